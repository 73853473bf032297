mod text;

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use haitable::{ConfigurationError, HaiTable, RowId, TableConfig};
use simplelog::{Config, LevelFilter, WriteLogger};

#[derive(Parser, Debug)]
#[command(name = "haitable")]
#[command(about = "Load a table configuration and print the rendered table")]
#[command(version)]
struct Args {
    /// Table configuration (JSON)
    config: PathBuf,

    /// Sort by a column; repeat to cycle asc, desc, off
    #[arg(long, value_name = "COL")]
    sort: Vec<String>,

    /// Add a column to a multi-column sort
    #[arg(long, value_name = "COL")]
    multi_sort: Vec<String>,

    /// Global filter text
    #[arg(long, value_name = "TEXT")]
    filter: Option<String>,

    /// Page to show (1-based)
    #[arg(long, value_name = "N")]
    page: Option<usize>,

    #[arg(long, value_name = "N")]
    page_size: Option<usize>,

    /// Toggle selection of a row by id
    #[arg(long, value_name = "ROW")]
    select: Vec<String>,

    /// Click the select-all checkbox
    #[arg(long)]
    select_all: bool,

    /// Body scroll offset in pixels
    #[arg(long, value_name = "PX", default_value_t = 0)]
    scroll_top: u64,

    /// Body viewport height in pixels
    #[arg(long, value_name = "PX", default_value_t = 360)]
    viewport: u64,

    #[arg(long, value_name = "PATH", default_value = "haitable.log")]
    log_file: PathBuf,

    #[arg(long, value_name = "LEVEL", default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid table configuration: {0}")]
    Config(#[from] ConfigurationError),
}

fn load(path: &PathBuf) -> Result<HaiTable, CliError> {
    let json = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.clone(),
        source,
    })?;
    let config = TableConfig::from_json(&json)?;
    Ok(HaiTable::new(config)?)
}

fn apply(table: &HaiTable, args: &Args) {
    if let Some(page_size) = args.page_size {
        table.set_page_size(page_size);
    }
    for column in &args.sort {
        table.sort_by(column, false);
    }
    for column in &args.multi_sort {
        table.sort_by(column, true);
    }
    if let Some(filter) = &args.filter {
        table.set_global_filter(filter);
    }
    if args.select_all {
        table.toggle_select_all();
    }
    for row in &args.select {
        table.toggle_row_selection(&RowId::new(row.as_str()));
    }
    if let Some(page) = args.page {
        let page_size = table.state().pagination.page_size;
        table.set_pagination(page.saturating_sub(1), page_size);
    }
    table.set_scroll(args.scroll_top, args.viewport);
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match File::create(&args.log_file) {
        Ok(file) => {
            if let Err(e) = WriteLogger::init(args.log_level, Config::default(), file) {
                eprintln!("Failed to initialize logger: {}", e);
            }
        }
        Err(e) => eprintln!("Failed to create log file: {}", e),
    }

    let table = match load(&args.config) {
        Ok(table) => table,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    apply(&table, &args);
    for line in text::render(&table.render()) {
        println!("{}", line);
    }
    table.unmount();
    ExitCode::SUCCESS
}
