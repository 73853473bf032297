//! Global filter ranking.
//!
//! Fuzzy mode scores cells with nucleo-matcher; any score is a pass. Contains
//! mode is a case-insensitive substring test ranked exact > prefix > infix.

use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};
use serde_json::Value;

use crate::column::Column;
use crate::options::GlobalFilterFn;
use crate::render::value_to_text;
use crate::source::{Row, RowId};

/// Outcome of matching one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRank {
    pub passed: bool,
    /// Relevance, higher is better. Zero when nothing matched.
    pub rank: u32,
}

impl MatchRank {
    const MISS: MatchRank = MatchRank {
        passed: false,
        rank: 0,
    };

    fn pass(rank: u32) -> Self {
        Self { passed: true, rank }
    }
}

/// Outcome of matching a whole row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRank {
    pub row_id: RowId,
    pub passed: bool,
    pub rank: u32,
}

/// Whether a row should be dropped without ranking it.
///
/// With no filter text nothing is ever removed. Otherwise a row without a
/// rank, or whose rank did not pass, is removed.
pub fn auto_remove(rank: Option<&FilterRank>, filter_text: &str) -> bool {
    if filter_text.trim().is_empty() {
        return false;
    }
    !rank.is_some_and(|r| r.passed)
}

enum Query {
    Fuzzy(Pattern),
    Contains(String),
}

/// Ranks cells and rows against the global filter text.
pub struct FilterEngine {
    mode: GlobalFilterFn,
    matcher: Matcher,
    buf: Vec<char>,
}

impl std::fmt::Debug for FilterEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterEngine")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self::new(GlobalFilterFn::default())
    }
}

impl FilterEngine {
    pub fn new(mode: GlobalFilterFn) -> Self {
        Self {
            mode,
            matcher: Matcher::new(Config::DEFAULT),
            buf: Vec::new(),
        }
    }

    pub fn mode(&self) -> GlobalFilterFn {
        self.mode
    }

    fn query(&self, text: &str) -> Query {
        match self.mode {
            GlobalFilterFn::Fuzzy => Query::Fuzzy(Pattern::new(
                text,
                CaseMatching::Ignore,
                Normalization::Smart,
                AtomKind::Fuzzy,
            )),
            GlobalFilterFn::Contains => Query::Contains(text.to_lowercase()),
        }
    }

    fn match_query(&mut self, query: &Query, cell: Option<&Value>) -> MatchRank {
        let Some(text) = cell.and_then(value_to_text) else {
            return MatchRank::MISS;
        };
        match query {
            Query::Fuzzy(pattern) => {
                let haystack = Utf32Str::new(&text, &mut self.buf);
                pattern
                    .score(haystack, &mut self.matcher)
                    .map(MatchRank::pass)
                    .unwrap_or(MatchRank::MISS)
            }
            Query::Contains(needle) => {
                let hay = text.to_lowercase();
                if hay == *needle {
                    MatchRank::pass(3)
                } else if hay.starts_with(needle.as_str()) {
                    MatchRank::pass(2)
                } else if hay.contains(needle.as_str()) {
                    MatchRank::pass(1)
                } else {
                    MatchRank::MISS
                }
            }
        }
    }

    /// Match one cell value against the filter text.
    ///
    /// Empty filter text passes everything with rank zero.
    pub fn matches(&mut self, cell: Option<&Value>, filter_text: &str) -> MatchRank {
        let text = filter_text.trim();
        if text.is_empty() {
            return MatchRank::pass(0);
        }
        let query = self.query(text);
        self.match_query(&query, cell)
    }

    /// Rank a row: best rank over its filterable columns.
    pub fn rank_row(&mut self, row: &Row, columns: &[Column], filter_text: &str) -> FilterRank {
        let text = filter_text.trim();
        if text.is_empty() {
            return FilterRank {
                row_id: row.id.clone(),
                passed: true,
                rank: 0,
            };
        }
        let query = self.query(text);
        self.rank_with(&query, row, columns)
    }

    /// Rank every row, parsing the filter text once.
    pub fn rank_rows(&mut self, rows: &[Row], columns: &[Column], filter_text: &str) -> Vec<FilterRank> {
        let text = filter_text.trim();
        if text.is_empty() {
            return rows
                .iter()
                .map(|row| FilterRank {
                    row_id: row.id.clone(),
                    passed: true,
                    rank: 0,
                })
                .collect();
        }
        let query = self.query(text);
        rows.iter()
            .map(|row| self.rank_with(&query, row, columns))
            .collect()
    }

    fn rank_with(&mut self, query: &Query, row: &Row, columns: &[Column]) -> FilterRank {
        let mut best = MatchRank::MISS;
        for column in columns.iter().filter(|c| c.can_filter()) {
            let m = self.match_query(query, column.value(row));
            if m.passed && (!best.passed || m.rank > best.rank) {
                best = m;
            }
        }
        FilterRank {
            row_id: row.id.clone(),
            passed: best.passed,
            rank: best.rank,
        }
    }
}
