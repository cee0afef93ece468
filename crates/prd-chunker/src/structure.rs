use crate::patterns;
use serde::{Deserialize, Serialize};

/// Share of table lines above which a document counts as table-heavy
pub const HEAVY_TABLE_RATIO: f64 = 0.20;

/// Structural signals of a document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructureInfo {
    pub heading_count: usize,
    pub h2_count: usize,
    /// A table header separator row is present
    pub has_table: bool,
    pub has_requirement_numbers: bool,
    /// Lines starting with `|` over all lines
    pub table_line_ratio: f64,
    pub is_heavy_table: bool,
    /// Requirement-document score, 0-5
    pub score: u8,
}

impl StructureInfo {
    /// Recompute `score` and `is_heavy_table` from the raw signals
    #[must_use]
    pub fn scored(mut self) -> Self {
        self.is_heavy_table = self.table_line_ratio > HEAVY_TABLE_RATIO;

        let mut score = 0;
        if self.heading_count >= 3 {
            score += 1;
        }
        if self.has_requirement_numbers {
            score += 2;
        }
        if self.has_table {
            score += 1;
        }
        if self.h2_count >= 2 {
            score += 1;
        }
        self.score = score;
        self
    }

    /// Whether the document reads like a requirement document
    #[must_use]
    pub const fn is_structured(&self) -> bool {
        self.score >= 3
    }
}

/// Scan raw text for structural signals
#[must_use]
pub fn analyze(text: &str) -> StructureInfo {
    let mut info = StructureInfo::default();
    let mut line_count = 0usize;
    let mut table_lines = 0usize;

    for line in text.split('\n') {
        line_count += 1;

        if let Some((level, _)) = patterns::heading(line) {
            info.heading_count += 1;
            if level == 2 {
                info.h2_count += 1;
            }
        }
        if patterns::is_table_line(line) {
            table_lines += 1;
            if !info.has_table && patterns::is_table_separator(line) {
                info.has_table = true;
            }
        }
    }

    info.has_requirement_numbers = patterns::has_requirement_id(text);
    info.table_line_ratio = table_lines as f64 / line_count as f64;
    info.scored()
}
