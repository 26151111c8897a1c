/// Session roll history shown beside the die
use polyroll_core::{DieType, RollOutcome};

/// One recorded roll, numbered from 1 in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub number: usize,
    pub die: DieType,
    pub count: u32,
    pub modifier: i32,
    pub results: Vec<i64>,
    pub total: i64,
}

/// Append-only log of the rolls made in this session.
#[derive(Debug, Clone, Default)]
pub struct RollHistory {
    entries: Vec<HistoryEntry>,
}

impl RollHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: &RollOutcome) -> &HistoryEntry {
        let entry = HistoryEntry {
            number: self.entries.len() + 1,
            die: outcome.die,
            count: outcome.count,
            modifier: outcome.modifier,
            results: outcome.results.clone(),
            total: outcome.total,
        };
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry; numbering starts again at 1.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Header plus the newest entries that fit in `rows` lines of `width` columns.
    pub fn table(&self, rows: usize, width: usize) -> Vec<String> {
        if rows == 0 || width == 0 {
            return Vec::new();
        }

        let header = format!(
            "{:>4} {:<4} {:>3} {:>4} {:>6}  results",
            "#", "die", "n", "mod", "total"
        );
        let mut lines = vec![fit(&header, width)];
        let room = rows - 1;
        let start = self.entries.len().saturating_sub(room);
        for entry in &self.entries[start..] {
            let results = entry
                .results
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join(",");
            let line = format!(
                "{:>4} {:<4} {:>3} {:>+4} {:>6}  {}",
                entry.number, entry.die, entry.count, entry.modifier, entry.total, results
            );
            lines.push(fit(&line, width));
        }
        lines
    }
}

/// Truncate to `width` characters, marking the cut with `~`.
fn fit(line: &str, width: usize) -> String {
    if line.chars().count() <= width {
        return line.to_string();
    }
    let mut cut: String = line.chars().take(width.saturating_sub(1)).collect();
    cut.push('~');
    cut
}
