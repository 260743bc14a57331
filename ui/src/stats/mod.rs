//! Dataset overview shown once an analysis lands.

mod panel;
pub use panel::StatsPanel;

use serde_json::{Map, Value};

use crate::core::format;

/// Rows of the correlation list. Capped so wide tables stay readable.
pub const MAX_CORRELATIONS: usize = 8;

/// Column order for the preview table: first row's keys, then any new keys
/// later rows introduce.
pub fn preview_columns(rows: &[Map<String, Value>]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !columns.iter().any(|existing| existing == key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

pub fn preview_cell(row: &Map<String, Value>, column: &str) -> String {
    match row.get(column) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => match number.as_f64() {
            Some(value) if number.is_f64() => format::format_number(value, 2),
            _ => number.to_string(),
        },
        Some(other) => other.to_string(),
    }
}

pub fn total_missing(stats: &api::Stats) -> u64 {
    stats.basic_info.missing_values.values().sum()
}
