//! MySQL Tabular EXPLAIN Reader
//!
//! Turns the classic table printed by MySQL clients for `EXPLAIN <query>` into
//! raw row maps the normalizer understands. Two layouts are accepted:
//! - Tab-separated (`mysql --batch`, most drivers' text dumps)
//! - Pipe-bordered (interactive `mysql` client)
//!
//! Header-less output is recognized in three widths:
//! - 10 columns: MySQL 5.6 and older plain `EXPLAIN`
//! - 11 columns: adds `filtered` (`EXPLAIN EXTENDED`)
//! - 12 columns: adds `partitions` as well (5.7 and later)
//!
//! ```text
//! id | select_type | table | [partitions] | type | possible_keys | key | key_len | ref | rows | [filtered] | Extra
//! ```
//!
//! When a header line is present its column names are used as-is; otherwise
//! the layout is inferred from the number of cells.
//!
//! # Examples
//!
//! ```
//! use planguard_analyzer::explain::tabular::parse_tabular_rows;
//!
//! let text = "\
//! +----+-------------+-------+------+---------------+------+---------+------+------+-------------+
//! | id | select_type | table | type | possible_keys | key  | key_len | ref  | rows | Extra       |
//! +----+-------------+-------+------+---------------+------+---------+------+------+-------------+
//! |  1 | SIMPLE      | users | ALL  | NULL          | NULL | NULL    | NULL |  500 | Using where |
//! +----+-------------+-------+------+---------------+------+---------+------+------+-------------+";
//!
//! let rows = parse_tabular_rows(text);
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0]["type"], "ALL");
//! assert_eq!(rows[0]["rows"], "500");
//! ```

use crate::explain::plan::RawRowMap;
use serde_json::Value;

const COLUMNS_CLASSIC: [&str; 10] = [
    "id",
    "select_type",
    "table",
    "type",
    "possible_keys",
    "key",
    "key_len",
    "ref",
    "rows",
    "Extra",
];

const COLUMNS_WITH_FILTERED: [&str; 11] = [
    "id",
    "select_type",
    "table",
    "type",
    "possible_keys",
    "key",
    "key_len",
    "ref",
    "rows",
    "filtered",
    "Extra",
];

const COLUMNS_WITH_PARTITIONS: [&str; 12] = [
    "id",
    "select_type",
    "table",
    "partitions",
    "type",
    "possible_keys",
    "key",
    "key_len",
    "ref",
    "rows",
    "filtered",
    "Extra",
];

/// Parses MySQL tabular EXPLAIN text into raw row maps
///
/// Border lines, blank lines and anything that isn't a data row are skipped.
/// Every cell is kept as a string, including `NULL`, exactly as the server
/// printed it; sentinel handling belongs to the normalizer.
pub fn parse_tabular_rows(text: &str) -> Vec<RawRowMap> {
    let mut header: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    for line in text.lines() {
        let Some(cells) = split_cells(line) else {
            continue;
        };

        if is_header(&cells) {
            header = Some(cells.iter().map(|c| c.to_string()).collect());
            continue;
        }

        if !is_data_row(&cells) {
            tracing::trace!(line, "skipping non-data line in tabular EXPLAIN");
            continue;
        }

        let columns: Vec<&str> = match &header {
            Some(names) => names.iter().map(String::as_str).collect(),
            None => match infer_columns(cells.len()) {
                Some(columns) => columns.to_vec(),
                None => {
                    tracing::trace!(cells = cells.len(), "unrecognized tabular EXPLAIN width");
                    continue;
                }
            },
        };

        let row: RawRowMap = columns
            .iter()
            .zip(cells.iter())
            .map(|(name, cell)| (name.to_string(), Value::String(cell.to_string())))
            .collect();
        rows.push(row);
    }

    tracing::debug!(rows = rows.len(), "parsed tabular EXPLAIN output");
    rows
}

/// Splits a line into trimmed cells, or `None` for blank and border lines
fn split_cells(line: &str) -> Option<Vec<&str>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('+') {
        return None;
    }

    if trimmed.starts_with('|') {
        let inner = trimmed.trim_start_matches('|').trim_end_matches('|');
        return Some(inner.split('|').map(str::trim).collect());
    }

    if trimmed.contains('\t') {
        return Some(line.split('\t').map(str::trim).collect());
    }

    None
}

fn is_header(cells: &[&str]) -> bool {
    cells.contains(&"select_type") && cells.contains(&"type")
}

/// A data row starts with a numeric select id, or `NULL` for UNION RESULT rows
fn is_data_row(cells: &[&str]) -> bool {
    cells
        .first()
        .is_some_and(|id| *id == "NULL" || id.parse::<u32>().is_ok())
}

fn infer_columns(width: usize) -> Option<&'static [&'static str]> {
    match width {
        10 => Some(&COLUMNS_CLASSIC),
        11 => Some(&COLUMNS_WITH_FILTERED),
        12 => Some(&COLUMNS_WITH_PARTITIONS),
        _ => None,
    }
}
