//! Text heuristics shared by the rules
//!
//! These read the lower-cased plan text and are only consulted when a plan has
//! no structured rows. They are deliberately coarse: a Postgres plan that mixes
//! a `Seq Scan` node with an `Index Scan` node elsewhere does not match, and
//! SQLite only matches the `SCAN TABLE` / `SEARCH TABLE` wording.

use crate::explain::BackendKind;
use crate::explain::plan::contains_any;

/// Substrings that indicate a scan on backends with no dedicated heuristic
pub const GENERIC_SCAN_TERMS: [&str; 3] = ["full scan", "table scan", "seq scan"];

/// Substrings the access-type rule treats as a bad access path without rows.
/// `index scan` is included even though it is usually a good plan on Postgres.
pub const ACCESS_SCAN_TERMS: [&str; 4] = ["full scan", "table scan", "seq scan", "index scan"];

const POSTGRES_SEQ_SCAN: &str = "seq scan";
const POSTGRES_INDEX_SCAN: &str = "index scan";
const SQLITE_SCAN: &str = "scan table";
const SQLITE_SEARCH: &str = "search table";

/// Returns true if the plan text shows a table being scanned without an index
///
/// `raw_text` must already be lower-cased.
pub fn matches_scan_symptom(raw_text: &str, backend: BackendKind) -> bool {
    match backend {
        BackendKind::PostgresLike => {
            raw_text.contains(POSTGRES_SEQ_SCAN) && !raw_text.contains(POSTGRES_INDEX_SCAN)
        }
        BackendKind::SqliteLike => {
            raw_text.contains(SQLITE_SCAN) && !raw_text.contains(SQLITE_SEARCH)
        }
        BackendKind::MySqlLike | BackendKind::Generic => contains_any(raw_text, &GENERIC_SCAN_TERMS),
    }
}

/// Returns true if the plan text mentions any scan, indexed or not
pub fn matches_access_symptom(raw_text: &str) -> bool {
    contains_any(raw_text, &ACCESS_SCAN_TERMS)
}
