// ============================================================
// Layer 3 — Core Traits
// ============================================================
// The application layer loads records through this trait and
// never sees how they are stored. CsvRecordSource reads the
// delimited file; tests feed in-memory text through the same
// seam.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use crate::domain::error::Result;
use crate::domain::record::GroupedRecords;

// ─── RecordSource ─────────────────────────────────────────────────────────────
/// Anything that can produce class-grouped feature records.
///
/// Implementations:
///   - CsvRecordSource → a quoted, comma-separated file or string
pub trait RecordSource {
    /// Parse every record and bucket it by label.
    fn load_grouped(&self) -> Result<GroupedRecords>;
}
