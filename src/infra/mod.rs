// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that don't belong in any one
// business layer:
//
//   config_store.rs — LoaderConfig as JSON on disk
//                     Partial files fall back to defaults.
//
//   report.rs       — Split summaries
//                     Row counts and per-class label sums,
//                     rendered as a table or as JSON.
//
// Reference: Rust Book §9 (Error Handling with anyhow)

/// Loader config reading and writing
pub mod config_store;

/// Per-subset row and label summaries
pub mod report;
