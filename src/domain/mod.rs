// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain types that describe the problem: parsed records, the
// label → class-id mapping, the error vocabulary, and the
// RecordSource abstraction.
//
// Nothing here touches files or tensors.
//
// Why keep this layer pure?
//   The splitter, encoder and CLI all depend on these types.
//   Without I/O or ndarray here they can be built and tested
//   from plain values.
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

/// Parsed records, class index and per-class buffers
pub mod record;

/// DatasetError and the crate-wide Result alias
pub mod error;

/// Abstractions implemented by the data layer
pub mod traits;
