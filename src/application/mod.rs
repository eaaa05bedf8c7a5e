// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the data layer to accomplish one goal at a time
// (load a dataset, or drive a batch iterator through epochs).
//
// Rules for this layer:
//   - No parsing or tensor math here (that's Layer 4)
//   - No printing here (that's Layer 1)
//   - Only workflow coordination and configuration
//
// Reference: Clean Architecture pattern

/// Loader configuration and the load → split → encode pipeline
pub mod load_use_case;

/// Multi-epoch smoke run over the batch iterator
pub mod iterate_use_case;
