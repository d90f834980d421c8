// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types that describe what the heads consume and
// which heads exist.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs and enums
//
// The ML layer converts a TokenBatch into tensors; nothing
// here knows what a backend or a device is.

// The (tokens, positions, segments) input triple
pub mod token_batch;

// The three task heads, by name
pub mod head_kind;

pub use head_kind::HeadKind;
pub use token_batch::TokenBatch;
