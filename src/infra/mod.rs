// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// File-system concerns shared by the application layer and
// the head constructors:
//
//   checkpoint.rs — bert_config.json reading/writing and
//                   encoder weight save/load through Burn's
//                   CompactRecorder (.mpk.gz)
//
// Reference: Burn Book §5 (Checkpointing)

/// Encoder config and weight persistence
pub mod checkpoint;
