// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Workflows the CLI can run:
//
//   demo_use_case.rs — build every head from one config and
//                      checkpoint, run forward + predict on the
//                      fixed demo input, report output shapes
//
//   init_use_case.rs — write a config and randomly initialised
//                      encoder weights to a checkpoint directory
//
// No printing here; use cases return reports and the CLI
// decides how to show them.

pub mod demo_use_case;

pub mod init_use_case;

/// Backend used by the CLI workflows.
#[cfg(feature = "wgpu")]
pub type CliBackend = burn::backend::Wgpu;

#[cfg(not(feature = "wgpu"))]
pub type CliBackend = burn::backend::NdArray;
