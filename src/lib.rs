//! Task heads on a BERT encoder, built with Burn.
//!
//! Three heads share one pattern: encode the input triple,
//! project to a task-specific space, optionally pick the
//! arg-max.
//!
//! - [`ml::sequence_classification`] — one class per sequence
//! - [`ml::sequence_labeling`] — one class per token
//! - [`ml::question_answering`] — start/end span logits per token
//!
//! The input triple is [`domain::TokenBatch`] (plain Rust) or
//! [`ml::input::EncoderInput`] (tensors). Encoder configs and
//! weights are handled by [`infra::checkpoint`].

pub mod application;
pub mod cli;
pub mod domain;
pub mod infra;
pub mod ml;
