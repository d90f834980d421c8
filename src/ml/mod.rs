// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn model code lives here.
//
// What's in this layer:
//
//   input.rs   — EncoderInput: the (tokens, positions, segments)
//                triple as Int tensors [batch, seq_len]
//
//   bert.rs    — BertConfig (bert_config.json) and the encoder:
//                • token / position / segment embeddings
//                • post-LN transformer blocks (GELU FFN)
//                • tanh pooler over the first token
//
//   sequence_classification.rs
//              — pooled vector → dropout → linear → [batch, classes]
//
//   sequence_labeling.rs
//              — per-token vectors → dropout → linear
//                → [batch, seq_len, classes]
//
//   question_answering.rs
//              — per-token vectors → linear(2) → start / end logits
//
//   predict.rs — softmax + argmax over an axis
//
// Train vs. eval is decided by the backend: on an autodiff
// backend dropout is active, `model.valid()` turns it off.

pub mod input;

/// BERT encoder shared by every head
pub mod bert;

pub mod sequence_classification;
pub mod sequence_labeling;
pub mod question_answering;

/// Softmax / argmax selection
pub mod predict;
