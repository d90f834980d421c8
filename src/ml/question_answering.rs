// ============================================================
// Layer 5 — Question Answering Head
// ============================================================
// Extractive span prediction:
//
//   input ──► BERT ──► sequence output   [batch, seq_len, hidden]
//                          │
//                       linear (2 units)  [batch, seq_len, 2]
//                          │
//              ┌───────────┴───────────┐
//        start_logits             end_logits    [batch, seq_len]
//              │                       │
//     softmax + argmax         softmax + argmax  (over seq_len)
//              │                       │
//          start index             end index     [batch]
//
// No dropout before the projection, matching the reference
// BERT SQuAD head.
//
// Start and end are chosen independently. A predicted end that
// precedes the predicted start is returned as is; callers that
// need a valid span must search for one themselves.

use std::path::Path;

use anyhow::Result;
use burn::{
    nn::{Linear, LinearConfig},
    prelude::*,
    tensor::activation::softmax,
};

use crate::infra::checkpoint::build_encoder;
use crate::ml::{
    bert::{BertConfig, BertModel},
    input::EncoderInput,
    predict::softmax_argmax,
};

#[derive(Module, Debug)]
pub struct QuestionAnswerer<B: Backend> {
    pub bert_model: BertModel<B>,
    pub linear:     Linear<B>,
}

/// Per-position span scores (logits or probabilities).
#[derive(Debug, Clone)]
pub struct SpanLogits<B: Backend> {
    /// [batch, seq_len]
    pub start_logits: Tensor<B, 2>,
    /// [batch, seq_len]
    pub end_logits:   Tensor<B, 2>,
}

/// Predicted answer boundaries, one per sequence.
#[derive(Debug, Clone)]
pub struct SpanPrediction<B: Backend> {
    /// [batch]
    pub start: Tensor<B, 1, Int>,
    /// [batch]
    pub end:   Tensor<B, 1, Int>,
}

impl<B: Backend> QuestionAnswerer<B> {
    pub fn new(
        config:             &BertConfig,
        tf_checkpoint_path: Option<&Path>,
        device:             &B::Device,
    ) -> Result<Self> {
        let bert_model = build_encoder(config, tf_checkpoint_path, device)?;
        let head = Self::from_encoder(bert_model, device);
        tracing::info!("Question answering head ready");
        Ok(head)
    }

    /// Attach a fresh 2-unit projection to an already built encoder.
    pub fn from_encoder(bert_model: BertModel<B>, device: &B::Device) -> Self {
        let linear = LinearConfig::new(bert_model.hidden_size(), 2).init(device);
        Self { bert_model, linear }
    }

    /// input: [batch, seq_len] ×3 → start/end logits: [batch, seq_len] each
    pub fn forward(&self, input: EncoderInput<B>) -> SpanLogits<B> {
        let [batch_size, seq_len] = input.dims();
        let sequence_output = self.bert_model.forward(input).sequence_output;

        let logits = self.linear.forward(sequence_output); // [batch, seq_len, 2]
        let start_logits = logits.clone()
            .slice([0..batch_size, 0..seq_len, 0..1])
            .reshape([batch_size, seq_len]);
        let end_logits = logits
            .slice([0..batch_size, 0..seq_len, 1..2])
            .reshape([batch_size, seq_len]);

        SpanLogits { start_logits, end_logits }
    }

    /// Softmax over positions for start and end separately.
    pub fn probabilities(&self, input: EncoderInput<B>) -> SpanLogits<B> {
        let SpanLogits { start_logits, end_logits } = self.forward(input);
        SpanLogits {
            start_logits: softmax(start_logits, 1),
            end_logits:   softmax(end_logits, 1),
        }
    }

    /// Most likely start and end position per sequence: [batch] each
    pub fn predict(&self, input: EncoderInput<B>) -> SpanPrediction<B> {
        let SpanLogits { start_logits, end_logits } = self.forward(input);
        SpanPrediction {
            start: softmax_argmax(start_logits, 1),
            end:   softmax_argmax(end_logits, 1),
        }
    }
}
