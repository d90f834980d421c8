// ============================================================
// Layer 5 — Sequence Labeling Head
// ============================================================
// One label per token (NER, POS tagging, ...):
//
//   input ──► BERT ──► sequence output   [batch, seq_len, hidden]
//                          │
//                       dropout (p = 0.1, autodiff backends only)
//                          │
//                       linear            [batch, seq_len, num_classes]
//                          │
//       softmax + argmax over classes     [batch, seq_len]
//
// Burn's Linear applies to the last axis, so the same weights
// are shared by every position.

use std::path::Path;

use anyhow::{ensure, Result};
use burn::{
    nn::{Dropout, DropoutConfig, Linear, LinearConfig},
    prelude::*,
    tensor::activation::softmax,
};

use crate::infra::checkpoint::build_encoder;
use crate::ml::{
    bert::{BertConfig, BertModel},
    input::EncoderInput,
    predict::softmax_argmax,
};

#[derive(Config, Debug)]
pub struct SequenceLabelerConfig {
    pub num_classes: usize,
    #[config(default = 0.1)]
    pub dropout:     f64,
}

impl SequenceLabelerConfig {
    pub fn init<B: Backend>(&self, bert_model: BertModel<B>, device: &B::Device) -> Result<SequenceLabeler<B>> {
        ensure!(self.num_classes >= 1, "num_classes must be at least 1");
        let linear  = LinearConfig::new(bert_model.hidden_size(), self.num_classes).init(device);
        let dropout = DropoutConfig::new(self.dropout).init();
        Ok(SequenceLabeler { bert_model, linear, dropout, num_classes: self.num_classes })
    }
}

#[derive(Module, Debug)]
pub struct SequenceLabeler<B: Backend> {
    pub bert_model:  BertModel<B>,
    pub linear:      Linear<B>,
    pub dropout:     Dropout,
    pub num_classes: usize,
}

impl<B: Backend> SequenceLabeler<B> {
    pub fn new(
        num_classes:        usize,
        config:             &BertConfig,
        tf_checkpoint_path: Option<&Path>,
        device:             &B::Device,
    ) -> Result<Self> {
        let bert_model = build_encoder(config, tf_checkpoint_path, device)?;
        let head = SequenceLabelerConfig::new(num_classes).init(bert_model, device)?;
        tracing::info!("Sequence labeling head ready: {} classes", num_classes);
        Ok(head)
    }

    /// input: [batch, seq_len] ×3 → logits: [batch, seq_len, num_classes]
    pub fn forward(&self, input: EncoderInput<B>) -> Tensor<B, 3> {
        let sequence_output = self.bert_model.forward(input).sequence_output;
        self.linear.forward(self.dropout.forward(sequence_output))
    }

    /// Per-token class probabilities: [batch, seq_len, num_classes]
    pub fn probabilities(&self, input: EncoderInput<B>) -> Tensor<B, 3> {
        softmax(self.forward(input), 2)
    }

    /// Predicted label per token: [batch, seq_len]
    pub fn predict(&self, input: EncoderInput<B>) -> Tensor<B, 2, Int> {
        softmax_argmax(self.forward(input), 2)
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TokenBatch;
    use burn::backend::{ndarray::NdArrayDevice, Autodiff, NdArray};
    use burn::module::AutodiffModule;

    type TestBackend = NdArray;

    fn demo_input(device: &NdArrayDevice) -> EncoderInput<TestBackend> {
        EncoderInput::from_batch(&TokenBatch::demo(), device)
    }

    #[test]
    fn forward_and_predict_shapes() {
        let device = NdArrayDevice::default();
        let head = SequenceLabeler::<TestBackend>::new(5, &BertConfig::tiny(), None, &device).unwrap();

        assert_eq!(head.forward(demo_input(&device)).dims(), [1, 7, 5]);
        assert_eq!(head.predict(demo_input(&device)).dims(), [1, 7]);
    }

    #[test]
    fn labels_stay_within_class_range() {
        let device = NdArrayDevice::default();
        let head = SequenceLabeler::<TestBackend>::new(3, &BertConfig::tiny(), None, &device).unwrap();
        let batch = TokenBatch::with_default_positions(
            vec![vec![7, 8, 9, 10, 11], vec![12, 13, 14, 15, 16]],
            vec![vec![0; 5], vec![1; 5]],
        )
        .unwrap();

        let labels = head.predict(EncoderInput::from_batch(&batch, &device));
        assert_eq!(labels.dims(), [2, 5]);
        let labels: Vec<i64> = labels.into_data().to_vec().unwrap();
        assert!(labels.iter().all(|&l| (0..3).contains(&l)));
    }

    #[test]
    fn single_class_labels_every_token_zero() {
        let device = NdArrayDevice::default();
        let head = SequenceLabeler::<TestBackend>::new(1, &BertConfig::tiny(), None, &device).unwrap();

        assert_eq!(head.forward(demo_input(&device)).dims(), [1, 7, 1]);
        let labels: Vec<i64> = head.predict(demo_input(&device)).into_data().to_vec().unwrap();
        assert_eq!(labels, vec![0; 7]);
    }

    #[test]
    fn per_token_probabilities_are_normalised() {
        let device = NdArrayDevice::default();
        let head = SequenceLabeler::<TestBackend>::new(5, &BertConfig::tiny(), None, &device).unwrap();

        let probs = head.probabilities(demo_input(&device));
        let per_token: Vec<f32> = probs.sum_dim(2).into_data().to_vec().unwrap();
        assert_eq!(per_token.len(), 7);
        assert!(per_token.iter().all(|p| (p - 1.0).abs() < 1e-5));
    }

    #[test]
    fn evaluation_forward_is_deterministic() {
        let device = NdArrayDevice::default();
        let head = SequenceLabeler::<TestBackend>::new(5, &BertConfig::tiny(), None, &device).unwrap();

        let a: Vec<f32> = head.forward(demo_input(&device)).into_data().to_vec().unwrap();
        let b: Vec<f32> = head.forward(demo_input(&device)).into_data().to_vec().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn training_mode_keeps_shapes_and_valid_model_is_deterministic() {
        type TrainBackend = Autodiff<NdArray>;
        let device = NdArrayDevice::default();
        let head = SequenceLabeler::<TrainBackend>::new(5, &BertConfig::tiny(), None, &device).unwrap();
        let input = EncoderInput::<TrainBackend>::from_batch(&TokenBatch::demo(), &device);
        assert_eq!(head.forward(input.clone()).dims(), [1, 7, 5]);
        assert_eq!(head.predict(input).dims(), [1, 7]);

        let eval_head = head.valid();
        let a: Vec<f32> = eval_head.forward(demo_input(&device)).into_data().to_vec().unwrap();
        let b: Vec<f32> = eval_head.forward(demo_input(&device)).into_data().to_vec().unwrap();
        assert_eq!(a, b);
    }
}
