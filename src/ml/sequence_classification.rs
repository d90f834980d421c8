// ============================================================
// Layer 5 — Sequence Classification Head
// ============================================================
// One label per input sequence:
//
//   input ──► BERT ──► pooled [CLS] vector  [batch, hidden]
//                          │
//                       dropout (p = 0.1, autodiff backends only)
//                          │
//                       linear                [batch, num_classes]
//                          │
//              softmax + argmax over classes  [batch]

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
pub struct SequenceClassifierConfig {
    pub num_classes: usize,
    #[config(default = 0.1)]
    pub dropout:     f64,
}

impl SequenceClassifierConfig {
    /// Attach a fresh head to an already built encoder.
    pub fn init<B: Backend>(&self, bert_model: BertModel<B>, device: &B::Device) -> Result<SequenceClassifier<B>> {
        ensure!(self.num_classes >= 1, "num_classes must be at least 1");
        let linear  = LinearConfig::new(bert_model.hidden_size(), self.num_classes).init(device);
        let dropout = DropoutConfig::new(self.dropout).init();
        Ok(SequenceClassifier { bert_model, linear, dropout, num_classes: self.num_classes })
    }
}

#[derive(Module, Debug)]
pub struct SequenceClassifier<B: Backend> {
    pub bert_model:  BertModel<B>,
    pub linear:      Linear<B>,
    pub dropout:     Dropout,
    pub num_classes: usize,
}

impl<B: Backend> SequenceClassifier<B> {
    /// Build the encoder from `config`, optionally restore its weights
    /// from `tf_checkpoint_path`, and attach a `num_classes`-way head.
    pub fn new(
        num_classes:        usize,
        config:             &BertConfig,
        tf_checkpoint_path: Option<&Path>,
        device:             &B::Device,
    ) -> Result<Self> {
        let bert_model = build_encoder(config, tf_checkpoint_path, device)?;
        let head = SequenceClassifierConfig::new(num_classes).init(bert_model, device)?;
        tracing::info!("Sequence classification head ready: {} classes", num_classes);
        Ok(head)
    }

    /// input: [batch, seq_len] ×3 → logits: [batch, num_classes]
    pub fn forward(&self, input: EncoderInput<B>) -> Tensor<B, 2> {
        let pooled = self.bert_model.forward(input).pooled_output;
        self.linear.forward(self.dropout.forward(pooled))
    }

    /// Class probabilities: [batch, num_classes]
    pub fn probabilities(&self, input: EncoderInput<B>) -> Tensor<B, 2> {
        softmax(self.forward(input), 1)
    }

    /// Predicted class per sequence: [batch]
    pub fn predict(&self, input: EncoderInput<B>) -> Tensor<B, 1, Int> {
        softmax_argmax(self.forward(input), 1)
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TokenBatch;
    use crate::ml::predict::argmax;
    use burn::backend::{ndarray::NdArrayDevice, Autodiff, NdArray};
    use burn::module::AutodiffModule;

    type TestBackend = NdArray;

    fn demo_input(device: &NdArrayDevice) -> EncoderInput<TestBackend> {
        EncoderInput::from_batch(&TokenBatch::demo(), device)
    }

    #[test]
    fn forward_and_predict_shapes() {
        let device = NdArrayDevice::default();
        let head = SequenceClassifier::<TestBackend>::new(5, &BertConfig::tiny(), None, &device).unwrap();

        assert_eq!(head.forward(demo_input(&device)).dims(), [1, 5]);
        assert_eq!(head.predict(demo_input(&device)).dims(), [1]);
        assert_eq!(head.num_classes(), 5);
    }

    #[test]
    fn batch_of_three_gives_three_predictions() {
        let device = NdArrayDevice::default();
        let head = SequenceClassifier::<TestBackend>::new(4, &BertConfig::tiny(), None, &device).unwrap();
        let batch = TokenBatch::with_default_positions(
            vec![vec![1, 2, 3, 4], vec![5, 6, 7, 8], vec![9, 10, 11, 12]],
            vec![vec![0; 4], vec![0; 4], vec![0, 0, 1, 1]],
        )
        .unwrap();
        let input = EncoderInput::from_batch(&batch, &device);

        assert_eq!(head.forward(input.clone()).dims(), [3, 4]);
        let pred: Vec<i64> = head.predict(input).into_data().to_vec().unwrap();
        assert_eq!(pred.len(), 3);
        assert!(pred.iter().all(|&c| (0..4).contains(&c)));
    }

    #[test]
    fn single_class_is_allowed() {
        let device = NdArrayDevice::default();
        let head = SequenceClassifier::<TestBackend>::new(1, &BertConfig::tiny(), None, &device).unwrap();

        assert_eq!(head.forward(demo_input(&device)).dims(), [1, 1]);
        let pred: Vec<i64> = head.predict(demo_input(&device)).into_data().to_vec().unwrap();
        assert_eq!(pred, vec![0]);
    }

    #[test]
    fn zero_classes_is_rejected() {
        let device = NdArrayDevice::default();
        assert!(SequenceClassifier::<TestBackend>::new(0, &BertConfig::tiny(), None, &device).is_err());
    }

    #[test]
    fn evaluation_forward_is_deterministic() {
        let device = NdArrayDevice::default();
        let head = SequenceClassifier::<TestBackend>::new(5, &BertConfig::tiny(), None, &device).unwrap();

        let a: Vec<f32> = head.forward(demo_input(&device)).into_data().to_vec().unwrap();
        let b: Vec<f32> = head.forward(demo_input(&device)).into_data().to_vec().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn probabilities_sum_to_one_and_agree_with_predict() {
        let device = NdArrayDevice::default();
        let head = SequenceClassifier::<TestBackend>::new(5, &BertConfig::tiny(), None, &device).unwrap();

        let probs = head.probabilities(demo_input(&device));
        let total: f32 = probs.clone().sum().into_scalar().elem();
        assert!((total - 1.0).abs() < 1e-5);

        let from_probs: Tensor<TestBackend, 1, Int> = argmax(probs, 1);
        let from_probs: Vec<i64> = from_probs.into_data().to_vec().unwrap();
        let predicted: Vec<i64> = head.predict(demo_input(&device)).into_data().to_vec().unwrap();
        assert_eq!(from_probs, predicted);
    }

    #[test]
    fn training_mode_keeps_shapes_and_valid_model_is_deterministic() {
        type TrainBackend = Autodiff<NdArray>;
        let device = NdArrayDevice::default();
        let head = SequenceClassifier::<TrainBackend>::new(5, &BertConfig::tiny(), None, &device).unwrap();
        let input = EncoderInput::<TrainBackend>::from_batch(&TokenBatch::demo(), &device);
        assert_eq!(head.forward(input).dims(), [1, 5]);

        let eval_head = head.valid();
        let a: Vec<f32> = eval_head.forward(demo_input(&device)).into_data().to_vec().unwrap();
        let b: Vec<f32> = eval_head.forward(demo_input(&device)).into_data().to_vec().unwrap();
        assert_eq!(a, b);
    }
}
