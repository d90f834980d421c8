// ============================================================
// Layer 2 — Demo Use Case
// ============================================================
// Wires all three heads to one encoder config and runs them on
// the fixed demo input:
//
//   Step 1: Load bert_config.json              (Layer 6 - infra)
//   Step 2: Build the demo TokenBatch          (Layer 3 - domain)
//           and check it against the config
//   Step 3: For each requested head:
//             build head (+ checkpoint)        (Layer 5 - ml)
//             forward + predict
//             record output shapes
//
// Every head gets its own encoder, loaded from the same
// checkpoint when one is given.

use std::path::PathBuf;

use anyhow::{Context, Result};
use burn::prelude::*;

use crate::domain::{HeadKind, TokenBatch};
use crate::infra::checkpoint::load_config;
use crate::ml::{
    input::EncoderInput,
    question_answering::QuestionAnswerer,
    sequence_classification::SequenceClassifier,
    sequence_labeling::SequenceLabeler,
};

/// Inputs of one demo run.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub config_path:     PathBuf,
    pub checkpoint_path: Option<PathBuf>,
    pub num_classes:     usize,
    pub heads:           Vec<HeadKind>,
}

/// Output shapes of one head, in the order they were produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadReport {
    pub kind:   HeadKind,
    pub shapes: Vec<(&'static str, Vec<usize>)>,
}

impl HeadReport {
    /// `out: [1, 5], pred: [1]`
    pub fn shape_line(&self) -> String {
        self.shapes
            .iter()
            .map(|(name, dims)| format!("{name}: {dims:?}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub struct DemoUseCase {
    config: DemoConfig,
}

impl DemoUseCase {
    pub fn new(config: DemoConfig) -> Self {
        Self { config }
    }

    pub fn execute<B: Backend>(&self, device: &B::Device) -> Result<Vec<HeadReport>> {
        let cfg = &self.config;

        // ── Step 1: Encoder config ────────────────────────────────────────────
        let bert_config = load_config(&cfg.config_path)?;
        tracing::info!(
            "Loaded encoder config from '{}' (hidden={}, layers={})",
            cfg.config_path.display(),
            bert_config.hidden_size,
            bert_config.num_hidden_layers
        );
        let checkpoint = cfg.checkpoint_path.as_deref();

        // ── Step 2: Fixed input ───────────────────────────────────────────────
        let batch = TokenBatch::demo();
        bert_config.check_batch(&batch).with_context(|| {
            format!("Demo input does not fit the encoder in '{}'", cfg.config_path.display())
        })?;
        let input = EncoderInput::<B>::from_batch(&batch, device);

        // ── Step 3: Run each head ─────────────────────────────────────────────
        let mut reports = Vec::with_capacity(cfg.heads.len());
        for &kind in &cfg.heads {
            let shapes = match kind {
                HeadKind::SequenceClassification => {
                    let model = SequenceClassifier::<B>::new(cfg.num_classes, &bert_config, checkpoint, device)?;
                    let out  = model.forward(input.clone());
                    let pred = model.predict(input.clone());
                    vec![("out", out.dims().to_vec()), ("pred", pred.dims().to_vec())]
                }
                HeadKind::SequenceLabeling => {
                    let model = SequenceLabeler::<B>::new(cfg.num_classes, &bert_config, checkpoint, device)?;
                    let out  = model.forward(input.clone());
                    let pred = model.predict(input.clone());
                    vec![("out", out.dims().to_vec()), ("pred", pred.dims().to_vec())]
                }
                HeadKind::QuestionAnswering => {
                    let model = QuestionAnswerer::<B>::new(&bert_config, checkpoint, device)?;
                    let out  = model.forward(input.clone());
                    let pred = model.predict(input.clone());
                    vec![
                        ("out_s", out.start_logits.dims().to_vec()),
                        ("out_e", out.end_logits.dims().to_vec()),
                        ("pred_s", pred.start.dims().to_vec()),
                        ("pred_e", pred.end.dims().to_vec()),
                    ]
                }
            };
            let report = HeadReport { kind, shapes };
            tracing::debug!("{}: {}", kind, report.shape_line());
            reports.push(report);
        }

        Ok(reports)
    }
}
