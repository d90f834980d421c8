// ============================================================
// Layer 2 — Init Use Case
// ============================================================
// Produces a checkpoint directory the demo can load:
//
//   Step 1: Pick the encoder config   (file, or BertConfig::tiny)
//   Step 2: Build a random encoder    (Layer 5 - ml)
//   Step 3: Save config + weights     (Layer 6 - infra)

use std::path::PathBuf;

use anyhow::Result;
use burn::prelude::*;

use crate::infra::checkpoint::{load_config, CheckpointManager};
use crate::ml::bert::{BertConfig, BertModel};

#[derive(Debug, Clone)]
pub struct InitConfig {
    /// Existing bert_config.json to copy; `None` uses the tiny config
    pub config_path: Option<PathBuf>,
    pub out_dir:     PathBuf,
}

/// Where the files ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub config_path:  PathBuf,
    pub weights_path: PathBuf,
}

pub struct InitUseCase {
    config: InitConfig,
}

impl InitUseCase {
    pub fn new(config: InitConfig) -> Self {
        Self { config }
    }

    pub fn execute<B: Backend>(&self, device: &B::Device) -> Result<InitReport> {
        let bert_config = match &self.config.config_path {
            Some(path) => load_config(path)?,
            None       => BertConfig::tiny(),
        };

        let model: BertModel<B> = bert_config.init(device)?;

        let manager = CheckpointManager::new(&self.config.out_dir)?;
        manager.save_config(&bert_config)?;
        manager.save_encoder(&model)?;

        tracing::info!("Wrote checkpoint to '{}'", self.config.out_dir.display());
        Ok(InitReport {
            config_path:  manager.config_path(),
            weights_path: manager.weights_path(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::checkpoint::build_encoder;
    use burn::backend::{ndarray::NdArrayDevice, NdArray};

    type TestBackend = NdArray;

    #[test]
    fn writes_a_loadable_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let device = NdArrayDevice::default();
        let report = InitUseCase::new(InitConfig {
            config_path: None,
            out_dir:     dir.path().join("ckpt"),
        })
        .execute::<TestBackend>(&device)
        .unwrap();

        let cfg = load_config(&report.config_path).unwrap();
        assert_eq!(cfg, BertConfig::tiny());
        assert!(build_encoder::<TestBackend>(&cfg, Some(&report.weights_path), &device).is_ok());
    }

    #[test]
    fn copies_a_given_config() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source.json");
        let custom = BertConfig { hidden_size: 16, num_attention_heads: 2, ..BertConfig::tiny() };
        crate::infra::checkpoint::save_config(&custom, &source).unwrap();

        let report = InitUseCase::new(InitConfig {
            config_path: Some(source),
            out_dir:     dir.path().join("out"),
        })
        .execute::<TestBackend>(&NdArrayDevice::default())
        .unwrap();

        assert_eq!(load_config(&report.config_path).unwrap(), custom);
    }
}
