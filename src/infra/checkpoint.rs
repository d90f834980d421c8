// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores encoder weights using Burn's CompactRecorder,
// and reads/writes the `bert_config.json` that describes them.
//
// A checkpoint directory written by `init` looks like:
//
//   checkpoints/
//     bert_config.json     ← encoder architecture (BertConfig)
//     bert_model.mpk.gz    ← encoder weights
//
// Checkpoint paths are given WITHOUT the `.mpk.gz` extension;
// the recorder appends it on both save and load.
//
// Loading fails with an error naming the path if the file is
// missing, unreadable, or holds weights whose shapes differ
// from the encoder described by the config.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{ensure, Context, Result};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};

use crate::ml::bert::{BertConfig, BertModel};

const CONFIG_FILE:  &str = "bert_config.json";
const WEIGHTS_FILE: &str = "bert_model";

/// Writes a config + weights pair into one directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create the manager, creating `dir` (and parents) if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create checkpoint directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    /// Weights path as passed to the recorder (no extension).
    pub fn weights_path(&self) -> PathBuf {
        self.dir.join(WEIGHTS_FILE)
    }

    pub fn save_config(&self, cfg: &BertConfig) -> Result<()> {
        save_config(cfg, &self.config_path())
    }

    pub fn save_encoder<B: Backend>(&self, model: &BertModel<B>) -> Result<()> {
        let path = self.weights_path();
        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save checkpoint to '{}'", path.display()))?;
        tracing::debug!("Saved encoder weights to '{}'", path.display());
        Ok(())
    }
}

/// Read and validate a `bert_config.json`.
pub fn load_config(path: &Path) -> Result<BertConfig> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Cannot read config from '{}'", path.display()))?;
    let cfg: BertConfig = serde_json::from_str(&json)
        .with_context(|| format!("Malformed config in '{}'", path.display()))?;
    cfg.validate()
        .with_context(|| format!("Invalid config in '{}'", path.display()))?;
    Ok(cfg)
}

pub fn save_config(cfg: &BertConfig, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(cfg)?;
    fs::write(path, json)
        .with_context(|| format!("Cannot write config to '{}'", path.display()))?;
    tracing::debug!("Saved encoder config to '{}'", path.display());
    Ok(())
}

/// Parameter shapes that must survive a checkpoint load unchanged.
#[derive(Debug, PartialEq, Eq)]
struct EncoderShapes {
    num_params:            usize,
    word_embeddings:       [usize; 2],
    position_embeddings:   [usize; 2],
    token_type_embeddings: [usize; 2],
    layers:                usize,
    pooler:                [usize; 2],
}

impl EncoderShapes {
    fn of<B: Backend>(model: &BertModel<B>) -> Self {
        Self {
            num_params:            model.num_params(),
            word_embeddings:       model.embeddings.word_embeddings.weight.val().dims(),
            position_embeddings:   model.embeddings.position_embeddings.weight.val().dims(),
            token_type_embeddings: model.embeddings.token_type_embeddings.weight.val().dims(),
            layers:                model.layers.len(),
            pooler:                model.pooler.dense.weight.val().dims(),
        }
    }
}

/// Restore encoder weights from `path` into `model`.
///
/// Burn replaces each parameter with whatever tensor the record
/// holds, so the shapes are compared afterwards: a record of a
/// differently sized encoder is rejected here instead of failing
/// inside the first forward pass.
pub fn load_encoder<B: Backend>(
    model:  BertModel<B>,
    path:   &Path,
    device: &B::Device,
) -> Result<BertModel<B>> {
    tracing::info!("Loading encoder weights from '{}'", path.display());
    let record = CompactRecorder::new()
        .load(path.to_path_buf(), device)
        .with_context(|| format!("Cannot load checkpoint '{}'", path.display()))?;

    let expected = EncoderShapes::of(&model);
    let model = model.load_record(record);
    let found = EncoderShapes::of(&model);
    ensure!(
        found == expected,
        "Checkpoint '{}' does not match the configured encoder: expected {:?}, found {:?}",
        path.display(),
        expected,
        found
    );
    Ok(model)
}

/// Build an encoder from `config` and, when a checkpoint is given,
/// overwrite its random initialisation with the stored weights.
pub fn build_encoder<B: Backend>(
    config:          &BertConfig,
    checkpoint_path: Option<&Path>,
    device:          &B::Device,
) -> Result<BertModel<B>> {
    let model = config.init(device)?;
    match checkpoint_path {
        Some(path) => load_encoder(model, path, device),
        None => {
            tracing::debug!("No checkpoint given, keeping random encoder weights");
            Ok(model)
        }
    }
}
