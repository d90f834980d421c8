// ============================================================
// Layer 3 — TokenBatch Domain Type
// ============================================================
// The input triple every head consumes, in plain Rust:
//   - token indices      (vocabulary ids, e.g. [CLS] = 101)
//   - position indices   (0..seq_len for ordinary inputs)
//   - token type indices (segment A = 0, segment B = 1)
//
// All three are (batch_size × seq_len) and must line up
// exactly, whether the batch is built with `new` or read
// through serde. Index ranges depend on the encoder and are
// checked by `BertConfig::check_batch`.
//
// Example (one sequence, two segments):
//   tokens:    [100, 1, 2, 101, 3, 4, 101]
//   positions: [  0, 1, 2,   3, 4, 5,   6]
//   types:     [  0, 0, 0,   0, 1, 1,   1]

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

/// A batch of index sequences ready to be turned into tensors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTokenBatch")]
pub struct TokenBatch {
    token_idxs:      Vec<Vec<i64>>,
    position_idxs:   Vec<Vec<i64>>,
    token_type_idxs: Vec<Vec<i64>>,
}

/// Unchecked wire form; only reachable through `TryFrom`.
#[derive(Deserialize)]
struct RawTokenBatch {
    token_idxs:      Vec<Vec<i64>>,
    position_idxs:   Vec<Vec<i64>>,
    token_type_idxs: Vec<Vec<i64>>,
}

impl TryFrom<RawTokenBatch> for TokenBatch {
    type Error = anyhow::Error;

    fn try_from(raw: RawTokenBatch) -> Result<Self> {
        Self::new(raw.token_idxs, raw.position_idxs, raw.token_type_idxs)
    }
}

impl TokenBatch {
    /// Build a batch from three row-major index tables.
    ///
    /// Fails when the batch is empty, when a row is empty, or
    /// when the three tables do not share the same shape.
    pub fn new(
        token_idxs:      Vec<Vec<i64>>,
        position_idxs:   Vec<Vec<i64>>,
        token_type_idxs: Vec<Vec<i64>>,
    ) -> Result<Self> {
        ensure!(!token_idxs.is_empty(), "token batch is empty");

        let seq_len = token_idxs[0].len();
        ensure!(seq_len > 0, "token sequences are empty");

        for (name, table) in [
            ("token_idxs", &token_idxs),
            ("position_idxs", &position_idxs),
            ("token_type_idxs", &token_type_idxs),
        ] {
            ensure!(
                table.len() == token_idxs.len(),
                "{name} has {} rows, expected {}",
                table.len(),
                token_idxs.len()
            );
            if let Some((row, bad)) = table.iter().enumerate().find(|(_, r)| r.len() != seq_len) {
                anyhow::bail!(
                    "{name} row {row} has length {}, expected {seq_len}",
                    bad.len()
                );
            }
        }

        Ok(Self { token_idxs, position_idxs, token_type_idxs })
    }

    /// A batch holding a single sequence.
    pub fn single(tokens: Vec<i64>, positions: Vec<i64>, types: Vec<i64>) -> Result<Self> {
        Self::new(vec![tokens], vec![positions], vec![types])
    }

    /// Build a batch whose positions are simply 0..seq_len on every row.
    pub fn with_default_positions(
        token_idxs:      Vec<Vec<i64>>,
        token_type_idxs: Vec<Vec<i64>>,
    ) -> Result<Self> {
        let position_idxs = token_idxs
            .iter()
            .map(|row| (0..row.len() as i64).collect())
            .collect();
        Self::new(token_idxs, position_idxs, token_type_idxs)
    }

    /// (batch_size, seq_len)
    pub fn dims(&self) -> [usize; 2] {
        [self.token_idxs.len(), self.token_idxs[0].len()]
    }

    pub fn token_idxs(&self) -> &[Vec<i64>] {
        &self.token_idxs
    }

    pub fn position_idxs(&self) -> &[Vec<i64>] {
        &self.position_idxs
    }

    pub fn token_type_idxs(&self) -> &[Vec<i64>] {
        &self.token_type_idxs
    }

    /// The fixed seven-token, two-segment input the demo runs on.
    pub fn demo() -> Self {
        Self {
            token_idxs:      vec![vec![100, 1, 2, 101, 3, 4, 101]],
            position_idxs:   vec![vec![0, 1, 2, 3, 4, 5, 6]],
            token_type_idxs: vec![vec![0, 0, 0, 0, 1, 1, 1]],
        }
    }
}
