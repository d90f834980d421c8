// ============================================================
// Layer 5 — Encoder Input
// ============================================================
// Tensor form of the domain TokenBatch. All three tensors are
// Int, shape [batch, seq_len], and live on the same device.

use anyhow::{ensure, Result};
use burn::prelude::*;

use crate::domain::TokenBatch;

#[derive(Debug, Clone)]
pub struct EncoderInput<B: Backend> {
    /// Vocabulary ids — shape: [batch_size, seq_len]
    pub token_idxs: Tensor<B, 2, Int>,

    /// Position ids — shape: [batch_size, seq_len]
    pub position_idxs: Tensor<B, 2, Int>,

    /// Segment ids — shape: [batch_size, seq_len]
    pub token_type_idxs: Tensor<B, 2, Int>,
}

impl<B: Backend> EncoderInput<B> {
    /// Wrap three tensors, checking that their shapes agree.
    pub fn new(
        token_idxs:      Tensor<B, 2, Int>,
        position_idxs:   Tensor<B, 2, Int>,
        token_type_idxs: Tensor<B, 2, Int>,
    ) -> Result<Self> {
        let dims = token_idxs.dims();
        ensure!(
            position_idxs.dims() == dims && token_type_idxs.dims() == dims,
            "input shapes disagree: tokens {:?}, positions {:?}, types {:?}",
            dims,
            position_idxs.dims(),
            token_type_idxs.dims()
        );
        Ok(Self { token_idxs, position_idxs, token_type_idxs })
    }

    /// Upload a validated TokenBatch to `device`.
    ///
    /// Rows are flattened then reshaped to [batch_size, seq_len];
    /// TokenBatch already guarantees every row has the same length.
    pub fn from_batch(batch: &TokenBatch, device: &B::Device) -> Self {
        let dims = batch.dims();
        Self {
            token_idxs:      to_tensor(batch.token_idxs(), dims, device),
            position_idxs:   to_tensor(batch.position_idxs(), dims, device),
            token_type_idxs: to_tensor(batch.token_type_idxs(), dims, device),
        }
    }

    /// [batch_size, seq_len]
    pub fn dims(&self) -> [usize; 2] {
        self.token_idxs.dims()
    }
}

fn to_tensor<B: Backend>(
    rows:   &[Vec<i64>],
    dims:   [usize; 2],
    device: &B::Device,
) -> Tensor<B, 2, Int> {
    let flat: Vec<i64> = rows.iter().flatten().copied().collect();
    Tensor::from_data(TensorData::new(flat, dims), device)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{ndarray::NdArrayDevice, NdArray};

    type TestBackend = NdArray;

    #[test]
    fn from_batch_keeps_row_layout() {
        let device = NdArrayDevice::default();
        let batch = TokenBatch::new(
            vec![vec![1, 2, 3], vec![4, 5, 6]],
            vec![vec![0, 1, 2], vec![0, 1, 2]],
            vec![vec![0, 0, 1], vec![0, 1, 1]],
        )
        .unwrap();

        let input = EncoderInput::<TestBackend>::from_batch(&batch, &device);
        assert_eq!(input.dims(), [2, 3]);

        let tokens: Vec<i64> = input.token_idxs.into_data().to_vec().unwrap();
        assert_eq!(tokens, vec![1, 2, 3, 4, 5, 6]);
        let types: Vec<i64> = input.token_type_idxs.into_data().to_vec().unwrap();
        assert_eq!(types, vec![0, 0, 1, 0, 1, 1]);
    }

    #[test]
    fn new_rejects_mismatched_tensors() {
        let device = NdArrayDevice::default();
        let a = Tensor::<TestBackend, 2, Int>::zeros([1, 4], &device);
        let b = Tensor::<TestBackend, 2, Int>::zeros([1, 4], &device);
        let c = Tensor::<TestBackend, 2, Int>::zeros([1, 3], &device);

        assert!(EncoderInput::new(a.clone(), b.clone(), b.clone()).is_ok());
        assert!(EncoderInput::new(a, b, c).is_err());
    }
}
