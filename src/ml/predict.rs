// ============================================================
// Layer 5 — Prediction Helpers
// ============================================================
// Turns raw logits into discrete indices.
//
//   softmax_argmax(logits, dim)
//     1. softmax along `dim`     (probabilities, same shape)
//     2. argmax along `dim`      (shape keeps a size-1 axis)
//     3. drop that size-1 axis   (rank D → rank O = D - 1)
//
// Softmax is monotonic, so step 1 never changes the selected
// index; `argmax` below is the same selection without it.
// Ties go to the lowest index.

use burn::{prelude::*, tensor::activation::softmax};

/// Softmax along `dim`, then arg-max along the same axis.
pub fn softmax_argmax<B: Backend, const D: usize, const O: usize>(
    logits: Tensor<B, D>,
    dim:    usize,
) -> Tensor<B, O, Int> {
    argmax(softmax(logits, dim), dim)
}

/// Arg-max along `dim` with the reduced axis removed.
pub fn argmax<B: Backend, const D: usize, const O: usize>(
    scores: Tensor<B, D>,
    dim:    usize,
) -> Tensor<B, O, Int> {
    debug_assert_eq!(O + 1, D, "argmax drops exactly one axis");
    let dims = scores.dims();
    let mut out = [0usize; O];
    let mut j = 0;
    for (i, &d) in dims.iter().enumerate() {
        if i != dim {
            out[j] = d;
            j += 1;
        }
    }
    scores.argmax(dim).reshape(out)
}
