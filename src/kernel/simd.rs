//! SIMD reductions using the `wide` crate.
//!
//! Callers guarantee buffer lengths are a multiple of [`LANES`], which the
//! window cache padding establishes, so there is no scalar remainder loop.

use crate::kernel::LANES;
use wide::f32x8;

/// Load 8 f32 values into f32x8.
#[inline]
fn load_f32x8(slice: &[f32]) -> f32x8 {
    f32x8::from([
        slice[0], slice[1], slice[2], slice[3], slice[4], slice[5], slice[6], slice[7],
    ])
}

/// Horizontal sum of f32x8.
#[inline]
fn hsum(v: f32x8) -> f32 {
    let arr = v.to_array();
    arr[0] + arr[1] + arr[2] + arr[3] + arr[4] + arr[5] + arr[6] + arr[7]
}

/// Sum of all samples.
pub(crate) fn sum(samples: &[f32]) -> f32 {
    debug_assert_eq!(samples.len() % LANES, 0);
    let mut acc = f32x8::ZERO;
    for chunk in samples.chunks_exact(LANES) {
        acc += load_f32x8(chunk);
    }
    hsum(acc)
}

/// Sum and sum of squares in one pass.
pub(crate) fn sum_and_sumsq(samples: &[f32]) -> (f32, f32) {
    debug_assert_eq!(samples.len() % LANES, 0);
    let mut acc = f32x8::ZERO;
    let mut acc_sq = f32x8::ZERO;
    for chunk in samples.chunks_exact(LANES) {
        let v = load_f32x8(chunk);
        acc += v;
        acc_sq += v * v;
    }
    (hsum(acc), hsum(acc_sq))
}

/// Dot product of `a` and `b` plus sum and sum of squares of `b`.
pub(crate) fn dot_and_sums(a: &[f32], b: &[f32]) -> (f32, f32, f32) {
    debug_assert_eq!(a.len(), b.len());
    debug_assert_eq!(a.len() % LANES, 0);
    let mut dot = f32x8::ZERO;
    let mut sum_b = f32x8::ZERO;
    let mut sumsq_b = f32x8::ZERO;
    for (lhs, rhs) in a.chunks_exact(LANES).zip(b.chunks_exact(LANES)) {
        let lv = load_f32x8(lhs);
        let rv = load_f32x8(rhs);
        dot += lv * rv;
        sum_b += rv;
        sumsq_b += rv * rv;
    }
    (hsum(dot), hsum(sum_b), hsum(sumsq_b))
}
