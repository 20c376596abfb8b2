//! Scalar reference reductions.

/// Sum of all samples.
pub(crate) fn sum(samples: &[f32]) -> f32 {
    samples.iter().sum()
}

/// Sum and sum of squares in one pass.
pub(crate) fn sum_and_sumsq(samples: &[f32]) -> (f32, f32) {
    let mut total = 0.0f32;
    let mut total_sq = 0.0f32;
    for &value in samples {
        total += value;
        total_sq += value * value;
    }
    (total, total_sq)
}

/// Dot product of `a` and `b` plus sum and sum of squares of `b`, fused so a
/// disparity candidate costs a single pass over both windows.
pub(crate) fn dot_and_sums(a: &[f32], b: &[f32]) -> (f32, f32, f32) {
    debug_assert_eq!(a.len(), b.len());
    let mut dot = 0.0f32;
    let mut sum_b = 0.0f32;
    let mut sumsq_b = 0.0f32;
    for (&lhs, &rhs) in a.iter().zip(b) {
        dot += lhs * rhs;
        sum_b += rhs;
        sumsq_b += rhs * rhs;
    }
    (dot, sum_b, sumsq_b)
}
