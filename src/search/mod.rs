//! ZNCC scoring, per-pixel disparity search and the depth map builder.
//!
//! Scores are computed from the cached padded windows by algebraic expansion:
//! with `n = window * window`, the zero-mean cross term
//! `sum((L - meanL) * (R - meanR))` equals
//! `dot(L, R) - meanL * sum(R) - meanR * sum(L) + n * meanL * meanR`,
//! and the squared deviation magnitude of a window equals
//! `sumsq - 2 * mean * sum + n * mean^2`. Zero padding drops out of every
//! term, so the expansion is exact over the padded buffers.

use crate::exec;
use crate::grid::{DepthGrid, GreyGrid};
use crate::kernel;
use crate::progress::Progress;
use crate::stats::WindowStats;
use crate::trace::trace_event;
use crate::config::PipelineConfig;
use crate::util::{StereoError, StereoResult};

/// Disparity assigned when no candidate scores strictly above zero.
///
/// The argmax starts from score 0 and accepts strictly greater scores only,
/// so uncorrelated and degenerate (non-finite score) pixels both land here.
pub const NO_MATCH_DISPARITY: i32 = 0;

/// Which image serves as the reference frame of a search pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// The left image is the reference; matches lie leftward in the right
    /// image, at column `col - d`.
    LeftToRight,
    /// The right image is the reference; the offset sign flips so matches lie
    /// rightward in the left image, at column `col + d`.
    RightToLeft,
}

impl Direction {
    /// Signed column offset for a disparity candidate.
    pub fn offset(self, disparity: usize) -> isize {
        match self {
            Direction::LeftToRight => disparity as isize,
            Direction::RightToLeft => -(disparity as isize),
        }
    }
}

/// Squared-deviation magnitude from cached sums: `sqrt(sum((v - mean)^2))`.
/// Not divided by the window area; the score depends on this scaling.
#[inline]
fn deviation(sum: f32, sumsq: f32, mean: f32, n: f32) -> f32 {
    (sumsq - 2.0 * mean * sum + n * mean * mean).sqrt()
}

/// ZNCC score between the reference window at `(row, col)` and the target
/// window at `(row, col - offset)`.
///
/// Off-grid target centers are clamped to the nearest valid column before
/// the statistics lookup. Flat windows make the score non-finite; callers
/// decide what that means (the search skips such candidates).
pub fn zncc_score(
    reference: &WindowStats<'_>,
    target: &WindowStats<'_>,
    row: usize,
    col: usize,
    offset: isize,
) -> f32 {
    let n = reference.sample_count() as f32;
    let ref_win = reference.window_samples(row, col);
    let ref_mean = reference.mean(row, col);
    let (ref_sum, ref_sumsq) = kernel::sum_and_sumsq(ref_win);
    let ref_dev = deviation(ref_sum, ref_sumsq, ref_mean, n);

    let target_col = target.source().clamp_col(col as isize - offset);
    let target_win = target.window_samples(row, target_col);
    let target_mean = target.mean(row, target_col);
    let (dot, target_sum, target_sumsq) = kernel::dot_and_sums(ref_win, target_win);
    let target_dev = deviation(target_sum, target_sumsq, target_mean, n);

    let numerator = dot - ref_mean * target_sum - target_mean * ref_sum + n * ref_mean * target_mean;
    numerator / (ref_dev * target_dev)
}

/// Scans all disparity candidates for one pixel and returns the best one.
///
/// Candidates with non-finite scores never win; a pixel where nothing scores
/// strictly above zero keeps [`NO_MATCH_DISPARITY`].
pub fn best_disparity(
    reference: &WindowStats<'_>,
    target: &WindowStats<'_>,
    row: usize,
    col: usize,
    max_disparity: usize,
    direction: Direction,
) -> i32 {
    let n = reference.sample_count() as f32;
    let ref_win = reference.window_samples(row, col);
    let ref_mean = reference.mean(row, col);
    let (ref_sum, ref_sumsq) = kernel::sum_and_sumsq(ref_win);
    let ref_dev = deviation(ref_sum, ref_sumsq, ref_mean, n);

    let mut best_score = 0.0f32;
    let mut best_disp = NO_MATCH_DISPARITY;
    for disparity in 0..max_disparity {
        let offset = direction.offset(disparity);
        let target_col = target.source().clamp_col(col as isize - offset);
        let target_win = target.window_samples(row, target_col);
        let target_mean = target.mean(row, target_col);
        let (dot, target_sum, target_sumsq) = kernel::dot_and_sums(ref_win, target_win);
        let target_dev = deviation(target_sum, target_sumsq, target_mean, n);

        let numerator =
            dot - ref_mean * target_sum - target_mean * ref_sum + n * ref_mean * target_mean;
        let score = numerator / (ref_dev * target_dev);
        if score.is_finite() && score > best_score {
            best_score = score;
            best_disp = disparity as i32;
        }
    }
    best_disp
}

/// Runs the parallel disparity search with `reference` as the reference frame.
pub fn disparity_map(
    reference: &WindowStats<'_>,
    target: &WindowStats<'_>,
    threads: usize,
    max_disparity: usize,
    direction: Direction,
    progress: &mut dyn Progress,
) -> StereoResult<DepthGrid> {
    if reference.window() != target.window() {
        return Err(StereoError::InvalidConfig(
            "window size differs between statistics",
        ));
    }
    exec::zip_map(
        reference.source(),
        target.source(),
        threads,
        progress,
        |row, col| best_disparity(reference, target, row, col, max_disparity, direction),
    )
}

/// Computes the raw disparity maps for both reference directions.
///
/// Window statistics are built once per image and shared by both passes; the
/// pair of maps feeds the cross-check stage.
pub fn compute_depth_maps(
    left: &GreyGrid,
    right: &GreyGrid,
    config: &PipelineConfig,
    progress: &mut dyn Progress,
) -> StereoResult<(DepthGrid, DepthGrid)> {
    config.validate()?;
    left.check_same_shape(right)?;

    let started = std::time::Instant::now();
    progress.start("window statistics");
    let left_stats = WindowStats::compute(left, config.window)?;
    let right_stats = WindowStats::compute(right, config.window)?;
    progress.end();
    trace_event!(
        "window_statistics",
        width = left.width() as u64,
        height = left.height() as u64,
        elapsed_ms = started.elapsed().as_millis() as u64,
    );

    let started = std::time::Instant::now();
    progress.start("depth map, left reference");
    let left_map = disparity_map(
        &left_stats,
        &right_stats,
        config.threads,
        config.max_disparity,
        Direction::LeftToRight,
        progress,
    )?;
    progress.end();

    progress.start("depth map, right reference");
    let right_map = disparity_map(
        &right_stats,
        &left_stats,
        config.threads,
        config.max_disparity,
        Direction::RightToLeft,
        progress,
    )?;
    progress.end();
    trace_event!(
        "disparity_search",
        max_disparity = config.max_disparity as u64,
        threads = config.threads as u64,
        elapsed_ms = started.elapsed().as_millis() as u64,
    );

    Ok((left_map, right_map))
}
