use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stereodepth::{
    best_disparity, disparity_map, window_deviation, window_mean, zncc_score, Direction,
    NoProgress, PixelGrid, WindowStats,
};

fn textured(width: usize, height: usize) -> PixelGrid<f32> {
    let data = (0..width * height)
        .map(|i| {
            let x = i % width;
            let y = i / width;
            (((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF) as f32
        })
        .collect();
    PixelGrid::new(data, width, height).unwrap()
}

fn random_grid(width: usize, height: usize, seed: u64) -> PixelGrid<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..width * height)
        .map(|_| rng.random_range(0..256) as f32)
        .collect();
    PixelGrid::new(data, width, height).unwrap()
}

/// Shifts a grid left by `shift` columns with replicated right border, so the
/// reference image matches the result at disparity `shift`.
fn shift_left(grid: &PixelGrid<f32>, shift: isize) -> PixelGrid<f32> {
    let width = grid.width();
    let height = grid.height();
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push(grid.get(row as isize, col as isize + shift));
        }
    }
    PixelGrid::new(data, width, height).unwrap()
}

fn window_vec(grid: &PixelGrid<f32>, row: isize, col: isize, window: usize) -> Vec<f32> {
    let mut out = Vec::new();
    grid.for_each_window(row, col, window, |v| out.push(v));
    out
}

/// Direct per-sample evaluation of the score, no caching or expansion.
fn brute_zncc(
    reference: &PixelGrid<f32>,
    target: &PixelGrid<f32>,
    row: usize,
    col: usize,
    offset: isize,
    window: usize,
) -> f32 {
    let target_col = (col as isize - offset).clamp(0, target.width() as isize - 1);
    let ref_win = window_vec(reference, row as isize, col as isize, window);
    let target_win = window_vec(target, row as isize, target_col, window);
    let ref_mean = window_mean(reference, row as isize, col as isize, window);
    let target_mean = window_mean(target, row as isize, target_col, window);
    let numerator: f32 = ref_win
        .iter()
        .zip(&target_win)
        .map(|(&a, &b)| (a - ref_mean) * (b - target_mean))
        .sum();
    numerator
        / (window_deviation(reference, row as isize, col as isize, window)
            * window_deviation(target, row as isize, target_col, window))
}

#[test]
fn cached_score_matches_bruteforce() {
    let left = textured(20, 14);
    let right = shift_left(&left, 2);
    let window = 5;
    let left_stats = WindowStats::compute(&left, window).unwrap();
    let right_stats = WindowStats::compute(&right, window).unwrap();

    for row in (1..14).step_by(3) {
        for col in (0..20).step_by(3) {
            for offset in 0..6isize {
                let cached = zncc_score(&left_stats, &right_stats, row, col, offset);
                let brute = brute_zncc(&left, &right, row, col, offset, window);
                assert_eq!(cached.is_finite(), brute.is_finite());
                if brute.is_finite() {
                    assert!(
                        (cached - brute).abs() < 5e-3,
                        "score diverged at ({row}, {col}) offset {offset}: {cached} vs {brute}"
                    );
                }
            }
        }
    }
}

#[test]
fn search_recovers_known_shift() {
    let shift = 3usize;
    let width = 40;
    let height = 24;
    let window = 5;
    let max_disparity = 8;
    let left = random_grid(width, height, 42);
    let right = shift_left(&left, shift as isize);

    let left_stats = WindowStats::compute(&left, window).unwrap();
    let right_stats = WindowStats::compute(&right, window).unwrap();

    // Interior pixels far enough from every border that no window or
    // candidate is clamped.
    for row in 4..height - 4 {
        for col in (max_disparity + window)..(width - window - shift) {
            let found = best_disparity(
                &left_stats,
                &right_stats,
                row,
                col,
                max_disparity,
                Direction::LeftToRight,
            );
            assert_eq!(found, shift as i32, "wrong disparity at ({row}, {col})");
        }
    }
}

#[test]
fn reversed_direction_recovers_the_same_shift() {
    let shift = 3usize;
    let width = 40;
    let height = 24;
    let window = 5;
    let max_disparity = 8;
    let left = random_grid(width, height, 99);
    let right = shift_left(&left, shift as isize);

    let left_stats = WindowStats::compute(&left, window).unwrap();
    let right_stats = WindowStats::compute(&right, window).unwrap();

    let map = disparity_map(
        &right_stats,
        &left_stats,
        3,
        max_disparity,
        Direction::RightToLeft,
        &mut NoProgress,
    )
    .unwrap();

    for row in 4..height - 4 {
        for col in window..(width - window - max_disparity - shift) {
            assert_eq!(
                map.get(row as isize, col as isize),
                shift as i32,
                "wrong reversed disparity at ({row}, {col})"
            );
        }
    }
}

#[test]
fn disparities_stay_in_candidate_range() {
    let left = random_grid(24, 16, 5);
    let right = random_grid(24, 16, 6);
    let left_stats = WindowStats::compute(&left, 3).unwrap();
    let right_stats = WindowStats::compute(&right, 3).unwrap();
    let max_disparity = 6;

    let map = disparity_map(
        &left_stats,
        &right_stats,
        2,
        max_disparity,
        Direction::LeftToRight,
        &mut NoProgress,
    )
    .unwrap();
    assert!(map
        .as_slice()
        .iter()
        .all(|&d| d >= 0 && d < max_disparity as i32));
}
