//! Fork-join executor for per-pixel map operations.
//!
//! Rows are split into contiguous slabs, one per worker thread. Workers read
//! only the immutable inputs captured by the per-pixel function and write only
//! their own slab vector, so no synchronization is needed beyond the join.
//! Slabs are concatenated in slab index order, which reconstructs row-major
//! layout regardless of scheduling order.

use crate::grid::PixelGrid;
use crate::progress::Progress;
use crate::util::{StereoError, StereoResult};

/// Applies `f(row, col)` to every pixel position of two same-shaped grids and
/// collects the results into a new grid of that shape.
///
/// The row range is partitioned into `threads` contiguous slabs of
/// `height / threads` rows; remainder rows that integer division leaves over
/// are assigned to the final slab so no row is dropped. The worker count is
/// clamped to the row count. `progress` receives one update per joined slab.
pub fn zip_map<T, U, F>(
    left: &PixelGrid<T>,
    right: &PixelGrid<T>,
    threads: usize,
    progress: &mut dyn Progress,
    f: F,
) -> StereoResult<PixelGrid<U>>
where
    T: Copy + Sync,
    U: Copy + Send,
    F: Fn(usize, usize) -> U + Sync,
{
    left.check_same_shape(right)?;
    if threads == 0 {
        return Err(StereoError::InvalidConfig("thread count must be positive"));
    }

    let width = left.width();
    let height = left.height();
    let workers = threads.min(height);
    let rows_per_slab = height / workers;

    let mut data = Vec::with_capacity(width * height);
    std::thread::scope(|scope| {
        let f = &f;
        let mut handles = Vec::with_capacity(workers);
        for slab in 0..workers {
            let start = slab * rows_per_slab;
            let end = if slab + 1 == workers {
                height
            } else {
                start + rows_per_slab
            };
            handles.push(scope.spawn(move || {
                let mut out = Vec::with_capacity((end - start) * width);
                for row in start..end {
                    for col in 0..width {
                        out.push(f(row, col));
                    }
                }
                out
            }));
        }

        for (joined, handle) in handles.into_iter().enumerate() {
            match handle.join() {
                Ok(slab) => data.extend_from_slice(&slab),
                Err(payload) => std::panic::resume_unwind(payload),
            }
            progress.update((joined + 1) as f32 / workers as f32);
        }
    });

    Ok(PixelGrid::from_raw(data, width, height))
}
