use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stereodepth::exec::zip_map;
use stereodepth::{NoProgress, PixelGrid};

fn random_grid(width: usize, height: usize, seed: u64) -> PixelGrid<i32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..width * height)
        .map(|_| rng.random_range(0..256))
        .collect();
    PixelGrid::new(data, width, height).unwrap()
}

#[test]
fn worker_count_does_not_change_output() {
    let width = 16;
    // Prime height so most worker counts leave remainder rows.
    let height = 13;
    let a = random_grid(width, height, 7);
    let b = random_grid(width, height, 11);

    let f = |row: usize, col: usize| -> i32 {
        a.get(row as isize, col as isize) * 31 + b.get(row as isize, col as isize) * 7
            - row as i32
            + col as i32
    };

    let sequential = zip_map(&a, &b, 1, &mut NoProgress, f).unwrap();
    for workers in [2, 3, 4, 5, 7, 13, 16, 64] {
        let parallel = zip_map(&a, &b, workers, &mut NoProgress, f).unwrap();
        assert_eq!(
            parallel.as_slice(),
            sequential.as_slice(),
            "worker count {workers} changed the output"
        );
    }
}

#[test]
fn output_preserves_row_major_order() {
    let a = random_grid(9, 6, 3);
    let b = random_grid(9, 6, 5);
    let indexed = zip_map(&a, &b, 4, &mut NoProgress, |row, col| {
        (row * 9 + col) as i32
    })
    .unwrap();
    let expected: Vec<i32> = (0..54).collect();
    assert_eq!(indexed.as_slice(), expected.as_slice());
}
