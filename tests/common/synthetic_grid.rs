use grid_distance::image::Image;
use grid_distance::Norm;

/// Deterministic pseudo-random generator for reproducible grids.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed.wrapping_mul(6364136223846793005).wrapping_add(1))
    }

    pub fn next_u32(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as u32
    }
}

/// Grid where roughly one cell in `one_in` is a seed (value 1).
pub fn scattered_seeds(width: usize, height: usize, one_in: u32, seed: u64) -> Image<u8> {
    assert!(one_in > 0, "density must be positive");
    let mut rng = Lcg::new(seed);
    Image::from_fn(width, height, |_, _| u8::from(rng.next_u32() % one_in == 0))
}

/// Grid with seeds (value 1) at the listed coordinates.
pub fn seeds_at(width: usize, height: usize, points: &[(usize, usize)]) -> Image<u8> {
    Image::from_fn(width, height, |x, y| u8::from(points.contains(&(x, y))))
}

/// O(N * seeds) reference distance map. Cells of a seedless grid get `None`.
pub fn brute_force<T: Copy + PartialEq>(grid: &Image<T>, seed: T, norm: Norm) -> Vec<Option<f32>> {
    let seeds: Vec<(i64, i64)> = (0..grid.h)
        .flat_map(|y| (0..grid.w).map(move |x| (x, y)))
        .filter(|&(x, y)| grid.get(x, y) == seed)
        .map(|(x, y)| (x as i64, y as i64))
        .collect();
    let mut out = Vec::with_capacity(grid.w * grid.h);
    for y in 0..grid.h as i64 {
        for x in 0..grid.w as i64 {
            let best = seeds
                .iter()
                .map(|&(sx, sy)| {
                    let (dx, dy) = ((x - sx).abs(), (y - sy).abs());
                    match norm {
                        Norm::Chessboard => dx.max(dy) as f32,
                        Norm::Manhattan => (dx + dy) as f32,
                        Norm::Euclidean => ((dx * dx + dy * dy) as f32).sqrt(),
                    }
                })
                .fold(None, |acc: Option<f32>, d| Some(acc.map_or(d, |a| a.min(d))));
            out.push(best);
        }
    }
    out
}

pub fn assert_matches_reference(got: &Image<f32>, want: &[Option<f32>], tol: f32) {
    assert_eq!(got.w * got.h, want.len());
    for y in 0..got.h {
        for x in 0..got.w {
            let g = got.get(x, y);
            match want[y * got.w + x] {
                Some(w) => assert!(
                    (g - w).abs() <= tol,
                    "({x},{y}): got {g}, want {w}"
                ),
                None => assert!(
                    grid_distance::distance::is_far(g),
                    "({x},{y}): expected saturated value, got {g}"
                ),
            }
        }
    }
}
