//! One-dimensional distance transforms of sampled functions.
//!
//! Each strategy maps an input line `f` (0 at seeds, [`FAR`] elsewhere, or
//! the output of a previous pass) to an output line `d` of the same length.
//! Both implemented strategies are min-plus updates, so `d[q] <= f[q]`.
//!
//! Reference: P. F. Felzenszwalb, D. P. Huttenlocher, "Distance Transforms of
//! Sampled Functions", Theory of Computing 8 (2012).
use super::{try_buffer, DistanceTransformError, Norm, FAR};

/// Stateless per-line distance strategy.
pub trait LineTransform: Sync {
    const NORM: Norm;

    #[inline]
    fn id(&self) -> u8 {
        Self::NORM.id()
    }

    /// Transform `f` into `d`. Both slices have the same length `n`;
    /// `envelope` has room for at least `n` samples.
    fn apply(&self, f: &[f32], d: &mut [f32], envelope: &mut Envelope);
}

/// L∞ line transform. There is no separable formulation wired up for it;
/// Chebyshev requests are answered by the serial chamfer instead.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChessboardLine;

impl LineTransform for ChessboardLine {
    const NORM: Norm = Norm::Chessboard;

    fn apply(&self, _f: &[f32], _d: &mut [f32], _envelope: &mut Envelope) {
        panic!("ChessboardLine::apply: chessboard line transform is not implemented");
    }
}

/// L1 line transform: one forward and one backward unit-step sweep.
#[derive(Clone, Copy, Debug, Default)]
pub struct ManhattanLine;

impl LineTransform for ManhattanLine {
    const NORM: Norm = Norm::Manhattan;

    fn apply(&self, f: &[f32], d: &mut [f32], _envelope: &mut Envelope) {
        let n = f.len();
        debug_assert_eq!(d.len(), n);
        if n == 0 {
            return;
        }
        d[0] = f[0];
        for q in 1..n {
            d[q] = f[q].min(d[q - 1] + 1.0);
        }
        for q in (0..n - 1).rev() {
            d[q] = d[q].min(d[q + 1] + 1.0);
        }
    }
}

/// Squared-L2 line transform via the lower envelope of parabolas rooted at
/// `(q, f[q])`.
#[derive(Clone, Copy, Debug, Default)]
pub struct EuclideanLine;

#[inline]
fn square(x: f32) -> f32 {
    x * x
}

impl LineTransform for EuclideanLine {
    const NORM: Norm = Norm::Euclidean;

    fn apply(&self, f: &[f32], d: &mut [f32], envelope: &mut Envelope) {
        let n = f.len();
        debug_assert_eq!(d.len(), n);
        if n == 0 {
            return;
        }
        let (v, z) = envelope.split(n);

        // Abscissa where the parabola of `q` overtakes the one of `p`.
        let intersect = |p: usize, q: usize, sum_q: f32| -> f32 {
            let pf = p as f32;
            (sum_q - (f[p] + square(pf))) / (2.0 * (q as f32 - pf))
        };

        let mut k = 0usize;
        v[0] = 0;
        z[0] = -FAR;
        z[1] = FAR;
        for q in 1..n {
            let sum_q = f[q] + square(q as f32);
            let mut s = intersect(v[k], q, sum_q);
            while k > 0 && s <= z[k] {
                k -= 1;
                s = intersect(v[k], q, sum_q);
            }
            k += 1;
            v[k] = q;
            z[k] = s;
            z[k + 1] = FAR;
        }

        k = 0;
        for (q, out) in d.iter_mut().enumerate() {
            let qf = q as f32;
            while z[k + 1] < qf {
                k += 1;
            }
            let apex = v[k];
            *out = square(qf - apex as f32) + f[apex];
        }
    }
}

/// Apex indices and breakpoints of the lower envelope.
#[derive(Debug, Default)]
pub struct Envelope {
    apex: Vec<usize>,
    breaks: Vec<f32>,
}

impl Envelope {
    pub fn try_new(len: usize) -> Result<Self, DistanceTransformError> {
        Ok(Self {
            apex: try_buffer(len, 0usize, "envelope apex")?,
            breaks: try_buffer(len + 1, 0.0f32, "envelope breakpoint")?,
        })
    }

    #[inline]
    fn split(&mut self, n: usize) -> (&mut [usize], &mut [f32]) {
        (&mut self.apex[..n], &mut self.breaks[..=n])
    }
}

/// Per-worker line buffers, sized once for the longest line of a grid.
#[derive(Debug)]
pub struct LineScratch {
    f: Vec<f32>,
    d: Vec<f32>,
    envelope: Envelope,
}

impl LineScratch {
    pub fn try_new(len: usize) -> Result<Self, DistanceTransformError> {
        Ok(Self {
            f: try_buffer(len, FAR, "line input")?,
            d: try_buffer(len, FAR, "line output")?,
            envelope: Envelope::try_new(len)?,
        })
    }

    pub fn capacity(&self) -> usize {
        self.f.len()
    }

    /// Input line of length `n` to fill before [`LineScratch::run`].
    #[inline]
    pub fn input_mut(&mut self, n: usize) -> &mut [f32] {
        &mut self.f[..n]
    }

    /// Apply `line` to the first `n` input samples and return the output.
    #[inline]
    pub fn run<L: LineTransform>(&mut self, line: &L, n: usize) -> &[f32] {
        line.apply(&self.f[..n], &mut self.d[..n], &mut self.envelope);
        &self.d[..n]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeds(n: usize, at: &[usize]) -> Vec<f32> {
        (0..n)
            .map(|q| if at.contains(&q) { 0.0 } else { FAR })
            .collect()
    }

    fn run<L: LineTransform>(line: L, f: &[f32]) -> Vec<f32> {
        let mut scratch = LineScratch::try_new(f.len()).expect("scratch");
        scratch.input_mut(f.len()).copy_from_slice(f);
        scratch.run(&line, f.len()).to_vec()
    }

    #[test]
    fn ids_follow_the_norm_codes() {
        assert_eq!(ChessboardLine.id(), 0);
        assert_eq!(ManhattanLine.id(), 1);
        assert_eq!(EuclideanLine.id(), 2);
    }

    #[test]
    fn manhattan_counts_steps_to_nearest_seed() {
        let d = run(ManhattanLine, &seeds(8, &[2, 6]));
        assert_eq!(d, vec![2.0, 1.0, 0.0, 1.0, 2.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn manhattan_takes_min_with_offsets() {
        let d = run(ManhattanLine, &[5.0, 0.5, 9.0, 9.0, 1.0]);
        assert_eq!(d, vec![1.5, 0.5, 1.5, 2.0, 1.0]);
    }

    #[test]
    fn euclidean_matches_hand_computed_envelopes() {
        // Single seed on the left border.
        let d = run(EuclideanLine, &seeds(5, &[0]));
        assert_eq!(d, vec![0.0, 1.0, 4.0, 9.0, 16.0]);

        // Single seed in the middle.
        let d = run(EuclideanLine, &seeds(7, &[3]));
        assert_eq!(d, vec![9.0, 4.0, 1.0, 0.0, 1.0, 4.0, 9.0]);

        // Three seeds: envelope switches apex at the midpoints.
        let d = run(EuclideanLine, &seeds(10, &[1, 4, 9]));
        assert_eq!(d, vec![1.0, 0.0, 1.0, 1.0, 0.0, 1.0, 4.0, 4.0, 1.0, 0.0]);
    }

    #[test]
    fn euclidean_with_offsets_is_min_over_parabolas() {
        let f = [4.0, FAR, 0.0, FAR, 1.0, 9.0];
        let d = run(EuclideanLine, &f);
        for (q, &got) in d.iter().enumerate() {
            let want = f
                .iter()
                .enumerate()
                .filter(|&(_, &v)| v < FAR)
                .map(|(p, &v)| square(q as f32 - p as f32) + v)
                .fold(f32::INFINITY, f32::min);
            assert_eq!(got, want, "q={q}");
        }
    }

    #[test]
    fn lines_without_seeds_stay_far() {
        let f = seeds(6, &[]);
        assert!(run(EuclideanLine, &f).iter().all(|&v| v == FAR));
        assert!(run(ManhattanLine, &f).iter().all(|&v| v == FAR));
    }

    #[test]
    fn degenerate_lengths() {
        assert!(run(EuclideanLine, &[]).is_empty());
        assert_eq!(run(EuclideanLine, &[0.0]), vec![0.0]);
        assert_eq!(run(ManhattanLine, &[FAR]), vec![FAR]);
    }

    #[test]
    fn scratch_can_serve_shorter_lines() {
        let mut scratch = LineScratch::try_new(16).expect("scratch");
        assert_eq!(scratch.capacity(), 16);
        scratch.input_mut(3).copy_from_slice(&[FAR, 0.0, FAR]);
        assert_eq!(scratch.run(&EuclideanLine, 3), &[1.0, 0.0, 1.0]);
    }

    #[test]
    fn oversized_scratch_reports_allocation_failure() {
        let err = LineScratch::try_new(usize::MAX / 4).expect_err("cannot fit");
        assert!(
            matches!(
                err,
                DistanceTransformError::Allocation {
                    what: "line input",
                    len,
                    ..
                } if len == usize::MAX / 4
            ),
            "{err:?}"
        );
        assert!(err.to_string().starts_with("failed to allocate line input buffer"));
    }

    #[test]
    #[should_panic(expected = "not implemented")]
    fn chessboard_line_is_fatal() {
        run(ChessboardLine, &seeds(4, &[1]));
    }
}
