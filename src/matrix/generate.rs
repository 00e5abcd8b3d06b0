//! Random matrix generation for benchmark inputs.

use rand::Rng;

use super::Matrix;

/// Fill a `rows`×`cols` matrix with uniform random values in `[0, 10)`.
///
/// Unseeded by design: the benchmark compares strategies against each other
/// on the same inputs within a run, so cross-run reproducibility is not a
/// requirement.
pub fn random(rows: usize, cols: usize) -> Matrix {
    let mut rng = rand::thread_rng();
    let data = (0..rows * cols).map(|_| rng.gen_range(0.0..10.0)).collect();
    Matrix::from_vec(rows, cols, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_stay_in_range() {
        let m = random(16, 16);
        assert!(m.as_slice().iter().all(|&v| (0.0..10.0).contains(&v)));
    }

    #[test]
    fn shape_matches_request() {
        let m = random(3, 7);
        assert_eq!(m.rows(), 3);
        assert_eq!(m.cols(), 7);
        assert_eq!(m.as_slice().len(), 21);
    }
}
