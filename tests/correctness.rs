use parmul::matrix::{Matrix, generate};
use parmul::strategies::{MultiplyError, Strategy};

const REL_TOL: f64 = 1e-9;

fn assert_matrices_close(expected: &Matrix, actual: &Matrix, name: &str) {
    assert_eq!(expected.rows(), actual.rows(), "{}: row count mismatch", name);
    assert_eq!(expected.cols(), actual.cols(), "{}: col count mismatch", name);
    for i in 0..expected.rows() {
        for j in 0..expected.cols() {
            let (x, y) = (expected.get(i, j), actual.get(i, j));
            let scale = x.abs().max(y.abs()).max(1.0);
            assert!(
                (x - y).abs() <= REL_TOL * scale,
                "{}: mismatch at ({}, {}): expected {}, got {}",
                name,
                i,
                j,
                x,
                y
            );
        }
    }
}

fn parallel_strategies() -> impl Iterator<Item = Strategy> {
    Strategy::ALL
        .into_iter()
        .filter(|s| *s != Strategy::Sequential)
}

// ============================================================
// Agreement with the sequential baseline
// ============================================================

#[test]
fn all_strategies_match_baseline_on_random_inputs() {
    for size in [1, 2, 3, 64, 100] {
        let a = generate::random(size, size);
        let b = generate::random(size, size);

        let baseline = Strategy::Sequential.multiply(&a, &b, 1).unwrap();

        for strategy in parallel_strategies() {
            let result = strategy.multiply(&a, &b, 4).unwrap();
            assert_matrices_close(
                &baseline,
                &result,
                &format!("{}_size_{}", strategy, size),
            );
        }
    }
}

#[test]
fn all_strategies_match_baseline_on_rectangular_inputs() {
    let a = generate::random(13, 17);
    let b = generate::random(17, 19);

    let baseline = Strategy::Sequential.multiply(&a, &b, 1).unwrap();

    for strategy in parallel_strategies() {
        let result = strategy.multiply(&a, &b, 4).unwrap();
        assert_matrices_close(&baseline, &result, &format!("{}_13x17x19", strategy));
    }
}

#[test]
fn partitioned_strategies_agree_across_thread_counts() {
    let a = generate::random(33, 33);
    let b = generate::random(33, 33);
    let baseline = Strategy::Sequential.multiply(&a, &b, 1).unwrap();

    for strategy in [Strategy::ThreadPool, Strategy::RowThreadsChunked] {
        // More threads than rows included on purpose.
        for threads in [1, 2, 3, 7, 64] {
            let result = strategy.multiply(&a, &b, threads).unwrap();
            assert_matrices_close(
                &baseline,
                &result,
                &format!("{}_threads_{}", strategy, threads),
            );
        }
    }
}

// ============================================================
// Algebraic properties
// ============================================================

#[test]
fn multiplying_by_identity_returns_the_operand() {
    let a = generate::random(32, 32);
    let id = Matrix::identity(32);

    for strategy in Strategy::ALL {
        let right = strategy.multiply(&a, &id, 4).unwrap();
        let left = strategy.multiply(&id, &a, 4).unwrap();
        assert_matrices_close(&a, &right, &format!("{}_a_times_id", strategy));
        assert_matrices_close(&a, &left, &format!("{}_id_times_a", strategy));
    }
}

#[test]
fn zero_operand_yields_all_zero_result() {
    let a = generate::random(16, 16);
    let zero = Matrix::zeros(16, 16);

    for strategy in Strategy::ALL {
        let result = strategy.multiply(&a, &zero, 4).unwrap();
        assert_matrices_close(&zero, &result, &format!("{}_times_zero", strategy));
    }
}

#[test]
fn two_by_two_of_ones_squares_to_twos() {
    let ones = Matrix::from_vec(2, 2, vec![1.0; 4]);
    let expected = Matrix::from_vec(2, 2, vec![2.0; 4]);

    for strategy in Strategy::ALL {
        let result = strategy.multiply(&ones, &ones, 2).unwrap();
        assert_matrices_close(&expected, &result, &format!("{}_ones_2x2", strategy));
    }
}

// ============================================================
// Failure modes
// ============================================================

#[test]
fn dimension_mismatch_fails_for_every_strategy() {
    let a = Matrix::zeros(3, 4);
    let b = Matrix::zeros(5, 6);

    for strategy in Strategy::ALL {
        let err = strategy.multiply(&a, &b, 4).unwrap_err();
        assert!(
            matches!(err, MultiplyError::DimensionMismatch { .. }),
            "{}: expected DimensionMismatch, got {:?}",
            strategy,
            err
        );
    }
}

#[test]
fn inputs_are_never_mutated() {
    let a = generate::random(24, 24);
    let b = generate::random(24, 24);
    let a_copy = a.clone();
    let b_copy = b.clone();

    for strategy in Strategy::ALL {
        strategy.multiply(&a, &b, 4).unwrap();
    }

    assert_eq!(a, a_copy);
    assert_eq!(b, b_copy);
}

// ============================================================
// Concurrency stress
// ============================================================

#[test]
fn contended_strategies_are_deterministic_under_repetition() {
    let a = generate::random(8, 8);
    let b = generate::random(8, 8);

    for strategy in [
        Strategy::AtomicAccumulator,
        Strategy::MutexGuarded,
        Strategy::SemaphoreGuarded,
    ] {
        let first = strategy.multiply(&a, &b, 1).unwrap();
        for run in 1..200 {
            let again = strategy.multiply(&a, &b, 1).unwrap();
            assert!(
                first == again,
                "{}: run {} differed from run 0",
                strategy,
                run
            );
        }
    }
}
