use approx::assert_abs_diff_eq;
use lgv_core::{entropy, partial_trace, DEFAULT_ENTROPY_EPS};
use ndarray::Array1;
use num_complex::Complex64;
use proptest::prelude::*;

const EPSILON: f64 = 1e-9;

/// Normalized state from raw (re, im) pairs
fn normalize(raw: Vec<(f64, f64)>) -> Option<Array1<Complex64>> {
    let state: Array1<Complex64> = raw.into_iter().map(|(re, im)| Complex64::new(re, im)).collect();
    let norm = state.iter().map(|c| c.norm_sqr()).sum::<f64>().sqrt();
    if norm < 1e-6 {
        return None;
    }
    Some(state.mapv(|c| c / norm))
}

/// Kronecker product a ⊗ b, a on the high wires
fn kron(a: &Array1<Complex64>, b: &Array1<Complex64>) -> Array1<Complex64> {
    a.iter().flat_map(|x| b.iter().map(move |y| x * y)).collect()
}

fn amplitudes(n_wires: usize) -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((-1.0f64..1.0, -1.0f64..1.0), 1 << n_wires)
}

#[test]
fn test_bell_scenario() {
    let h = std::f64::consts::FRAC_1_SQRT_2;
    let state = Array1::from(vec![
        Complex64::new(h, 0.0),
        Complex64::new(0.0, 0.0),
        Complex64::new(0.0, 0.0),
        Complex64::new(h, 0.0),
    ]);
    assert_abs_diff_eq!(
        entropy(&state, &[0], 2, DEFAULT_ENTROPY_EPS).unwrap(),
        1.0,
        epsilon = EPSILON
    );
}

#[test]
fn test_eps_does_not_alter_large_eigenvalues() {
    let h = std::f64::consts::FRAC_1_SQRT_2;
    let state = Array1::from(vec![
        Complex64::new(h, 0.0),
        Complex64::new(0.0, 0.0),
        Complex64::new(0.0, 0.0),
        Complex64::new(h, 0.0),
    ]);
    let a = entropy(&state, &[0], 2, 1e-12).unwrap();
    let b = entropy(&state, &[0], 2, 1e-3).unwrap();
    assert_abs_diff_eq!(a, b, epsilon = 1e-12);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_trace_is_one(raw in amplitudes(3), keep in prop::collection::vec(0usize..3, 0..4)) {
        if let Some(state) = normalize(raw) {
            let rho = partial_trace(&state, &keep, 3).unwrap();
            prop_assert!((rho.trace() - 1.0).abs() < EPSILON);
            prop_assert!(rho.purity() <= 1.0 + EPSILON);
        }
    }

    #[test]
    fn prop_keep_all_is_outer_product(raw in amplitudes(2)) {
        if let Some(state) = normalize(raw) {
            let rho = partial_trace(&state, &[0, 1], 2).unwrap();
            for i in 0..4 {
                for j in 0..4 {
                    let expected = state[i] * state[j].conj();
                    prop_assert!((rho.matrix()[[i, j]] - expected).norm() < EPSILON);
                }
            }
        }
    }

    #[test]
    fn prop_entropy_bounded_by_kept_wires(raw in amplitudes(3), wire in 0usize..3) {
        if let Some(state) = normalize(raw) {
            let s = entropy(&state, &[wire], 3, DEFAULT_ENTROPY_EPS).unwrap();
            prop_assert!(s >= -EPSILON);
            prop_assert!(s <= 1.0 + EPSILON);
        }
    }

    #[test]
    fn prop_product_state_has_zero_entropy(a in amplitudes(1), b in amplitudes(2)) {
        if let (Some(a), Some(b)) = (normalize(a), normalize(b)) {
            let state = kron(&a, &b);
            let s = entropy(&state, &[0], 3, DEFAULT_ENTROPY_EPS).unwrap();
            prop_assert!(s.abs() < 1e-6, "product entropy {}", s);
        }
    }

    #[test]
    fn prop_complementary_partitions_agree(raw in amplitudes(3)) {
        if let Some(state) = normalize(raw) {
            let s0 = entropy(&state, &[0], 3, DEFAULT_ENTROPY_EPS).unwrap();
            let s12 = entropy(&state, &[1, 2], 3, DEFAULT_ENTROPY_EPS).unwrap();
            prop_assert!((s0 - s12).abs() < 1e-6);
        }
    }
}
