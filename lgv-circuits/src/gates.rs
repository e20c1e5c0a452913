//! Gate matrices
//!
//! Two-wire matrices act on the local basis |a b⟩ with the first wire
//! as the high bit.

use ndarray::{array, Array2};
use num_complex::Complex64;
use std::f64::consts::FRAC_1_SQRT_2;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// Hadamard gate
pub fn hadamard() -> Array2<Complex64> {
    let h = FRAC_1_SQRT_2;
    array![
        [Complex64::new(h, 0.0), Complex64::new(h, 0.0)],
        [Complex64::new(h, 0.0), Complex64::new(-h, 0.0)]
    ]
}

/// Rotation around X-axis
pub fn rx(theta: f64) -> Array2<Complex64> {
    let c = (theta / 2.0).cos();
    let s = (theta / 2.0).sin();
    array![
        [Complex64::new(c, 0.0), Complex64::new(0.0, -s)],
        [Complex64::new(0.0, -s), Complex64::new(c, 0.0)]
    ]
}

/// Rotation around Y-axis
pub fn ry(theta: f64) -> Array2<Complex64> {
    let c = (theta / 2.0).cos();
    let s = (theta / 2.0).sin();
    array![
        [Complex64::new(c, 0.0), Complex64::new(-s, 0.0)],
        [Complex64::new(s, 0.0), Complex64::new(c, 0.0)]
    ]
}

/// CNOT, control on the first wire
pub fn cnot() -> Array2<Complex64> {
    array![
        [ONE, ZERO, ZERO, ZERO],
        [ZERO, ONE, ZERO, ZERO],
        [ZERO, ZERO, ZERO, ONE],
        [ZERO, ZERO, ONE, ZERO]
    ]
}

/// Controlled-Z (symmetric in its wires)
pub fn cz() -> Array2<Complex64> {
    array![
        [ONE, ZERO, ZERO, ZERO],
        [ZERO, ONE, ZERO, ZERO],
        [ZERO, ZERO, ONE, ZERO],
        [ZERO, ZERO, ZERO, Complex64::new(-1.0, 0.0)]
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn is_unitary(u: &Array2<Complex64>) -> bool {
        let adjoint = u.t().mapv(|c| c.conj());
        let product = adjoint.dot(u);
        product
            .indexed_iter()
            .all(|((i, j), c)| (c - if i == j { ONE } else { ZERO }).norm() < 1e-12)
    }

    #[test]
    fn test_gates_are_unitary() {
        for u in [hadamard(), rx(0.7), ry(-1.3), cnot(), cz()] {
            assert!(is_unitary(&u));
        }
    }

    #[test]
    fn test_rotations_at_pi() {
        // RX(π) = -iX, RY(π) = [[0,-1],[1,0]]
        let x = rx(PI);
        assert!((x[[0, 1]] - Complex64::new(0.0, -1.0)).norm() < 1e-12);
        let y = ry(PI);
        assert!((y[[1, 0]] - ONE).norm() < 1e-12);
        assert!(y[[0, 0]].norm() < 1e-12);
    }
}
