// src/utils/linalg.rs

use nalgebra::{Matrix3, Vector3};

fn row_matrix(lattice: [[f64; 3]; 3]) -> Matrix3<f64> {
  Matrix3::from_row_slice(&[
    lattice[0][0],
    lattice[0][1],
    lattice[0][2],
    lattice[1][0],
    lattice[1][1],
    lattice[1][2],
    lattice[2][0],
    lattice[2][1],
    lattice[2][2],
  ])
}

/// Convert fractional coordinates to Cartesian using the lattice matrix.
///
/// `lattice` holds the lattice vectors as rows [[ax, ay, az], [bx, by, bz],
/// [cx, cy, cz]]; the result is `Lattice^T × frac`.
pub fn frac_to_cart(frac: [f64; 3], lattice: [[f64; 3]; 3]) -> [f64; 3] {
  let cart = row_matrix(lattice).transpose() * Vector3::from(frac);
  [cart.x, cart.y, cart.z]
}

/// Convert Cartesian coordinates back to fractional, or `None` if the
/// lattice is singular.
pub fn cart_to_frac(cart: [f64; 3], lattice: [[f64; 3]; 3]) -> Option<[f64; 3]> {
  let inv = row_matrix(lattice).transpose().try_inverse()?;
  let frac = inv * Vector3::from(cart);
  Some([frac.x, frac.y, frac.z])
}

/// True when the lattice vectors are linearly dependent.
pub fn is_singular(lattice: [[f64; 3]; 3]) -> bool {
  row_matrix(lattice).try_inverse().is_none()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_cubic_lattice() {
    let lattice = [[5.62, 0.0, 0.0], [0.0, 5.62, 0.0], [0.0, 0.0, 5.62]];

    let cart = frac_to_cart([0.5, 0.5, 0.5], lattice);

    assert!((cart[0] - 2.81).abs() < 1e-10);
    assert!((cart[1] - 2.81).abs() < 1e-10);
    assert!((cart[2] - 2.81).abs() < 1e-10);
  }

  #[test]
  fn test_roundtrip() {
    let lattice = [[4.0, 0.0, 0.0], [2.0, 3.46, 0.0], [0.0, 0.0, 5.0]];

    let frac_orig = [0.75, 0.25, 0.25];
    let cart = frac_to_cart(frac_orig, lattice);
    let frac_back = cart_to_frac(cart, lattice).unwrap();

    assert!((frac_back[0] - frac_orig[0]).abs() < 1e-10);
    assert!((frac_back[1] - frac_orig[1]).abs() < 1e-10);
    assert!((frac_back[2] - frac_orig[2]).abs() < 1e-10);
  }

  #[test]
  fn test_singular_detection() {
    let degenerate = [[1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
    assert!(is_singular(degenerate));
    assert!(cart_to_frac([1.0, 1.0, 1.0], degenerate).is_none());

    let cubic = [[2.81, 0.0, 0.0], [0.0, 2.81, 0.0], [0.0, 0.0, 2.81]];
    assert!(!is_singular(cubic));
  }
}
