// src/generation/supercell.rs

use crate::error::{FevgenError, Result};
use crate::model::UnitCell;
use crate::utils::linalg;

/// Replicate a unit cell `size` times along each axis.
///
/// Positions are emitted cell-major: the first replication axis is the
/// outermost loop, the third the innermost, and within each cell the basis
/// atoms keep their given order. Site n (1-based) of the output therefore
/// occupies basis slot ((n-1) mod |basis|) + 1 of cell (i, j, k); the
/// labeler and the data writer both depend on this ordering.
pub fn generate(cell: &UnitCell, size: usize) -> Result<Vec<[f64; 3]>> {
    if size < 1 {
        return Err(FevgenError::InvalidSupercellSize(size));
    }
    if cell.atoms.is_empty() {
        return Err(FevgenError::EmptyBasis);
    }
    if linalg::is_singular(cell.lattice) {
        return Err(FevgenError::SingularLattice);
    }

    let vec_a = cell.lattice[0];
    let vec_b = cell.lattice[1];
    let vec_c = cell.lattice[2];

    let mut positions = Vec::with_capacity(size * size * size * cell.atoms.len());

    for i in 0..size {
        for j in 0..size {
            for k in 0..size {
                let translation = [
                    vec_a[0] * i as f64 + vec_b[0] * j as f64 + vec_c[0] * k as f64,
                    vec_a[1] * i as f64 + vec_b[1] * j as f64 + vec_c[1] * k as f64,
                    vec_a[2] * i as f64 + vec_b[2] * j as f64 + vec_c[2] * k as f64,
                ];

                for atom in &cell.atoms {
                    positions.push([
                        atom[0] + translation[0],
                        atom[1] + translation[1],
                        atom[2] + translation[2],
                    ]);
                }
            }
        }
    }

    Ok(positions)
}
