// src/model/structure.rs

use crate::error::{FevgenError, Result};
use crate::model::basis::CrystalBasis;
use crate::utils::linalg;

/// One of the two species in the binary alloy. The numeric LAMMPS atom
/// type is 1 for iron and 2 for vanadium.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Species {
    Iron,
    Vanadium,
}

impl Species {
    pub fn atom_type(self) -> u32 {
        match self {
            Species::Iron => 1,
            Species::Vanadium => 2,
        }
    }

    pub fn from_atom_type(t: u32) -> Option<Self> {
        match t {
            1 => Some(Species::Iron),
            2 => Some(Species::Vanadium),
            _ => None,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Species::Iron => Species::Vanadium,
            Species::Vanadium => Species::Iron,
        }
    }
}

/// A single atomic site of the assembled supercell.
///
/// `id` is the 1-based global index in construction order; the data file
/// encodes the position/species correspondence purely through this order.
#[derive(Clone, Debug, PartialEq)]
pub struct Site {
    pub id: usize,
    pub species: Species,
    pub position: [f64; 3],
}

/// A unit cell scaled to a concrete lattice parameter.
///
/// `lattice` holds the cell vectors as rows, `atoms` the basis sites in
/// Cartesian coordinates, `edge` the conventional-cell edge length
/// (cell scale × lattice parameter).
#[derive(Clone, Debug)]
pub struct UnitCell {
    pub lattice: [[f64; 3]; 3],
    pub atoms: Vec<[f64; 3]>,
    pub edge: f64,
}

impl UnitCell {
    /// Scale a crystal basis onto a cubic cell with the given lattice
    /// parameter.
    pub fn cubic(lattice_parameter: f64, basis: &CrystalBasis) -> Result<Self> {
        if !(lattice_parameter > 0.0) {
            return Err(FevgenError::InvalidLatticeParameter(lattice_parameter));
        }
        if basis.is_empty() {
            return Err(FevgenError::EmptyBasis);
        }

        let edge = basis.cell_scale * lattice_parameter;
        let lattice = [
            [edge, 0.0, 0.0],
            [0.0, edge, 0.0],
            [0.0, 0.0, edge],
        ];

        let atoms = basis
            .sites
            .iter()
            .map(|&frac| linalg::frac_to_cart(frac, lattice))
            .collect();

        Ok(Self { lattice, atoms, edge })
    }
}

/// A fully labeled periodic replication of a unit cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Supercell {
    pub lattice_parameter: f64,
    /// Cubic box length per axis: replication count × cell edge.
    pub box_length: f64,
    /// Realized type-2 fraction; present only for defect-injected
    /// compositions, where it can drift from the nominal 0.5.
    pub realized_fraction: Option<f64>,
    pub sites: Vec<Site>,
}

impl Supercell {
    /// Zip generated positions with their species labels into sites,
    /// assigning 1-based ids in construction order.
    pub fn assemble(
        lattice_parameter: f64,
        box_length: f64,
        positions: Vec<[f64; 3]>,
        labels: &[Species],
        realized_fraction: Option<f64>,
    ) -> Result<Self> {
        if positions.len() != labels.len() {
            return Err(FevgenError::LabelCountMismatch {
                positions: positions.len(),
                labels: labels.len(),
            });
        }

        let sites = positions
            .into_iter()
            .zip(labels.iter().copied())
            .enumerate()
            .map(|(i, (position, species))| Site {
                id: i + 1,
                species,
                position,
            })
            .collect();

        Ok(Self {
            lattice_parameter,
            box_length,
            realized_fraction,
            sites,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cubic_scaling() {
        let cell = UnitCell::cubic(2.81, &CrystalBasis::b2()).unwrap();

        assert!((cell.edge - 2.81).abs() < 1e-10);
        assert_eq!(cell.atoms.len(), 2);
        assert!((cell.atoms[1][0] - 1.405).abs() < 1e-10);
        assert!((cell.atoms[1][1] - 1.405).abs() < 1e-10);
        assert!((cell.atoms[1][2] - 1.405).abs() < 1e-10);
    }

    #[test]
    fn test_conventional_cell_doubling() {
        let cell = UnitCell::cubic(2.8, &CrystalBasis::fev_superstructure()).unwrap();
        assert!((cell.edge - 5.6).abs() < 1e-10);
        // slot 2 sits at (0.5, 0, 0) of the doubled cell
        assert!((cell.atoms[1][0] - 2.8).abs() < 1e-10);
    }

    #[test]
    fn test_rejects_bad_lattice_parameter() {
        assert!(UnitCell::cubic(0.0, &CrystalBasis::b2()).is_err());
        assert!(UnitCell::cubic(-1.0, &CrystalBasis::b2()).is_err());
    }

    #[test]
    fn test_assemble_checks_lengths() {
        let positions = vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]];
        let labels = [Species::Iron];
        assert!(Supercell::assemble(2.81, 2.81, positions, &labels, None).is_err());
    }

    #[test]
    fn test_assemble_ids_are_one_based() {
        let positions = vec![[0.0, 0.0, 0.0], [1.405, 1.405, 1.405]];
        let labels = [Species::Iron, Species::Vanadium];
        let cell = Supercell::assemble(2.81, 2.81, positions, &labels, None).unwrap();

        assert_eq!(cell.sites[0].id, 1);
        assert_eq!(cell.sites[1].id, 2);
        assert_eq!(cell.sites[1].species, Species::Vanadium);
    }
}
