// src/model/basis.rs

use serde::{Deserialize, Serialize};

/// An ordered set of fractional basis-atom positions within one unit cell.
///
/// `cell_scale` multiplies the lattice parameter to obtain the edge length
/// of the conventional cell the fractional coordinates refer to. The
/// 16-atom FeV superstructure is defined on a doubled cell (scale 2.0),
/// the plain B2 basis on the primitive cubic cell (scale 1.0).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CrystalBasis {
    pub cell_scale: f64,
    pub sites: Vec<[f64; 3]>,
}

impl CrystalBasis {
    /// CsCl-type two-atom basis: corner plus body center.
    pub fn b2() -> Self {
        Self {
            cell_scale: 1.0,
            sites: vec![[0.0, 0.0, 0.0], [0.5, 0.5, 0.5]],
        }
    }

    /// 16-atom ordered FeV superstructure on the doubled conventional cell.
    ///
    /// Slot order is significant: composition patterns address these sites
    /// by their 1-based position in this list.
    pub fn fev_superstructure() -> Self {
        Self {
            cell_scale: 2.0,
            sites: vec![
                [0.0, 0.0, 0.0],
                [0.5, 0.0, 0.0],
                [0.0, 0.5, 0.0],
                [0.5, 0.5, 0.0],
                [0.0, 0.0, 0.5],
                [0.0, 0.5, 0.5],
                [0.5, 0.0, 0.5],
                [0.5, 0.5, 0.5],
                [0.75, 0.25, 0.25],
                [0.25, 0.75, 0.25],
                [0.25, 0.25, 0.75],
                [0.75, 0.75, 0.75],
                [0.25, 0.25, 0.25],
                [0.75, 0.25, 0.75],
                [0.25, 0.75, 0.75],
                [0.75, 0.75, 0.25],
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}
