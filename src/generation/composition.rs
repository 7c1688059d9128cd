// src/generation/composition.rs

use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{FevgenError, Result};
use crate::model::Species;

/// How species labels are assigned to the global site sequence.
///
/// Both policies address sites through the same 1-based global index the
/// supercell generator emits, so a single `assign` entry point enforces
/// the index/site correspondence for either case.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CompositionPolicy {
    /// Exact pattern: the listed 1-based basis slots carry vanadium in
    /// every unit cell.
    Ordered { minority_slots: Vec<usize> },
    /// Start from the perfectly alternating B2 assignment and flip a
    /// random subset of sites, sized as a percentage of all sites.
    DefectInjection { defect_percentage: f64 },
}

/// Result of a labeling pass. `selection` records what defined the
/// pattern (minority slots, or drawn defect indices in draw order) for
/// the provenance dump; `realized_fraction` is only present for defect
/// injection, where the vanadium share can drift from the nominal 0.5.
#[derive(Clone, Debug, PartialEq)]
pub struct Composition {
    pub labels: Vec<Species>,
    pub selection: Vec<usize>,
    pub realized_fraction: Option<f64>,
}

impl CompositionPolicy {
    /// Label `total_sites` sites. The random source is consumed only by
    /// defect injection; ordered labeling is deterministic.
    pub fn assign<R: Rng>(
        &self,
        total_sites: usize,
        basis_len: usize,
        rng: &mut R,
    ) -> Result<Composition> {
        match self {
            CompositionPolicy::Ordered { minority_slots } => {
                ordered_labels(total_sites, basis_len, minority_slots)
            }
            CompositionPolicy::DefectInjection { defect_percentage } => {
                let count = defect_count(total_sites, *defect_percentage)?;
                defect_labels(total_sites, count, rng)
            }
        }
    }
}

/// Number of label flips for a given percentage of the site population,
/// truncated toward zero.
pub fn defect_count(total_sites: usize, percentage: f64) -> Result<usize> {
    if !(0.0..=100.0).contains(&percentage) {
        return Err(FevgenError::InvalidDefectPercentage(percentage));
    }
    Ok((total_sites as f64 * percentage / 100.0) as usize)
}

/// Deterministic ordered labeling: site n occupies basis slot
/// ((n-1) mod basis_len) + 1 and is vanadium iff that slot is listed.
///
/// The resulting vanadium count is exactly
/// (total_sites / basis_len) × |minority_slots|.
pub fn ordered_labels(
    total_sites: usize,
    basis_len: usize,
    minority_slots: &[usize],
) -> Result<Composition> {
    if basis_len == 0 {
        return Err(FevgenError::EmptyBasis);
    }

    let mut slot_set = BTreeSet::new();
    for &slot in minority_slots {
        if slot < 1 || slot > basis_len {
            return Err(FevgenError::MinoritySlotOutOfRange { slot, basis_len });
        }
        if !slot_set.insert(slot) {
            return Err(FevgenError::DuplicateMinoritySlot(slot));
        }
    }

    let labels = (1..=total_sites)
        .map(|n| {
            let slot = ((n - 1) % basis_len) + 1;
            if slot_set.contains(&slot) {
                Species::Vanadium
            } else {
                Species::Iron
            }
        })
        .collect();

    Ok(Composition {
        labels,
        selection: minority_slots.to_vec(),
        realized_fraction: None,
    })
}

/// Flip `count` distinct sites of the alternating B2 baseline.
///
/// Indices are drawn uniformly without replacement, so no site is flipped
/// twice. Flips are unconditional (iron↔vanadium), not paired exchanges:
/// the realized vanadium fraction depends on how many drawn indices were
/// even and is reported rather than corrected.
pub fn defect_labels<R: Rng>(
    total_sites: usize,
    count: usize,
    rng: &mut R,
) -> Result<Composition> {
    if count > total_sites {
        return Err(FevgenError::DefectCountExceedsSites {
            count,
            total: total_sites,
        });
    }

    // alternating baseline: even 1-based index -> vanadium
    let mut labels: Vec<Species> = (1..=total_sites)
        .map(|n| {
            if n % 2 == 0 {
                Species::Vanadium
            } else {
                Species::Iron
            }
        })
        .collect();

    let selection: Vec<usize> = rand::seq::index::sample(rng, total_sites, count)
        .into_iter()
        .map(|i| i + 1)
        .collect();

    for &site in &selection {
        labels[site - 1] = labels[site - 1].flipped();
    }

    let vanadium = labels.iter().filter(|&&s| s == Species::Vanadium).count();
    let realized = vanadium as f64 / total_sites as f64;

    Ok(Composition {
        labels,
        selection,
        realized_fraction: Some(realized),
    })
}
