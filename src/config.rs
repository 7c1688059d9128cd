// src/config.rs

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::error::{FevgenError, Result};
use crate::generation::CompositionPolicy;
use crate::model::CrystalBasis;

// --- Sweep ---

/// Lattice-parameter sweep: `count` values starting at `start`, spaced
/// `step` apart, monotonically increasing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepSpec {
  pub start: f64,
  pub step: f64,
  pub count: usize,
}

impl SweepSpec {
  pub fn values(&self) -> Vec<f64> {
    (0..self.count)
      .map(|i| self.start + i as f64 * self.step)
      .collect()
  }
}

// --- Basis selection ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasisSpec {
  /// Two-atom CsCl-type basis on the primitive cubic cell.
  B2,
  /// 16-atom ordered FeV superstructure on the doubled cell.
  Fev16,
  Custom {
    cell_scale: f64,
    sites: Vec<[f64; 3]>,
  },
}

impl BasisSpec {
  pub fn to_basis(&self) -> CrystalBasis {
    match self {
      BasisSpec::B2 => CrystalBasis::b2(),
      BasisSpec::Fev16 => CrystalBasis::fev_superstructure(),
      BasisSpec::Custom { cell_scale, sites } => CrystalBasis {
        cell_scale: *cell_scale,
        sites: sites.clone(),
      },
    }
  }
}

// --- Auxiliary files ---

/// The three files copied verbatim into every generated workspace: the
/// MEAM library, the alloy potential, and the engine input script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuxiliaryFiles {
  pub library: String,
  pub potential: String,
  pub input: String,
}

impl Default for AuxiliaryFiles {
  fn default() -> Self {
    Self {
      library: "FeV.library.meam".to_string(),
      potential: "FeV.meam".to_string(),
      input: "FeV_external_positions_input_file.in".to_string(),
    }
  }
}

impl AuxiliaryFiles {
  pub fn names(&self) -> [&str; 3] {
    [&self.library, &self.potential, &self.input]
  }
}

// --- Main config struct ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
  /// Directory holding the auxiliary files.
  pub source_directory: PathBuf,

  /// Root under which the per-lattice workspaces are created.
  #[serde(default = "default_output_directory")]
  pub output_directory: PathBuf,

  pub sweep: SweepSpec,
  pub supercell_size: usize,
  pub basis: BasisSpec,
  pub composition: CompositionPolicy,

  #[serde(default)]
  pub auxiliary_files: AuxiliaryFiles,

  #[serde(default = "default_data_file_name")]
  pub data_file_name: String,

  #[serde(default = "default_selection_file_name")]
  pub selection_file_name: String,

  /// External engine executable; when absent the sweep only generates
  /// workspaces.
  #[serde(default)]
  pub engine_command: Option<String>,

  /// Seed for the defect draw. Unset means fresh entropy per run.
  #[serde(default)]
  pub seed: Option<u64>,
}

fn default_output_directory() -> PathBuf {
  PathBuf::from(".")
}

fn default_data_file_name() -> String {
  "atoms_positions.data".to_string()
}

fn default_selection_file_name() -> String {
  "composition_selection.csv".to_string()
}

impl SweepConfig {
  /// Load and validate a configuration from a JSON file.
  pub fn load(path: &Path) -> Result<Self> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let config: SweepConfig =
      serde_json::from_reader(reader).map_err(|source| FevgenError::InvalidConfig {
        path: path.to_path_buf(),
        source,
      })?;
    config.validate()?;
    Ok(config)
  }

  /// Reject parameter combinations that cannot produce a run. Called
  /// before any filesystem effect.
  pub fn validate(&self) -> Result<()> {
    if self.sweep.count < 1 {
      return Err(FevgenError::EmptySweep);
    }
    if !(self.sweep.step > 0.0) {
      return Err(FevgenError::InvalidSweepStep(self.sweep.step));
    }
    if !(self.sweep.start > 0.0) {
      return Err(FevgenError::InvalidLatticeParameter(self.sweep.start));
    }
    if self.supercell_size < 1 {
      return Err(FevgenError::InvalidSupercellSize(self.supercell_size));
    }
    if self.basis.to_basis().is_empty() {
      return Err(FevgenError::EmptyBasis);
    }
    Ok(())
  }
}
