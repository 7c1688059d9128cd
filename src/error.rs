// src/error.rs

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Unified error type for fevgen operations.
///
/// Configuration variants are fatal and surface before any filesystem
/// effect; I/O and engine variants are raised per sweep iteration and can
/// be isolated without aborting the remaining lattice parameters.
#[derive(Debug, Error)]
pub enum FevgenError {
    #[error("supercell size must be at least 1, got {0}")]
    InvalidSupercellSize(usize),

    #[error("crystal basis must contain at least one atom")]
    EmptyBasis,

    #[error("lattice matrix is singular")]
    SingularLattice,

    #[error("lattice parameter must be positive, got {0}")]
    InvalidLatticeParameter(f64),

    #[error("minority slot {slot} outside basis range 1..={basis_len}")]
    MinoritySlotOutOfRange { slot: usize, basis_len: usize },

    #[error("minority slot {0} listed more than once")]
    DuplicateMinoritySlot(usize),

    #[error("defect percentage must be within [0, 100], got {0}")]
    InvalidDefectPercentage(f64),

    #[error("cannot draw {count} defects without replacement from {total} sites")]
    DefectCountExceedsSites { count: usize, total: usize },

    #[error("sweep must contain at least one lattice parameter")]
    EmptySweep,

    #[error("sweep step must be positive, got {0}")]
    InvalidSweepStep(f64),

    #[error("auxiliary file not found: {0}")]
    MissingAuxiliaryFile(PathBuf),

    #[error("workspace already exists: {0}")]
    WorkspaceCollision(PathBuf),

    #[error("refusing to write a data file with no sites")]
    EmptySiteList,

    #[error("{positions} positions but {labels} species labels")]
    LabelCountMismatch { positions: usize, labels: usize },

    #[error("malformed data file {path}: {reason}")]
    MalformedDataFile { path: PathBuf, reason: String },

    #[error("failed to launch engine `{command}`: {source}")]
    EngineLaunch {
        command: String,
        source: std::io::Error,
    },

    #[error("engine `{command}` exited with {status}")]
    EngineFailure { command: String, status: ExitStatus },

    #[error("invalid configuration file {path}: {source}")]
    InvalidConfig {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Common result type used throughout the crate.
pub type Result<T> = std::result::Result<T, FevgenError>;

impl FevgenError {
    /// Whether this error invalidates the whole run rather than a single
    /// sweep iteration.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            FevgenError::WorkspaceCollision(_)
                | FevgenError::Io(_)
                | FevgenError::EngineLaunch { .. }
                | FevgenError::EngineFailure { .. }
        )
    }
}
