// src/sweep.rs

use std::fs;
use std::path::Path;
use std::process::Command;

use log::{debug, info, warn};
use rand::Rng;

use crate::config::SweepConfig;
use crate::error::{FevgenError, Result};
use crate::generation::composition::Composition;
use crate::generation::supercell;
use crate::io::{lammps_data, selection};
use crate::model::{CrystalBasis, Supercell, UnitCell};

/// Outcome of one full sweep. Failed iterations carry their lattice
/// parameter and the rendered error.
#[derive(Debug, Default)]
pub struct SweepReport {
    pub completed: Vec<f64>,
    pub failed: Vec<(f64, String)>,
}

/// Run the whole lattice-parameter sweep.
///
/// The composition pattern is computed once up front and reused for every
/// lattice parameter; only the geometry is rebuilt per value. Fatal
/// (configuration) errors abort immediately, while per-iteration I/O and
/// engine failures are logged with their lattice parameter and skipped so
/// a long sweep still produces the remaining workspaces.
pub fn run_sweep<R: Rng>(config: &SweepConfig, rng: &mut R) -> Result<SweepReport> {
    config.validate()?;
    check_auxiliary_files(config)?;

    let basis = config.basis.to_basis();
    let size = config.supercell_size;
    let total_sites = size.pow(3) * basis.len();

    let comp = config.composition.assign(total_sites, basis.len(), rng)?;
    if let Some(fraction) = comp.realized_fraction {
        info!("realized type-2 composition {:.4}", fraction);
        let mut sorted = comp.selection.clone();
        sorted.sort_unstable();
        debug!("defect sites: {:?}", sorted);
    }

    fs::create_dir_all(&config.output_directory)?;
    selection::write(
        &config.output_directory.join(&config.selection_file_name),
        &comp.selection,
    )?;

    let values = config.sweep.values();
    info!(
        "sweeping {} lattice parameters from {:.2} in steps of {}",
        values.len(),
        config.sweep.start,
        config.sweep.step
    );

    let mut report = SweepReport::default();
    for lattice_parameter in values {
        match run_iteration(config, &basis, size, &comp, lattice_parameter) {
            Ok(()) => report.completed.push(lattice_parameter),
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                warn!("lattice parameter {:.2} failed: {}", lattice_parameter, err);
                report.failed.push((lattice_parameter, err.to_string()));
            }
        }
    }

    info!(
        "sweep finished: {} completed, {} failed",
        report.completed.len(),
        report.failed.len()
    );
    Ok(report)
}

/// Build one labeled supercell without touching a workspace. Backs the
/// single-file `data` subcommand and the per-iteration path below.
pub fn build_supercell<R: Rng>(
    config: &SweepConfig,
    lattice_parameter: f64,
    rng: &mut R,
) -> Result<Supercell> {
    let basis = config.basis.to_basis();
    let size = config.supercell_size;
    let total_sites = size.pow(3) * basis.len();

    let comp = config.composition.assign(total_sites, basis.len(), rng)?;
    assemble(&basis, size, &comp, lattice_parameter)
}

fn assemble(
    basis: &CrystalBasis,
    size: usize,
    comp: &Composition,
    lattice_parameter: f64,
) -> Result<Supercell> {
    let unit = UnitCell::cubic(lattice_parameter, basis)?;
    let positions = supercell::generate(&unit, size)?;
    Supercell::assemble(
        lattice_parameter,
        size as f64 * unit.edge,
        positions,
        &comp.labels,
        comp.realized_fraction,
    )
}

fn workspace_name(lattice_parameter: f64) -> String {
    format!("Simulation_Lattice_{:.2}", lattice_parameter)
}

fn check_auxiliary_files(config: &SweepConfig) -> Result<()> {
    for name in config.auxiliary_files.names() {
        let path = config.source_directory.join(name);
        if !path.is_file() {
            return Err(FevgenError::MissingAuxiliaryFile(path));
        }
    }
    Ok(())
}

fn run_iteration(
    config: &SweepConfig,
    basis: &CrystalBasis,
    size: usize,
    comp: &Composition,
    lattice_parameter: f64,
) -> Result<()> {
    let cell = assemble(basis, size, comp, lattice_parameter)?;

    let workspace = config
        .output_directory
        .join(workspace_name(lattice_parameter));
    if workspace.exists() {
        return Err(FevgenError::WorkspaceCollision(workspace));
    }
    fs::create_dir_all(&workspace)?;

    for name in config.auxiliary_files.names() {
        fs::copy(config.source_directory.join(name), workspace.join(name))?;
    }

    lammps_data::write(&workspace.join(&config.data_file_name), &cell)?;
    debug!(
        "wrote {} sites into {}",
        cell.sites.len(),
        workspace.display()
    );

    match &config.engine_command {
        Some(command) => launch_engine(command, &workspace, &config.auxiliary_files.input),
        None => {
            debug!("no engine command configured, skipping launch");
            Ok(())
        }
    }
}

fn launch_engine(command: &str, workspace: &Path, input: &str) -> Result<()> {
    info!("launching `{}` in {}", command, workspace.display());
    let status = Command::new(command)
        .arg("-in")
        .arg(input)
        .current_dir(workspace)
        .status()
        .map_err(|source| FevgenError::EngineLaunch {
            command: command.to_string(),
            source,
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(FevgenError::EngineFailure {
            command: command.to_string(),
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuxiliaryFiles, BasisSpec, SweepSpec};
    use crate::generation::CompositionPolicy;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::path::PathBuf;

    fn scratch_config(name: &str) -> (SweepConfig, PathBuf) {
        let root = std::env::temp_dir().join(format!("fevgen_sweep_{}_{}", std::process::id(), name));
        let source = root.join("potentials");
        fs::create_dir_all(&source).unwrap();
        let aux = AuxiliaryFiles::default();
        for file in aux.names() {
            fs::write(source.join(file), "stub\n").unwrap();
        }

        let config = SweepConfig {
            source_directory: source,
            output_directory: root.join("out"),
            sweep: SweepSpec {
                start: 2.8,
                step: 0.01,
                count: 2,
            },
            supercell_size: 1,
            basis: BasisSpec::B2,
            composition: CompositionPolicy::Ordered {
                minority_slots: vec![2],
            },
            auxiliary_files: aux,
            data_file_name: "atoms_positions.data".to_string(),
            selection_file_name: "composition_selection.csv".to_string(),
            engine_command: None,
            seed: None,
        };
        (config, root)
    }

    #[test]
    fn test_sweep_generates_all_workspaces() {
        let (config, root) = scratch_config("ok");
        let mut rng = StdRng::seed_from_u64(0);

        let report = run_sweep(&config, &mut rng).unwrap();
        assert_eq!(report.completed.len(), 2);
        assert!(report.failed.is_empty());

        for name in ["Simulation_Lattice_2.80", "Simulation_Lattice_2.81"] {
            let workspace = config.output_directory.join(name);
            assert!(workspace.join("atoms_positions.data").is_file());
            assert!(workspace.join("FeV.meam").is_file());
            assert!(workspace.join("FeV.library.meam").is_file());
            assert!(workspace
                .join("FeV_external_positions_input_file.in")
                .is_file());
        }
        assert!(config
            .output_directory
            .join("composition_selection.csv")
            .is_file());

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_collision_does_not_abort_sweep() {
        let (config, root) = scratch_config("collision");
        fs::create_dir_all(config.output_directory.join("Simulation_Lattice_2.80")).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        let report = run_sweep(&config, &mut rng).unwrap();
        assert_eq!(report.completed.len(), 1);
        assert!((report.completed[0] - 2.81).abs() < 1e-9);
        assert_eq!(report.failed.len(), 1);
        assert!((report.failed[0].0 - 2.8).abs() < 1e-12);

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_missing_auxiliary_file_is_fatal() {
        let (config, root) = scratch_config("missing_aux");
        fs::remove_file(config.source_directory.join("FeV.meam")).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        assert!(matches!(
            run_sweep(&config, &mut rng),
            Err(FevgenError::MissingAuxiliaryFile(_))
        ));
        // fail-fast: nothing was generated
        assert!(!config.output_directory.exists());

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_build_supercell_counts() {
        let (mut config, root) = scratch_config("single");
        config.supercell_size = 2;
        let mut rng = StdRng::seed_from_u64(0);

        let cell = build_supercell(&config, 2.81, &mut rng).unwrap();
        assert_eq!(cell.sites.len(), 16);
        assert!((cell.box_length - 2.0 * 2.81).abs() < 1e-12);

        fs::remove_dir_all(&root).unwrap();
    }
}
