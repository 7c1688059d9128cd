// src/io/lammps_data.rs

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{FevgenError, Result};
use crate::model::{Site, Species, Supercell};

const ATOM_TYPES: u32 = 2;

/// Write a supercell as a LAMMPS `read_data` atom file.
///
/// The layout is fixed: comment header, lattice-parameter comment (plus
/// the realized composition for defect-injected cells), atom and type
/// counts, cubic box bounds starting at the origin, then the `Atoms`
/// section with one `id type x y z` record per site. Records appear in
/// global-index order; consumers match positions to labels purely by
/// line order. Positions are written at full f64 precision so a reread
/// recovers them exactly.
pub fn write(path: &Path, cell: &Supercell) -> Result<()> {
    if cell.sites.is_empty() {
        return Err(FevgenError::EmptySiteList);
    }

    let mut file = BufWriter::new(File::create(path)?);

    writeln!(file, "# FeV alloy supercell")?;
    writeln!(file)?;
    writeln!(file, "# lattice parameter {:.2}", cell.lattice_parameter)?;
    if let Some(fraction) = cell.realized_fraction {
        writeln!(file, "# atom type 2 composition {:.4}", fraction)?;
    }

    writeln!(file, "{} atoms", cell.sites.len())?;
    writeln!(file, "{} atom types", ATOM_TYPES)?;

    writeln!(file, "0.0 {} xlo xhi", cell.box_length)?;
    writeln!(file, "0.0 {} ylo yhi", cell.box_length)?;
    writeln!(file, "0.0 {} zlo zhi", cell.box_length)?;
    writeln!(file)?;

    writeln!(file, "Atoms")?;
    writeln!(file)?;

    for site in &cell.sites {
        writeln!(
            file,
            "{} {} {} {} {}",
            site.id,
            site.species.atom_type(),
            site.position[0],
            site.position[1],
            site.position[2]
        )?;
    }

    file.flush()?;
    Ok(())
}

fn malformed(path: &Path, reason: impl Into<String>) -> FevgenError {
    FevgenError::MalformedDataFile {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

/// Read a data file written by [`write`] back into a supercell.
///
/// Comment lines and blanks are skipped except for the lattice-parameter
/// and composition comments, which are recovered (at their written
/// rounding) into the returned struct.
pub fn parse(path: &Path) -> Result<Supercell> {
    let reader = BufReader::new(File::open(path)?);

    let mut lattice_parameter = None;
    let mut realized_fraction = None;
    let mut declared_atoms = None;
    let mut bounds: Vec<(f64, f64)> = Vec::new();
    let mut sites: Vec<Site> = Vec::new();
    let mut in_atoms = false;

    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(comment) = trimmed.strip_prefix('#') {
            let comment = comment.trim();
            if let Some(value) = comment.strip_prefix("lattice parameter") {
                lattice_parameter = value.trim().parse::<f64>().ok();
            } else if let Some(value) = comment.strip_prefix("atom type 2 composition") {
                realized_fraction = value.trim().parse::<f64>().ok();
            }
            continue;
        }

        if in_atoms {
            let fields: Vec<&str> = trimmed.split_whitespace().collect();
            if fields.len() != 5 {
                return Err(malformed(path, format!("bad atom record `{}`", trimmed)));
            }
            let id: usize = fields[0]
                .parse()
                .map_err(|_| malformed(path, "bad atom id"))?;
            let atom_type: u32 = fields[1]
                .parse()
                .map_err(|_| malformed(path, "bad atom type"))?;
            let species = Species::from_atom_type(atom_type)
                .ok_or_else(|| malformed(path, format!("unknown atom type {}", atom_type)))?;
            let mut position = [0.0; 3];
            for (slot, field) in position.iter_mut().zip(&fields[2..]) {
                *slot = field
                    .parse()
                    .map_err(|_| malformed(path, "bad coordinate"))?;
            }
            sites.push(Site {
                id,
                species,
                position,
            });
        } else if trimmed == "Atoms" {
            in_atoms = true;
        } else if let Some(count) = trimmed.strip_suffix("atom types") {
            let count: u32 = count
                .trim()
                .parse()
                .map_err(|_| malformed(path, "bad atom type count"))?;
            if count != ATOM_TYPES {
                return Err(malformed(path, format!("expected 2 atom types, got {}", count)));
            }
        } else if let Some(count) = trimmed.strip_suffix("atoms") {
            declared_atoms = Some(
                count
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| malformed(path, "bad atom count"))?,
            );
        } else if trimmed.ends_with("xlo xhi")
            || trimmed.ends_with("ylo yhi")
            || trimmed.ends_with("zlo zhi")
        {
            let fields: Vec<&str> = trimmed.split_whitespace().collect();
            let lo: f64 = fields[0]
                .parse()
                .map_err(|_| malformed(path, "bad box bound"))?;
            let hi: f64 = fields[1]
                .parse()
                .map_err(|_| malformed(path, "bad box bound"))?;
            bounds.push((lo, hi));
        } else {
            return Err(malformed(path, format!("unexpected line `{}`", trimmed)));
        }
    }

    let declared = declared_atoms.ok_or_else(|| malformed(path, "missing atoms line"))?;
    if sites.len() != declared {
        return Err(malformed(
            path,
            format!("declared {} atoms but found {}", declared, sites.len()),
        ));
    }
    if bounds.len() != 3 {
        return Err(malformed(path, "expected three box bound lines"));
    }
    let box_length = bounds[0].1;
    if bounds
        .iter()
        .any(|&(lo, hi)| lo != 0.0 || hi != box_length)
    {
        return Err(malformed(path, "box is not cubic at the origin"));
    }

    Ok(Supercell {
        lattice_parameter: lattice_parameter
            .ok_or_else(|| malformed(path, "missing lattice parameter comment"))?,
        box_length,
        realized_fraction,
        sites,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{composition, supercell};
    use crate::model::{CrystalBasis, UnitCell};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::fs;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("fevgen_test_{}_{}", std::process::id(), name))
    }

    fn two_site_cell() -> Supercell {
        let unit = UnitCell::cubic(2.81, &CrystalBasis::b2()).unwrap();
        let positions = supercell::generate(&unit, 1).unwrap();
        let labels = composition::ordered_labels(2, 2, &[2]).unwrap();
        Supercell::assemble(2.81, unit.edge, positions, &labels.labels, None).unwrap()
    }

    #[test]
    fn test_two_site_layout() {
        let path = temp_path("two_site.data");
        write(&path, &two_site_cell()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "# FeV alloy supercell");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "# lattice parameter 2.81");
        assert_eq!(lines[3], "2 atoms");
        assert_eq!(lines[4], "2 atom types");
        assert_eq!(lines[5], "0.0 2.81 xlo xhi");
        assert_eq!(lines[6], "0.0 2.81 ylo yhi");
        assert_eq!(lines[7], "0.0 2.81 zlo zhi");
        assert_eq!(lines[8], "");
        assert_eq!(lines[9], "Atoms");
        assert_eq!(lines[10], "");
        assert!(lines[11].starts_with("1 1 "));
        assert!(lines[12].starts_with("2 2 "));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_composition_comment_in_defect_mode() {
        let mut cell = two_site_cell();
        cell.realized_fraction = Some(0.50128);

        let path = temp_path("defect_comment.data");
        write(&path, &cell).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("# atom type 2 composition 0.5013"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_roundtrip() {
        let unit = UnitCell::cubic(2.81, &CrystalBasis::b2()).unwrap();
        let positions = supercell::generate(&unit, 3).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let comp = composition::defect_labels(positions.len(), 5, &mut rng).unwrap();
        let cell = Supercell::assemble(
            2.81,
            3.0 * unit.edge,
            positions,
            &comp.labels,
            comp.realized_fraction,
        )
        .unwrap();

        let path = temp_path("roundtrip.data");
        write(&path, &cell).unwrap();
        let reread = parse(&path).unwrap();

        // ids, labels and positions survive exactly; box bounds too
        assert_eq!(reread.sites, cell.sites);
        assert_eq!(reread.box_length, cell.box_length);
        assert!(reread.realized_fraction.is_some());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_rejects_empty_cell() {
        let cell = Supercell {
            lattice_parameter: 2.81,
            box_length: 2.81,
            realized_fraction: None,
            sites: Vec::new(),
        };

        let path = temp_path("empty.data");
        assert!(matches!(
            write(&path, &cell),
            Err(FevgenError::EmptySiteList)
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let path = temp_path("garbage.data");
        fs::write(&path, "not a data file\n").unwrap();

        assert!(matches!(
            parse(&path),
            Err(FevgenError::MalformedDataFile { .. })
        ));

        fs::remove_file(&path).unwrap();
    }
}
