//! After a fit, Pawian stores the momentum tuples of the data sample and of the fitted
//! phase-space sample as trees of Lorentz vectors in `pawianHists.root`. Each particle is one
//! `TLorentzVector` branch, split into `fP.fX`, `fP.fY`, `fP.fZ` and `fE` leaves, next to a
//! `weight` branch.

use super::*;
use crate::utils::{canonicalize_path, enums::HistType};
use log::info;
use oxyroot::{Branch, Named, ReaderTree, RootFile};

/// Load the momentum tuples of a `pawianHists.root` file into a table with the same layout as
/// [`read_ascii`](crate::data::io::read_ascii) produces.
///
/// Particles are the branches of the `_dataFourvecs` or `_fittedFourvecs` tree other than
/// `weight`, in branch order. The `weight` column is only added when the weights are not all
/// equal, so unweighted data stays unweighted. Flat `<particle>_px`-style branches are read as
/// well as split Lorentz vectors.
///
/// # Errors
///
/// Fails with [`PawianError::MissingBranch`] if a particle lacks one of its four values and with
/// [`PawianError::Custom`] if the file or tree cannot be read.
pub fn read_pawian_hists<P: AsRef<Path>>(
    file_path: P,
    hist_type: HistType,
) -> PawianResult<DataFrame> {
    let path = canonicalize_path(file_path.as_ref())?;
    let mut file = RootFile::open(&path).map_err(|err| {
        map_root_error(
            &format!("Failed to open ROOT file '{}'", path.display()),
            err,
        )
    })?;
    let tree_name = hist_type.tree_name();
    let tree = file
        .get_tree(tree_name)
        .map_err(|err| map_root_error(&format!("Failed to open ROOT tree '{tree_name}'"), err))?;

    let branch_names: Vec<&str> = tree.branches().map(|branch| branch.name()).collect();
    let particles = validate_particle_names(particle_names(&branch_names))?;
    debug!("found particles {particles:?} in {tree_name}");

    let mut columns = Vec::with_capacity(4 * particles.len() + 1);
    if let Some(branch) = tree.branch(WEIGHT_COLUMN) {
        let weights = read_branch_values(branch, WEIGHT_COLUMN)?;
        if is_constant(&weights) {
            debug!("weights in {tree_name} are constant, leaving them out");
        } else {
            columns.push(Column::new(WEIGHT_COLUMN.into(), weights));
        }
    }
    for particle in &particles {
        for component in Component::ALL {
            let values = read_component(&tree, tree_name, particle, component)?;
            columns.push(Column::new(component.column_name(particle).into(), values));
        }
    }
    let df = DataFrame::new(columns)?;
    info!(
        "Read {} {hist_type} events from {}",
        df.height(),
        path.display()
    );
    Ok(df)
}

/// Particle names in branch order. A complete set of flat `<p>_e`, `<p>_px`, `<p>_py`, `<p>_pz`
/// branches counts as one particle `p`, any other branch is a Lorentz vector.
fn particle_names(branch_names: &[&str]) -> Vec<String> {
    let flat = infer_particle_names(branch_names);
    let mut particles = IndexSet::new();
    for name in branch_names.iter().filter(|name| **name != WEIGHT_COLUMN) {
        let flat_particle = flat.iter().find(|particle| {
            Component::ALL
                .iter()
                .any(|component| component.column_name(particle) == *name)
        });
        particles.insert(flat_particle.map_or(name.to_string(), String::clone));
    }
    particles.into_iter().collect()
}

fn is_constant(values: &[f64]) -> bool {
    values
        .first()
        .map_or(true, |first| values.iter().all(|value| value == first))
}

/// Name of the `TLorentzVector` leaf holding a component.
fn lorentz_leaf(component: Component) -> &'static str {
    match component {
        Component::E => "fE",
        Component::Px => "fP.fX",
        Component::Py => "fP.fY",
        Component::Pz => "fP.fZ",
    }
}

/// Branch paths which may hold a component, in the order they are tried: ROOT 6 split vectors,
/// the nested `fP` branch written by ROOT 5, dotted leaf names and flat columns.
fn component_candidates(particle: &str, component: Component) -> Vec<String> {
    let leaf = lorentz_leaf(component);
    let mut candidates = vec![format!("{particle}/{leaf}")];
    if component != Component::E {
        candidates.push(format!("{particle}/fP/{leaf}"));
    }
    candidates.push(format!("{particle}.{leaf}"));
    candidates.push(component.column_name(particle));
    candidates
}

fn read_component(
    tree: &ReaderTree,
    tree_name: &str,
    particle: &str,
    component: Component,
) -> PawianResult<Vec<f64>> {
    for candidate in component_candidates(particle, component) {
        if let Some(branch) = tree.branch(&candidate) {
            debug!("reading {particle} {component} from branch '{candidate}'");
            return read_branch_values(branch, &candidate);
        }
    }
    Err(PawianError::MissingBranch {
        tree: tree_name.to_string(),
        name: component.column_name(particle),
    })
}

fn read_branch_values(branch: &Branch, name: &str) -> PawianResult<Vec<f64>> {
    let type_name = branch.item_type_name();
    let context = || format!("Failed to read branch '{name}'");
    match type_name.to_ascii_lowercase().as_str() {
        "float" | "float_t" | "float32_t" => Ok(branch
            .as_iter::<f32>()
            .map_err(|err| map_root_error(&context(), err))?
            .map(f64::from)
            .collect()),
        "double" | "double_t" | "double32_t" => Ok(branch
            .as_iter::<f64>()
            .map_err(|err| map_root_error(&context(), err))?
            .collect()),
        _ => Err(PawianError::Custom(format!(
            "Branch '{name}' holds {type_name} values, expected float or double"
        ))),
    }
}

fn map_root_error<E: std::fmt::Display>(context: &str, err: E) -> PawianError {
    PawianError::Custom(format!("{context}: {err}"))
}
