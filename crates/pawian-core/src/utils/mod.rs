use std::path::{Path, PathBuf};

use crate::PawianResult;

/// Enumerations for particle columns, line layouts and number formatting.
pub mod enums;
/// Named derived columns (masses, energies, momenta) built from particle names.
pub mod variables;
/// Three- and four-vectors of lazy column expressions.
pub mod vectors;

#[inline]
fn list_to_name<I, S>(values: &I) -> String
where
    I: IntoIterator<Item = S> + Clone,
    S: AsRef<str>,
{
    values
        .clone()
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Expand `~` and environment variables in a path.
pub(crate) fn expand_path(file_path: &Path) -> PawianResult<PathBuf> {
    Ok(PathBuf::from(
        &*shellexpand::full(&file_path.to_string_lossy())?,
    ))
}

/// Expand a path which must already exist and resolve it to an absolute path.
pub(crate) fn canonicalize_path(file_path: &Path) -> PawianResult<PathBuf> {
    Ok(expand_path(file_path)?.canonicalize()?)
}
