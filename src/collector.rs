//! Packaged artifact collection.
//! Copies every distinct archive referenced by the service's functions into
//! the build directory.

use crate::descriptor::FunctionDef;
use crate::error::{Error, Result};
use indexmap::{IndexMap, IndexSet};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolves the distinct artifact paths in first-seen order.
///
/// Functions without their own artifact use `fallback`.
///
/// # Errors
/// * `Error::MissingArtifact` if a function has neither
pub fn distinct_artifacts(
    functions: &IndexMap<String, FunctionDef>,
    fallback: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    let mut artifacts = IndexSet::new();
    for (name, function) in functions {
        let artifact = function.artifact().or(fallback).ok_or_else(|| {
            Error::MissingArtifact(format!("function '{}' has no packaged artifact", name))
        })?;
        artifacts.insert(artifact.to_path_buf());
    }
    Ok(artifacts.into_iter().collect())
}

/// Copies each distinct artifact into `destination`, creating it if needed.
/// Relative artifact paths are resolved against `base_dir`.
///
/// # Returns
/// * The base file names copied, in copy order
///
/// # Errors
/// * `Error::MissingArtifact` when an artifact is not a file on disk. Copies
///   made before that point are left in place.
pub fn collect_artifacts<P: AsRef<Path>, Q: AsRef<Path>>(
    functions: &IndexMap<String, FunctionDef>,
    fallback: Option<&Path>,
    base_dir: P,
    destination: Q,
) -> Result<Vec<String>> {
    let destination = destination.as_ref();
    let artifacts = distinct_artifacts(functions, fallback)?;

    fs::create_dir_all(destination)?;

    let mut copied = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let source = base_dir.as_ref().join(&artifact);
        if !source.is_file() {
            return Err(Error::MissingArtifact(source.display().to_string()));
        }
        let file_name = artifact
            .file_name()
            .ok_or_else(|| Error::MissingArtifact(format!("{} has no file name", artifact.display())))?
            .to_string_lossy()
            .into_owned();

        let target = destination.join(&file_name);
        fs::copy(&source, &target)?;
        info!("Copied zip {} to {}", file_name, target.display());
        copied.push(file_name);
    }
    Ok(copied)
}
