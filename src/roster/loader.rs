use std::fs;
use std::path::{Path, PathBuf};

use super::raw::RawPatientData;
use super::transform::transform_patient_data;
use super::RosterError;
use crate::models::PatientRecord;

/// Load every `*.json` discharge export in `dir`, sorted by file name.
///
/// Ids are assigned 1..n in that order, so the roster is stable across
/// restarts as long as the directory contents do not change.
pub fn load_roster(dir: &Path) -> Result<Vec<PatientRecord>, RosterError> {
    let entries = fs::read_dir(dir).map_err(|source| RosterError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| RosterError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json && path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    let mut roster = Vec::with_capacity(files.len());
    for (index, path) in files.iter().enumerate() {
        let raw = read_raw(path)?;
        roster.push(transform_patient_data(&raw, index as u32 + 1));
    }

    if roster.is_empty() {
        return Err(RosterError::EmptyRoster(dir.to_path_buf()));
    }

    tracing::info!(
        patients = roster.len(),
        dir = %dir.display(),
        "Loaded discharge roster"
    );
    Ok(roster)
}

fn read_raw(path: &Path) -> Result<RawPatientData, RosterError> {
    let contents = fs::read_to_string(path).map_err(|source| RosterError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| RosterError::Json {
        path: path.to_path_buf(),
        source,
    })
}
