pub mod loader;
pub mod query;
pub mod raw;
pub mod transform;

use std::path::PathBuf;

use thiserror::Error;

pub use loader::load_roster;
pub use query::DischargeFilters;
pub use raw::RawPatientData;
pub use transform::transform_patient_data;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Failed to read roster data at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid discharge record in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No discharge records found in {0}")]
    EmptyRoster(PathBuf),
}
