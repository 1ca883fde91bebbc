pub mod enums;
pub mod insight;
pub mod patient;

pub use enums::*;
pub use insight::*;
pub use patient::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid {field} value: {value}")]
    InvalidEnum { field: String, value: String },
}
