//! Catalog lookup errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("unknown particle type: {0}")]
    UnknownParticleType(String),

    #[error("unknown experiment preset: {0}")]
    UnknownPreset(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
