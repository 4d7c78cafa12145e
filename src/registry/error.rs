use thiserror::Error;

/// Configuration errors raised while mutating the registry
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Invalid extension key: {0:?}")]
    InvalidExtension(String),

    #[error("Parser registered for {ext:?} has no parse capability")]
    MissingParse { ext: String },
}
