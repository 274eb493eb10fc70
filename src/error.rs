use std::path::PathBuf;
use thiserror::Error;

/// Setup-time failures. The per-invocation shading math never produces these.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image error for '{}': {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to parse config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("unknown mesh kind '{0}'")]
    UnknownMesh(String),
}

pub type Result<T> = std::result::Result<T, Error>;
