use std::path::PathBuf;

/// Why a single sensor could not be read
#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    #[error("i2c transfer failed: {0:?}")]
    I2c(embedded_hal::i2c::ErrorKind),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unexpected content in {what}: {detail}")]
    Parse { what: &'static str, detail: String },
}

impl SensorError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SensorError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(what: &'static str, detail: impl Into<String>) -> Self {
        SensorError::Parse {
            what,
            detail: detail.into(),
        }
    }
}
