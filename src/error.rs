use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum QuasarError {
    #[error("Device not found in directory: {0}")]
    DeviceNotFound(String),

    #[error("Malformed '{instance}' property on device {device_id}: {reason}")]
    MalformedProperty {
        device_id: String,
        instance: String,
        reason: String,
    },

    #[error("Integration not loaded: {0}")]
    NotLoaded(String),

    #[error("Config entry not found: {0}")]
    EntryNotFound(String),

    #[error("Device fetch failed: {0}")]
    Fetch(String),

    #[error("No fixture given; pass --fixture or set QUASAR_FIXTURE")]
    MissingFixture,

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),
}

impl QuasarError {
    pub(crate) fn malformed(
        device_id: impl Into<String>,
        instance: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        QuasarError::MalformedProperty {
            device_id: device_id.into(),
            instance: instance.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, QuasarError>;
