use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Crate-wide error taxonomy.
///
/// Business conditions (`NotFound`, `Validation`, `NoDiagnosis`) are kept
/// distinct from infrastructure failures (`Upstream`, `Http`) so callers can
/// map them to different outcomes without parsing message strings.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The remote table store answered with a non-2xx status.
    #[error("upstream table store returned {status}: {body}")]
    Upstream { status: u16, body: String },

    /// An entity was absent from its remote table.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// Input rejected before any remote call was issued.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The inference service broke its one-structured-call contract.
    /// Never retried.
    #[error("inference contract violated: {0}")]
    InferenceContract(String),

    /// Business precondition unmet: the patient has no usable diagnosis.
    #[error("no usable diagnosis for patient {patient_id}")]
    NoDiagnosis { patient_id: i64 },

    /// Dispatch target was never registered.
    #[error("unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True for failures of the external collaborators (store or transport),
    /// as opposed to business conditions detected by this layer.
    #[must_use]
    pub fn is_gateway(&self) -> bool {
        matches!(self, Error::Upstream { .. } | Error::Http(_))
    }
}
