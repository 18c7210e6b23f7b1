//! Error types for the KIND Cluster Operator

use thiserror::Error;

/// Result type alias using the operator's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Operator error types
#[derive(Error, Debug)]
pub enum Error {
    /// Kubernetes API error
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    /// Provisioner (kind tool) error
    #[error("Provisioner error: {0}")]
    Provisioner(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Gateway call exceeded its deadline
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Kubeconfig material is not available to persist as a secret
    #[error("Credential source unavailable: {0}")]
    CredentialSource(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Non-UTF8 output from the provisioner
    #[error("Invalid UTF-8 in provisioner output: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl Error {
    /// Create a provisioner error
    pub fn provisioner(msg: impl Into<String>) -> Self {
        Error::Provisioner(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a timeout error
    pub fn timeout(msg: impl Into<String>) -> Self {
        Error::Timeout(msg.into())
    }

    /// Create a credential source error
    pub fn credential_source(msg: impl Into<String>) -> Self {
        Error::CredentialSource(msg.into())
    }

    /// True when the underlying Kubernetes API call failed with 404
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Kube(kube::Error::Api(api_err)) if api_err.code == 404)
    }
}
