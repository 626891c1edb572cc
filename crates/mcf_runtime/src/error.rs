//! Error types for module execution.

use mcf_manifest::ManifestError;
use mcf_provider::ProviderError;
use thiserror::Error;

/// Result type alias for module operations.
pub type ModuleResult<T> = Result<T, ModuleError>;

/// Errors raised while running a resource module.
#[derive(Error, Debug)]
pub enum ModuleError {
    #[error("bad stack input: {0}")]
    BadStackInput(String),

    #[error("{provider} provider setup failed: {detail}")]
    ProviderSetupFailed { provider: String, detail: String },

    #[error("unresolved reference to {kind}/{name} output '{output_key}'")]
    UnresolvedReference {
        kind: String,
        name: String,
        output_key: String,
    },

    #[error("validation failed: {field}: {reason}")]
    ValidationFailed { field: String, reason: String },

    #[error("failed to create {kind} '{name}': {cause}")]
    ResourceCreationFailed {
        kind: String,
        name: String,
        cause: String,
    },

    #[error("resource {type_token} named '{name}' is already registered")]
    DuplicateResource { type_token: String, name: String },

    #[error("resource '{name}' depends on unknown resource {urn}")]
    UnknownDependency { name: String, urn: String },

    #[error("output '{0}' is exported twice")]
    DuplicateOutput(String),

    #[error("{kind} module exported undeclared output '{key}'")]
    UndeclaredOutput { kind: String, key: String },

    #[error("no module registered for kind {0}")]
    ModuleNotFound(String),

    #[error("{context}")]
    Wrapped {
        context: String,
        #[source]
        source: Box<ModuleError>,
    },

    #[error(transparent)]
    Manifest(ManifestError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ManifestError> for ModuleError {
    fn from(err: ManifestError) -> Self {
        match err {
            ManifestError::UnresolvedReference {
                kind,
                name,
                output_key,
            } => ModuleError::UnresolvedReference {
                kind,
                name,
                output_key,
            },
            other => ModuleError::Manifest(other),
        }
    }
}

impl ModuleError {
    /// Prefix this error with the step that failed.
    pub fn wrap(self, context: impl Into<String>) -> Self {
        ModuleError::Wrapped {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error under any number of context prefixes.
    pub fn root_cause(&self) -> &ModuleError {
        match self {
            ModuleError::Wrapped { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Provider name when the root cause is a provider setup failure.
    pub fn failed_provider(&self) -> Option<&str> {
        match self.root_cause() {
            ModuleError::ProviderSetupFailed { provider, .. } => Some(provider),
            _ => None,
        }
    }
}

/// Context prefixes for fallible module steps.
pub trait WrapErr<T> {
    fn wrap_err(self, context: impl Into<String>) -> ModuleResult<T>;

    fn wrap_err_with<F>(self, context: F) -> ModuleResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<ModuleError>> WrapErr<T> for Result<T, E> {
    fn wrap_err(self, context: impl Into<String>) -> ModuleResult<T> {
        self.map_err(|e| e.into().wrap(context))
    }

    fn wrap_err_with<F>(self, context: F) -> ModuleResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().wrap(context()))
    }
}
