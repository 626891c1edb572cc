//! CLI errors and their exit codes.

use mcf_lint::LintError;
use mcf_manifest::ManifestError;
use mcf_runtime::ModuleError;
use thiserror::Error;

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const VALIDATION_FAILURE: u8 = 3;
    pub const PROVIDER_SETUP_FAILURE: u8 = 4;
    pub const LINT_FAILURE: u8 = 5;
}

/// Failures detected by the CLI itself.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    InvalidArgs(String),

    #[error("validation failed with {0} error(s)")]
    ValidationFailed(usize),

    #[error("schema lint found {0} violation(s)")]
    LintFailed(usize),
}

/// Map an error chain to an exit code.
pub fn exit_code(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if let Some(err) = cause.downcast_ref::<CliError>() {
            return match err {
                CliError::InvalidArgs(_) => ExitCodes::INVALID_ARGS,
                CliError::ValidationFailed(_) => ExitCodes::VALIDATION_FAILURE,
                CliError::LintFailed(_) => ExitCodes::LINT_FAILURE,
            };
        }
        if let Some(err) = cause.downcast_ref::<ModuleError>() {
            return match err.root_cause() {
                ModuleError::ProviderSetupFailed { .. } => ExitCodes::PROVIDER_SETUP_FAILURE,
                ModuleError::ValidationFailed { .. } | ModuleError::UnresolvedReference { .. } => {
                    ExitCodes::VALIDATION_FAILURE
                }
                ModuleError::BadStackInput(_) | ModuleError::ModuleNotFound(_) => {
                    ExitCodes::INVALID_ARGS
                }
                _ => ExitCodes::GENERAL_ERROR,
            };
        }
        if let Some(err) = cause.downcast_ref::<ManifestError>() {
            return match err {
                ManifestError::NotFound(_) => ExitCodes::INVALID_ARGS,
                _ => ExitCodes::VALIDATION_FAILURE,
            };
        }
        if cause.downcast_ref::<LintError>().is_some() {
            return ExitCodes::LINT_FAILURE;
        }
    }
    ExitCodes::GENERAL_ERROR
}
