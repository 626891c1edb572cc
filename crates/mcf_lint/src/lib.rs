//! # mcf_lint
//!
//! Static checks over the schema descriptors of OpenMCF specs.
//!
//! Schemas are linted at build or CI time, never while a module runs.
//! Rules are plain functions registered on a [`LintPlugin`]; the plugin
//! walks every field of every message, nested ones included.
//!
//! ## Features
//!
//! - `default-requires-optional`: a default only makes sense on an optional field
//! - `default-matches-type`: defaults must parse as the field's scalar type
//! - Loading extra schemas from YAML files in a directory tree
//!
//! ## Example
//!
//! ```rust,no_run
//! use mcf_lint::LintPlugin;
//!
//! let report = LintPlugin::new().lint_builtin();
//! for violation in &report.violations {
//!     eprintln!("{}", violation);
//! }
//! ```

pub mod error;
pub mod plugin;
pub mod rules;

pub use error::{LintError, LintResult};
pub use plugin::{LintPlugin, LintReport, DEFAULT_SCHEMA_PATTERN};
pub use rules::{builtin_rules, LintViolation, RuleCheck, RuleSpec};
