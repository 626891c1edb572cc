//! Field-level validation results and the checks shared by every spec.

use std::fmt;

use ipnet::IpNet;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub reason: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Validation result with details.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<FieldViolation>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.valid = false;
        self.errors.push(FieldViolation {
            field: field.into(),
            reason: reason.into(),
        });
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn merge(&mut self, other: ValidationResult) {
        if !other.valid {
            self.valid = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Merge, qualifying every field of `other` with `prefix`.
    pub fn merge_prefixed(&mut self, prefix: &str, other: ValidationResult) {
        if !other.valid {
            self.valid = false;
        }
        self.errors
            .extend(other.errors.into_iter().map(|v| FieldViolation {
                field: format!("{}.{}", prefix, v.field),
                reason: v.reason,
            }));
        self.warnings.extend(other.warnings);
    }

    pub fn first_error(&self) -> Option<&FieldViolation> {
        self.errors.first()
    }

    /// Reject `value` when empty.
    pub fn require(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add_error(field, "is required");
        }
    }

    /// Reject `value` outside `[min, max]`.
    pub fn check_range<T>(&mut self, field: &str, value: T, min: T, max: T)
    where
        T: PartialOrd + fmt::Display + Copy,
    {
        if value < min || value > max {
            self.add_error(field, format!("must be between {} and {}, got {}", min, max, value));
        }
    }

    /// Reject a non-empty `value` that does not match `pattern`.
    pub fn check_pattern(&mut self, field: &str, value: &str, pattern: &Regex, expectation: &str) {
        if !value.is_empty() && !pattern.is_match(value) {
            self.add_error(field, format!("must {}, got '{}'", expectation, value));
        }
    }
}

/// Parse a network in `addr/prefix` notation.
///
/// The text must be canonical and the address must be the network address.
pub fn parse_cidr(value: &str) -> Result<IpNet, String> {
    let net: IpNet = value
        .parse()
        .map_err(|_| format!("'{}' is not in CIDR notation (address/prefix)", value))?;

    if net.to_string() != value {
        return Err(format!("'{}' is not in canonical CIDR notation", value));
    }
    if net != net.trunc() {
        return Err(format!("'{}' has host bits set, expected {}", value, net.trunc()));
    }
    Ok(net)
}
