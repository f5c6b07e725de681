//! Assertion helpers for defensive checks at function entry.
//!
//! Every helper fails with [`EnsureError`], so assertion failures can be told
//! apart from ordinary faults.

use crate::descriptor::Descriptor;
use crate::error::EnsureError;
use crate::value::Value;

pub use crate::signature::{check_signature, signature, signature_minimum, Mode};

/// `condition` must be a boolean, and true.
pub fn that(condition: impl Into<Value>, message: Option<&str>) -> Result<(), EnsureError> {
    match condition.into() {
        Value::Bool(true) => Ok(()),
        Value::Bool(false) => Err(EnsureError::new(message.unwrap_or("Expected condition to be true"))),
        _ => Err(EnsureError::new("Expected condition to be true or false")),
    }
}

pub fn unreachable(message: Option<&str>) -> EnsureError {
    with_detail("Unreachable code executed", message)
}

pub fn todo(message: Option<&str>) -> EnsureError {
    with_detail("To-do code executed", message)
}

/// `null` counts as defined; only `undefined` fails.
pub fn defined(value: &Value, name: Option<&str>) -> Result<(), EnsureError> {
    if value.is_undefined() {
        return Err(EnsureError::new(format!("{} was not defined", name.unwrap_or("variable"))));
    }
    Ok(())
}

/// Check one value the same way a signature checks an argument.
pub fn type_exact(value: &Value, descriptor: &Descriptor, name: Option<&str>) -> Result<(), EnsureError> {
    crate::signature::check_value(value, descriptor, name.unwrap_or("variable"))
}

/// Same as [`type_exact`]; record shapes ignore unknown keys in both modes.
pub fn type_minimum(value: &Value, descriptor: &Descriptor, name: Option<&str>) -> Result<(), EnsureError> {
    type_exact(value, descriptor, name)
}

fn with_detail(base: &str, message: Option<&str>) -> EnsureError {
    match message {
        Some(detail) => EnsureError::new(format!("{base}: {detail}")),
        None => EnsureError::new(base),
    }
}
