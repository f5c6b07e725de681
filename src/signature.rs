//! Signature checking: an argument list against a list of descriptors.
//!
//! Evaluation order:
//! 1. count check (EXACT only rejects surplus arguments; a missing argument
//!    reads as `undefined` and is judged by its own descriptor),
//! 2. per-argument checks left to right, stopping at the first failure.

use serde::Deserialize;

use crate::descriptor::Descriptor;
use crate::error::EnsureError;
use crate::value::{Value, UNDEFINED_VALUE};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// No surplus arguments.
    #[default]
    Exact,
    /// Surplus arguments are allowed.
    Minimum,
}

/// One declared parameter.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Param {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub descriptor: Descriptor,
}

/// A declared parameter list plus the mode it is checked in.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Signature {
    #[serde(default)]
    pub mode: Mode,
    pub params: Vec<Param>,
}

// ————————————————————————————————————————————————————————————————————————————
// FRONT API
// ————————————————————————————————————————————————————————————————————————————

/// EXACT-mode check.
pub fn signature(args: &[Value], descriptors: &[Descriptor], names: &[&str]) -> Result<(), EnsureError> {
    check_signature(Mode::Exact, args, descriptors, names)
}

/// MINIMUM-mode check.
pub fn signature_minimum(args: &[Value], descriptors: &[Descriptor], names: &[&str]) -> Result<(), EnsureError> {
    check_signature(Mode::Minimum, args, descriptors, names)
}

pub fn check_signature(
    mode: Mode,
    args: &[Value],
    descriptors: &[Descriptor],
    names: &[&str],
) -> Result<(), EnsureError> {
    check_params(
        mode,
        args,
        descriptors.iter().enumerate().map(|(i, d)| (names.get(i).copied(), d)),
        descriptors.len(),
    )
}

/// Default display name for the parameter at 0-based `index`.
pub fn default_name(index: usize) -> String {
    format!("Argument #{}", index + 1)
}

impl Param {
    pub fn new(descriptor: impl Into<Descriptor>) -> Self {
        Self { name: None, descriptor: descriptor.into() }
    }

    pub fn named(name: impl Into<String>, descriptor: impl Into<Descriptor>) -> Self {
        Self { name: Some(name.into()), descriptor: descriptor.into() }
    }
}

impl Signature {
    pub fn new(mode: Mode, params: Vec<Param>) -> Self {
        Self { mode, params }
    }

    pub fn exact(params: Vec<Param>) -> Self {
        Self::new(Mode::Exact, params)
    }

    pub fn minimum(params: Vec<Param>) -> Self {
        Self::new(Mode::Minimum, params)
    }

    /// Check in the signature's own mode.
    pub fn check(&self, args: &[Value]) -> Result<(), EnsureError> {
        self.check_with(self.mode, args)
    }

    pub fn check_with(&self, mode: Mode, args: &[Value]) -> Result<(), EnsureError> {
        check_params(
            mode,
            args,
            self.params.iter().map(|p| (p.name.as_deref(), &p.descriptor)),
            self.params.len(),
        )
    }

    /// One `(name, expected)` pair per parameter, names defaulted.
    pub fn describe(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let name = p.name.clone().unwrap_or_else(|| default_name(i));
                (name, p.descriptor.phrase())
            })
            .collect()
    }
}

/// Single value check, as used by `ensure::type_exact` and friends.
pub fn check_value(value: &Value, descriptor: &Descriptor, name: &str) -> Result<(), EnsureError> {
    match descriptor {
        // descend so the failure names the offending key
        Descriptor::Shape(fields) if value.record().is_some() => {
            for (key, nested) in fields {
                check_value(value.get(key), nested, &format!("{name}.{key}"))?;
            }
            Ok(())
        }
        _ if descriptor.conforms(value) => Ok(()),
        _ => Err(EnsureError::type_mismatch(name, &descriptor.phrase(), &value.describe())),
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn check_params<'a, I>(mode: Mode, args: &[Value], params: I, expected: usize) -> Result<(), EnsureError>
where
    I: Iterator<Item = (Option<&'a str>, &'a Descriptor)>,
{
    tracing::trace!(?mode, expected, actual = args.len(), "checking signature");

    if mode == Mode::Exact && args.len() > expected {
        let error = EnsureError::too_many_arguments(expected, args.len());
        tracing::debug!(%error, "signature check failed");
        return Err(error);
    }

    for (i, (name, descriptor)) in params.enumerate() {
        let value = args.get(i).unwrap_or(&UNDEFINED_VALUE);
        let name = name.map_or_else(|| default_name(i), str::to_string);
        if let Err(error) = check_value(value, descriptor, &name) {
            tracing::debug!(%error, position = i + 1, "signature check failed");
            return Err(error);
        }
    }
    Ok(())
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
