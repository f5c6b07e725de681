//! Type descriptors: declarative specs of what an argument may be.
//!
//! A descriptor is one of five arms, matched by a single dispatch in
//! [`Descriptor::conforms`]:
//! - a primitive kind tag (`STRING`, `NUMBER`, ...),
//! - a sentinel matched by identity (`UNDEFINED`, `NULL`, `NAN`),
//! - a record shape (required keys → nested descriptors),
//! - a class tag (instance-of),
//! - a union of the above.

use indexmap::IndexMap;

use crate::value::{Class, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    String,
    Number,
    Boolean,
    Function,
    /// Plain record only; arrays, functions, regexps and instances are excluded.
    Object,
    Array,
    RegExp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentinel {
    Undefined,
    Null,
    NaN,
}

#[derive(Debug, Clone)]
pub enum Descriptor {
    Primitive(Kind),
    Sentinel(Sentinel),
    Shape(IndexMap<String, Descriptor>),
    ClassOf(Class),
    Union(Vec<Descriptor>),
}

pub const STRING: Descriptor = Descriptor::Primitive(Kind::String);
pub const NUMBER: Descriptor = Descriptor::Primitive(Kind::Number);
pub const BOOLEAN: Descriptor = Descriptor::Primitive(Kind::Boolean);
pub const FUNCTION: Descriptor = Descriptor::Primitive(Kind::Function);
pub const OBJECT: Descriptor = Descriptor::Primitive(Kind::Object);
pub const ARRAY: Descriptor = Descriptor::Primitive(Kind::Array);
pub const REGEXP: Descriptor = Descriptor::Primitive(Kind::RegExp);
pub const UNDEFINED: Descriptor = Descriptor::Sentinel(Sentinel::Undefined);
pub const NULL: Descriptor = Descriptor::Sentinel(Sentinel::Null);
pub const NAN: Descriptor = Descriptor::Sentinel(Sentinel::NaN);

impl Kind {
    pub fn matches(self, value: &Value) -> bool {
        match (self, value) {
            (Kind::String, Value::String(_)) => true,
            (Kind::Number, Value::Number(_)) => true,
            (Kind::Boolean, Value::Bool(_)) => true,
            (Kind::Function, Value::Function(_)) => true,
            (Kind::Object, Value::Object(_)) => true,
            (Kind::Array, Value::Array(_)) => true,
            (Kind::RegExp, Value::RegExp(_)) => true,
            _ => false,
        }
    }

    pub fn phrase(self) -> &'static str {
        match self {
            Kind::String => "a string",
            Kind::Number => "a number",
            Kind::Boolean => "a boolean",
            Kind::Function => "a function",
            Kind::Object => "an object",
            Kind::Array => "an array",
            Kind::RegExp => "a regular expression",
        }
    }
}

impl Sentinel {
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Sentinel::Undefined => value.is_undefined(),
            Sentinel::Null => matches!(value, Value::Null),
            Sentinel::NaN => value.is_nan(),
        }
    }

    pub fn phrase(self) -> &'static str {
        match self {
            Sentinel::Undefined => "undefined",
            Sentinel::Null => "null",
            Sentinel::NaN => "NaN",
        }
    }
}

impl Descriptor {
    pub fn union<I>(members: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Descriptor>,
    {
        Descriptor::Union(members.into_iter().map(Into::into).collect())
    }

    pub fn shape<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Descriptor)>,
        K: Into<String>,
    {
        Descriptor::Shape(fields.into_iter().map(|(k, d)| (k.into(), d)).collect())
    }

    /// `undefined` or `inner`; the usual way to declare an optional parameter.
    pub fn optional(inner: impl Into<Descriptor>) -> Self {
        Descriptor::Union(vec![UNDEFINED, inner.into()])
    }

    /// Structural match, recursing into shapes and unions.
    /// Keys not named by a shape are ignored.
    pub fn conforms(&self, value: &Value) -> bool {
        match self {
            Descriptor::Primitive(kind) => kind.matches(value),
            Descriptor::Sentinel(sentinel) => sentinel.matches(value),
            Descriptor::ClassOf(class) => {
                matches!(value, Value::Instance(instance) if instance.class.is_a(class))
            }
            Descriptor::Shape(fields) => {
                value.record().is_some()
                    && fields.iter().all(|(key, d)| d.conforms(value.get(key)))
            }
            Descriptor::Union(members) => members.iter().any(|d| d.conforms(value)),
        }
    }

    /// How the expected type reads in failure messages, e.g.
    /// "a string, a boolean, or a MyClass instance".
    pub fn phrase(&self) -> String {
        match self {
            Descriptor::Primitive(kind) => kind.phrase().to_string(),
            Descriptor::Sentinel(sentinel) => sentinel.phrase().to_string(),
            Descriptor::Shape(_) => "an object".to_string(),
            Descriptor::ClassOf(class) => class.instance_phrase(),
            Descriptor::Union(members) => {
                let phrases: Vec<String> = members.iter().map(Descriptor::phrase).collect();
                join_alternatives(&phrases)
            }
        }
    }
}

fn join_alternatives(phrases: &[String]) -> String {
    match phrases {
        [] => "nothing".to_string(),
        [one] => one.clone(),
        [a, b] => format!("{a} or {b}"),
        [init @ .., last] => format!("{}, or {last}", init.join(", ")),
    }
}

impl From<Kind> for Descriptor {
    fn from(kind: Kind) -> Self { Descriptor::Primitive(kind) }
}

impl From<Sentinel> for Descriptor {
    fn from(sentinel: Sentinel) -> Self { Descriptor::Sentinel(sentinel) }
}

impl From<Class> for Descriptor {
    fn from(class: Class) -> Self { Descriptor::ClassOf(class) }
}

impl From<&Class> for Descriptor {
    fn from(class: &Class) -> Self { Descriptor::ClassOf(class.clone()) }
}

impl From<Vec<Descriptor>> for Descriptor {
    fn from(members: Vec<Descriptor>) -> Self { Descriptor::Union(members) }
}

/// Keyword spelling used by the signature file notation.
pub(crate) fn from_keyword(word: &str) -> Option<Descriptor> {
    Some(match word {
        "string" => STRING,
        "number" => NUMBER,
        "boolean" => BOOLEAN,
        "function" => FUNCTION,
        "object" => OBJECT,
        "array" => ARRAY,
        "regexp" => REGEXP,
        "undefined" => UNDEFINED,
        "null" => NULL,
        "NaN" => NAN,
        _ => return None,
    })
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
