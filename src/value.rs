//! Dynamic runtime values.
//!
//! `Value` models what a dynamically typed caller can hand to a checked
//! function: the JSON kinds, plus `undefined`, NaN, functions, regular
//! expressions and instances of (possibly anonymous) classes. Records keep
//! insertion order so nested failures are reported in declaration order.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use regex::Regex;

/// Ordered key/value record (a plain object).
pub type Record = IndexMap<String, Value>;

/// Shared `undefined`, used when reading missing arguments and keys.
pub(crate) static UNDEFINED_VALUE: Value = Value::Undefined;

#[derive(Debug, Clone)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    /// Every number is a double; NaN is a number too.
    Number(f64),
    String(String),
    Function(Function),
    RegExp(Regex),
    Array(Vec<Value>),
    /// Plain record, i.e. an object literal.
    Object(Record),
    /// Record created through a `Class`.
    Instance(Instance),
}

// ————————————————————————————————————————————————————————————————————————————
// CLASSES
// ————————————————————————————————————————————————————————————————————————————

/// A constructor-like type tag. Identity is by reference: two classes with
/// the same name are still different classes.
#[derive(Clone)]
pub struct Class(Arc<ClassInner>);

struct ClassInner {
    name: Option<String>,
    parent: Option<Class>,
}

impl Class {
    pub fn named(name: impl Into<String>) -> Self {
        Self(Arc::new(ClassInner { name: Some(name.into()), parent: None }))
    }

    /// A class with no discoverable name; displayed as `<anon>`.
    pub fn anonymous() -> Self {
        Self(Arc::new(ClassInner { name: None, parent: None }))
    }

    pub fn subclass(&self, name: impl Into<String>) -> Self {
        Self(Arc::new(ClassInner { name: Some(name.into()), parent: Some(self.clone()) }))
    }

    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    pub fn display_name(&self) -> &str {
        self.name().unwrap_or("<anon>")
    }

    pub fn parent(&self) -> Option<&Class> {
        self.0.parent.as_ref()
    }

    /// `true` when `self` is `other` or inherits from it.
    pub fn is_a(&self, other: &Class) -> bool {
        let mut cursor = Some(self);
        while let Some(class) = cursor {
            if Arc::ptr_eq(&class.0, &other.0) {
                return true;
            }
            cursor = class.parent();
        }
        false
    }

    pub fn instantiate(&self) -> Value {
        self.instantiate_with(Record::new())
    }

    pub fn instantiate_with(&self, fields: Record) -> Value {
        Value::Instance(Instance { class: self.clone(), fields })
    }

    /// "a MyClass instance", "an Animal instance", "an <anon> instance"
    pub fn instance_phrase(&self) -> String {
        match self.name() {
            Some(name) => format!("{} {name} instance", article(name)),
            None => "an <anon> instance".to_string(),
        }
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Class {}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Class").field(&self.display_name()).finish()
    }
}

#[derive(Debug, Clone)]
pub struct Instance {
    pub class: Class,
    pub fields: Record,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Function {
    pub name: Option<String>,
}

impl Function {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()) }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Value {
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, Value::Number(n) if n.is_nan())
    }

    /// Fields of a plain record or an instance.
    pub fn record(&self) -> Option<&Record> {
        match self {
            Value::Object(fields) => Some(fields),
            Value::Instance(instance) => Some(&instance.fields),
            _ => None,
        }
    }

    /// Field lookup; missing keys (and non-records) read as `undefined`.
    pub fn get(&self, key: &str) -> &Value {
        self.record()
            .and_then(|fields| fields.get(key))
            .unwrap_or(&UNDEFINED_VALUE)
    }

    /// How the value is named in failure messages ("a number", "null", ...).
    pub fn describe(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Number(n) if n.is_nan() => "NaN".to_string(),
            Value::Number(_) => "a number".to_string(),
            Value::Bool(_) => "a boolean".to_string(),
            Value::String(_) => "a string".to_string(),
            Value::Function(_) => "a function".to_string(),
            Value::RegExp(_) => "a regular expression".to_string(),
            Value::Array(_) => "an array".to_string(),
            Value::Object(_) => "an object".to_string(),
            Value::Instance(instance) => instance.class.instance_phrase(),
        }
    }

    pub fn from_json(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            // as_f64 only fails for arbitrary-precision numbers, which we don't enable
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(xs) => Value::Array(xs.iter().map(Value::from_json).collect()),
            serde_json::Value::Object(map) => Value::Object(
                map.iter().map(|(k, v)| (k.clone(), Value::from_json(v))).collect(),
            ),
        }
    }
}

pub(crate) fn article(word: &str) -> &'static str {
    match word.chars().next() {
        Some(c) if "aeiouAEIOU".contains(c) => "an",
        _ => "a",
    }
}

// ————————————————————————————————————————————————————————————————————————————
// CONVERSIONS
// ————————————————————————————————————————————————————————————————————————————

impl From<bool> for Value {
    fn from(b: bool) -> Self { Value::Bool(b) }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self { Value::Number(n) }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self { Value::Number(f64::from(n)) }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self { Value::Number(f64::from(n)) }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self { Value::String(s.to_string()) }
}

impl From<String> for Value {
    fn from(s: String) -> Self { Value::String(s) }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self { Value::Function(f) }
}

impl From<Regex> for Value {
    fn from(rx: Regex) -> Self { Value::RegExp(rx) }
}

impl From<Vec<Value>> for Value {
    fn from(xs: Vec<Value>) -> Self { Value::Array(xs) }
}

impl From<Record> for Value {
    fn from(fields: Record) -> Self { Value::Object(fields) }
}

impl From<Instance> for Value {
    fn from(instance: Instance) -> Self { Value::Instance(instance) }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self { Value::from_json(&json) }
}

/// `None` is an omitted value, i.e. `undefined`.
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(x: Option<T>) -> Self {
        x.map_or(Value::Undefined, Into::into)
    }
}

/// Build an argument list: `args!["foo", 42, true]`.
#[macro_export]
macro_rules! args {
    ($($x:expr),* $(,)?) => {
        ::std::vec![$($crate::Value::from($x)),*]
    };
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
