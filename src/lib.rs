//! Runtime argument validation for dynamically typed values.
//!
//! ```
//! use ensure_json::{args, ensure, Descriptor, NUMBER, STRING};
//!
//! let call = args!["episode-1", 42];
//! ensure::signature(&call, &[STRING, Descriptor::optional(NUMBER)], &["id", "limit"]).unwrap();
//!
//! let err = ensure::signature(&args![42], &[STRING], &[]).unwrap_err();
//! assert_eq!(err.to_string(), "Argument #1 must be a string, but it was a number");
//! ```
pub mod descriptor;
pub mod ensure;
pub mod error;
pub mod notation;
pub mod path_de;
pub mod signature;
pub mod value;

pub use descriptor::{
    Descriptor, Kind, Sentinel, ARRAY, BOOLEAN, FUNCTION, NAN, NULL, NUMBER, OBJECT, REGEXP,
    STRING, UNDEFINED,
};
pub use error::{EnsureError, LoadError};
pub use signature::{Mode, Param, Signature};
pub use value::{Class, Function, Instance, Record, Value};
