//! JSON notation for descriptors and signatures.
//!
//! - a keyword string is a primitive kind or sentinel (`"string"`, `"NaN"`, ...)
//! - an array is a union (`["undefined", "object"]`)
//! - an object is a shape (`{"required": "boolean"}`)
//!
//! Class descriptors have no notation: classes only exist in host code.

use std::fmt;
use std::path::Path;

use indexmap::IndexMap;
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;

use crate::descriptor::{from_keyword, Descriptor};
use crate::error::LoadError;
use crate::signature::Signature;

impl<'de> Deserialize<'de> for Descriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DescriptorVisitor)
    }
}

struct DescriptorVisitor;

impl<'de> Visitor<'de> for DescriptorVisitor {
    type Value = Descriptor;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a type keyword, an array of types, or an object of keyed types")
    }

    fn visit_str<E: de::Error>(self, word: &str) -> Result<Descriptor, E> {
        from_keyword(word).ok_or_else(|| E::custom(format!("unknown type keyword `{word}`")))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Descriptor, A::Error> {
        let mut members = Vec::new();
        while let Some(member) = seq.next_element::<Descriptor>()? {
            members.push(member);
        }
        if members.is_empty() {
            return Err(de::Error::custom("a union needs at least one type"));
        }
        Ok(Descriptor::Union(members))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Descriptor, A::Error> {
        let mut fields = IndexMap::new();
        while let Some((key, nested)) = map.next_entry::<String, Descriptor>()? {
            if fields.insert(key.clone(), nested).is_some() {
                return Err(de::Error::custom(format!("duplicate key `{key}`")));
            }
        }
        Ok(Descriptor::Shape(fields))
    }
}

pub fn parse_descriptor(src: &str) -> Result<Descriptor, LoadError> {
    crate::path_de::from_str_with_path(src)
}

pub fn parse_signature(src: &str) -> Result<Signature, LoadError> {
    crate::path_de::from_str_with_path(src)
}

pub fn load_signature(path: &Path) -> Result<Signature, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let signature: Signature = crate::path_de::from_slice_with_path(&bytes)?;
    tracing::debug!(path = %path.display(), params = signature.params.len(), "loaded signature");
    Ok(signature)
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::Mode;
    use crate::value::Value;
    use serde_json::json;

    #[test]
    fn parses_keywords_unions_and_shapes() {
        let d = parse_descriptor(r#"["undefined", {"id": "string", "tags": "array"}]"#).unwrap();
        assert_eq!(d.phrase(), "undefined or an object");
        assert!(d.conforms(&Value::Undefined));
        assert!(d.conforms(&Value::from(json!({"id": "a", "tags": []}))));
        assert!(!d.conforms(&Value::from(json!({"id": 1, "tags": []}))));
    }

    #[test]
    fn unknown_keyword_reports_json_path() {
        let err = parse_signature(r#"{"params": [{"type": "string"}, {"type": {"a": "strnig"}}]}"#)
            .unwrap_err();
        match err {
            LoadError::Decode { json_path, message } => {
                assert_eq!(json_path, "params[1].type.a");
                assert!(message.contains("unknown type keyword `strnig`"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_union_is_rejected() {
        assert!(parse_descriptor("[]").is_err());
        assert!(parse_descriptor("42").is_err());
    }

    #[test]
    fn signature_defaults_to_exact_mode() {
        let sig = parse_signature(r#"{"params": [{"name": "id", "type": "string"}]}"#).unwrap();
        assert_eq!(sig.mode, Mode::Exact);
        assert_eq!(sig.params[0].name.as_deref(), Some("id"));

        let sig = parse_signature(r#"{"mode": "minimum", "params": []}"#).unwrap();
        assert_eq!(sig.mode, Mode::Minimum);
        assert!(sig.check(&crate::args![1, 2]).is_ok());
    }

    #[test]
    fn unknown_signature_fields_are_rejected() {
        assert!(parse_signature(r#"{"params": [], "strict": true}"#).is_err());
    }

    #[test]
    fn misspelled_param_field_is_rejected() {
        let err = parse_signature(r#"{"params": [{"nmae": "id", "type": "string"}]}"#).unwrap_err();
        match err {
            LoadError::Decode { json_path, message } => {
                assert!(json_path.starts_with("params[0]"), "{json_path}");
                assert!(message.contains("unknown field `nmae`"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_signature(Path::new("/nonexistent/signature.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
