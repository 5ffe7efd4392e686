//! JSON encoding and decoding for request and response bodies.
//!
//! DTOs serialize with camelCase field names. Decoding matches object keys
//! against the target struct's field names ignoring ASCII case, so `JobId`,
//! `jobid`, `JOBID` and `JobID` all land in `job_id`. Matching happens per
//! struct during deserialization, which keeps keys of free-form maps and
//! `Value` targets untouched.

use serde::de::{self, DeserializeOwned, DeserializeSeed, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{ApiError, Result};

pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| ApiError::Serialization(e.to_string()))
}

pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    let raw: Value =
        serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))?;
    from_value(raw)
}

/// Decode a list body. An empty body or `null` yields an empty `Vec`.
pub fn decode_list<T: DeserializeOwned>(body: &str) -> Result<Vec<T>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let raw: Value =
        serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))?;
    if raw.is_null() {
        return Ok(Vec::new());
    }
    from_value(raw)
}

/// Typed conversion of an already parsed document with case-insensitive
/// field matching.
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    T::deserialize(CaseInsensitive(value)).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Pick the struct field `key` names, ignoring ASCII case. Exact matches win;
/// keys matching no field pass through so serde can ignore them.
fn match_field(key: String, fields: &'static [&'static str]) -> String {
    if fields.contains(&key.as_str()) {
        return key;
    }
    match fields.iter().find(|f| f.eq_ignore_ascii_case(&key)) {
        Some(field) => (*field).to_string(),
        None => key,
    }
}

/// `Value` deserializer that renames struct keys to the declared field names
/// on the way down.
struct CaseInsensitive(Value);

macro_rules! forward_to_value {
    ($($method:ident)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> std::result::Result<V::Value, Self::Error> {
                self.0.$method(visitor)
            }
        )*
    };
}

impl<'de> Deserializer<'de> for CaseInsensitive {
    type Error = serde_json::Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> std::result::Result<V::Value, Self::Error> {
        match self.0 {
            Value::Object(map) => visitor.visit_map(Entries::new(map.into_iter().collect())),
            Value::Array(items) => visitor.visit_seq(Elements(items.into_iter())),
            other => other.deserialize_any(visitor),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> std::result::Result<V::Value, Self::Error> {
        match self.0 {
            Value::Null => visitor.visit_none(),
            other => visitor.visit_some(CaseInsensitive(other)),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> std::result::Result<V::Value, Self::Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> std::result::Result<V::Value, Self::Error> {
        match self.0 {
            Value::Array(items) => visitor.visit_seq(Elements(items.into_iter())),
            other => other.deserialize_seq(visitor),
        }
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, _len: usize, visitor: V) -> std::result::Result<V::Value, Self::Error> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> std::result::Result<V::Value, Self::Error> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> std::result::Result<V::Value, Self::Error> {
        match self.0 {
            Value::Object(map) => visitor.visit_map(Entries::new(map.into_iter().collect())),
            other => other.deserialize_map(visitor),
        }
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> std::result::Result<V::Value, Self::Error> {
        match self.0 {
            Value::Object(map) => {
                let entries = map
                    .into_iter()
                    .map(|(key, value)| (match_field(key, fields), value))
                    .collect();
                visitor.visit_map(Entries::new(entries))
            }
            other => other.deserialize_struct(name, fields, visitor),
        }
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> std::result::Result<V::Value, Self::Error> {
        self.0.deserialize_enum(name, variants, visitor)
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        visitor: V,
    ) -> std::result::Result<V::Value, Self::Error> {
        self.0.deserialize_unit_struct(name, visitor)
    }

    forward_to_value! {
        deserialize_bool deserialize_i8 deserialize_i16 deserialize_i32 deserialize_i64
        deserialize_u8 deserialize_u16 deserialize_u32 deserialize_u64 deserialize_f32
        deserialize_f64 deserialize_char deserialize_str deserialize_string deserialize_bytes
        deserialize_byte_buf deserialize_unit deserialize_identifier deserialize_ignored_any
    }
}

struct Entries {
    entries: std::vec::IntoIter<(String, Value)>,
    value: Option<Value>,
}

impl Entries {
    fn new(entries: Vec<(String, Value)>) -> Self {
        Self {
            entries: entries.into_iter(),
            value: None,
        }
    }
}

impl<'de> MapAccess<'de> for Entries {
    type Error = serde_json::Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> std::result::Result<Option<K::Value>, Self::Error> {
        match self.entries.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(Value::String(key)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<S: DeserializeSeed<'de>>(&mut self, seed: S) -> std::result::Result<S::Value, Self::Error> {
        match self.value.take() {
            Some(value) => seed.deserialize(CaseInsensitive(value)),
            None => Err(de::Error::custom("map value requested before its key")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

struct Elements(std::vec::IntoIter<Value>);

impl<'de> SeqAccess<'de> for Elements {
    type Error = serde_json::Error;

    fn next_element_seed<S: DeserializeSeed<'de>>(&mut self, seed: S) -> std::result::Result<Option<S::Value>, Self::Error> {
        self.0
            .next()
            .map(|value| seed.deserialize(CaseInsensitive(value)))
            .transpose()
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Sample {
        id: i32,
        job_id: Option<i32>,
        is_active: bool,
    }

    #[test]
    fn pascal_case_keys_decode() {
        let s: Sample = decode(r#"{"Id":1,"JobId":7,"IsActive":true}"#).unwrap();
        assert_eq!(
            s,
            Sample {
                id: 1,
                job_id: Some(7),
                is_active: true
            }
        );
    }

    #[test]
    fn key_case_is_ignored() {
        let expected = Sample {
            id: 3,
            job_id: Some(7),
            is_active: false,
        };
        for body in [
            r#"{"id":3,"jobid":7,"isactive":false}"#,
            r#"{"ID":3,"JOBID":7,"ISACTIVE":false}"#,
            r#"{"Id":3,"JobID":7,"isActive":false}"#,
            r#"{"iD":3,"jObId":7,"IsAcTiVe":false}"#,
        ] {
            let s: Sample = decode(body).unwrap();
            assert_eq!(s, expected, "{body}");
        }
    }

    #[test]
    fn nested_and_listed_structs_match_too() {
        #[derive(Debug, Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Outer {
            line_items: Vec<Sample>,
            primary: Option<Sample>,
            extra: std::collections::BTreeMap<String, i32>,
        }

        let outer: Outer = decode(
            r#"{"LINEITEMS":[{"ID":1,"JOBID":2,"ISACTIVE":true}],
                "Primary":{"id":4,"isactive":true},
                "extra":{"KeepMe":1}}"#,
        )
        .unwrap();
        assert_eq!(outer.line_items[0].job_id, Some(2));
        assert_eq!(outer.primary.map(|p| p.id), Some(4));
        assert_eq!(outer.extra.get("KeepMe"), Some(&1));

        let list: Vec<Sample> = decode_list(r#"[{"ID":9,"ISACTIVE":true}]"#).unwrap();
        assert_eq!(list[0].id, 9);
    }

    #[test]
    fn renamed_fields_and_enums_still_decode() {
        #[derive(Debug, Deserialize, PartialEq)]
        enum Stage {
            #[serde(rename = "Partially Paid")]
            PartiallyPaid,
        }

        #[derive(Debug, Deserialize)]
        struct Tagged {
            #[serde(rename = "type")]
            kind: String,
            stage: Stage,
        }

        let t: Tagged = decode(r#"{"Type":"Company","STAGE":"Partially Paid"}"#).unwrap();
        assert_eq!(t.kind, "Company");
        assert_eq!(t.stage, Stage::PartiallyPaid);
    }

    #[test]
    fn value_targets_keep_their_keys() {
        let v: Value = decode(r#"{"Detail":"x"}"#).unwrap();
        assert_eq!(v["Detail"], "x");
    }

    #[test]
    fn empty_and_null_lists_are_empty() {
        assert!(decode_list::<Sample>("").unwrap().is_empty());
        assert!(decode_list::<Sample>("null").unwrap().is_empty());
        assert!(decode_list::<Sample>("[]").unwrap().is_empty());
    }

    #[test]
    fn malformed_body_is_deserialization_error() {
        let err = decode::<Sample>("not json").unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
        let err = decode_list::<Sample>(r#"{"id":1}"#).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }
}
