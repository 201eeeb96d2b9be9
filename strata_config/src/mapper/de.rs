//! Path-tracking deserializer over documents.
//!
//! Sources such as environment variables and properties only produce
//! strings, so binding coerces scalars towards the requested type: numeric
//! and boolean strings bind into numbers and booleans, numbers and booleans
//! bind into strings, `null` binds into empty maps and structs, and a string
//! bound into a sequence is split on commas. Every error is tagged with the
//! JSON pointer of the node being deserialized when it occurred.

use serde::de::{
    self, DeserializeSeed, Deserializer, EnumAccess, IntoDeserializer, MapAccess, SeqAccess, Unexpected,
    VariantAccess, Visitor, value::StrDeserializer,
};
use serde_json::{Map, Value};

use super::error::BindError;

/// Coercion and strictness switches applied while binding.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct BindPolicy {
    pub(crate) coerce_scalars: bool,
    pub(crate) split_comma_lists: bool,
    pub(crate) deny_unknown_fields: bool,
}

/// Deserializer for the node `value` found at `path`.
pub(crate) struct ValueDeserializer<'a> {
    value: &'a Value,
    path: String,
    policy: BindPolicy,
}

impl<'a> ValueDeserializer<'a> {
    pub(crate) const fn new(value: &'a Value, path: String, policy: BindPolicy) -> Self {
        Self {
            value,
            path,
            policy,
        }
    }

    fn child<'b>(&self, value: &'b Value, segment: &str) -> ValueDeserializer<'b> {
        ValueDeserializer::new(value, child_path(&self.path, segment), self.policy)
    }

    /// Visit the node according to its own shape, without coercion.
    fn visit_natural<'de, V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(*b),
            Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    visitor.visit_u64(u)
                } else if let Some(i) = n.as_i64() {
                    visitor.visit_i64(i)
                } else {
                    n.as_f64().map_or_else(
                        || Err(de::Error::custom(format!("number {n} is not representable"))),
                        |f| visitor.visit_f64(f),
                    )
                }
            }
            Value::String(s) => visitor.visit_str(s),
            Value::Array(items) => visit_items(items, &self.path, self.policy, visitor),
            Value::Object(map) => visitor.visit_map(MapRefs::new(map, &self.path, self.policy)),
        }
    }

    fn coerced_str(&self) -> Option<&'a str> {
        match self.value {
            Value::String(s) if self.policy.coerce_scalars => Some(s.as_str()),
            _ => None,
        }
    }

    fn integer<'de, V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        let Some(raw) = self.coerced_str() else {
            return self.visit_natural(visitor);
        };
        let text = raw.trim();
        if text.starts_with('-') {
            match text.parse::<i64>() {
                Ok(i) => visitor.visit_i64(i),
                Err(_) => Err(de::Error::invalid_value(Unexpected::Str(raw), &visitor)),
            }
        } else {
            match text.trim_start_matches('+').parse::<u64>() {
                Ok(u) => visitor.visit_u64(u),
                Err(_) => Err(de::Error::invalid_value(Unexpected::Str(raw), &visitor)),
            }
        }
    }

    fn float<'de, V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        let Some(raw) = self.coerced_str() else {
            return self.visit_natural(visitor);
        };
        match raw.trim().parse::<f64>() {
            Ok(f) => visitor.visit_f64(f),
            Err(_) => Err(de::Error::invalid_value(Unexpected::Str(raw), &visitor)),
        }
    }

    fn string<'de, V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        match self.value {
            Value::Number(n) if self.policy.coerce_scalars => visitor.visit_string(n.to_string()),
            Value::Bool(b) if self.policy.coerce_scalars => visitor.visit_string(b.to_string()),
            _ => self.visit_natural(visitor),
        }
    }

    fn boolean<'de, V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        let Some(raw) = self.coerced_str() else {
            return self.visit_natural(visitor);
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" => visitor.visit_bool(true),
            "false" => visitor.visit_bool(false),
            _ => Err(de::Error::invalid_value(Unexpected::Str(raw), &visitor)),
        }
    }

    fn sequence<'de, V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        let Some(raw) = self.coerced_str() else {
            return self.visit_natural(visitor);
        };
        if let Some(embedded @ Value::Array(_)) = embedded_json(raw, '[') {
            return ValueDeserializer::new(&embedded, self.path, self.policy).visit_natural(visitor);
        }
        if !self.policy.split_comma_lists || looks_structured(raw) {
            return self.visit_natural(visitor);
        }
        let parts: Vec<Value> = if raw.trim().is_empty() {
            Vec::new()
        } else {
            raw.split(',')
                .map(|part| Value::String(part.trim().to_owned()))
                .collect()
        };
        visit_items(&parts, &self.path, self.policy, visitor)
    }

    fn mapping<'de, V: Visitor<'de>>(
        self,
        fields: Option<&'static [&'static str]>,
        visitor: V,
    ) -> Result<V::Value, BindError> {
        match self.value {
            Value::Object(map) => {
                if let Some(expected) = fields.filter(|_| self.policy.deny_unknown_fields) {
                    reject_unknown(map, expected, &self.path)?;
                }
                visitor.visit_map(MapRefs::new(map, &self.path, self.policy))
            }
            Value::Null if self.policy.coerce_scalars => {
                let empty = Map::new();
                visitor.visit_map(MapRefs::new(&empty, &self.path, self.policy))
            }
            Value::String(raw) if self.policy.coerce_scalars => {
                match embedded_json(raw, '{') {
                    Some(embedded @ Value::Object(_)) => {
                        ValueDeserializer::new(&embedded, self.path, self.policy)
                            .mapping(fields, visitor)
                    }
                    _ => self.visit_natural(visitor),
                }
            }
            _ => self.visit_natural(visitor),
        }
    }

    fn enumeration<'de, V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        match self.value {
            Value::String(s) => {
                let tag: StrDeserializer<'_, BindError> = s.as_str().into_deserializer();
                visitor.visit_enum(tag)
            }
            Value::Object(map) if map.len() == 1 => match map.iter().next() {
                Some((variant, value)) => visitor.visit_enum(EnumRef {
                    variant,
                    content: self.child(value, variant),
                }),
                None => self.visit_natural(visitor),
            },
            other => Err(de::Error::invalid_type(unexpected(other), &visitor)),
        }
    }
}

/// Wrap a deserialization step so failures carry this node's path.
macro_rules! at_path {
    ($self:ident, $body:expr) => {{
        let path = $self.path.clone();
        $body.map_err(|err: BindError| err.at(&path))
    }};
}

macro_rules! deserialize_via {
    ($helper:ident: $($method:ident)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
                at_path!(self, self.$helper(visitor))
            }
        )*
    };
}

impl<'de> Deserializer<'de> for ValueDeserializer<'_> {
    type Error = BindError;

    deserialize_via!(visit_natural: deserialize_any deserialize_bytes deserialize_byte_buf);
    deserialize_via!(integer:
        deserialize_i8 deserialize_i16 deserialize_i32 deserialize_i64 deserialize_i128
        deserialize_u8 deserialize_u16 deserialize_u32 deserialize_u64 deserialize_u128);
    deserialize_via!(float: deserialize_f32 deserialize_f64);
    deserialize_via!(string: deserialize_char deserialize_str deserialize_string deserialize_identifier);
    deserialize_via!(boolean: deserialize_bool);
    deserialize_via!(sequence: deserialize_seq);

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        if self.value.is_null() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        at_path!(self, self.visit_natural(visitor))
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, BindError> {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, BindError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_tuple<V: Visitor<'de>>(
        self,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, BindError> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, BindError> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        at_path!(self, self.mapping(None, visitor))
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, BindError> {
        at_path!(self, self.mapping(Some(fields), visitor))
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, BindError> {
        at_path!(self, self.enumeration(visitor))
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        visitor.visit_unit()
    }
}

fn visit_items<'de, V: Visitor<'de>>(
    items: &[Value],
    path: &str,
    policy: BindPolicy,
    visitor: V,
) -> Result<V::Value, BindError> {
    let mut seq = SeqRefs {
        items: items.iter().enumerate(),
        path,
        policy,
    };
    let value = visitor.visit_seq(&mut seq)?;
    let remaining = seq.items.len();
    if remaining == 0 {
        Ok(value)
    } else {
        Err(de::Error::invalid_length(
            items.len(),
            &"fewer elements in sequence",
        ))
    }
}

struct SeqRefs<'a, 'p> {
    items: std::iter::Enumerate<std::slice::Iter<'a, Value>>,
    path: &'p str,
    policy: BindPolicy,
}

impl<'de> SeqAccess<'de> for SeqRefs<'_, '_> {
    type Error = BindError;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, BindError> {
        let Some((index, value)) = self.items.next() else {
            return Ok(None);
        };
        let path = child_path(self.path, &index.to_string());
        seed.deserialize(ValueDeserializer::new(value, path, self.policy))
            .map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

struct MapRefs<'a> {
    entries: serde_json::map::Iter<'a>,
    pending: Option<(&'a String, &'a Value)>,
    path: String,
    policy: BindPolicy,
}

impl<'a> MapRefs<'a> {
    fn new(map: &'a Map<String, Value>, path: &str, policy: BindPolicy) -> Self {
        Self {
            entries: map.iter(),
            pending: None,
            path: path.to_owned(),
            policy,
        }
    }
}

impl<'de> MapAccess<'de> for MapRefs<'_> {
    type Error = BindError;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, BindError> {
        let Some((key, value)) = self.entries.next() else {
            return Ok(None);
        };
        self.pending = Some((key, value));
        // Keys are always strings; coercion lets them bind into numeric keys.
        let as_value = Value::String(key.clone());
        let policy = BindPolicy {
            coerce_scalars: true,
            ..self.policy
        };
        let path = child_path(&self.path, key);
        seed.deserialize(ValueDeserializer::new(&as_value, path, policy))
            .map(Some)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, BindError> {
        let Some((key, value)) = self.pending.take() else {
            return Err(de::Error::custom("map value requested before its key"));
        };
        let path = child_path(&self.path, key);
        seed.deserialize(ValueDeserializer::new(value, path, self.policy))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

struct EnumRef<'a> {
    variant: &'a str,
    content: ValueDeserializer<'a>,
}

impl<'de, 'a> EnumAccess<'de> for EnumRef<'a> {
    type Error = BindError;
    type Variant = ValueDeserializer<'a>;

    fn variant_seed<V: DeserializeSeed<'de>>(
        self,
        seed: V,
    ) -> Result<(V::Value, Self::Variant), BindError> {
        let tag: StrDeserializer<'_, BindError> = self.variant.into_deserializer();
        let variant = seed.deserialize(tag)?;
        Ok((variant, self.content))
    }
}

impl<'de> VariantAccess<'de> for ValueDeserializer<'_> {
    type Error = BindError;

    fn unit_variant(self) -> Result<(), BindError> {
        if self.value.is_null() {
            Ok(())
        } else {
            let err = <BindError as de::Error>::invalid_type(unexpected(self.value), &"unit variant");
            Err(err.at(&self.path))
        }
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value, BindError> {
        seed.deserialize(self)
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value, BindError> {
        self.deserialize_seq(visitor)
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, BindError> {
        self.deserialize_struct("", fields, visitor)
    }
}

fn reject_unknown(
    map: &Map<String, Value>,
    expected: &'static [&'static str],
    path: &str,
) -> Result<(), BindError> {
    match map.keys().find(|key| !expected.contains(&key.as_str())) {
        Some(key) => {
            let err: BindError = de::Error::unknown_field(key, expected);
            Err(err.at(&child_path(path, key)))
        }
        None => Ok(()),
    }
}

/// Append `segment` to a JSON pointer, escaping `~` and `/`.
pub(crate) fn child_path(parent: &str, segment: &str) -> String {
    let escaped = segment.replace('~', "~0").replace('/', "~1");
    format!("{parent}/{escaped}")
}

/// Parse `raw` as JSON when it opens with `open`.
fn embedded_json(raw: &str, open: char) -> Option<Value> {
    let trimmed = raw.trim();
    if trimmed.starts_with(open) {
        serde_json::from_str(trimmed).ok()
    } else {
        None
    }
}

/// Strings opening with a bracket or quote are never split on commas.
fn looks_structured(raw: &str) -> bool {
    matches!(raw.trim().chars().next(), Some('[' | '{' | '"' | '\''))
}

fn unexpected(value: &Value) -> Unexpected<'_> {
    match value {
        Value::Null => Unexpected::Unit,
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Number(n) => n.as_u64().map_or_else(
            || {
                n.as_i64().map_or_else(
                    || Unexpected::Float(n.as_f64().unwrap_or_default()),
                    Unexpected::Signed,
                )
            },
            Unexpected::Unsigned,
        ),
        Value::String(s) => Unexpected::Str(s),
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
    }
}
