use alloc::borrow::Cow;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::{self, Formatter};

use serde_core::de::{self, Error as _, MapAccess, SeqAccess, Visitor};
use serde_core::ser::{SerializeMap, SerializeSeq};
use serde_core::{Deserialize, Deserializer, Serialize, Serializer};

use super::{
    ATTRIBUTE_PREFIX, DocField, DocScalar, DocValue, Document, ESCAPE_PREFIX, VALUE_KEY,
};

// -----------------------------------------------------------------------------
// Keys

/// Returns the map key of a field named `name`.
fn field_key(name: &str) -> Cow<'_, str> {
    if name.starts_with([ATTRIBUTE_PREFIX, ESCAPE_PREFIX]) {
        Cow::Owned(format!("{ESCAPE_PREFIX}{name}"))
    } else {
        Cow::Borrowed(name)
    }
}

/// Returns the field name behind a map key that is neither an attribute nor
/// [`VALUE_KEY`].
fn field_name<E: de::Error>(key: String) -> Result<String, E> {
    match key.strip_prefix(ESCAPE_PREFIX) {
        None => Ok(key),
        Some(name) if name.starts_with([ATTRIBUTE_PREFIX, ESCAPE_PREFIX]) => {
            Ok(String::from(name))
        }
        Some(_) => Err(E::custom(format!("unknown reserved key `{key}`"))),
    }
}

// -----------------------------------------------------------------------------
// Serialize

impl Serialize for DocScalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Int(value) => serializer.serialize_i64(*value),
            Self::UInt(value) => serializer.serialize_u64(*value),
            Self::Bool(value) => serializer.serialize_bool(*value),
            Self::Str(value) => serializer.serialize_str(value),
        }
    }
}

impl Serialize for DocValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Marker => serializer.serialize_unit(),
            Self::Scalar(scalar) => scalar.serialize(serializer),
            Self::Object(fields) => {
                let mut state = serializer.serialize_map(Some(fields.len()))?;
                for field in fields {
                    state.serialize_entry(&field_key(&field.name), &FieldContent(field))?;
                }
                state.end()
            }
            Self::Array(items) => {
                let mut state = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    state.serialize_element(item)?;
                }
                state.end()
            }
        }
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_map(Some(self.fields.len()))?;
        for field in &self.fields {
            state.serialize_entry(&field_key(&field.name), &FieldContent(field))?;
        }
        state.end()
    }
}

/// The value of a field, with its attributes folded in.
struct FieldContent<'a>(&'a DocField);

impl Serialize for FieldContent<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let field = self.0;
        if field.attributes.is_empty() {
            return field.value.serialize(serializer);
        }

        let mut state = serializer.serialize_map(None)?;
        for (name, value) in &field.attributes {
            state.serialize_entry(&format!("{ATTRIBUTE_PREFIX}{name}"), value)?;
        }
        match &field.value {
            DocValue::Object(fields) => {
                for child in fields {
                    state.serialize_entry(&field_key(&child.name), &FieldContent(child))?;
                }
            }
            value => state.serialize_entry(VALUE_KEY, value)?,
        }
        state.end()
    }
}

// -----------------------------------------------------------------------------
// Deserialize

impl<'de> Deserialize<'de> for DocScalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ScalarVisitor)
    }
}

impl<'de> Deserialize<'de> for DocValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let content = deserializer.deserialize_any(ContentVisitor)?;
        Ok(content.value)
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DocumentVisitor)
    }
}

struct ScalarVisitor;

impl<'de> Visitor<'de> for ScalarVisitor {
    type Value = DocScalar;

    fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.write_str("a boolean, number or string")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(DocScalar::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(DocScalar::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(DocScalar::UInt(v))
    }

    // Floats are carried as text, the way the writer records them.
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(DocScalar::Str(v.to_string()))
    }

    fn visit_char<E: de::Error>(self, v: char) -> Result<Self::Value, E> {
        Ok(DocScalar::Str(v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(DocScalar::Str(String::from(v)))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(DocScalar::Str(v))
    }
}

/// A value together with the attributes found beside it.
struct Content {
    attributes: Vec<(String, DocScalar)>,
    value: DocValue,
}

impl Content {
    #[inline]
    fn plain(value: DocValue) -> Self {
        Self {
            attributes: Vec::new(),
            value,
        }
    }

    #[inline]
    fn into_field(self, name: String) -> DocField {
        DocField {
            name,
            attributes: self.attributes,
            value: self.value,
        }
    }
}

impl<'de> Deserialize<'de> for Content {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ContentVisitor)
    }
}

struct ContentVisitor;

impl ContentVisitor {
    #[inline]
    fn scalar<E: de::Error>(value: Result<DocScalar, E>) -> Result<Content, E> {
        value.map(|scalar| Content::plain(DocValue::Scalar(scalar)))
    }
}

impl<'de> Visitor<'de> for ContentVisitor {
    type Value = Content;

    fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.write_str("a document value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Self::scalar(ScalarVisitor.visit_bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Self::scalar(ScalarVisitor.visit_i64(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Self::scalar(ScalarVisitor.visit_u64(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Self::scalar(ScalarVisitor.visit_f64(v))
    }

    fn visit_char<E: de::Error>(self, v: char) -> Result<Self::Value, E> {
        Self::scalar(ScalarVisitor.visit_char(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Self::scalar(ScalarVisitor.visit_str(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Self::scalar(ScalarVisitor.visit_string(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Content::plain(DocValue::Marker))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Content::plain(DocValue::Marker))
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<V>(self, mut seq: V) -> Result<Self::Value, V::Error>
    where
        V: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or_default());
        while let Some(item) = seq.next_element::<DocValue>()? {
            items.push(item);
        }
        Ok(Content::plain(DocValue::Array(items)))
    }

    fn visit_map<V>(self, mut map: V) -> Result<Self::Value, V::Error>
    where
        V: MapAccess<'de>,
    {
        let mut attributes = Vec::new();
        let mut fields = Vec::new();
        let mut value = None;

        while let Some(key) = map.next_key::<String>()? {
            if let Some(name) = key.strip_prefix(ATTRIBUTE_PREFIX) {
                if name.is_empty() {
                    return Err(V::Error::custom("empty attribute name"));
                }
                attributes.push((String::from(name), map.next_value::<DocScalar>()?));
            } else if key == VALUE_KEY {
                if value.is_some() {
                    return Err(V::Error::duplicate_field(VALUE_KEY));
                }
                value = Some(map.next_value::<DocValue>()?);
            } else {
                let name = field_name::<V::Error>(key)?;
                let content = map.next_value::<Content>()?;
                fields.push(content.into_field(name));
            }
        }

        let value = match value {
            None => DocValue::Object(fields),
            Some(value) if fields.is_empty() => value,
            Some(_) => {
                return Err(V::Error::custom(format!(
                    "`{VALUE_KEY}` cannot be mixed with named fields"
                )));
            }
        };
        Ok(Content { attributes, value })
    }
}

struct DocumentVisitor;

impl<'de> Visitor<'de> for DocumentVisitor {
    type Value = Document;

    fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.write_str("a map of named document fields")
    }

    fn visit_map<V>(self, mut map: V) -> Result<Self::Value, V::Error>
    where
        V: MapAccess<'de>,
    {
        let mut fields = Vec::with_capacity(map.size_hint().unwrap_or_default());
        while let Some(key) = map.next_key::<String>()? {
            let name = field_name::<V::Error>(key)?;
            let content = map.next_value::<Content>()?;
            fields.push(content.into_field(name));
        }
        Ok(Document { fields })
    }
}

// -----------------------------------------------------------------------------
// Tests
