//! Dynamic value representation for KV3 data.
//!
//! This module provides the [`Value`] enum which represents any valid KV3 value.
//!
//! ## Core Types
//!
//! - [`Value`]: null, bool, the integer widths, double, string, binary blob, array, object, and flagged values
//! - [`Flag`] / [`Flags`]: semantic markers such as `resource` or `subclass` that change how a value is rendered
//! - [`Comment`]: a `//` or `/* */` comment kept from text input
//!
//! ## Usage Patterns
//!
//! ### Creating Values
//!
//! ```rust
//! use keyvalues3::{kv3, Flag, Value};
//!
//! let null = Value::Null;
//! let number = Value::from(42);
//! let path = Value::from("particles/star.vpcf").with_flag(Flag::Resource);
//!
//! let obj = kv3!({
//!     "name": "Alice",
//!     "age": 30
//! });
//! assert_eq!(obj["age"], 30);
//! ```
//!
//! ### Equality
//!
//! `==` compares logical content: flags are ignored and integers compare by
//! numeric value whatever their width. [`Value::deep_eq`] is the strict
//! comparison used for round-trip checks.
//!
//! ```rust
//! use keyvalues3::{Flag, Value};
//!
//! let plain = Value::from("a/b.vmdl");
//! let flagged = plain.clone().with_flag(Flag::Resource);
//! assert_eq!(plain, flagged);
//! assert!(!plain.deep_eq(&flagged));
//!
//! assert_eq!(Value::Int32(7), Value::Int64(7));
//! assert!(!Value::Int32(7).deep_eq(&Value::Int64(7)));
//! ```

use crate::{Error, KvMap, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::ops::Index;

/// A dynamically-typed representation of any valid KV3 value.
///
/// # Examples
///
/// ```rust
/// use keyvalues3::Value;
///
/// let null = Value::Null;
/// let num = Value::Int64(42);
/// let text = Value::String("hello".to_string());
///
/// assert!(null.is_null());
/// assert!(num.is_integer());
/// assert!(text.is_string());
/// ```
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Double(f64),
    String(String),
    Blob(Vec<u8>),
    Array(Vec<Value>),
    Object(KvMap),
    /// A value tagged with rendering markers. The flags never change the
    /// logical content of `value`.
    Flagged { flags: Flags, value: Box<Value> },
}

/// A semantic marker on a value.
///
/// Known markers have a fixed text spelling; anything else read from text is
/// kept verbatim as [`Flag::Other`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Flag {
    Resource,
    ResourceName,
    MultilineString,
    Panorama,
    SoundEvent,
    SubClass,
    EntityName,
    Localize,
    Other(String),
}

impl Flag {
    /// Parses a flag name. Known names are case-insensitive.
    ///
    /// ```rust
    /// use keyvalues3::Flag;
    ///
    /// assert_eq!(Flag::from_name("resource"), Flag::Resource);
    /// assert_eq!(Flag::from_name("resourcename"), Flag::ResourceName);
    /// assert_eq!(Flag::from_name("vmap_only"), Flag::Other("vmap_only".to_string()));
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Flag {
        match name.to_ascii_lowercase().as_str() {
            "resource" => Flag::Resource,
            "resource_name" | "resourcename" => Flag::ResourceName,
            "multilinestring" => Flag::MultilineString,
            "panorama" => Flag::Panorama,
            "soundevent" => Flag::SoundEvent,
            "subclass" => Flag::SubClass,
            "entity_name" => Flag::EntityName,
            "localize" => Flag::Localize,
            _ => Flag::Other(name.to_string()),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Flag::Resource => "resource",
            Flag::ResourceName => "resource_name",
            Flag::MultilineString => "multilinestring",
            Flag::Panorama => "panorama",
            Flag::SoundEvent => "soundevent",
            Flag::SubClass => "subclass",
            Flag::EntityName => "entity_name",
            Flag::Localize => "localize",
            Flag::Other(name) => name,
        }
    }

    /// Bit used for this flag in the binary flag byte, if it has one.
    #[must_use]
    pub const fn bit(&self) -> Option<u8> {
        match self {
            Flag::Resource => Some(1),
            Flag::ResourceName => Some(2),
            Flag::MultilineString => Some(4),
            Flag::Panorama => Some(8),
            Flag::SoundEvent => Some(16),
            Flag::SubClass => Some(32),
            _ => None,
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An unordered set of [`Flag`]s.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Flags(BTreeSet<Flag>);

impl Flags {
    #[must_use]
    pub fn new() -> Self {
        Flags(BTreeSet::new())
    }

    /// Decodes a binary flag byte. Bits without a known flag are ignored.
    #[must_use]
    pub fn from_bits(bits: u8) -> Self {
        [
            Flag::Resource,
            Flag::ResourceName,
            Flag::MultilineString,
            Flag::Panorama,
            Flag::SoundEvent,
            Flag::SubClass,
        ]
        .into_iter()
        .filter(|flag| flag.bit().is_some_and(|bit| bits & bit != 0))
        .collect()
    }

    /// Encodes the flags that have a binary bit.
    #[must_use]
    pub fn bits(&self) -> u8 {
        self.0.iter().filter_map(Flag::bit).fold(0, |acc, bit| acc | bit)
    }

    pub fn insert(&mut self, flag: Flag) -> bool {
        self.0.insert(flag)
    }

    pub fn remove(&mut self, flag: &Flag) -> bool {
        self.0.remove(flag)
    }

    #[must_use]
    pub fn contains(&self, flag: &Flag) -> bool {
        self.0.contains(flag)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Flag> {
        self.0.iter()
    }

    pub fn extend(&mut self, other: Flags) {
        self.0.extend(other.0);
    }
}

impl FromIterator<Flag> for Flags {
    fn from_iter<T: IntoIterator<Item = Flag>>(iter: T) -> Self {
        Flags(iter.into_iter().collect())
    }
}

impl From<Flag> for Flags {
    fn from(flag: Flag) -> Self {
        Flags(BTreeSet::from([flag]))
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, flag) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            f.write_str(flag.name())?;
        }
        Ok(())
    }
}

/// A comment read from text input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Comment {
    /// `// text`, without the slashes
    Line(String),
    /// `/* text */`, without the delimiters
    Block(String),
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comment::Line(text) => write!(f, "//{}", text),
            Comment::Block(text) => write!(f, "/*{}*/", text),
        }
    }
}

static NULL: Value = Value::Null;

impl Value {
    /// Wraps a value with a set of flags. An empty set leaves the value unflagged.
    #[must_use]
    pub fn flagged(flags: Flags, value: Value) -> Value {
        Value::Null.merge_flags(flags, value)
    }

    /// Adds one flag to this value.
    #[must_use]
    pub fn with_flag(self, flag: Flag) -> Value {
        Value::flagged(Flags::from(flag), self)
    }

    /// A string carrying the `resource` flag.
    #[must_use]
    pub fn resource(path: impl Into<String>) -> Value {
        Value::String(path.into()).with_flag(Flag::Resource)
    }

    /// A string that the text writer emits as a `"""` block.
    #[must_use]
    pub fn multiline(text: impl Into<String>) -> Value {
        Value::String(text.into()).with_flag(Flag::MultilineString)
    }

    fn merge_flags(self, mut flags: Flags, value: Value) -> Value {
        match value {
            Value::Flagged {
                flags: inner,
                value,
            } => {
                flags.extend(inner);
                self.merge_flags(flags, *value)
            }
            value if flags.is_empty() => value,
            value => Value::Flagged {
                flags,
                value: Box::new(value),
            },
        }
    }

    /// Returns the value with all flag wrappers removed.
    #[must_use]
    pub fn unflagged(&self) -> &Value {
        match self {
            Value::Flagged { value, .. } => value.unflagged(),
            other => other,
        }
    }

    /// Consumes the value, dropping all flags.
    #[must_use]
    pub fn into_unflagged(self) -> Value {
        match self {
            Value::Flagged { value, .. } => value.into_unflagged(),
            other => other,
        }
    }

    /// Returns the flags on this value, merged across nested wrappers.
    #[must_use]
    pub fn flags(&self) -> Flags {
        let mut flags = Flags::new();
        let mut current = self;
        while let Value::Flagged { flags: f, value } = current {
            flags.extend(f.clone());
            current = value;
        }
        flags
    }

    #[must_use]
    pub fn has_flag(&self, flag: &Flag) -> bool {
        match self {
            Value::Flagged { flags, value } => flags.contains(flag) || value.has_flag(flag),
            _ => false,
        }
    }

    /// Returns `true` if the value is null.
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self.unflagged(), Value::Null)
    }

    #[inline]
    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self.unflagged(), Value::Bool(_))
    }

    /// Returns `true` for any of the integer widths.
    #[inline]
    #[must_use]
    pub fn is_integer(&self) -> bool {
        self.as_i128().is_some()
    }

    #[inline]
    #[must_use]
    pub fn is_double(&self) -> bool {
        matches!(self.unflagged(), Value::Double(_))
    }

    #[inline]
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self.unflagged(), Value::String(_))
    }

    #[inline]
    #[must_use]
    pub fn is_blob(&self) -> bool {
        matches!(self.unflagged(), Value::Blob(_))
    }

    #[inline]
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self.unflagged(), Value::Array(_))
    }

    #[inline]
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self.unflagged(), Value::Object(_))
    }

    #[inline]
    #[must_use]
    pub fn is_flagged(&self) -> bool {
        matches!(self, Value::Flagged { .. })
    }

    /// If the value is a boolean, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self.unflagged() {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn as_i128(&self) -> Option<i128> {
        match self.unflagged() {
            Value::Int32(i) => Some(i128::from(*i)),
            Value::UInt32(u) => Some(i128::from(*u)),
            Value::Int64(i) => Some(i128::from(*i)),
            Value::UInt64(u) => Some(i128::from(*u)),
            _ => None,
        }
    }

    /// If the value is an integer that fits in `i64`, returns it.
    ///
    /// ```rust
    /// use keyvalues3::Value;
    ///
    /// assert_eq!(Value::Int32(-3).as_i64(), Some(-3));
    /// assert_eq!(Value::UInt64(u64::MAX).as_i64(), None);
    /// assert_eq!(Value::Double(1.0).as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_i128().and_then(|i| i64::try_from(i).ok())
    }

    /// If the value is a non-negative integer that fits in `u64`, returns it.
    #[inline]
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        self.as_i128().and_then(|i| u64::try_from(i).ok())
    }

    /// Returns the value as `f64` for doubles and integers.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self.unflagged() {
            Value::Double(d) => Some(*d),
            Value::Int32(i) => Some(f64::from(*i)),
            Value::UInt32(u) => Some(f64::from(*u)),
            Value::Int64(i) => Some(*i as f64),
            Value::UInt64(u) => Some(*u as f64),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self.unflagged() {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self.unflagged() {
            Value::Blob(bytes) => Some(bytes),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self.unflagged() {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            Value::Flagged { value, .. } => value.as_array_mut(),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&KvMap> {
        match self.unflagged() {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object_mut(&mut self) -> Option<&mut KvMap> {
        match self {
            Value::Object(obj) => Some(obj),
            Value::Flagged { value, .. } => value.as_object_mut(),
            _ => None,
        }
    }

    /// Looks up `key` if this value is an object.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|obj| obj.get(key))
    }

    /// Looks up `key`, failing when the value is not an object or has no such key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] on a miss.
    pub fn try_get(&self, key: &str) -> Result<&Value> {
        self.get(key)
            .ok_or_else(|| Error::KeyNotFound(key.to_string()))
    }

    /// Strict comparison: flags, key order, numeric width and double bits must all match.
    #[must_use]
    pub fn deep_eq(&self, other: &Value) -> bool {
        if self.flags() != other.flags() {
            return false;
        }
        match (self.unflagged(), other.unflagged()) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int32(a), Value::Int32(b)) => a == b,
            (Value::UInt32(a), Value::UInt32(b)) => a == b,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (Value::UInt64(a), Value::UInt64(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Blob(a), Value::Blob(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.deep_eq(y))
            }
            (Value::Object(a), Value::Object(b)) => a.deep_eq(b),
            _ => false,
        }
    }

    /// Short name of the value's type, used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self.unflagged() {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int32(_) => "int32",
            Value::UInt32(_) => "uint32",
            Value::Int64(_) => "int64",
            Value::UInt64(_) => "uint64",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Blob(_) => "binary blob",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Flagged { .. } => "flagged value",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        let (a, b) = (self.unflagged(), other.unflagged());
        if let (Some(x), Some(y)) = (a.as_i128(), b.as_i128()) {
            return x == y;
        }
        match (a, b) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(x), Value::Bool(y)) => x == y,
            (Value::Double(x), Value::Double(y)) => x == y,
            (Value::String(x), Value::String(y)) => x == y,
            (Value::Blob(x), Value::Blob(y)) => x == y,
            (Value::Array(x), Value::Array(y)) => x == y,
            (Value::Object(x), Value::Object(y)) => x == y,
            _ => false,
        }
    }
}

impl PartialEq<f64> for Value {
    fn eq(&self, other: &f64) -> bool {
        matches!(self.unflagged(), Value::Double(d) if d == other)
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        self.as_i128() == Some(i128::from(*other))
    }
}

impl PartialEq<i32> for Value {
    fn eq(&self, other: &i32) -> bool {
        self.as_i128() == Some(i128::from(*other))
    }
}

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

/// Missing keys and non-objects index to `Value::Null`.
impl Index<&str> for Value {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        self.get(key).unwrap_or(&NULL)
    }
}

/// Out-of-range positions and non-arrays index to `Value::Null`.
impl Index<usize> for Value {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        self.as_array()
            .and_then(|arr| arr.get(index))
            .unwrap_or(&NULL)
    }
}

/// Renders the value in headerless canonical text form.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = crate::text::value_to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(text.trim_end())
    }
}

/// Flags and comments have no counterpart in the Serde data model and are dropped.
impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.unflagged() {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int32(i) => serializer.serialize_i32(*i),
            Value::UInt32(u) => serializer.serialize_u32(*u),
            Value::Int64(i) => serializer.serialize_i64(*i),
            Value::UInt64(u) => serializer.serialize_u64(*u),
            Value::Double(d) => serializer.serialize_f64(*d),
            Value::String(s) => serializer.serialize_str(s),
            Value::Blob(bytes) => serializer.serialize_bytes(bytes),
            Value::Array(arr) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Object(obj) => {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(obj.len()))?;
                for (k, v) in obj.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Value::Flagged { .. } => unreachable!("unflagged() never returns a flagged value"),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any valid KV3 value")
            }

            fn visit_bool<E>(self, value: bool) -> std::result::Result<Self::Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> std::result::Result<Self::Value, E> {
                Ok(Value::Int64(value))
            }

            fn visit_u64<E>(self, value: u64) -> std::result::Result<Self::Value, E> {
                match i64::try_from(value) {
                    Ok(i) => Ok(Value::Int64(i)),
                    Err(_) => Ok(Value::UInt64(value)),
                }
            }

            fn visit_f64<E>(self, value: f64) -> std::result::Result<Self::Value, E> {
                Ok(Value::Double(value))
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> std::result::Result<Self::Value, E> {
                Ok(Value::String(value))
            }

            fn visit_bytes<E>(self, value: &[u8]) -> std::result::Result<Self::Value, E> {
                Ok(Value::Blob(value.to_vec()))
            }

            fn visit_byte_buf<E>(self, value: Vec<u8>) -> std::result::Result<Self::Value, E> {
                Ok(Value::Blob(value))
            }

            fn visit_unit<E>(self) -> std::result::Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> std::result::Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::Array(vec))
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = KvMap::new();
                while let Some((key, value)) = map.next_entry()? {
                    values.insert(key, value);
                }
                Ok(Value::Object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl TryFrom<Value> for i64 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        value.as_i64().ok_or_else(|| {
            Error::InvalidValue(format!("expected integer, found {}", value.type_name()))
        })
    }
}

impl TryFrom<Value> for f64 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        value.as_f64().ok_or_else(|| {
            Error::InvalidValue(format!("expected number, found {}", value.type_name()))
        })
    }
}

impl TryFrom<Value> for bool {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        value.as_bool().ok_or_else(|| {
            Error::InvalidValue(format!("expected bool, found {}", value.type_name()))
        })
    }
}

impl TryFrom<Value> for String {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value.into_unflagged() {
            Value::String(s) => Ok(s),
            other => Err(Error::InvalidValue(format!(
                "expected string, found {}",
                other.type_name()
            ))),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i8> for Value {
    fn from(value: i8) -> Self {
        Value::Int64(i64::from(value))
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Self {
        Value::Int64(i64::from(value))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int64(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int64(value)
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Value::Int64(i64::from(value))
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Value::Int64(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int64(i64::from(value))
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::UInt64(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Double(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Blob(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<KvMap> for Value {
    fn from(value: KvMap) -> Self {
        Value::Object(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
