// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Values attached to log records as fields.
//!
//! A [`Value`] is a closed set of variants: scalars, maps, sequences, lazily computed values and
//! error chains. Anything outside of this set is converted through its `Display` or `Debug`
//! representation with [`Value::display`] and [`Value::debug`].

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasher;

mod chain;
mod lazy;

pub use self::chain::ErrorChain;
pub use self::chain::ErrorExt;
pub use self::chain::Frame;
pub use self::chain::WrapError;
pub use self::lazy::Lazy;

/// A structured value attached to a log record.
#[derive(Clone, Debug)]
pub enum Value {
    /// A single inline value.
    Scalar(Scalar),
    /// Named entries. Rendered sorted by key.
    Map(Vec<(Cow<'static, str>, Value)>),
    /// Ordered elements.
    Seq(Vec<Value>),
    /// A value computed when the record is rendered.
    Lazy(Lazy),
    /// An error and the chain of its causes.
    Error(ErrorChain),
}

/// A value rendered on a single line.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    /// The absence of a value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// An unsigned integer.
    Uint(u64),
    /// A floating point number.
    Float(f64),
    /// A string, rendered verbatim.
    Str(Cow<'static, str>),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("null"),
            Scalar::Bool(v) => write!(f, "{v}"),
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::Uint(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::Str(v) => f.write_str(v),
        }
    }
}

impl Value {
    /// The null value.
    pub const fn null() -> Value {
        Value::Scalar(Scalar::Null)
    }

    /// Capture a value through its `Display` representation.
    pub fn display(value: impl fmt::Display) -> Value {
        Value::Scalar(Scalar::Str(Cow::Owned(value.to_string())))
    }

    /// Capture a value through its `Debug` representation.
    pub fn debug(value: impl fmt::Debug) -> Value {
        Value::Scalar(Scalar::Str(Cow::Owned(format!("{value:?}"))))
    }

    /// Build a map value from named entries.
    ///
    /// Entries keep their insertion order here; the renderer sorts them by key.
    pub fn map<K, V, I>(entries: I) -> Value
    where
        K: Into<Cow<'static, str>>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a sequence value.
    pub fn seq<V, I>(elements: I) -> Value
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        Value::Seq(elements.into_iter().map(Into::into).collect())
    }

    /// Defer computing a value until the record is rendered.
    ///
    /// See [`Lazy`].
    pub fn lazy<F, V>(f: F) -> Value
    where
        F: FnOnce() -> V + Send + 'static,
        V: Into<Value>,
    {
        Value::Lazy(Lazy::new(f))
    }

    /// Capture an error and its chain of causes.
    pub fn error(err: &(dyn std::error::Error + 'static)) -> Value {
        Value::Error(ErrorChain::new(err))
    }

    /// Convert any serializable value.
    ///
    /// Objects become maps, arrays become sequences and primitives become scalars. If
    /// serialization fails, the error message is captured instead.
    #[cfg(feature = "serde")]
    pub fn from_serde<T: serde::Serialize + ?Sized>(value: &T) -> Value {
        match serde_json::to_value(value) {
            Ok(value) => Value::from(value),
            Err(err) => Value::display(format_args!("<unserializable: {err}>")),
        }
    }

    /// Return the scalar if this value is one.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::null()
    }
}

impl From<Scalar> for Value {
    fn from(value: Scalar) -> Self {
        Value::Scalar(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Scalar(Scalar::Bool(value))
    }
}

macro_rules! impl_from_int {
    ($variant:ident, $target:ty, $($ty:ty),+) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Scalar(Scalar::$variant(value as $target))
                }
            }
        )+
    };
}

impl_from_int!(Int, i64, i8, i16, i32, i64, isize);
impl_from_int!(Uint, u64, u8, u16, u32, u64, usize);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Scalar(Scalar::Float(f64::from(value)))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Scalar(Scalar::Float(value))
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::Scalar(Scalar::Str(Cow::Owned(value.to_string())))
    }
}

impl From<&'static str> for Value {
    fn from(value: &'static str) -> Self {
        Value::Scalar(Scalar::Str(Cow::Borrowed(value)))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Scalar(Scalar::Str(Cow::Owned(value)))
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Scalar(Scalar::Str(Cow::Owned(value.clone())))
    }
}

impl From<Cow<'static, str>> for Value {
    fn from(value: Cow<'static, str>) -> Self {
        Value::Scalar(Scalar::Str(value))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::null(),
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::seq(value)
    }
}

impl<K: ToString, V: Into<Value>> From<BTreeMap<K, V>> for Value {
    fn from(value: BTreeMap<K, V>) -> Self {
        Value::map(value.into_iter().map(|(k, v)| (k.to_string(), v)))
    }
}

impl<K: ToString, V: Into<Value>, S: BuildHasher> From<HashMap<K, V, S>> for Value {
    fn from(value: HashMap<K, V, S>) -> Self {
        Value::map(value.into_iter().map(|(k, v)| (k.to_string(), v)))
    }
}

impl From<Lazy> for Value {
    fn from(value: Lazy) -> Self {
        Value::Lazy(value)
    }
}

impl From<ErrorChain> for Value {
    fn from(value: ErrorChain) -> Self {
        Value::Error(value)
    }
}

impl From<WrapError> for Value {
    fn from(value: WrapError) -> Self {
        Value::error(&value)
    }
}

impl From<std::io::Error> for Value {
    fn from(value: std::io::Error) -> Self {
        Value::error(&value)
    }
}

impl From<&anyhow::Error> for Value {
    fn from(value: &anyhow::Error) -> Self {
        let err: &(dyn std::error::Error + 'static) = value.as_ref();
        Value::error(err)
    }
}

impl From<anyhow::Error> for Value {
    fn from(value: anyhow::Error) -> Self {
        Value::from(&value)
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match value {
            Json::Null => Value::null(),
            Json::Bool(v) => Value::from(v),
            Json::Number(n) => {
                if let Some(v) = n.as_u64() {
                    Value::from(v)
                } else if let Some(v) = n.as_i64() {
                    Value::from(v)
                } else if let Some(v) = n.as_f64() {
                    Value::from(v)
                } else {
                    Value::display(n)
                }
            }
            Json::String(v) => Value::from(v),
            Json::Array(v) => Value::seq(v),
            Json::Object(v) => Value::map(v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_conversions() {
        let cases: Vec<(Value, Scalar)> = vec![
            (Value::from(true), Scalar::Bool(true)),
            (Value::from(-3i8), Scalar::Int(-3)),
            (Value::from(7usize), Scalar::Uint(7)),
            (Value::from(1.5f32), Scalar::Float(1.5)),
            (Value::from('x'), Scalar::Str("x".into())),
            (Value::from("foof"), Scalar::Str("foof".into())),
            (Value::from(String::from("bar")), Scalar::Str("bar".into())),
            (Value::from(None::<i32>), Scalar::Null),
            (Value::from(Some(1u8)), Scalar::Uint(1)),
        ];
        for (value, expected) in cases {
            assert_eq!(value.as_scalar(), Some(&expected));
        }
    }

    #[test]
    fn test_scalar_display() {
        assert_eq!(Scalar::Null.to_string(), "null");
        assert_eq!(Scalar::Float(0.25).to_string(), "0.25");
        assert_eq!(Scalar::Int(-1).to_string(), "-1");
        assert_eq!(Scalar::Str("wowow".into()).to_string(), "wowow");
    }

    #[test]
    fn test_collections() {
        let mut map = HashMap::new();
        map.insert("b", 2);
        map.insert("a", 1);
        match Value::from(map) {
            Value::Map(entries) => assert_eq!(entries.len(), 2),
            other => panic!("expected a map, got {other:?}"),
        }

        match Value::from(vec![1, 2, 3]) {
            Value::Seq(elements) => assert_eq!(elements.len(), 3),
            other => panic!("expected a sequence, got {other:?}"),
        }
    }

    #[test]
    fn test_fallback_representations() {
        #[derive(Debug)]
        struct Opaque {
            id: u32,
        }

        let value = Value::debug(Opaque { id: 4 });
        assert_eq!(
            value.as_scalar(),
            Some(&Scalar::Str("Opaque { id: 4 }".into()))
        );

        let value = Value::display(std::net::Ipv4Addr::LOCALHOST);
        assert_eq!(value.as_scalar(), Some(&Scalar::Str("127.0.0.1".into())));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_serde() {
        #[derive(serde::Serialize)]
        struct Request {
            path: &'static str,
            status: u16,
            tags: Vec<&'static str>,
        }

        let value = Value::from_serde(&Request {
            path: "/health",
            status: 200,
            tags: vec!["probe"],
        });
        let Value::Map(entries) = value else {
            panic!("expected a map");
        };
        let keys = entries.iter().map(|(k, _)| k.as_ref()).collect::<Vec<_>>();
        assert_eq!(keys.len(), 3);
        assert!(keys.contains(&"path"));
        assert!(keys.contains(&"status"));
        assert!(keys.contains(&"tags"));
    }
}
