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

//! Named values attached to log records.

use std::borrow::Cow;

use crate::value::Lazy;
use crate::value::Value;

/// A named value attached to a log record.
#[derive(Clone, Debug)]
pub struct Field {
    name: Cow<'static, str>,
    value: Value,
    kind: FieldKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FieldKind {
    Pair,
    Component,
}

impl Field {
    /// Create a field.
    pub fn new(name: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Field {
        Field {
            name: name.into(),
            value: value.into(),
            kind: FieldKind::Pair,
        }
    }

    /// The field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Return the component name if this field was created by [`component`].
    pub fn as_component(&self) -> Option<&str> {
        match self.kind {
            FieldKind::Component => Some(&self.name),
            FieldKind::Pair => None,
        }
    }
}

/// Create a field.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
///
/// let name = slogforth::field("field_name", "something or the other");
/// let map = slogforth::field("some_map", BTreeMap::from([("nested_fields", "wowow")]));
/// let seq = slogforth::field("some slice", slogforth::value::Value::seq([1, 2, 3]));
/// ```
pub fn field(name: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Field {
    Field::new(name, value)
}

/// Create a field whose value is computed only when the record is rendered.
///
/// The closure runs at most once, no matter how many appenders render the record. When the
/// field is attached to a child logger with [`Logger::with`](crate::Logger::with), it runs
/// once for the lifetime of that logger.
pub fn lazy<F, V>(name: impl Into<Cow<'static, str>>, f: F) -> Field
where
    F: FnOnce() -> V + Send + 'static,
    V: Into<Value>,
{
    Field::new(name, Lazy::new(f))
}

/// Create a field named `error` holding `err` and the chain of its causes.
pub fn error(err: &(dyn std::error::Error + 'static)) -> Field {
    Field::new("error", Value::error(err))
}

/// Tag the record with a component name instead of attaching a field.
///
/// When a logger already has a component, the names are joined with a dot.
pub fn component(name: impl Into<Cow<'static, str>>) -> Field {
    Field {
        name: name.into(),
        value: Value::null(),
        kind: FieldKind::Component,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Scalar;

    #[test]
    fn test_field_and_component() {
        let f = field("field_name", "x");
        assert_eq!(f.name(), "field_name");
        assert_eq!(f.value().as_scalar(), Some(&Scalar::Str("x".into())));
        assert_eq!(f.as_component(), None);

        let c = component("test");
        assert_eq!(c.as_component(), Some("test"));
    }

    #[test]
    fn test_lazy_is_not_evaluated_on_attach() {
        let f = lazy("name", || -> &'static str { panic!("must not run on attach") });
        assert!(matches!(f.value(), Value::Lazy(l) if !l.is_evaluated()));
    }

    #[test]
    fn test_error_field() {
        let err = std::io::Error::other("EOF");
        let f = error(&err);
        assert_eq!(f.name(), "error");
        match f.value() {
            Value::Error(chain) => assert_eq!(chain.root(), "EOF"),
            other => panic!("expected an error chain, got {other:?}"),
        }
    }
}
