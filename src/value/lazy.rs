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

use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::OnceLock;
use std::sync::PoisonError;

use crate::value::Value;

type Thunk = Box<dyn FnOnce() -> Value + Send>;

/// A value computed on demand when a record is rendered.
///
/// The closure runs at most once. Its result is memoized and shared by all clones, so a record
/// rendered by several appenders evaluates it a single time. A record that no dispatch accepts
/// never evaluates it.
///
/// # Examples
///
/// ```
/// use slogforth::value::Lazy;
/// use slogforth::value::Value;
///
/// let lazy = Lazy::new(|| "wow");
/// assert!(!lazy.is_evaluated());
/// assert!(matches!(lazy.get(), Value::Scalar(_)));
/// assert!(lazy.is_evaluated());
/// ```
#[derive(Clone)]
pub struct Lazy {
    inner: Arc<LazyInner>,
}

struct LazyInner {
    thunk: Mutex<Option<Thunk>>,
    value: OnceLock<Value>,
}

impl Lazy {
    /// Wrap a closure whose result becomes the value.
    pub fn new<F, V>(f: F) -> Lazy
    where
        F: FnOnce() -> V + Send + 'static,
        V: Into<Value>,
    {
        let thunk: Thunk = Box::new(move || f().into());
        Lazy {
            inner: Arc::new(LazyInner {
                thunk: Mutex::new(Some(thunk)),
                value: OnceLock::new(),
            }),
        }
    }

    /// Evaluate the closure if it has not run yet, and return its result.
    pub fn get(&self) -> &Value {
        self.inner.value.get_or_init(|| {
            let thunk = self
                .inner
                .thunk
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take();
            match thunk {
                Some(f) => f(),
                None => Value::null(),
            }
        })
    }

    /// Whether the closure has already run.
    pub fn is_evaluated(&self) -> bool {
        self.inner.value.get().is_some()
    }
}

impl fmt::Debug for Lazy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.value.get() {
            Some(value) => f.debug_tuple("Lazy").field(value).finish(),
            None => f.write_str("Lazy(<pending>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::value::Scalar;

    #[test]
    fn test_evaluates_once_across_clones() {
        let calls = Arc::new(AtomicUsize::new(0));
        let lazy = {
            let calls = calls.clone();
            Lazy::new(move || {
                calls.fetch_add(1, Ordering::SeqCst);
                42
            })
        };
        let copy = lazy.clone();
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert_eq!(lazy.get().as_scalar(), Some(&Scalar::Int(42)));
        assert_eq!(copy.get().as_scalar(), Some(&Scalar::Int(42)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(copy.is_evaluated());
    }

    #[test]
    fn test_debug_does_not_evaluate() {
        let lazy = Lazy::new(|| "wow");
        assert_eq!(format!("{lazy:?}"), "Lazy(<pending>)");
        assert!(!lazy.is_evaluated());
        lazy.get();
        assert!(format!("{lazy:?}").contains("wow"));
    }
}
