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

use std::error::Error as StdError;
use std::fmt;
use std::panic::Location;

/// An error wrapped with a message and the place it was wrapped at.
///
/// Each `WrapError` becomes one frame when rendered as part of an [`ErrorChain`]. Create it with
/// the [`wrap!`](crate::wrap) macro, which also records the enclosing function, or with
/// [`ErrorExt::wrap`].
///
/// `Display` prints only the message of this link; the cause is reachable through
/// [`source`](StdError::source).
#[derive(Debug)]
pub struct WrapError {
    message: String,
    location: &'static Location<'static>,
    function: Option<&'static str>,
    source: Box<dyn StdError + Send + Sync + 'static>,
}

impl WrapError {
    /// Wrap `source` with `message`, recording the caller's location.
    #[track_caller]
    pub fn new(
        source: impl Into<Box<dyn StdError + Send + Sync + 'static>>,
        message: impl Into<String>,
    ) -> WrapError {
        WrapError {
            message: message.into(),
            location: Location::caller(),
            function: None,
            source: source.into(),
        }
    }

    /// Record the name of the function that wrapped the error.
    pub fn with_function(mut self, function: &'static str) -> WrapError {
        self.function = Some(function);
        self
    }

    /// The message of this link.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Where the error was wrapped.
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// The function the error was wrapped in, if known.
    pub fn function(&self) -> Option<&'static str> {
        self.function
    }
}

impl fmt::Display for WrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for WrapError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&*self.source)
    }
}

/// Wrap any error with a message at the caller's location.
pub trait ErrorExt {
    /// See [`WrapError::new`].
    fn wrap(self, message: impl Into<String>) -> WrapError;
}

impl<E: StdError + Send + Sync + 'static> ErrorExt for E {
    #[track_caller]
    fn wrap(self, message: impl Into<String>) -> WrapError {
        WrapError::new(self, message)
    }
}

/// Wrap an error with a formatted message, recording the location and the enclosing function.
///
/// # Examples
///
/// ```
/// use std::io;
///
/// fn read_config() -> Result<(), slogforth::value::WrapError> {
///     let err = io::Error::from(io::ErrorKind::UnexpectedEof);
///     Err(slogforth::wrap!(err, "failed to read {}", "config.toml"))
/// }
///
/// let err = read_config().unwrap_err();
/// assert_eq!(err.message(), "failed to read config.toml");
/// assert!(err.function().unwrap().ends_with("read_config"));
/// ```
#[macro_export]
macro_rules! wrap {
    ($source:expr, $($arg:tt)+) => {
        $crate::value::WrapError::new($source, ::std::format!($($arg)+))
            .with_function($crate::__function_name!())
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        let name = match name.strip_suffix("::f") {
            Some(name) => name,
            None => name,
        };
        name.trim_end_matches("::{{closure}}")
    }};
}

/// One link of an [`ErrorChain`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    message: String,
    location: Option<String>,
    function: Option<String>,
}

impl Frame {
    fn capture(err: &(dyn StdError + 'static)) -> Frame {
        match err.downcast_ref::<WrapError>() {
            Some(wrap) => Frame {
                message: wrap.message.clone(),
                location: Some(format!("{}:{}", wrap.location.file(), wrap.location.line())),
                function: wrap.function.map(str::to_owned),
            },
            None => Frame {
                message: err.to_string(),
                location: None,
                function: None,
            },
        }
    }

    /// The message of this link.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// `file:line` of the wrap site, if known.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// The function of the wrap site, if known.
    pub fn function(&self) -> Option<&str> {
        self.function.as_deref()
    }
}

/// A snapshot of an error and its causes, outermost first.
///
/// Every link that has a cause becomes a [`Frame`]; the innermost cause is the root, rendered
/// as the terminal line of the chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorChain {
    frames: Vec<Frame>,
    root: String,
}

impl ErrorChain {
    /// Walk `err` through [`source`](StdError::source) and capture every link.
    pub fn new(err: &(dyn StdError + 'static)) -> ErrorChain {
        let mut frames = vec![];
        let mut current = err;
        while let Some(next) = current.source() {
            frames.push(Frame::capture(current));
            current = next;
        }
        ErrorChain {
            frames,
            root: current.to_string(),
        }
    }

    /// The wrap frames, outermost first.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// The message of the innermost cause.
    pub fn root(&self) -> &str {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    fn eof() -> io::Error {
        io::Error::new(io::ErrorKind::UnexpectedEof, "EOF")
    }

    #[test]
    fn test_chain_of_wraps() {
        let err = crate::wrap!(crate::wrap!(eof(), "wrap1"), "wrap2");
        let chain = ErrorChain::new(&err);

        let messages = chain.frames().iter().map(Frame::message).collect::<Vec<_>>();
        assert_eq!(messages, vec!["wrap2", "wrap1"]);
        assert_eq!(chain.root(), "EOF");

        for frame in chain.frames() {
            let location = frame.location().unwrap();
            assert!(location.starts_with(file!()), "{location}");
            assert!(frame.function().unwrap().ends_with("test_chain_of_wraps"));
        }
    }

    #[test]
    fn test_unwrapped_error_has_no_frames() {
        let chain = ErrorChain::new(&eof());
        assert!(chain.frames().is_empty());
        assert_eq!(chain.root(), "EOF");
    }

    #[test]
    fn test_ext_wrap_records_caller() {
        let line = line!() + 1;
        let err = eof().wrap("read header");
        assert_eq!(err.location().line(), line);
        assert_eq!(err.function(), None);
        assert_eq!(err.to_string(), "read header");
    }

    #[test]
    fn test_anyhow_context_links() {
        let err = anyhow::Error::new(eof()).context("load state");
        let err: &(dyn StdError + 'static) = err.as_ref();
        let chain = ErrorChain::new(err);
        assert_eq!(chain.frames().len(), 1);
        assert_eq!(chain.frames()[0].message(), "load state");
        assert_eq!(chain.frames()[0].location(), None);
        assert_eq!(chain.root(), "EOF");
    }
}
