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

use std::io;
use std::io::Write;

use crate::Error;
use crate::Layout;
use crate::append::Append;
use crate::layout::TextLayout;
use crate::record::Record;

// the header and all field lines of a record go out in one write, so records logged from
// different threads do not interleave
fn write_record(mut w: impl Write, layout: &dyn Layout, record: &Record) -> Result<(), Error> {
    let mut bytes = layout.format(record)?;
    bytes.push(b'\n');
    w.write_all(&bytes).map_err(Error::from_io_error)
}

/// An appender that prints log records to stdout.
///
/// # Examples
///
/// ```
/// use slogforth::append::Stdout;
///
/// let stdout_appender = Stdout::default();
/// ```
#[derive(Debug)]
pub struct Stdout {
    layout: Box<dyn Layout>,
}

impl Default for Stdout {
    fn default() -> Self {
        Self {
            layout: Box::new(TextLayout::default()),
        }
    }
}

impl Stdout {
    /// Set the layout for the [`Stdout`] appender.
    ///
    /// Default to [`TextLayout`].
    ///
    /// # Examples
    ///
    /// ```
    /// use slogforth::append::Stdout;
    /// use slogforth::layout::TextLayout;
    ///
    /// let stdout_appender = Stdout::default().with_layout(TextLayout::default().no_color());
    /// ```
    pub fn with_layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        self.layout = layout.into();
        self
    }
}

impl Append for Stdout {
    fn append(&self, record: &Record) -> Result<(), Error> {
        write_record(io::stdout().lock(), &*self.layout, record)
    }

    fn flush(&self) -> Result<(), Error> {
        io::stdout().flush().map_err(Error::from_io_error)
    }
}

/// An appender that prints log records to stderr.
///
/// # Examples
///
/// ```
/// use slogforth::append::Stderr;
///
/// let stderr_appender = Stderr::default();
/// ```
#[derive(Debug)]
pub struct Stderr {
    layout: Box<dyn Layout>,
}

impl Default for Stderr {
    fn default() -> Self {
        Self {
            layout: Box::new(TextLayout::default()),
        }
    }
}

impl Stderr {
    /// Set the layout for the [`Stderr`] appender.
    ///
    /// Default to [`TextLayout`].
    ///
    /// # Examples
    ///
    /// ```
    /// use slogforth::append::Stderr;
    /// use slogforth::layout::TextLayout;
    ///
    /// let stderr_appender = Stderr::default().with_layout(TextLayout::default().no_color());
    /// ```
    pub fn with_layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        self.layout = layout.into();
        self
    }
}

impl Append for Stderr {
    fn append(&self, record: &Record) -> Result<(), Error> {
        write_record(io::stderr().lock(), &*self.layout, record)
    }

    fn flush(&self) -> Result<(), Error> {
        io::stderr().flush().map_err(Error::from_io_error)
    }
}
