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

use crate::Error;
use crate::Layout;
use crate::append::Append;
use crate::layout::TextLayout;
use crate::record::Record;

/// An appender that writes log records that can be captured by a test harness (like `cargo test`),
/// and thus the outputs are suppressed unless `--nocapture` or `--show-output` is specified.
///
/// Each record is prefixed with the `file:line` of the logging call, so the output of a failing
/// test points at the line that logged it:
///
/// ```text
/// lib.rs:38: Sep 06 14:04:08.947 [INFO]: my message here
///   field_name: something or the other
/// ```
///
/// # Examples
///
/// ```
/// use slogforth::append::Testing;
///
/// let test_appender = Testing::default();
/// ```
#[derive(Debug)]
pub struct Testing {
    layout: Box<dyn Layout>,
}

impl Default for Testing {
    fn default() -> Self {
        Self {
            layout: Box::new(TextLayout::default().no_color()),
        }
    }
}

impl Testing {
    /// Set the layout for the [`Testing`] appender.
    ///
    /// Default to [`TextLayout`] without colors.
    ///
    /// # Examples
    ///
    /// ```
    /// use slogforth::append::Testing;
    /// use slogforth::layout::TextLayout;
    ///
    /// let test_appender = Testing::default().with_layout(TextLayout::default().indent(4));
    /// ```
    pub fn with_layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        self.layout = layout.into();
        self
    }

    fn render(&self, record: &Record) -> Result<String, Error> {
        let bytes = self.layout.format(record)?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(match (record.filename(), record.line()) {
            (Some(file), Some(line)) => format!("{file}:{line}: {text}"),
            _ => text.into_owned(),
        })
    }
}

impl Append for Testing {
    fn append(&self, record: &Record) -> Result<(), Error> {
        // print macros go through the test harness output capture, writing to io::stderr
        // directly does not
        eprintln!("{}", self.render(record)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field;

    #[test]
    fn test_prefixes_call_site() {
        let testing = Testing::default().with_layout(
            TextLayout::default()
                .no_color()
                .timestamp_format(|_, _| "TIME".to_string()),
        );
        let record = Record::builder()
            .message("my message here")
            .file(Some("src/lib.rs".into()))
            .line(Some(38))
            .fields([field("field_name", "x")])
            .build();
        assert_eq!(
            testing.render(&record).unwrap(),
            "lib.rs:38: TIME [INFO]: my message here\n  field_name: x"
        );
        testing.append(&record).unwrap();
    }

    #[test]
    fn test_without_call_site() {
        let testing = Testing::default().with_layout(
            TextLayout::default()
                .no_color()
                .timestamp_format(|_, _| "T".to_string()),
        );
        let record = Record::builder().message("m").build();
        assert_eq!(testing.render(&record).unwrap(), "T [INFO]: m");
    }
}
