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

//! Log record and metadata.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

use crate::Error;
use crate::field::Field;

/// A log entry: a message, its severity and the fields attached to it.
#[derive(Clone, Debug)]
pub struct Record {
    // the observed time
    time: SystemTime,

    level: Level,
    component: Option<Cow<'static, str>>,
    message: Cow<'static, str>,

    // the call site
    file: Option<Cow<'static, str>>,
    line: Option<u32>,

    // in attach order
    fields: Vec<Field>,
}

impl Record {
    /// Returns a new builder.
    pub fn builder() -> RecordBuilder {
        RecordBuilder::default()
    }

    /// The observed time.
    pub fn time(&self) -> SystemTime {
        self.time
    }

    /// The severity of the record.
    pub fn level(&self) -> Level {
        self.level
    }

    /// The component the record was logged from, if tagged.
    pub fn component(&self) -> Option<&str> {
        self.component.as_deref()
    }

    /// The message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The source file of the logging call.
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    /// The filename of the source file.
    pub fn filename(&self) -> Option<&str> {
        self.file().map(|file| match file.rfind(['/', '\\']) {
            Some(idx) => &file[idx + 1..],
            None => file,
        })
    }

    /// The line of the logging call.
    pub fn line(&self) -> Option<u32> {
        self.line
    }

    /// The fields, in the order they were attached.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Metadata used to filter this record.
    pub fn metadata(&self) -> Metadata<'_> {
        Metadata {
            level: self.level,
            component: self.component.as_deref().unwrap_or_default(),
        }
    }
}

/// Builder for [`Record`].
#[derive(Debug)]
pub struct RecordBuilder {
    record: Record,
}

impl Default for RecordBuilder {
    fn default() -> Self {
        RecordBuilder {
            record: Record {
                time: SystemTime::now(),
                level: Level::Info,
                component: None,
                message: Cow::Borrowed(""),
                file: None,
                line: None,
                fields: vec![],
            },
        }
    }
}

impl RecordBuilder {
    /// Set [`time`](Record::time).
    pub fn time(mut self, time: SystemTime) -> Self {
        self.record.time = time;
        self
    }

    /// Set [`level`](Record::level).
    pub fn level(mut self, level: Level) -> Self {
        self.record.level = level;
        self
    }

    /// Set [`message`](Record::message).
    pub fn message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.record.message = message.into();
        self
    }

    /// Set [`component`](Record::component).
    pub fn component(mut self, component: Option<Cow<'static, str>>) -> Self {
        self.record.component = component;
        self
    }

    /// Set [`file`](Record::file).
    pub fn file(mut self, file: Option<Cow<'static, str>>) -> Self {
        self.record.file = file;
        self
    }

    /// Set [`line`](Record::line).
    pub fn line(mut self, line: Option<u32>) -> Self {
        self.record.line = line;
        self
    }

    /// Append fields, keeping their order.
    ///
    /// Fields created by [`component`](crate::component) are not appended; they extend the
    /// record's component instead.
    pub fn fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        for field in fields {
            match field.as_component() {
                Some(name) => {
                    let component = match self.record.component.take() {
                        Some(parent) if !parent.is_empty() => Cow::Owned(format!("{parent}.{name}")),
                        _ => Cow::Owned(name.to_owned()),
                    };
                    self.record.component = Some(component);
                }
                None => self.record.fields.push(field),
            }
        }
        self
    }

    /// Invoke the builder and return a `Record`.
    pub fn build(self) -> Record {
        self.record
    }
}

/// Metadata about a log record, used by filters before anything is rendered.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct Metadata<'a> {
    level: Level,
    component: &'a str,
}

impl<'a> Metadata<'a> {
    /// Create metadata for a level and component. Use `""` for no component.
    pub fn new(level: Level, component: &'a str) -> Self {
        Metadata { level, component }
    }

    /// Get the level.
    pub fn level(&self) -> Level {
        self.level
    }

    /// Get the component, or `""` if the record has none.
    pub fn component(&self) -> &'a str {
        self.component
    }
}

/// The severity of a log record, ordered from least to most severe.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Information useful while debugging.
    Debug,
    /// Routine information.
    Info,
    /// Something unexpected that the program recovered from.
    Warn,
    /// An operation failed.
    Error,
    /// A failure that needs immediate attention.
    Critical,
    /// The program cannot continue.
    Fatal,
}

impl Level {
    /// Return the upper-case name of the `Level`.
    ///
    /// This returns the same string as the `fmt::Display` implementation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
            Level::Fatal => "FATAL",
        }
    }
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Level, Self::Err> {
        for (name, level) in [
            ("debug", Level::Debug),
            ("info", Level::Info),
            ("warn", Level::Warn),
            ("warning", Level::Warn),
            ("error", Level::Error),
            ("critical", Level::Critical),
            ("crit", Level::Critical),
            ("fatal", Level::Fatal),
        ] {
            if s.eq_ignore_ascii_case(name) {
                return Ok(level);
            }
        }

        Err(Error::new(format!("malformed level: {s:?}")))
    }
}

/// A condition on the level of a record.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum LevelFilter {
    /// Disables all levels.
    Off,
    /// Enables if the record level is equal to the filter level.
    Equal(Level),
    /// Enables if the record level is not equal to the filter level.
    NotEqual(Level),
    /// Enables if the record level is more severe than the filter level.
    MoreSevere(Level),
    /// Enables if the record level is more severe than or equal to the filter level.
    ///
    /// This is the usual sink threshold.
    MoreSevereEqual(Level),
    /// Enables if the record level is less severe than the filter level.
    LessSevere(Level),
    /// Enables if the record level is less severe than or equal to the filter level.
    LessSevereEqual(Level),
    /// Enables all levels.
    All,
}

impl LevelFilter {
    /// Checks the given level if satisfies the filter condition.
    ///
    /// # Examples
    ///
    /// ```
    /// use slogforth::record::Level;
    /// use slogforth::record::LevelFilter;
    ///
    /// let level_filter = LevelFilter::MoreSevereEqual(Level::Warn);
    ///
    /// assert_eq!(level_filter.test(Level::Debug), false);
    /// assert_eq!(level_filter.test(Level::Info), false);
    /// assert_eq!(level_filter.test(Level::Warn), true);
    /// assert_eq!(level_filter.test(Level::Fatal), true);
    /// ```
    pub fn test(&self, level: Level) -> bool {
        match self {
            LevelFilter::Off => false,
            LevelFilter::Equal(l) => level == *l,
            LevelFilter::NotEqual(l) => level != *l,
            LevelFilter::MoreSevere(l) => level > *l,
            LevelFilter::MoreSevereEqual(l) => level >= *l,
            LevelFilter::LessSevere(l) => level < *l,
            LevelFilter::LessSevereEqual(l) => level <= *l,
            LevelFilter::All => true,
        }
    }
}

impl From<Level> for LevelFilter {
    fn from(level: Level) -> Self {
        LevelFilter::MoreSevereEqual(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component;
    use crate::field;

    const LEVELS: [Level; 6] = [
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Critical,
        Level::Fatal,
    ];

    #[test]
    fn test_threshold_is_monotonic() {
        for threshold in LEVELS {
            let filter = LevelFilter::from(threshold);
            for level in LEVELS {
                assert_eq!(filter.test(level), level >= threshold, "{threshold} {level}");
            }
        }
        assert!(LEVELS.iter().all(|l| !LevelFilter::Off.test(*l)));
        assert!(LEVELS.iter().all(|l| LevelFilter::All.test(*l)));
    }

    #[test]
    fn test_level_from_str() {
        assert_eq!("INFO".parse::<Level>().unwrap(), Level::Info);
        assert_eq!("Warning".parse::<Level>().unwrap(), Level::Warn);
        assert_eq!("crit".parse::<Level>().unwrap(), Level::Critical);
        let err = "verbose".parse::<Level>().unwrap_err();
        assert_eq!(err.to_string(), r#"malformed level: "verbose""#);
    }

    #[test]
    fn test_builder_keeps_field_order_and_routes_components() {
        let record = Record::builder()
            .component(Some("server".into()))
            .fields([
                field("zeta", 1),
                component("http"),
                field("alpha", 2),
                field("mid", 3),
            ])
            .build();

        let names = record.fields().iter().map(|f| f.name()).collect::<Vec<_>>();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert_eq!(record.component(), Some("server.http"));
        assert_eq!(record.metadata().component(), "server.http");
    }

    #[test]
    fn test_filename() {
        let record = Record::builder()
            .file(Some("src/deep/module.rs".into()))
            .build();
        assert_eq!(record.filename(), Some("module.rs"));
        assert_eq!(Record::builder().build().filename(), None);
    }
}
