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

use std::borrow::Cow;
use std::panic::Location;
use std::sync::Arc;

use crate::Append;
use crate::Filter;
use crate::Trap;
use crate::field::Field;
use crate::filter::FilterResult;
use crate::record::Level;
use crate::record::Metadata;
use crate::record::Record;
use crate::record::RecordBuilder;

/// A logger that dispatches log records to one or more dispatches.
///
/// Cloning a logger is cheap; clones share the same dispatches. Child loggers created with
/// [`with`](Logger::with) and [`named`](Logger::named) carry extra fields and a component
/// that are added to every record they emit.
///
/// Logging never fails the caller: errors raised by appenders go to the configured
/// [`Trap`](crate::Trap).
///
/// # Examples
///
/// ```
/// use slogforth::append;
/// use slogforth::field;
///
/// let logger = slogforth::builder()
///     .dispatch(|d| d.append(append::Stderr::default()))
///     .build();
///
/// let db = logger.named("db").with([field("pool", 1)]);
/// db.info("connected", [field("took_ms", 12)]);
/// ```
#[derive(Clone, Debug)]
pub struct Logger {
    shared: Arc<Shared>,
    component: Option<Cow<'static, str>>,
    fields: Vec<Field>,
}

#[derive(Debug)]
struct Shared {
    dispatches: Vec<Dispatch>,
    trap: Box<dyn Trap>,
}

impl Logger {
    pub(super) fn new(dispatches: Vec<Dispatch>, trap: Box<dyn Trap>) -> Self {
        Self {
            shared: Arc::new(Shared { dispatches, trap }),
            component: None,
            fields: vec![],
        }
    }

    /// Create a child logger that attaches `fields` to every record before the call's own
    /// fields.
    ///
    /// A [`component`](crate::component) among `fields` names the child instead.
    ///
    /// The fields are shared by every record the child emits, so a [`lazy`](crate::lazy) field
    /// attached here is computed once, on the first record that gets rendered, and that value
    /// is reused afterwards.
    pub fn with(&self, fields: impl IntoIterator<Item = Field>) -> Logger {
        let mut child = self.clone();
        for field in fields {
            match field.as_component() {
                Some(name) => child.component = Some(join_component(&child.component, name)),
                None => child.fields.push(field),
            }
        }
        child
    }

    /// Create a child logger whose records are tagged with `name`, joined to this logger's
    /// component with a dot.
    pub fn named(&self, name: impl Into<Cow<'static, str>>) -> Logger {
        let mut child = self.clone();
        let name = name.into();
        child.component = Some(match &self.component {
            None => name,
            Some(_) => join_component(&self.component, &name),
        });
        child
    }

    /// The component of this logger, if any.
    pub fn component(&self) -> Option<&str> {
        self.component.as_deref()
    }

    /// Whether any dispatch would accept a record of `level` from this logger.
    pub fn enabled(&self, level: Level) -> bool {
        let metadata = Metadata::new(level, self.component.as_deref().unwrap_or_default());
        self.enabled_for(&metadata)
    }

    pub(crate) fn enabled_for(&self, metadata: &Metadata) -> bool {
        self.shared
            .dispatches
            .iter()
            .any(|dispatch| dispatch.enabled(metadata))
    }

    // a record carrying this logger's component and context fields
    pub(crate) fn record_builder(&self, level: Level) -> RecordBuilder {
        Record::builder()
            .level(level)
            .component(self.component.clone())
            .fields(self.fields.iter().cloned())
    }

    /// Send a prepared record to every dispatch that accepts it.
    pub fn log(&self, record: &Record) {
        for dispatch in &self.shared.dispatches {
            dispatch.log(record, self.shared.trap.as_ref());
        }
    }

    /// Flush all appenders.
    pub fn flush(&self) {
        for dispatch in &self.shared.dispatches {
            dispatch.flush(self.shared.trap.as_ref());
        }
    }

    /// Log a message with fields at `level`, recording the caller's file and line.
    #[track_caller]
    pub fn emit(
        &self,
        level: Level,
        message: impl Into<Cow<'static, str>>,
        fields: impl IntoIterator<Item = Field>,
    ) {
        let location = Location::caller();
        let record = self
            .record_builder(level)
            .message(message)
            .file(Some(Cow::Borrowed(location.file())))
            .line(Some(location.line()))
            .fields(fields)
            .build();
        self.log(&record);
    }

    /// Log at [`Level::Debug`].
    #[track_caller]
    pub fn debug(
        &self,
        message: impl Into<Cow<'static, str>>,
        fields: impl IntoIterator<Item = Field>,
    ) {
        self.emit(Level::Debug, message, fields);
    }

    /// Log at [`Level::Info`].
    #[track_caller]
    pub fn info(
        &self,
        message: impl Into<Cow<'static, str>>,
        fields: impl IntoIterator<Item = Field>,
    ) {
        self.emit(Level::Info, message, fields);
    }

    /// Log at [`Level::Warn`].
    #[track_caller]
    pub fn warn(
        &self,
        message: impl Into<Cow<'static, str>>,
        fields: impl IntoIterator<Item = Field>,
    ) {
        self.emit(Level::Warn, message, fields);
    }

    /// Log at [`Level::Error`].
    #[track_caller]
    pub fn error(
        &self,
        message: impl Into<Cow<'static, str>>,
        fields: impl IntoIterator<Item = Field>,
    ) {
        self.emit(Level::Error, message, fields);
    }

    /// Log at [`Level::Critical`].
    #[track_caller]
    pub fn critical(
        &self,
        message: impl Into<Cow<'static, str>>,
        fields: impl IntoIterator<Item = Field>,
    ) {
        self.emit(Level::Critical, message, fields);
    }

    /// Log at [`Level::Fatal`].
    ///
    /// This only logs; terminating the process is left to the caller.
    #[track_caller]
    pub fn fatal(
        &self,
        message: impl Into<Cow<'static, str>>,
        fields: impl IntoIterator<Item = Field>,
    ) {
        self.emit(Level::Fatal, message, fields);
    }
}

fn join_component(parent: &Option<Cow<'static, str>>, name: &str) -> Cow<'static, str> {
    match parent.as_deref() {
        Some(parent) if !parent.is_empty() => Cow::Owned(format!("{parent}.{name}")),
        _ => Cow::Owned(name.to_owned()),
    }
}

/// A grouped set of appenders and filters.
///
/// The [`Logger`] dispatches log records to one or more [`Dispatch`] instances.
/// Each [`Dispatch`] instance contains a set of filters and appenders.
///
/// `filters` are used to determine whether a log record should be passed to the appenders.
/// `appends` are used to write log records to a destination.
#[derive(Debug)]
pub(super) struct Dispatch {
    filters: Vec<Box<dyn Filter>>,
    appends: Vec<Box<dyn Append>>,
}

impl Dispatch {
    pub(super) fn new(filters: Vec<Box<dyn Filter>>, appends: Vec<Box<dyn Append>>) -> Self {
        Self { filters, appends }
    }

    fn enabled(&self, metadata: &Metadata) -> bool {
        for filter in &self.filters {
            match filter.enabled(metadata) {
                FilterResult::Reject => return false,
                FilterResult::Accept => return true,
                FilterResult::Neutral => {}
            }
        }

        true
    }

    fn log(&self, record: &Record, trap: &dyn Trap) {
        for filter in &self.filters {
            match filter.matches(record) {
                FilterResult::Reject => return,
                FilterResult::Accept => break,
                FilterResult::Neutral => {}
            }
        }

        // a failing appender must not keep the record from the others
        for append in &self.appends {
            if let Err(err) = append.append(record) {
                trap.trap(&err);
            }
        }
    }

    fn flush(&self, trap: &dyn Trap) {
        for append in &self.appends {
            if let Err(err) = append.flush() {
                trap.trap(&err);
            }
        }
    }
}
