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

//! Bridge to the [`log`] crate.
//!
//! A [`Logger`] implements [`log::Log`]: the target of a `log` record becomes its component
//! (unless the logger is already named) and its key-values become fields.

use std::borrow::Cow;
use std::sync::OnceLock;

use crate::Logger;
use crate::field::Field;
use crate::record::Level;
use crate::record::Metadata;
use crate::value::Value;

fn from_log_level(level: log::Level) -> Level {
    match level {
        log::Level::Error => Level::Error,
        log::Level::Warn => Level::Warn,
        log::Level::Info => Level::Info,
        log::Level::Debug | log::Level::Trace => Level::Debug,
    }
}

fn from_log_value(value: &log::kv::Value) -> Value {
    if let Some(v) = value.to_bool() {
        Value::from(v)
    } else if let Some(v) = value.to_i64() {
        Value::from(v)
    } else if let Some(v) = value.to_u64() {
        Value::from(v)
    } else if let Some(v) = value.to_f64() {
        Value::from(v)
    } else if let Some(v) = value.to_borrowed_str() {
        Value::from(v.to_owned())
    } else {
        Value::display(value)
    }
}

struct FieldVisitor {
    fields: Vec<Field>,
}

impl<'kvs> log::kv::VisitSource<'kvs> for FieldVisitor {
    fn visit_pair(
        &mut self,
        key: log::kv::Key<'kvs>,
        value: log::kv::Value<'kvs>,
    ) -> Result<(), log::kv::Error> {
        self.fields
            .push(Field::new(key.as_str().to_owned(), from_log_value(&value)));
        Ok(())
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        let level = from_log_level(metadata.level());
        let component = self.component().unwrap_or(metadata.target());
        self.enabled_for(&Metadata::new(level, component))
    }

    fn log(&self, record: &log::Record) {
        let mut visitor = FieldVisitor { fields: vec![] };
        // the visitor itself never fails
        let _ = record.key_values().visit(&mut visitor);

        let mut builder = self
            .record_builder(from_log_level(record.level()))
            .message(record.args().to_string())
            .file(record.file().map(|file| Cow::Owned(file.to_owned())))
            .line(record.line())
            .fields(visitor.fields);
        if self.component().is_none() && !record.target().is_empty() {
            builder = builder.component(Some(Cow::Owned(record.target().to_owned())));
        }

        Logger::log(self, &builder.build());
    }

    fn flush(&self) {
        Logger::flush(self);
    }
}

static LOGGER: OnceLock<Logger> = OnceLock::new();

struct LogCrateProxy;

impl log::Log for LogCrateProxy {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        match LOGGER.get() {
            Some(logger) => log::Log::enabled(logger, metadata),
            None => false,
        }
    }

    fn log(&self, record: &log::Record) {
        if let Some(logger) = LOGGER.get() {
            log::Log::log(logger, record);
        }
    }

    fn flush(&self) {
        if let Some(logger) = LOGGER.get() {
            log::Log::flush(logger);
        }
    }
}

/// Set up the log crate global logger.
///
/// This function calls [`log::set_logger`] to install a proxy, and all logs from the log crate
/// will be forwarded to `logger`.
///
/// This function will set the global maximum log level to `Trace`. To override this, call
/// [`log::set_max_level`] after this function.
///
/// # Errors
///
/// Return an error if the log crate global logger has already been set.
///
/// # Examples
///
/// ```
/// use slogforth::append;
///
/// let logger = slogforth::builder()
///     .dispatch(|d| d.append(append::Stderr::default()))
///     .build();
/// if slogforth::bridge::log::try_setup_log_crate(logger).is_err() {
///     eprintln!("failed to set up the log crate");
/// }
/// ```
pub fn try_setup_log_crate(logger: Logger) -> Result<(), log::SetLoggerError> {
    static PROXY: LogCrateProxy = LogCrateProxy;
    log::set_logger(&PROXY)?;
    // set_logger succeeds only once, so the cell is still empty here
    let _ = LOGGER.set(logger);
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Set up the log crate global logger.
///
/// See [`try_setup_log_crate`].
///
/// # Panics
///
/// Panic if the log crate global logger has already been set.
pub fn setup_log_crate(logger: Logger) {
    try_setup_log_crate(logger).expect(
        "setup_log_crate must be called before the log crate global logger initialized",
    )
}
