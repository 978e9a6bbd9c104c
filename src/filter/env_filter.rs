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
//! Provides [`env_filter`](https://crates.io/crates/env_filter) based filter for log records.

use std::borrow::Cow;
use std::str::FromStr;

use crate::Error;
use crate::filter::Filter;
use crate::filter::FilterResult;
use crate::record::Level;
use crate::record::Metadata;

/// The default environment variable for filtering logs.
pub const DEFAULT_FILTER_ENV: &str = "SLOG_LOG";

/// A filter consists of one or more comma-separated directives which match on the record's level
/// and component.
///
/// A directive is either a bare level (`warn`), a component (`db`), or both (`db=debug`).
/// Components are matched by prefix, so `db` also covers `db.pool`. The levels `critical`
/// and `fatal` are treated as `error` by the directives.
///
/// The directive syntax is similar to that of [`env_logger`](https://crates.io/crates/env_logger)'s.
/// Read more from [the `env_logger` documentation](https://docs.rs/env_logger/#enabling-logging)
#[derive(Debug)]
pub struct EnvFilter(env_filter::Filter);

impl EnvFilter {
    /// Initializes the filter from the [EnvFilterBuilder].
    pub fn new(mut builder: EnvFilterBuilder) -> Self {
        EnvFilter(builder.0.build())
    }

    /// Initializes the filter from the environment using default variable name `SLOG_LOG`.
    ///
    /// # Examples
    ///
    /// ```
    /// use slogforth::filter::EnvFilter;
    /// let filter = EnvFilter::from_default_env();
    /// ```
    pub fn from_default_env() -> Self {
        EnvFilter::from_env(DEFAULT_FILTER_ENV)
    }

    /// Initializes the filter from the environment using default variable name `SLOG_LOG`.
    /// If the variable is not set, the default value will be used.
    ///
    /// # Examples
    ///
    /// ```
    /// use slogforth::filter::EnvFilter;
    /// let filter = EnvFilter::from_default_env_or("info");
    /// ```
    pub fn from_default_env_or<'a, V>(default: V) -> Self
    where
        V: Into<Cow<'a, str>>,
    {
        EnvFilter::from_env_or(DEFAULT_FILTER_ENV, default)
    }

    /// Initializes the filter from the environment using specific variable name.
    pub fn from_env<'a, E>(name: E) -> Self
    where
        E: Into<Cow<'a, str>>,
    {
        let name = name.into();

        let builder = EnvFilterBuilder::new();
        match std::env::var(&*name) {
            Ok(s) => EnvFilter::new(builder.parse(&s)),
            Err(_) => EnvFilter::new(builder),
        }
    }

    /// Initializes the filter from the environment using specific variable name.
    /// If the variable is not set, the default value will be used.
    pub fn from_env_or<'a, 'b, E, V>(name: E, default: V) -> Self
    where
        E: Into<Cow<'a, str>>,
        V: Into<Cow<'b, str>>,
    {
        let name = name.into();
        let default = default.into();

        let builder = EnvFilterBuilder::new();
        match std::env::var(&*name) {
            Ok(s) => EnvFilter::new(builder.parse(&s)),
            Err(_) => EnvFilter::new(builder.parse(&default)),
        }
    }
}

impl Filter for EnvFilter {
    fn enabled(&self, metadata: &Metadata) -> FilterResult {
        let metadata = log::MetadataBuilder::new()
            .level(to_log_level(metadata.level()))
            .target(metadata.component())
            .build();

        if self.0.enabled(&metadata) {
            FilterResult::Neutral
        } else {
            FilterResult::Reject
        }
    }
}

impl From<Level> for EnvFilter {
    fn from(level: Level) -> Self {
        EnvFilter::new(EnvFilterBuilder::new().filter_level(level))
    }
}

impl<'a> From<&'a str> for EnvFilter {
    fn from(filter: &'a str) -> Self {
        EnvFilter::new(EnvFilterBuilder::new().parse(filter))
    }
}

impl FromStr for EnvFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EnvFilterBuilder::new().try_parse(s).map(EnvFilter::new)
    }
}

/// A builder for the env log filter.
///
/// It can be used to parse a set of directives from a string before building a [EnvFilter]
/// instance.
#[derive(Default, Debug)]
pub struct EnvFilterBuilder(env_filter::Builder);

impl EnvFilterBuilder {
    /// Initializes the filter builder with defaults.
    pub fn new() -> Self {
        EnvFilterBuilder(env_filter::Builder::new())
    }

    /// Try to initialize the filter builder from an environment; return `None` if the environment
    /// variable is not set or invalid.
    pub fn try_from_env(env: &str) -> Option<Self> {
        let config = std::env::var(env).ok()?;
        EnvFilterBuilder::new().try_parse(&config).ok()
    }

    /// Adds a directive to the filter for a specific component.
    pub fn filter_component(mut self, component: &str, level: Level) -> Self {
        self.0.filter_module(component, to_log_level(level).to_level_filter());
        self
    }

    /// Adds a directive to the filter for all components.
    pub fn filter_level(mut self, level: Level) -> Self {
        self.0.filter_level(to_log_level(level).to_level_filter());
        self
    }

    /// Parses the directive string, returning an error if the given directive string is invalid.
    pub fn try_parse(mut self, filters: &str) -> Result<Self, Error> {
        self.0.try_parse(filters).map_err(|err| {
            Error::new("failed to parse filter directives")
                .with_context("directives", filters)
                .with_source(err)
        })?;
        Ok(self)
    }

    /// Parses the directives string, ignoring invalid directives.
    pub fn parse(mut self, filters: &str) -> Self {
        self.0.parse(filters);
        self
    }
}

fn to_log_level(level: Level) -> log::Level {
    match level {
        Level::Debug => log::Level::Debug,
        Level::Info => log::Level::Info,
        Level::Warn => log::Level::Warn,
        Level::Error | Level::Critical | Level::Fatal => log::Level::Error,
    }
}
