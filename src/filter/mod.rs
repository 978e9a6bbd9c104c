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
//! Filters for log records.
//!
//! Every filter of a dispatch is asked in order; the first result that is not
//! [`FilterResult::Neutral`] decides whether the record reaches the dispatch's appenders.

use std::fmt;

use crate::record::Level;
use crate::record::LevelFilter;
use crate::record::Metadata;
use crate::record::Record;

mod custom;
pub mod env_filter;

pub use self::custom::CustomFilter;
pub use self::env_filter::EnvFilter;

/// The result of a filter check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterResult {
    /// The record will be processed without further filtering.
    Accept,
    /// The record should not be processed.
    Reject,
    /// No decision could be made, further filtering should occur.
    Neutral,
}

/// A filter that can be applied to log records.
pub trait Filter: fmt::Debug + Send + Sync + 'static {
    /// Whether a record with the given metadata may be logged.
    ///
    /// Called before the record is built, so it must not depend on fields.
    fn enabled(&self, metadata: &Metadata) -> FilterResult;

    /// Whether the record should be logged.
    fn matches(&self, record: &Record) -> FilterResult {
        self.enabled(&record.metadata())
    }
}

impl<T: Filter> From<T> for Box<dyn Filter> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}

impl Filter for LevelFilter {
    fn enabled(&self, metadata: &Metadata) -> FilterResult {
        if self.test(metadata.level()) {
            FilterResult::Neutral
        } else {
            FilterResult::Reject
        }
    }
}

/// A level is a threshold: records at least as severe pass.
impl Filter for Level {
    fn enabled(&self, metadata: &Metadata) -> FilterResult {
        LevelFilter::MoreSevereEqual(*self).enabled(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_threshold() {
        let filter = Level::Warn;
        assert_eq!(
            filter.enabled(&Metadata::new(Level::Info, "")),
            FilterResult::Reject
        );
        assert_eq!(
            filter.enabled(&Metadata::new(Level::Warn, "")),
            FilterResult::Neutral
        );
        assert_eq!(
            filter.enabled(&Metadata::new(Level::Fatal, "db")),
            FilterResult::Neutral
        );
    }

    #[test]
    fn test_level_filter_variants() {
        let meta = Metadata::new(Level::Error, "");
        assert_eq!(LevelFilter::Off.enabled(&meta), FilterResult::Reject);
        assert_eq!(LevelFilter::All.enabled(&meta), FilterResult::Neutral);
        assert_eq!(
            LevelFilter::Equal(Level::Error).enabled(&meta),
            FilterResult::Neutral
        );
        assert_eq!(
            LevelFilter::LessSevere(Level::Error).enabled(&meta),
            FilterResult::Reject
        );
    }
}
