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

//! Slogforth is a structured logging library: log calls carry a level, a message and typed
//! fields, and every configured appender renders them as a header line followed by an indented
//! block of fields.
//!
//! # Overview
//!
//! A [`Logger`] holds one or more dispatches, each with its own filters and appenders. Field
//! values may be scalars, maps, sequences, values computed lazily at render time, or errors
//! rendered with the chain of their causes. A record that no dispatch accepts is never rendered.
//!
//! # Examples
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use slogforth::append;
//! use slogforth::field;
//! use slogforth::lazy;
//! use slogforth::record::Level;
//!
//! let logger = slogforth::builder()
//!     .dispatch(|d| d.filter(Level::Info).append(append::Stderr::default()))
//!     .build();
//!
//! logger.info(
//!     "my message here",
//!     [
//!         field("field_name", "something or the other"),
//!         field("some_map", BTreeMap::from([("nested_fields", "wowow")])),
//!         lazy("name", || "wow"),
//!     ],
//! );
//! ```
//!
//! Output:
//!
//! ```text
//! Sep 06 14:04:33.028 [INFO]: my message here
//!   field_name: something or the other
//!   some_map:
//!     nested_fields: wowow
//!   name: wow
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod append;
pub mod bridge;
pub mod filter;
pub mod layout;
pub mod record;
pub mod render;
pub mod trap;
pub mod value;

mod error;
mod field;
mod logger;

pub use self::append::Append;
pub use self::error::Error;
pub use self::field::Field;
pub use self::field::component;
pub use self::field::error;
pub use self::field::field;
pub use self::field::lazy;
pub use self::filter::Filter;
pub use self::layout::Layout;
pub use self::logger::DispatchBuilder;
pub use self::logger::Logger;
pub use self::logger::LoggerBuilder;
pub use self::logger::builder;
pub use self::record::Level;
pub use self::record::Record;
pub use self::trap::Trap;
pub use self::value::Value;
