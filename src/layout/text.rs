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

use std::fmt::Write;

#[cfg(feature = "colored")]
use colored::Color;
#[cfg(feature = "colored")]
use colored::Colorize;
use jiff::Timestamp;
use jiff::tz::TimeZone;

use crate::Error;
use crate::layout::Layout;
use crate::record::Level;
use crate::record::Record;
use crate::render::Renderer;
use crate::value::Value;

/// A layout that formats a record as a header line followed by its indented fields.
///
/// Output format:
///
/// ```text
/// Sep 06 14:04:33.028 [INFO]: my message here
///   field_name: something or the other
///   some_map:
///     nested_fields: wowow
///   name: wow
/// ```
///
/// The component of a record, if any, is the first line of the field block:
///
/// ```text
/// Sep 06 14:04:33.028 [INFO]: my message here
///   component: test
///   field_name: something or the other
/// ```
///
/// With the `colored` feature, which is enabled by default, log levels are colored. Call
/// [`no_color`](TextLayout::no_color) to disable coloring.
///
/// You can customize the timezone of the timestamp with [`timezone`](TextLayout::timezone).
/// Otherwise, the system timezone is used.
///
/// # Examples
///
/// ```
/// use slogforth::layout::TextLayout;
///
/// let layout = TextLayout::default().no_color().indent(4);
/// ```
#[derive(Debug, Clone)]
pub struct TextLayout {
    #[cfg(feature = "colored")]
    colors: LevelColor,
    no_color: bool,
    timezone: TimeZone,
    timestamp_format: Option<fn(Timestamp, &TimeZone) -> String>,
    indent: usize,
    renderer: Renderer,
}

impl Default for TextLayout {
    fn default() -> Self {
        Self {
            #[cfg(feature = "colored")]
            colors: LevelColor::default(),
            no_color: false,
            timezone: TimeZone::system(),
            timestamp_format: None,
            indent: 2,
            renderer: Renderer::default(),
        }
    }
}

impl TextLayout {
    /// Disable colored output.
    pub fn no_color(mut self) -> Self {
        self.no_color = true;
        self
    }

    /// Customize the color of a log level.
    ///
    /// No effect if `no_color` is set.
    ///
    /// # Examples
    ///
    /// ```
    /// use colored::Color;
    /// use slogforth::layout::TextLayout;
    /// use slogforth::record::Level;
    ///
    /// let layout = TextLayout::default().level_color(Level::Info, Color::Cyan);
    /// ```
    #[cfg(feature = "colored")]
    pub fn level_color(mut self, level: Level, color: Color) -> Self {
        self.colors.set(level, color);
        self
    }

    /// Set the timezone for timestamps.
    ///
    /// Defaults to the system timezone if not set.
    ///
    /// # Examples
    ///
    /// ```
    /// use jiff::tz::TimeZone;
    /// use slogforth::layout::TextLayout;
    ///
    /// let layout = TextLayout::default().timezone(TimeZone::UTC);
    /// ```
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.timezone = tz;
        self
    }

    /// Set a user-defined timestamp format function.
    ///
    /// Default to `%b %d %H:%M:%S%.3f`, such as `Sep 06 14:04:33.028`.
    ///
    /// # Examples
    ///
    /// ```
    /// use jiff::Timestamp;
    /// use jiff::tz::TimeZone;
    /// use slogforth::layout::TextLayout;
    ///
    /// let layout = TextLayout::default()
    ///     .timestamp_format(|ts, tz| format!("{:.6}", ts.display_with_offset(tz.to_offset(ts))));
    /// ```
    pub fn timestamp_format(mut self, format: fn(Timestamp, &TimeZone) -> String) -> Self {
        self.timestamp_format = Some(format);
        self
    }

    /// Set the number of spaces per nesting level of fields, including the indentation of the
    /// field block under the header. Default to 2.
    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = indent.max(1);
        self.renderer = self.renderer.indent(indent);
        self
    }

    /// Set how deep field values may nest before they are cut off. Default to 32.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.renderer = self.renderer.max_depth(max_depth);
        self
    }

    fn format_level(&self, level: Level) -> String {
        #[cfg(feature = "colored")]
        if !self.no_color {
            return level.as_str().color(self.colors.get(level)).to_string();
        }

        level.as_str().to_string()
    }
}

fn default_timestamp_format(ts: Timestamp, tz: &TimeZone) -> String {
    ts.to_zoned(tz.clone())
        .strftime("%b %d %H:%M:%S%.3f")
        .to_string()
}

impl Layout for TextLayout {
    fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        // a time out of jiff's range only comes from a broken clock
        let ts = Timestamp::try_from(record.time()).unwrap_or(Timestamp::UNIX_EPOCH);
        let mut text = match self.timestamp_format {
            Some(format) => format(ts, &self.timezone),
            None => default_timestamp_format(ts, &self.timezone),
        };

        let level = self.format_level(record.level());
        let message = record.message();
        // SAFETY: write to a string always succeeds
        write!(&mut text, " [{level}]: {message}").unwrap();

        let mut block = String::new();
        if let Some(component) = record.component() {
            let component = Value::display(component);
            self.renderer
                .render_field("component", &component, self.indent, &mut block);
        }
        self.renderer
            .render_fields(record.fields(), self.indent, &mut block);
        if !block.is_empty() {
            // drop the newline ending the last field
            block.pop();
            text.push('\n');
            text.push_str(&block);
        }

        Ok(text.into_bytes())
    }
}

/// Colors for different log levels.
#[cfg(feature = "colored")]
#[derive(Debug, Clone)]
struct LevelColor {
    debug: Color,
    info: Color,
    warn: Color,
    error: Color,
    critical: Color,
    fatal: Color,
}

#[cfg(feature = "colored")]
impl Default for LevelColor {
    fn default() -> Self {
        Self {
            debug: Color::Blue,
            info: Color::Green,
            warn: Color::Yellow,
            error: Color::Red,
            critical: Color::BrightRed,
            fatal: Color::Magenta,
        }
    }
}

#[cfg(feature = "colored")]
impl LevelColor {
    fn get(&self, level: Level) -> Color {
        match level {
            Level::Debug => self.debug,
            Level::Info => self.info,
            Level::Warn => self.warn,
            Level::Error => self.error,
            Level::Critical => self.critical,
            Level::Fatal => self.fatal,
        }
    }

    fn set(&mut self, level: Level, color: Color) {
        let slot = match level {
            Level::Debug => &mut self.debug,
            Level::Info => &mut self.info,
            Level::Warn => &mut self.warn,
            Level::Error => &mut self.error,
            Level::Critical => &mut self.critical,
            Level::Fatal => &mut self.fatal,
        };
        *slot = color;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::time::Duration;
    use std::time::SystemTime;

    use super::*;
    use crate::component;
    use crate::field;
    use crate::lazy;

    fn layout() -> TextLayout {
        TextLayout::default()
            .no_color()
            .timestamp_format(|_, _| "TIME".to_string())
    }

    fn format(layout: &TextLayout, record: &Record) -> String {
        String::from_utf8(layout.format(record).unwrap()).unwrap()
    }

    #[test]
    fn test_header_only() {
        let record = Record::builder()
            .level(Level::Warn)
            .message("disk almost full")
            .build();
        assert_eq!(format(&layout(), &record), "TIME [WARN]: disk almost full");
    }

    #[test]
    fn test_full_record() {
        let record = Record::builder()
            .message("my message here")
            .fields([
                field("field_name", "something or the other"),
                field("some_map", BTreeMap::from([("nested_fields", "wowow")])),
                field(
                    "some slice",
                    Value::seq::<Value, _>([1.into(), "foof".into(), "bar".into(), true.into()]),
                ),
                component("test"),
                lazy("name", || "wow"),
            ])
            .build();

        insta::assert_snapshot!(format(&layout(), &record), @r"
        TIME [INFO]: my message here
          component: test
          field_name: something or the other
          some_map:
            nested_fields: wowow
          some slice:
            - 1
            - foof
            - bar
            - true
          name: wow
        ");
    }

    #[test]
    fn test_component_keeps_header_shape() {
        let record = Record::builder()
            .message("my message here")
            .fields([component("test")])
            .build();
        assert_eq!(
            format(&layout(), &record),
            "TIME [INFO]: my message here\n  component: test"
        );
    }

    #[test]
    fn test_indent() {
        let record = Record::builder()
            .message("m")
            .fields([field("outer", Value::map([("inner", 1)]))])
            .build();
        assert_eq!(
            format(&layout().indent(4), &record),
            "TIME [INFO]: m\n    outer:\n        inner: 1"
        );
    }

    #[test]
    fn test_default_timestamp_format() {
        let time = SystemTime::UNIX_EPOCH + Duration::from_millis(1_567_778_673_028);
        let record = Record::builder().time(time).message("m").build();
        let layout = TextLayout::default().no_color().timezone(TimeZone::UTC);
        assert_eq!(format(&layout, &record), "Sep 06 14:04:33.028 [INFO]: m");
    }
}
