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

//! Render fields as indented, human-readable text.
//!
//! Output format:
//!
//! ```text
//! field_name: something or the other
//! some_map:
//!   nested_fields: wowow
//! some slice:
//!   - 1
//!   - foof
//! error:
//!   - msg: wrap2
//!     loc: src/main.rs:43
//!     fun: demo::run
//!   - msg: wrap1
//!     loc: src/main.rs:44
//!     fun: demo::run
//!   - EOF
//! name: wow
//! ```

use std::borrow::Cow;
use std::fmt;
use std::fmt::Write;

use crate::field::Field;
use crate::value::ErrorChain;
use crate::value::Frame;
use crate::value::Scalar;
use crate::value::Value;

/// Text rendered in place of values nested deeper than the depth limit.
pub const MAX_DEPTH_PLACEHOLDER: &str = "<max depth exceeded>";

const DEFAULT_INDENT: usize = 2;
const DEFAULT_MAX_DEPTH: usize = 32;

// sequence items continue two columns right of their marker
const ITEM_MARKER: &str = "- ";
const ITEM_WIDTH: usize = ITEM_MARKER.len();

/// Renders fields and values as indented lines.
///
/// * Scalars render inline as `key: value`; multi-line strings render as `key: |` followed by
///   their lines.
/// * Maps render as `key:` followed by their entries sorted by key, one indentation unit deeper.
/// * Sequences render as `key:` followed by one `- element` line per element.
/// * Lazy values are evaluated and their result rendered in place.
/// * Error chains render one item per wrap frame followed by the root cause.
///
/// Every line ends with `\n`.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
///
/// use slogforth::field;
/// use slogforth::render::Renderer;
///
/// let mut out = String::new();
/// Renderer::default().render_fields(
///     &[
///         field("field_name", "x"),
///         field("some_map", BTreeMap::from([("nested_fields", "wowow")])),
///     ],
///     0,
///     &mut out,
/// );
/// assert_eq!(out, "field_name: x\nsome_map:\n  nested_fields: wowow\n");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    indent: usize,
    max_depth: usize,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

enum Shape<'a> {
    Inline(Cow<'a, str>),
    Multiline(&'a str),
    Nested,
}

fn shape(value: &Value) -> Shape<'_> {
    match value {
        Value::Scalar(Scalar::Str(s)) if s.contains('\n') => Shape::Multiline(s),
        Value::Scalar(Scalar::Str(s)) => Shape::Inline(Cow::Borrowed(s)),
        Value::Scalar(s) => Shape::Inline(Cow::Owned(s.to_string())),
        Value::Map(entries) if entries.is_empty() => Shape::Inline(Cow::Borrowed("{}")),
        Value::Seq(elements) if elements.is_empty() => Shape::Inline(Cow::Borrowed("[]")),
        Value::Error(chain) if chain.frames().is_empty() => match chain.root() {
            root if root.contains('\n') => Shape::Multiline(root),
            root => Shape::Inline(Cow::Borrowed(root)),
        },
        Value::Map(_) | Value::Seq(_) | Value::Error(_) => Shape::Nested,
        // resolved before shaping
        Value::Lazy(_) => Shape::Inline(Cow::Borrowed(MAX_DEPTH_PLACEHOLDER)),
    }
}

// keys stay on one line
fn escape_key(key: &str) -> Cow<'_, str> {
    if key.contains(['\n', '\r']) {
        Cow::Owned(key.replace('\n', "\\n").replace('\r', "\\r"))
    } else {
        Cow::Borrowed(key)
    }
}

fn line(out: &mut String, col: usize, args: fmt::Arguments) {
    out.extend(std::iter::repeat_n(' ', col));
    // SAFETY: write to a string always succeeds
    out.write_fmt(args).unwrap();
    out.push('\n');
}

impl Renderer {
    /// Create a renderer with the default indentation unit (2) and depth limit (32).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of spaces added per nesting level. At least 1.
    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = indent.max(1);
        self
    }

    /// Set how deep values may nest before the rest is replaced by a placeholder.
    ///
    /// Evaluating a lazy value counts as one level.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Render every field in order, starting at column `base`.
    pub fn render_fields(&self, fields: &[Field], base: usize, out: &mut String) {
        for field in fields {
            self.render_field(field.name(), field.value(), base, out);
        }
    }

    /// Render a single named value starting at column `base`.
    pub fn render_field(&self, name: &str, value: &Value, base: usize, out: &mut String) {
        self.entry(name, value, base, 0, out);
    }

    /// Render a value on its own, without a name.
    pub fn render_value(&self, value: &Value) -> String {
        let mut out = String::new();
        match self.resolve(value, 0) {
            None => line(&mut out, 0, format_args!("{MAX_DEPTH_PLACEHOLDER}")),
            Some((value, depth)) => match shape(value) {
                Shape::Inline(text) => line(&mut out, 0, format_args!("{text}")),
                Shape::Multiline(text) => self.text_lines(text, 0, &mut out),
                Shape::Nested => self.nested(value, 0, depth + 1, &mut out),
            },
        }
        out
    }

    // Follow lazy values to the value they produce. `None` once the depth limit is exceeded.
    fn resolve<'a>(&self, mut value: &'a Value, mut depth: usize) -> Option<(&'a Value, usize)> {
        loop {
            if depth > self.max_depth {
                return None;
            }
            match value {
                Value::Lazy(lazy) => {
                    value = lazy.get();
                    depth += 1;
                }
                _ => return Some((value, depth)),
            }
        }
    }

    fn entry(&self, key: &str, value: &Value, col: usize, depth: usize, out: &mut String) {
        let key = escape_key(key);
        let Some((value, depth)) = self.resolve(value, depth) else {
            line(out, col, format_args!("{key}: {MAX_DEPTH_PLACEHOLDER}"));
            return;
        };

        match shape(value) {
            Shape::Inline(text) => line(out, col, format_args!("{key}: {text}")),
            Shape::Multiline(text) => {
                line(out, col, format_args!("{key}: |"));
                self.text_lines(text, col + self.indent, out);
            }
            Shape::Nested => {
                line(out, col, format_args!("{key}:"));
                self.nested(value, col + self.indent, depth + 1, out);
            }
        }
    }

    fn item(&self, value: &Value, col: usize, depth: usize, out: &mut String) {
        let Some((value, depth)) = self.resolve(value, depth) else {
            line(out, col, format_args!("{ITEM_MARKER}{MAX_DEPTH_PLACEHOLDER}"));
            return;
        };

        match shape(value) {
            Shape::Inline(text) => line(out, col, format_args!("{ITEM_MARKER}{text}")),
            Shape::Multiline(text) => {
                line(out, col, format_args!("{ITEM_MARKER}|"));
                self.text_lines(text, col + ITEM_WIDTH + self.indent, out);
            }
            Shape::Nested => {
                // render the element at its content column, then put the marker in front of
                // its first line
                let mut element = String::new();
                self.nested(value, col + ITEM_WIDTH, depth + 1, &mut element);
                element.replace_range(col..col + ITEM_WIDTH, ITEM_MARKER);
                out.push_str(&element);
            }
        }
    }

    fn nested(&self, value: &Value, col: usize, depth: usize, out: &mut String) {
        match value {
            Value::Map(entries) => {
                let mut sorted = entries.iter().collect::<Vec<_>>();
                sorted.sort_by(|(a, _), (b, _)| a.cmp(b));
                for (key, value) in sorted {
                    self.entry(key, value, col, depth, out);
                }
            }
            Value::Seq(elements) => {
                for element in elements {
                    self.item(element, col, depth, out);
                }
            }
            Value::Error(chain) => self.chain(chain, col, out),
            Value::Scalar(_) | Value::Lazy(_) => {}
        }
    }

    fn chain(&self, chain: &ErrorChain, col: usize, out: &mut String) {
        for frame in chain.frames() {
            self.frame(frame, col, out);
        }
        self.labeled_text(ITEM_MARKER, chain.root(), col, out);
    }

    fn frame(&self, frame: &Frame, col: usize, out: &mut String) {
        self.labeled_text("- msg: ", frame.message(), col, out);
        if let Some(location) = frame.location() {
            line(out, col + ITEM_WIDTH, format_args!("loc: {location}"));
        }
        if let Some(function) = frame.function() {
            line(out, col + ITEM_WIDTH, format_args!("fun: {function}"));
        }
    }

    // `label` followed by `text`, or by `|` and the lines of `text` below the item
    fn labeled_text(&self, label: &str, text: &str, col: usize, out: &mut String) {
        if text.contains('\n') {
            line(out, col, format_args!("{label}|"));
            self.text_lines(text, col + ITEM_WIDTH + self.indent, out);
        } else {
            line(out, col, format_args!("{label}{text}"));
        }
    }

    fn text_lines(&self, text: &str, col: usize, out: &mut String) {
        for text in text.split('\n') {
            line(out, col, format_args!("{text}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::collections::HashMap;
    use std::io;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use rand::Rng;
    use rand::distr::Alphanumeric;

    use super::*;
    use crate::field;
    use crate::value::Lazy;

    fn render(fields: &[Field]) -> String {
        let mut out = String::new();
        Renderer::default().render_fields(fields, 0, &mut out);
        out
    }

    #[test]
    fn test_scalar_field_at_base_indentation() {
        assert_eq!(render(&[field("field_name", "x")]), "field_name: x\n");

        let mut out = String::new();
        Renderer::default().render_fields(&[field("field_name", "x")], 4, &mut out);
        assert_eq!(out, "    field_name: x\n");
    }

    #[test]
    fn test_nested_map() {
        let map = HashMap::from([("nested_fields", "wowow")]);
        assert_eq!(
            render(&[field("some_map", map)]),
            "some_map:\n  nested_fields: wowow\n"
        );
    }

    #[test]
    fn test_map_keys_are_sorted() {
        let mut rng = rand::rng();
        for _ in 0..32 {
            let len = rng.random_range(1..16);
            let entries = (0..len)
                .map(|i| {
                    let key = (&mut rng)
                        .sample_iter(&Alphanumeric)
                        .take(8)
                        .map(char::from)
                        .collect::<String>();
                    (key, i)
                })
                .collect::<Vec<_>>();

            let out = Renderer::default().render_value(&Value::map(entries.clone()));
            let rendered = out
                .lines()
                .map(|line| line.split_once(": ").unwrap().0.to_string())
                .collect::<Vec<_>>();

            let mut expected = entries.into_iter().map(|(k, _)| k).collect::<Vec<_>>();
            expected.sort();
            assert_eq!(rendered, expected);
        }
    }

    #[test]
    fn test_field_order_is_preserved() {
        let out = render(&[field("zeta", 1), field("alpha", 2), field("mid", 3)]);
        assert_eq!(out, "zeta: 1\nalpha: 2\nmid: 3\n");
    }

    #[test]
    fn test_sequence() {
        let seq = Value::seq::<Value, _>([1.into(), "foof".into(), "bar".into(), true.into()]);
        assert_eq!(
            render(&[field("some slice", seq)]),
            "some slice:\n  - 1\n  - foof\n  - bar\n  - true\n"
        );
    }

    #[test]
    fn test_compound_sequence_elements() {
        let seq = Value::seq::<Value, _>([
            Value::map([("b", 2), ("a", 1)]),
            Value::seq([3, 4]),
            Value::seq(Vec::<i32>::new()),
        ]);
        assert_eq!(
            render(&[field("items", seq)]),
            "items:\n  - a: 1\n    b: 2\n  - - 3\n    - 4\n  - []\n"
        );
    }

    #[test]
    fn test_empty_collections_and_null() {
        let out = render(&[
            field("map", BTreeMap::<String, i32>::new()),
            field("seq", Vec::<i32>::new()),
            field("none", None::<i32>),
        ]);
        assert_eq!(out, "map: {}\nseq: []\nnone: null\n");
    }

    #[test]
    fn test_multiline_string() {
        let out = render(&[field("query", "SELECT 1\nFROM dual")]);
        assert_eq!(out, "query: |\n  SELECT 1\n  FROM dual\n");
    }

    #[test]
    fn test_lazy_is_rendered_in_place_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let lazy = {
            let calls = calls.clone();
            Lazy::new(move || {
                calls.fetch_add(1, Ordering::SeqCst);
                "wow"
            })
        };
        let fields = [field("name", lazy)];

        assert_eq!(render(&fields), "name: wow\n");
        assert_eq!(render(&fields), "name: wow\n");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_error_chain() {
        let eof = io::Error::new(io::ErrorKind::UnexpectedEof, "EOF");
        let err = crate::wrap!(crate::wrap!(eof, "wrap1"), "wrap2");
        let out = render(&[crate::error(&err)]);

        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "error:");
        assert_eq!(lines.iter().filter(|l| l.contains("- msg: ")).count(), 2);
        assert_eq!(lines[1], "  - msg: wrap2");
        assert!(lines[2].starts_with("    loc: src/render.rs:"));
        assert!(lines[3].starts_with("    fun: "));
        assert!(lines[3].ends_with("test_error_chain"));
        assert_eq!(lines[4], "  - msg: wrap1");
        assert_eq!(lines[7], "  - EOF");
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn test_error_chain_depth() {
        for depth in 0..5 {
            let mut err: Box<dyn std::error::Error + Send + Sync> = io::Error::other("EOF").into();
            for i in 0..depth {
                err = Box::new(crate::wrap!(err, "wrap{i}"));
            }
            let value = Value::error(&*err);
            let out = Renderer::default().render_value(&value);

            let frames = out.lines().filter(|l| l.contains("msg: ")).count();
            let sentinels = out.lines().filter(|l| l.trim() == "- EOF").count();
            assert_eq!(frames, depth);
            if depth == 0 {
                assert_eq!(out, "EOF\n");
            } else {
                assert_eq!(sentinels, 1);
            }
        }
    }

    #[test]
    fn test_unwrapped_error_is_inline() {
        let err = io::Error::other("connection refused");
        assert_eq!(
            render(&[crate::error(&err)]),
            "error: connection refused\n"
        );
    }

    #[test]
    fn test_multiline_error_messages_stay_in_block() {
        let err = crate::wrap!(io::Error::other("line one\nline two"), "wrap1");
        let mut out = String::new();
        Renderer::default().render_fields(&[crate::error(&err)], 2, &mut out);

        let lines = out.lines().collect::<Vec<_>>();
        assert!(lines.iter().all(|l| l.starts_with("  ")), "{out}");
        assert_eq!(lines[0], "  error:");
        assert_eq!(lines[1], "    - msg: wrap1");
        assert_eq!(&lines[4..], ["    - |", "        line one", "        line two"]);

        let err = crate::wrap!(io::Error::other("EOF"), "first\nsecond");
        let out = Renderer::default().render_value(&Value::error(&err));
        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!(&lines[..3], ["- msg: |", "    first", "    second"]);
        assert_eq!(lines.last(), Some(&"- EOF"));
    }

    #[test]
    fn test_multiline_unwrapped_error() {
        let err = io::Error::other("a\nb");
        let mut out = String::new();
        Renderer::default().render_fields(&[crate::error(&err)], 2, &mut out);
        assert_eq!(out, "  error: |\n    a\n    b\n");
    }

    #[test]
    fn test_keys_with_newlines_are_escaped() {
        let mut out = String::new();
        Renderer::default().render_fields(
            &[field("m", Value::map([("k\nx", 1)])), field("a\rb", 2)],
            2,
            &mut out,
        );
        assert_eq!(out, "  m:\n    k\\nx: 1\n  a\\rb: 2\n");
    }

    #[test]
    fn test_depth_guard_on_nested_maps() {
        let mut value = Value::from("bottom");
        for _ in 0..100 {
            value = Value::map([("a", value)]);
        }
        let mut out = String::new();
        Renderer::default()
            .max_depth(3)
            .render_field("a", &value, 0, &mut out);
        assert_eq!(
            out,
            "a:\n  a:\n    a:\n      a:\n        a: <max depth exceeded>\n"
        );
    }

    #[test]
    fn test_depth_guard_on_endless_lazy_values() {
        fn endless(n: usize) -> Value {
            Value::lazy(move || endless(n + 1))
        }

        let mut out = String::new();
        Renderer::default()
            .max_depth(8)
            .render_field("loop", &endless(0), 0, &mut out);
        assert_eq!(out, "loop: <max depth exceeded>\n");
    }

    #[test]
    fn test_custom_indent() {
        let mut out = String::new();
        Renderer::default().indent(4).render_field(
            "outer",
            &Value::map([("inner", Value::seq([Value::map([("k", "v"), ("j", "w")])]))]),
            0,
            &mut out,
        );
        assert_eq!(out, "outer:\n    inner:\n        - j: w\n          k: v\n");
    }
}
