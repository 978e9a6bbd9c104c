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
use crate::trap::Trap;

/// Reports a record that an appender could not write as one line on standard error.
///
/// The record itself is lost; only the appender's error is reported. Failures to write the
/// report are ignored.
#[derive(Debug, Default)]
#[non_exhaustive]
pub struct DefaultTrap {}

fn report(mut w: impl Write, err: &Error) {
    let _ = writeln!(w, "slogforth: dropped a log record: {err}");
}

impl Trap for DefaultTrap {
    fn trap(&self, err: &Error) {
        report(io::stderr().lock(), err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_is_one_line() {
        let err = Error::new("failed to write log record").with_context("sink", "stderr");
        let mut out = vec![];
        report(&mut out, &err);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "slogforth: dropped a log record: failed to write log record (sink=stderr)\n"
        );
    }
}
