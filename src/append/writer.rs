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

use std::fmt;
use std::io::Write;
use std::sync::Mutex;
use std::sync::PoisonError;

use crate::Error;
use crate::Layout;
use crate::append::Append;
use crate::layout::TextLayout;
use crate::record::Record;

/// An appender that writes log records to any [`Write`] destination, such as a file or a socket.
///
/// Writes are serialized through a mutex, one record per write.
///
/// # Examples
///
/// ```
/// use slogforth::append::Writer;
///
/// let appender = Writer::new(std::io::sink());
/// ```
pub struct Writer {
    writer: Mutex<Box<dyn Write + Send>>,
    layout: Box<dyn Layout>,
}

impl fmt::Debug for Writer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Writer")
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

impl Writer {
    /// Create a new appender writing to `writer` with a [`TextLayout`] without colors.
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            layout: Box::new(TextLayout::default().no_color()),
        }
    }

    /// Set the layout for the [`Writer`] appender.
    pub fn with_layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        self.layout = layout.into();
        self
    }
}

impl Append for Writer {
    fn append(&self, record: &Record) -> Result<(), Error> {
        let mut bytes = self.layout.format(record)?;
        bytes.push(b'\n');

        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_all(&bytes).map_err(Error::from_io_error)
    }

    fn flush(&self) -> Result<(), Error> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.flush().map_err(Error::from_io_error)
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Arc;

    use super::*;
    use crate::field;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::ErrorKind::BrokenPipe.into())
        }
    }

    #[test]
    fn test_writes_one_line_block_per_record() {
        let buf = SharedBuf::default();
        let appender = Writer::new(buf.clone()).with_layout(
            TextLayout::default()
                .no_color()
                .timestamp_format(|_, _| "TIME".to_string()),
        );

        for i in 0..2 {
            let record = Record::builder()
                .message("tick")
                .fields([field("i", i)])
                .build();
            appender.append(&record).unwrap();
        }
        appender.flush().unwrap();

        let text = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert_eq!(text, "TIME [INFO]: tick\n  i: 0\nTIME [INFO]: tick\n  i: 1\n");
    }

    #[test]
    fn test_write_failure_is_reported() {
        let appender = Writer::new(BrokenPipe);
        let err = appender.append(&Record::builder().build()).unwrap_err();
        assert_eq!(err.message(), "failed to write log record");
        assert!(appender.flush().is_err());
    }
}
