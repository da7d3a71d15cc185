//! A line-oriented reader for delimited text tables.
//!
//! [`TabReader`] drives the iteration and a [`TabHandler`] decides what to do with
//! each line. The first line of a source is always consumed as the header line and
//! is never delivered as a record.
use std::{
    fs,
    io::{self, BufRead, BufReader},
    path::Path,
};

use indexmap::IndexMap;
use log::trace;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TabReaderError {
    #[error("Encountered an IO error: {0}")]
    IOError(
        #[from]
        #[source]
        io::Error,
    ),
    #[error("No column named {0:?}")]
    HeaderNotFound(String),
}

/// Callbacks invoked by [`TabReader`] as it works through a source.
///
/// All methods have do-nothing defaults so a handler only needs to implement the
/// ones it cares about.
pub trait TabHandler {
    /// Whether the first line should be split and passed to [`TabHandler::on_headers`]
    fn wants_headers(&self) -> bool {
        false
    }

    /// Lines starting with this character are skipped, unless the reader overrides it
    fn comment_char(&self) -> char {
        '#'
    }

    fn on_open(&mut self) {}

    fn on_headers(&mut self, headers: Vec<String>) {
        let _ = headers;
    }

    /// Called with each data line before it is split. Returning `false` stops processing.
    fn on_line(&mut self, line: &str) -> bool {
        let _ = line;
        true
    }

    /// Called with the fields of each data line. Returning `false` stops processing.
    fn on_record(&mut self, fields: Vec<String>) -> bool {
        let _ = fields;
        true
    }

    /// Called once when processing of an opened source ends, however it ends
    fn on_close(&mut self) {}
}

impl<T: TabHandler + ?Sized> TabHandler for &mut T {
    fn wants_headers(&self) -> bool {
        (**self).wants_headers()
    }

    fn comment_char(&self) -> char {
        (**self).comment_char()
    }

    fn on_open(&mut self) {
        (**self).on_open()
    }

    fn on_headers(&mut self, headers: Vec<String>) {
        (**self).on_headers(headers)
    }

    fn on_line(&mut self, line: &str) -> bool {
        (**self).on_line(line)
    }

    fn on_record(&mut self, fields: Vec<String>) -> bool {
        (**self).on_record(fields)
    }

    fn on_close(&mut self) {
        (**self).on_close()
    }
}

/// Split `line` on `delimiter`, treating a run of delimiters as one and dropping
/// empty fields
pub fn split_fields(line: &str, delimiter: char) -> Vec<String> {
    line.split(delimiter)
        .filter(|field| !field.is_empty())
        .map(|field| field.to_string())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabReader {
    pub delimiter: char,
    pub comment_char: Option<char>,
}

impl Default for TabReader {
    fn default() -> Self {
        Self {
            delimiter: '\t',
            comment_char: None,
        }
    }
}

impl TabReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Use `comment_char` instead of the handler's comment character
    pub fn with_comment_char(mut self, comment_char: char) -> Self {
        self.comment_char = Some(comment_char);
        self
    }

    /// Open the file at `path` and feed it to `handler`.
    ///
    /// A file that cannot be opened is an error and the handler is not notified.
    pub fn process_path<P: AsRef<Path>, H: TabHandler>(
        &self,
        path: P,
        handler: H,
    ) -> Result<(), TabReaderError> {
        let path = path.as_ref();
        let handle = fs::File::open(path)?;
        trace!("Opened {} for reading", path.display());
        self.process(BufReader::new(handle), handler)
    }

    /// Feed every line of `reader` to `handler`
    pub fn process<R: BufRead, H: TabHandler>(
        &self,
        mut reader: R,
        mut handler: H,
    ) -> Result<(), TabReaderError> {
        handler.on_open();
        let result = self.dispatch(&mut reader, &mut handler);
        handler.on_close();
        result
    }

    fn dispatch<R: BufRead, H: TabHandler>(
        &self,
        reader: &mut R,
        handler: &mut H,
    ) -> Result<(), TabReaderError> {
        let comment_char = self.comment_char.unwrap_or_else(|| handler.comment_char());
        let mut buffer = String::new();
        let mut line_number: usize = 0;

        loop {
            buffer.clear();
            let b = reader.read_line(&mut buffer)?;
            if b == 0 {
                break;
            }
            line_number += 1;

            let line = buffer.trim_end_matches('\n').trim_end_matches('\r');

            if line_number == 1 {
                if handler.wants_headers() {
                    handler.on_headers(split_fields(line, self.delimiter));
                }
                continue;
            }

            if line.starts_with(comment_char) {
                trace!("Skipping comment on line {line_number}");
                continue;
            }

            trace!("Dispatching line {line_number}");
            if !handler.on_line(line) {
                break;
            }
            if !handler.on_record(split_fields(line, self.delimiter)) {
                break;
            }
        }
        Ok(())
    }
}

/// A [`TabHandler`] that keeps every record and, optionally, the header names
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DefaultTabHandler {
    read_headers: bool,
    headers: IndexMap<String, usize>,
    records: Vec<Vec<String>>,
}

impl DefaultTabHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_headers() -> Self {
        Self {
            read_headers: true,
            ..Default::default()
        }
    }

    /// The column position of `name`. When a name repeats, the first column wins.
    pub fn header_index(&self, name: &str) -> Result<usize, TabReaderError> {
        self.headers
            .get(name)
            .copied()
            .ok_or_else(|| TabReaderError::HeaderNotFound(name.to_string()))
    }

    pub fn header_name(&self, index: usize) -> Option<&str> {
        self.headers
            .iter()
            .find(|(_, i)| **i == index)
            .map(|(name, _)| name.as_str())
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.headers.keys().map(|k| k.as_str())
    }

    pub fn records(&self) -> &[Vec<String>] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Vec<String>> {
        self.records
    }
}

impl TabHandler for DefaultTabHandler {
    fn wants_headers(&self) -> bool {
        self.read_headers
    }

    fn on_open(&mut self) {
        self.headers.clear();
        self.records.clear();
    }

    fn on_headers(&mut self, headers: Vec<String>) {
        for (i, name) in headers.into_iter().enumerate() {
            self.headers.entry(name).or_insert(i);
        }
    }

    fn on_record(&mut self, fields: Vec<String>) -> bool {
        self.records.push(fields);
        true
    }
}
