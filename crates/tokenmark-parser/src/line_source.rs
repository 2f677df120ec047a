//! Line-at-a-time input for the tokenizer.
//!
//! Lines are produced without their terminator. A document ending in a
//! newline yields a final empty line, so joining all lines with `\n`
//! reproduces the input.

use std::io::{self, BufRead};

pub trait LineSource {
    /// Next line without its `\n` or `\r\n` terminator, or `None` once the
    /// input is exhausted.
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

fn strip_carriage_return(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

/// Lines of an in-memory document.
#[derive(Debug, Clone)]
pub struct StrLineSource<'a> {
    remaining: Option<&'a str>,
}

impl<'a> StrLineSource<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            remaining: Some(input),
        }
    }
}

impl LineSource for StrLineSource<'_> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let Some(rest) = self.remaining else {
            return Ok(None);
        };
        let line = match rest.find('\n') {
            Some(idx) => {
                self.remaining = Some(&rest[idx + 1..]);
                &rest[..idx]
            }
            None => {
                self.remaining = None;
                rest
            }
        };
        Ok(Some(strip_carriage_return(line).to_string()))
    }
}

/// Lines read lazily from any buffered reader.
#[derive(Debug)]
pub struct ReaderLineSource<R> {
    reader: R,
    buf: String,
    started: bool,
    trailing_newline: bool,
    done: bool,
}

impl<R: BufRead> ReaderLineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            started: false,
            trailing_newline: false,
            done: false,
        }
    }
}

impl<R: BufRead> LineSource for ReaderLineSource<R> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        if self.done {
            return Ok(None);
        }
        self.buf.clear();
        if self.reader.read_line(&mut self.buf)? == 0 {
            self.done = true;
            if !self.started || self.trailing_newline {
                self.started = true;
                return Ok(Some(String::new()));
            }
            return Ok(None);
        }
        self.started = true;
        let line = match self.buf.strip_suffix('\n') {
            Some(line) => {
                self.trailing_newline = true;
                line
            }
            None => {
                self.trailing_newline = false;
                self.buf.as_str()
            }
        };
        Ok(Some(strip_carriage_return(line).to_string()))
    }
}
