//! Chunked input buffer for the lexer
//!
//! The lexer never holds the whole file in memory. It scans a reusable buffer
//! that is filled one chunk at a time; when a token in progress reaches the
//! end of the loaded bytes, [`ScanBuffer::refill`] moves the unconsumed part
//! of the token to the front and reads more input behind it, so no token is
//! cut at a chunk boundary.

use std::io::{self, ErrorKind, Read};

pub struct ScanBuffer<R> {
    reader: R,
    data: Vec<u8>,
    len: usize,
    chunk_size: usize,
    exhausted: bool,
}

impl<R: Read> ScanBuffer<R> {
    /// Creates an empty buffer; nothing is read until the first refill.
    pub fn new(reader: R, chunk_size: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        ScanBuffer {
            reader,
            data: vec![0; chunk_size],
            len: 0,
            chunk_size,
            exhausted: false,
        }
    }

    /// Number of loaded bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the reader has reported end of stream.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn byte(&self, pos: usize) -> u8 {
        self.data[pos]
    }

    pub fn slice(&self, start: usize, end: usize) -> &[u8] {
        &self.data[start..end]
    }

    /// Keeps the bytes from `keep_from` onward, moves them to the front and
    /// reads more input after them.
    ///
    /// Returns how far the kept bytes moved; callers subtract it from every
    /// position they hold. When the kept bytes already fill the buffer, it
    /// grows by one chunk.
    pub fn refill(&mut self, keep_from: usize) -> io::Result<usize> {
        let keep_from = keep_from.min(self.len);
        self.data.copy_within(keep_from..self.len, 0);
        self.len -= keep_from;

        if self.len == self.data.len() {
            self.data.resize(self.data.len() + self.chunk_size, 0);
        }

        loop {
            match self.reader.read(&mut self.data[self.len..]) {
                Ok(0) => {
                    self.exhausted = true;
                    break;
                }
                Ok(n) => {
                    self.len += n;
                    break;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(keep_from)
    }
}
