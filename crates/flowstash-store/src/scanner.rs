// ABOUTME: Pull-based line iterator that reads its source in small fixed-size chunks.
// ABOUTME: Keeps only unconsumed bytes buffered so header scans never load a whole file.

use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::path::Path;

/// Chunk size used when only the header block is needed.
pub const HEADER_CHUNK_SIZE: usize = 10;

/// Chunk size used when scanning past the header to collect the body.
pub const BODY_CHUNK_SIZE: usize = 50;

/// Yields complete lines (each including its trailing `\n`) from a reader,
/// pulling one chunk at a time only when no complete line is buffered.
///
/// A final line without a terminator is never yielded; it stays in the
/// pending buffer and is returned by [`LineScanner::into_remainder`].
pub struct LineScanner<R> {
    reader: R,
    chunk: Vec<u8>,
    pending: Vec<u8>,
    exhausted: bool,
}

impl LineScanner<File> {
    /// Open a file for chunked line scanning.
    pub fn open(path: &Path, chunk_size: usize) -> io::Result<Self> {
        Ok(Self::new(File::open(path)?, chunk_size))
    }
}

impl<R: Read> LineScanner<R> {
    pub fn new(reader: R, chunk_size: usize) -> Self {
        Self {
            reader,
            chunk: vec![0; chunk_size.max(1)],
            pending: Vec::new(),
            exhausted: false,
        }
    }

    /// Consume the scanner, returning every byte not yet yielded as a line:
    /// the buffered remainder followed by the unread rest of the source.
    pub fn into_remainder(mut self) -> io::Result<Vec<u8>> {
        let mut rest = self.pending;
        if !self.exhausted {
            self.reader.read_to_end(&mut rest)?;
        }
        Ok(rest)
    }

    fn take_line(&mut self) -> Option<Vec<u8>> {
        let idx = self.pending.iter().position(|b| *b == b'\n')?;
        let rest = self.pending.split_off(idx + 1);
        Some(std::mem::replace(&mut self.pending, rest))
    }

    /// Read one chunk into the pending buffer. Returns false at end of input.
    fn fill(&mut self) -> io::Result<bool> {
        loop {
            match self.reader.read(&mut self.chunk) {
                Ok(0) => {
                    self.exhausted = true;
                    return Ok(false);
                }
                Ok(n) => {
                    self.pending.extend_from_slice(&self.chunk[..n]);
                    return Ok(true);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

impl<R: Read> Iterator for LineScanner<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(line) = self.take_line() {
                return Some(Ok(line));
            }
            if self.exhausted {
                return None;
            }
            match self.fill() {
                Ok(_) => {}
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
