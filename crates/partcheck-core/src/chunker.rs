//! Splits a local byte stream into the same fixed-size windows the object
//! store used for the multipart upload.
//!
//! Every window is `part_size` bytes except the last, which holds the
//! remainder. A stream whose length is an exact multiple of `part_size` ends
//! on a boundary with no empty trailing window; an empty stream yields no
//! windows at all.

use std::io::{self, ErrorKind, Read};
use std::num::NonZeroU64;

/// Default read buffer; windows are streamed through it in slices.
pub const DEFAULT_BUF_SIZE: usize = 64 * 1024;

/// Position of the chunker in the stream: byte offset of the next window and
/// its 1-based part index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkCursor {
    pub offset: u64,
    pub next_index: u32,
}

impl Default for ChunkCursor {
    fn default() -> Self {
        Self {
            offset: 0,
            next_index: 1,
        }
    }
}

/// One completed window: byte range `[offset, offset + len)` of part `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkWindow {
    pub index: u32,
    pub offset: u64,
    pub len: u64,
}

impl ChunkWindow {
    /// Offset one past the last byte of this window.
    pub fn end(&self) -> u64 {
        self.offset + self.len
    }
}

/// Single-pass chunker over a reader.
pub struct Chunker<R> {
    reader: R,
    part_size: NonZeroU64,
    cursor: ChunkCursor,
    buf: Vec<u8>,
    exhausted: bool,
}

impl<R: Read> Chunker<R> {
    pub fn new(reader: R, part_size: NonZeroU64) -> Self {
        Self::with_buffer_size(reader, part_size, DEFAULT_BUF_SIZE)
    }

    /// Like [`Chunker::new`] with an explicit read buffer size. The buffer
    /// never exceeds one part and is at least one byte.
    pub fn with_buffer_size(reader: R, part_size: NonZeroU64, buf_size: usize) -> Self {
        let cap = usize::try_from(part_size.get()).unwrap_or(usize::MAX);
        let len = buf_size.clamp(1, cap.max(1));
        Self {
            reader,
            part_size,
            cursor: ChunkCursor::default(),
            buf: vec![0u8; len],
            exhausted: false,
        }
    }

    pub fn part_size(&self) -> NonZeroU64 {
        self.part_size
    }

    pub fn cursor(&self) -> ChunkCursor {
        self.cursor
    }

    /// Read the next window, handing its bytes to `consume` in order.
    ///
    /// Returns `Ok(None)` once the stream is exhausted. The window is only
    /// reported after all of its bytes were consumed; on a read error the
    /// bytes already handed out belong to an incomplete window and the error
    /// is returned instead.
    pub fn next_window<F>(&mut self, mut consume: F) -> io::Result<Option<ChunkWindow>>
    where
        F: FnMut(&[u8]),
    {
        if self.exhausted {
            return Ok(None);
        }

        let mut remaining = self.part_size.get();
        while remaining > 0 {
            let want = usize::try_from(remaining)
                .unwrap_or(usize::MAX)
                .min(self.buf.len());
            let n = match self.reader.read(&mut self.buf[..want]) {
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if n == 0 {
                self.exhausted = true;
                break;
            }
            consume(&self.buf[..n]);
            remaining -= n as u64;
        }

        let len = self.part_size.get() - remaining;
        if len == 0 {
            return Ok(None);
        }

        let window = ChunkWindow {
            index: self.cursor.next_index,
            offset: self.cursor.offset,
            len,
        };
        self.cursor = ChunkCursor {
            offset: window.end(),
            next_index: self.cursor.next_index + 1,
        };
        Ok(Some(window))
    }
}
