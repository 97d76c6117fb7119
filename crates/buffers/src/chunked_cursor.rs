//! Chunked cursor for reading across chunk boundaries.

use bytes::{Bytes, BytesMut};

use crate::BufferError;

/// Snapshot of a [`ChunkedCursor`] read position.
///
/// A mark stays valid until the bytes it points into are dropped by
/// [`ChunkedCursor::release`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    pos: usize,
}

impl Mark {
    /// Absolute stream offset captured by this mark.
    pub fn position(&self) -> usize {
        self.pos
    }
}

/// A read cursor over a sequence of byte chunks.
///
/// Chunks are never merged. Reads that straddle a boundary are assembled on
/// demand, and [`take`](Self::take) hands out bounded sub-cursors that share
/// the underlying storage. Positions are absolute stream offsets counted from
/// the first byte ever pushed, so they stay meaningful after
/// [`release`](Self::release).
///
/// # Example
///
/// ```
/// use amqp_buffers::ChunkedCursor;
///
/// let mut cursor = ChunkedCursor::new();
/// cursor.push(vec![0x00, 0x01]);
/// cursor.push(vec![0x02, 0x03]);
/// assert_eq!(cursor.u32().unwrap(), 0x0001_0203);
/// assert_eq!(cursor.position(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChunkedCursor {
    chunks: Vec<Bytes>,
    /// Index of the chunk holding the next unread byte, or `chunks.len()`
    /// when everything buffered has been read.
    chunk: usize,
    /// Offset of the next unread byte within `chunks[chunk]`.
    x: usize,
    /// Absolute offset of the first byte of `chunks[0]`.
    base: usize,
    /// Absolute offset of the next unread byte.
    pos: usize,
    /// Absolute offset one past the last buffered byte.
    end: usize,
    finished: bool,
}

impl ChunkedCursor {
    /// Creates an empty, unfinished cursor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a finished cursor holding a copy of `data`.
    pub fn from_slice(data: &[u8]) -> Self {
        let mut cursor = Self::new();
        cursor.push(Bytes::copy_from_slice(data));
        cursor.finish();
        cursor
    }

    /// Appends a chunk. Empty chunks are ignored.
    pub fn push(&mut self, chunk: impl Into<Bytes>) {
        let chunk = chunk.into();
        if chunk.is_empty() {
            return;
        }
        self.end += chunk.len();
        self.chunks.push(chunk);
    }

    /// Declares that no further chunks will be pushed.
    pub fn finish(&mut self) {
        self.finished = true;
    }

    /// Whether the stream has been declared complete.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Number of buffered bytes not yet read.
    pub fn remaining(&self) -> usize {
        self.end - self.pos
    }

    /// Whether at least `n` unread bytes are buffered.
    pub fn has_remaining(&self, n: usize) -> bool {
        self.remaining() >= n
    }

    /// Absolute stream offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Captures the current read position.
    pub fn mark(&self) -> Mark {
        Mark { pos: self.pos }
    }

    /// Restores a position captured by [`mark`](Self::mark).
    pub fn reset(&mut self, mark: Mark) -> Result<(), BufferError> {
        if mark.pos < self.base || mark.pos > self.end {
            return Err(BufferError::StaleMark);
        }
        self.seek(mark.pos);
        Ok(())
    }

    /// Drops chunks that lie entirely before the read position.
    ///
    /// Marks taken before the released bytes become stale.
    pub fn release(&mut self) {
        if self.chunk == 0 {
            return;
        }
        let dropped: usize = self.chunks.drain(..self.chunk).map(|c| c.len()).sum();
        self.base += dropped;
        self.chunk = 0;
    }

    fn seek(&mut self, pos: usize) {
        let mut start = self.base;
        for (i, chunk) in self.chunks.iter().enumerate() {
            if pos < start + chunk.len() {
                self.chunk = i;
                self.x = pos - start;
                self.pos = pos;
                return;
            }
            start += chunk.len();
        }
        self.chunk = self.chunks.len();
        self.x = 0;
        self.pos = pos;
    }

    #[inline]
    fn check(&self, n: usize) -> Result<(), BufferError> {
        let available = self.remaining();
        if available < n {
            Err(BufferError::Underflow {
                needed: n,
                available,
            })
        } else {
            Ok(())
        }
    }

    /// Moves forward `n` bytes. Callers check availability first.
    fn advance(&mut self, mut n: usize) {
        self.pos += n;
        while n > 0 {
            let available = self.chunks[self.chunk].len() - self.x;
            if n < available {
                self.x += n;
                return;
            }
            n -= available;
            self.chunk += 1;
            self.x = 0;
        }
    }

    fn copy_to(&mut self, dst: &mut [u8]) {
        let mut copied = 0;
        let mut chunk_idx = self.chunk;
        let mut local_x = self.x;
        while copied < dst.len() {
            let chunk = &self.chunks[chunk_idx];
            let to_copy = (chunk.len() - local_x).min(dst.len() - copied);
            dst[copied..copied + to_copy].copy_from_slice(&chunk[local_x..local_x + to_copy]);
            copied += to_copy;
            chunk_idx += 1;
            local_x = 0;
        }
        self.advance(dst.len());
    }

    /// Returns the next byte without advancing.
    pub fn peek_u8(&self) -> Result<u8, BufferError> {
        self.check(1)?;
        Ok(self.chunks[self.chunk][self.x])
    }

    /// Reads exactly `N` bytes.
    pub fn array<const N: usize>(&mut self) -> Result<[u8; N], BufferError> {
        self.check(N)?;
        let mut out = [0u8; N];
        self.copy_to(&mut out);
        Ok(out)
    }

    /// Reads an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self) -> Result<u8, BufferError> {
        let val = self.peek_u8()?;
        self.advance(1);
        Ok(val)
    }

    #[inline]
    pub fn i8(&mut self) -> Result<i8, BufferError> {
        Ok(self.u8()? as i8)
    }

    #[inline]
    pub fn u16(&mut self) -> Result<u16, BufferError> {
        self.array().map(u16::from_be_bytes)
    }

    #[inline]
    pub fn i16(&mut self) -> Result<i16, BufferError> {
        self.array().map(i16::from_be_bytes)
    }

    #[inline]
    pub fn u32(&mut self) -> Result<u32, BufferError> {
        self.array().map(u32::from_be_bytes)
    }

    #[inline]
    pub fn i32(&mut self) -> Result<i32, BufferError> {
        self.array().map(i32::from_be_bytes)
    }

    #[inline]
    pub fn u64(&mut self) -> Result<u64, BufferError> {
        self.array().map(u64::from_be_bytes)
    }

    #[inline]
    pub fn i64(&mut self) -> Result<i64, BufferError> {
        self.array().map(i64::from_be_bytes)
    }

    #[inline]
    pub fn f32(&mut self) -> Result<f32, BufferError> {
        self.array().map(f32::from_be_bytes)
    }

    #[inline]
    pub fn f64(&mut self) -> Result<f64, BufferError> {
        self.array().map(f64::from_be_bytes)
    }

    /// Reads `n` bytes. Zero-copy when they sit inside a single chunk.
    pub fn bytes(&mut self, n: usize) -> Result<Bytes, BufferError> {
        self.check(n)?;
        if n == 0 {
            return Ok(Bytes::new());
        }
        let chunk = &self.chunks[self.chunk];
        if chunk.len() - self.x >= n {
            let out = chunk.slice(self.x..self.x + n);
            self.advance(n);
            return Ok(out);
        }
        let mut out = BytesMut::zeroed(n);
        self.copy_to(&mut out);
        Ok(out.freeze())
    }

    /// Skips `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<(), BufferError> {
        self.check(n)?;
        self.advance(n);
        Ok(())
    }

    /// Splits off the next `n` bytes as a finished sub-cursor and advances
    /// past them.
    ///
    /// The sub-cursor shares chunk storage with `self` and reports the same
    /// absolute positions.
    pub fn take(&mut self, n: usize) -> Result<ChunkedCursor, BufferError> {
        self.check(n)?;
        let mut chunks = Vec::new();
        let mut left = n;
        let mut chunk_idx = self.chunk;
        let mut local_x = self.x;
        while left > 0 {
            let chunk = &self.chunks[chunk_idx];
            let len = (chunk.len() - local_x).min(left);
            chunks.push(chunk.slice(local_x..local_x + len));
            left -= len;
            chunk_idx += 1;
            local_x = 0;
        }
        let sub = ChunkedCursor {
            chunks,
            chunk: 0,
            x: 0,
            base: self.pos,
            pos: self.pos,
            end: self.pos + n,
            finished: true,
        };
        self.advance(n);
        Ok(sub)
    }
}
