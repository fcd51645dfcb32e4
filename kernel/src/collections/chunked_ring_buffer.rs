// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! A byte ring buffer that stores variable length chunks.
//!
//! The producer opens a chunk, appends bytes to it and closes it, deciding at
//! close time whether the chunk is kept or dropped. Kept chunks form a FIFO
//! that the consumer reads oldest first. At most one chunk is open at a time,
//! and it always sits directly after the newest closed chunk, so dropping it
//! only rewinds the write position.
//!
//! Nothing here blocks or panics: when the open chunk cannot grow the
//! producer is told so and decides what to do with the partial chunk.

/// Number of closed chunks the buffer can track at once.
pub const MAX_CHUNKS: usize = 4;

pub struct ChunkedRingBuffer<'a> {
    ring: &'a mut [u8],
    /// Start of the oldest closed chunk.
    head: usize,
    /// Bytes held by closed chunks and the open chunk.
    used: usize,
    /// Length of the open chunk, if one is open.
    open: Option<usize>,
    /// Lengths of the closed chunks, oldest at `first`.
    chunks: [usize; MAX_CHUNKS],
    first: usize,
    count: usize,
}

impl<'a> ChunkedRingBuffer<'a> {
    pub fn new(ring: &'a mut [u8]) -> ChunkedRingBuffer<'a> {
        ChunkedRingBuffer {
            ring,
            head: 0,
            used: 0,
            open: None,
            chunks: [0; MAX_CHUNKS],
            first: 0,
            count: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.ring.len()
    }

    /// Bytes currently stored, including the open chunk.
    pub fn len(&self) -> usize {
        self.used
    }

    pub fn chunk_count(&self) -> usize {
        self.count
    }

    pub fn has_open_chunk(&self) -> bool {
        self.open.is_some()
    }

    /// Forget every chunk, open or closed.
    pub fn reset(&mut self) {
        self.head = 0;
        self.used = 0;
        self.open = None;
        self.first = 0;
        self.count = 0;
    }

    fn index(&self, offset: usize) -> usize {
        (self.head + offset) % self.ring.len()
    }

    /// Open a new chunk.
    ///
    /// Fails if a chunk is already open or the chunk table is full.
    pub fn start_chunk(&mut self) -> bool {
        if self.open.is_some() || self.count == MAX_CHUNKS {
            return false;
        }
        self.open = Some(0);
        true
    }

    /// Append a byte to the open chunk. Returns `false` if no chunk is open
    /// or the buffer is full.
    pub fn add_byte(&mut self, byte: u8) -> bool {
        match self.open {
            Some(len) if self.used < self.ring.len() => {
                let pos = self.index(self.used);
                self.ring[pos] = byte;
                self.used += 1;
                self.open = Some(len + 1);
                true
            }
            _ => false,
        }
    }

    /// Append all of `bytes` to the open chunk, or nothing if they do not fit.
    pub fn add_bytes(&mut self, bytes: &[u8]) -> bool {
        if self.open.is_none() || self.ring.len() - self.used < bytes.len() {
            return false;
        }
        for &byte in bytes {
            self.add_byte(byte);
        }
        true
    }

    /// Close the open chunk.
    ///
    /// With `keep` set a non-empty chunk joins the FIFO of closed chunks and
    /// `true` is returned. Otherwise its bytes are released.
    pub fn end_chunk(&mut self, keep: bool) -> bool {
        let len = match self.open.take() {
            Some(len) => len,
            None => return false,
        };
        if keep && len > 0 {
            let slot = (self.first + self.count) % MAX_CHUNKS;
            self.chunks[slot] = len;
            self.count += 1;
            true
        } else {
            self.used -= len;
            false
        }
    }

    /// Size of the oldest closed chunk.
    pub fn chunk_size(&self) -> Option<usize> {
        if self.count == 0 {
            None
        } else {
            Some(self.chunks[self.first])
        }
    }

    /// Copy bytes of the oldest closed chunk, starting at `offset`, into all
    /// of `dst`. Fails if the range extends past the end of the chunk.
    pub fn peek_bytes(&self, dst: &mut [u8], offset: usize) -> bool {
        match self.chunk_size() {
            Some(size) if offset + dst.len() <= size => {
                for (i, byte) in dst.iter_mut().enumerate() {
                    *byte = self.ring[self.index(offset + i)];
                }
                true
            }
            _ => false,
        }
    }

    /// Feed every byte of the oldest closed chunk to `f`, in order.
    pub fn chunk_for_each<F: FnMut(u8)>(&self, mut f: F) -> bool {
        match self.chunk_size() {
            Some(size) => {
                for i in 0..size {
                    f(self.ring[self.index(i)]);
                }
                true
            }
            None => false,
        }
    }

    /// Release the oldest closed chunk, returning its size.
    pub fn drop_chunk(&mut self) -> Option<usize> {
        let size = self.chunk_size()?;
        self.first = (self.first + 1) % MAX_CHUNKS;
        self.count -= 1;
        self.used -= size;
        self.head = if self.used == 0 && self.open.is_none() {
            0
        } else {
            self.index(size)
        };
        Some(size)
    }

    /// Copy the start of the oldest closed chunk into `dst` and release the
    /// whole chunk. Returns the number of bytes copied.
    pub fn consume_chunk(&mut self, dst: &mut [u8]) -> Option<usize> {
        let size = self.chunk_size()?;
        let copied = size.min(dst.len());
        self.peek_bytes(&mut dst[..copied], 0);
        self.drop_chunk();
        Some(copied)
    }
}

#[cfg(test)]
mod test {
    use super::{ChunkedRingBuffer, MAX_CHUNKS};

    #[test]
    fn chunks_are_fifo() {
        let mut ring = [0u8; 16];
        let mut crb = ChunkedRingBuffer::new(&mut ring);

        assert!(crb.start_chunk());
        assert!(crb.add_bytes(b"abc"));
        assert!(crb.end_chunk(true));
        assert!(crb.start_chunk());
        assert!(crb.add_bytes(b"de"));
        assert!(crb.end_chunk(true));

        assert_eq!(crb.chunk_count(), 2);
        assert_eq!(crb.chunk_size(), Some(3));
        let mut out = [0u8; 8];
        assert_eq!(crb.consume_chunk(&mut out), Some(3));
        assert_eq!(&out[..3], b"abc");
        assert_eq!(crb.consume_chunk(&mut out), Some(2));
        assert_eq!(&out[..2], b"de");
        assert_eq!(crb.chunk_size(), None);
        assert_eq!(crb.len(), 0);
    }

    #[test]
    fn dropped_chunk_releases_space() {
        let mut ring = [0u8; 8];
        let mut crb = ChunkedRingBuffer::new(&mut ring);

        assert!(crb.start_chunk());
        assert!(crb.add_bytes(b"xyz"));
        assert!(!crb.end_chunk(false));
        assert_eq!(crb.len(), 0);
        assert_eq!(crb.chunk_count(), 0);

        // Empty chunks are never kept either.
        assert!(crb.start_chunk());
        assert!(!crb.end_chunk(true));
        assert_eq!(crb.chunk_count(), 0);
    }

    #[test]
    fn wraps_around() {
        let mut ring = [0u8; 8];
        let mut crb = ChunkedRingBuffer::new(&mut ring);
        let mut out = [0u8; 8];

        crb.start_chunk();
        crb.add_bytes(b"12345");
        crb.end_chunk(true);
        crb.start_chunk();
        crb.add_bytes(b"67");
        crb.end_chunk(true);
        assert_eq!(crb.consume_chunk(&mut out), Some(5));

        // Six bytes free, but only by wrapping past the end of the ring.
        crb.start_chunk();
        assert!(crb.add_bytes(b"abcdef"));
        assert!(!crb.add_byte(b'g'));
        crb.end_chunk(true);

        assert_eq!(crb.consume_chunk(&mut out), Some(2));
        assert_eq!(&out[..2], b"67");
        let mut head = [0u8; 2];
        assert!(crb.peek_bytes(&mut head, 4));
        assert_eq!(&head, b"ef");
        assert_eq!(crb.consume_chunk(&mut out), Some(6));
        assert_eq!(&out[..6], b"abcdef");
    }

    #[test]
    fn overflow_is_reported_not_written() {
        let mut ring = [0u8; 4];
        let mut crb = ChunkedRingBuffer::new(&mut ring);

        crb.start_chunk();
        for b in 0..4 {
            assert!(crb.add_byte(b));
        }
        assert!(!crb.add_byte(4));
        assert!(!crb.add_bytes(&[5]));
        assert_eq!(crb.len(), 4);
        crb.end_chunk(false);
        assert_eq!(crb.len(), 0);
    }

    #[test]
    fn producer_needs_open_chunk() {
        let mut ring = [0u8; 4];
        let mut crb = ChunkedRingBuffer::new(&mut ring);

        assert!(!crb.add_byte(1));
        assert!(!crb.end_chunk(true));
        assert!(crb.start_chunk());
        assert!(!crb.start_chunk());
        assert!(crb.has_open_chunk());
    }

    #[test]
    fn chunk_table_is_bounded() {
        let mut ring = [0u8; 32];
        let mut crb = ChunkedRingBuffer::new(&mut ring);

        for i in 0..MAX_CHUNKS {
            assert!(crb.start_chunk());
            crb.add_byte(i as u8);
            crb.end_chunk(true);
        }
        assert!(!crb.start_chunk());
        assert_eq!(crb.drop_chunk(), Some(1));
        assert!(crb.start_chunk());
    }

    #[test]
    fn short_destination_truncates_but_releases() {
        let mut ring = [0u8; 8];
        let mut crb = ChunkedRingBuffer::new(&mut ring);

        crb.start_chunk();
        crb.add_bytes(b"hello");
        crb.end_chunk(true);

        let mut sum = 0u32;
        assert!(crb.chunk_for_each(|b| sum += b as u32));
        assert_eq!(sum, b"hello".iter().map(|&b| b as u32).sum::<u32>());

        let mut out = [0u8; 2];
        assert_eq!(crb.consume_chunk(&mut out), Some(2));
        assert_eq!(&out, b"he");
        assert_eq!(crb.chunk_count(), 0);
        assert_eq!(crb.len(), 0);
    }

    #[test]
    fn reset_discards_everything() {
        let mut ring = [0u8; 8];
        let mut crb = ChunkedRingBuffer::new(&mut ring);

        crb.start_chunk();
        crb.add_bytes(b"ab");
        crb.end_chunk(true);
        crb.start_chunk();
        crb.add_byte(b'c');
        crb.reset();
        assert_eq!(crb.len(), 0);
        assert_eq!(crb.chunk_count(), 0);
        assert!(!crb.has_open_chunk());
        assert_eq!(crb.capacity(), 8);
    }
}
