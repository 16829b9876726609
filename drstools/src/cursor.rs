//! Forward-only, position-tracking reader that never hands out short reads
//!
//! Every read either fills its whole buffer or fails. Running out of bytes is
//! reported as [`StreamError::Exhausted`], distinct from other I/O failures,
//! so callers can tell a truncated recording from a broken disk.

use std::io::{self, BufRead};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("stream exhausted at byte {offset}: wanted {wanted} bytes, got {got}")]
    Exhausted { offset: u64, wanted: usize, got: usize },
    #[error("read failed at byte {offset}")]
    Io {
        offset: u64,
        #[source]
        source: io::Error,
    },
}

impl StreamError {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, StreamError::Exhausted { .. })
    }
}

pub struct StreamCursor<R> {
    rdr: R,
    pos: u64,
}

impl<R: BufRead> StreamCursor<R> {
    pub fn new(rdr: R) -> Self {
        StreamCursor { rdr, pos: 0 }
    }

    /// Bytes consumed so far
    pub fn position(&self) -> u64 {
        self.pos
    }

    pub fn into_inner(self) -> R {
        self.rdr
    }

    /// True when no further byte can be read
    pub fn at_end(&mut self) -> Result<bool, StreamError> {
        let offset = self.pos;
        loop {
            match self.rdr.fill_buf() {
                Ok(buf) => return Ok(buf.is_empty()),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(source) => return Err(StreamError::Io { offset, source }),
            }
        }
    }

    /// Fill `buf` completely, or fail
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), StreamError> {
        let offset = self.pos;
        let wanted = buf.len();
        let mut got = 0;
        while got < wanted {
            let available = match self.rdr.fill_buf() {
                Ok(b) => b,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(source) => return Err(StreamError::Io { offset, source }),
            };
            if available.is_empty() {
                return Err(StreamError::Exhausted { offset, wanted, got });
            }
            let n = available.len().min(wanted - got);
            buf[got..got + n].copy_from_slice(&available[..n]);
            self.rdr.consume(n);
            self.pos += n as u64;
            got += n;
        }
        Ok(())
    }

    /// Read exactly `n` bytes into a new buffer
    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>, StreamError> {
        let mut buf = vec![0u8; n];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Discard exactly `n` bytes
    pub fn skip(&mut self, n: usize) -> Result<(), StreamError> {
        let offset = self.pos;
        let mut got = 0;
        while got < n {
            let available = match self.rdr.fill_buf() {
                Ok(b) => b.len(),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(source) => return Err(StreamError::Io { offset, source }),
            };
            if available == 0 {
                return Err(StreamError::Exhausted { offset, wanted: n, got });
            }
            let k = available.min(n - got);
            self.rdr.consume(k);
            self.pos += k as u64;
            got += k;
        }
        Ok(())
    }

    pub fn read_tag<const N: usize>(&mut self) -> Result<[u8; N], StreamError> {
        let mut tag = [0u8; N];
        self.read_exact(&mut tag)?;
        Ok(tag)
    }

    pub fn read_u16_le(&mut self) -> Result<u16, StreamError> {
        Ok(u16::from_le_bytes(self.read_tag::<2>()?))
    }

    pub fn read_u32_le(&mut self) -> Result<u32, StreamError> {
        Ok(u32::from_le_bytes(self.read_tag::<4>()?))
    }

    /// Fill `out` with little-endian `u16`s
    pub fn read_u16s_le(&mut self, out: &mut [u16]) -> Result<(), StreamError> {
        let mut raw = vec![0u8; out.len() * 2];
        self.read_exact(&mut raw)?;
        for (v, b) in out.iter_mut().zip(raw.chunks_exact(2)) {
            *v = u16::from_le_bytes([b[0], b[1]]);
        }
        Ok(())
    }

    /// Fill `out` with little-endian `f32`s
    pub fn read_f32s_le(&mut self, out: &mut [f32]) -> Result<(), StreamError> {
        let mut raw = vec![0u8; out.len() * 4];
        self.read_exact(&mut raw)?;
        for (v, b) in out.iter_mut().zip(raw.chunks_exact(4)) {
            *v = f32::from_le_bytes([b[0], b[1], b[2], b[3]]);
        }
        Ok(())
    }
}
