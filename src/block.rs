use std::io::ErrorKind::Interrupted;
use std::io::{Read, Write};

use crate::error::{Error, Result};

pub const BLOCK_SIZE: usize = 4096; // both channels, every message type

/// Pad `payload` with zeroes up to `block` bytes and send the whole block.
pub fn send_block<W: Write>(conn: &mut W, payload: &[u8], block: usize) -> Result<()> {
    if payload.len() > block {
        return Err(Error::BlockOverflow {
            len: payload.len(),
            block,
        });
    }
    let mut buf = vec![0u8; block];
    buf[..payload.len()].copy_from_slice(payload);
    conn.write_all(&buf)?;
    Ok(())
}

/// One receive call. 0 means the peer closed the connection cleanly.
pub fn recv_once<R: Read>(conn: &mut R, buf: &mut [u8]) -> Result<usize> {
    loop {
        match conn.read(buf) {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Receive until `buf` holds one whole block. Returns false on a clean
/// close at a block boundary; a close mid-block is an error.
pub fn recv_exact<R: Read>(conn: &mut R, buf: &mut [u8]) -> Result<bool> {
    let mut got = 0;
    while got < buf.len() {
        match conn.read(&mut buf[got..]) {
            Ok(0) if got == 0 => return Ok(false),
            Ok(0) => {
                return Err(Error::ShortBlock {
                    got,
                    expected: buf.len(),
                })
            }
            Ok(n) => got += n,
            Err(e) if e.kind() == Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(true)
}

/// The payload is everything before the first padding byte.
pub fn unpad(block: &[u8]) -> &[u8] {
    match block.iter().position(|b| *b == 0) {
        Some(n) => &block[..n],
        None => block,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // hands out the source a few bytes at a time
    struct Dribble<'a> {
        data: &'a [u8],
        pos: usize,
        chunk: usize,
    }

    impl Read for Dribble<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos == self.data.len() {
                return Ok(0);
            }
            let n = self.chunk.min(buf.len()).min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[test]
    fn send_block_pads_to_full_size() {
        let mut wire = Vec::new();
        send_block(&mut wire, b"hi", 8).unwrap();
        assert_eq!(wire, b"hi\0\0\0\0\0\0");
    }

    #[test]
    fn send_block_accepts_exact_fit() {
        let mut wire = Vec::new();
        send_block(&mut wire, b"12345678", 8).unwrap();
        assert_eq!(wire, b"12345678");
    }

    #[test]
    fn send_block_rejects_oversize_payload() {
        let mut wire = Vec::new();
        match send_block(&mut wire, b"123456789", 8) {
            Err(Error::BlockOverflow { len: 9, block: 8 }) => {}
            other => panic!("expected overflow, got {:?}", other),
        }
        assert!(wire.is_empty());
    }

    #[test]
    fn recv_once_returns_whatever_one_read_yields() {
        let data = [9u8; 10];
        let mut src = Dribble {
            data: &data,
            pos: 0,
            chunk: 4,
        };
        let mut buf = [0u8; 16];
        assert_eq!(recv_once(&mut src, &mut buf).unwrap(), 4);
        assert_eq!(&buf[..4], &data[..4]);
    }

    #[test]
    fn recv_once_reports_clean_close_as_zero() {
        let mut src = Dribble {
            data: &[],
            pos: 0,
            chunk: 4,
        };
        let mut buf = [0u8; 16];
        assert_eq!(recv_once(&mut src, &mut buf).unwrap(), 0);
    }

    #[test]
    fn recv_exact_loops_over_fragmented_reads() {
        let data = [7u8; 16];
        let mut src = Dribble {
            data: &data,
            pos: 0,
            chunk: 3,
        };
        let mut buf = [0u8; 16];
        assert!(recv_exact(&mut src, &mut buf).unwrap());
        assert_eq!(buf, data);
    }

    #[test]
    fn recv_exact_reports_clean_close_at_boundary() {
        let data = [7u8; 16];
        let mut src = Dribble {
            data: &data,
            pos: 0,
            chunk: 5,
        };
        let mut buf = [0u8; 16];
        assert!(recv_exact(&mut src, &mut buf).unwrap());
        assert!(!recv_exact(&mut src, &mut buf).unwrap());
    }

    #[test]
    fn recv_exact_rejects_close_mid_block() {
        let data = [7u8; 10];
        let mut src = Dribble {
            data: &data,
            pos: 0,
            chunk: 4,
        };
        let mut buf = [0u8; 16];
        match recv_exact(&mut src, &mut buf) {
            Err(Error::ShortBlock {
                got: 10,
                expected: 16,
            }) => {}
            other => panic!("expected short block, got {:?}", other),
        }
    }

    #[test]
    fn unpad_stops_at_first_zero() {
        assert_eq!(unpad(b"abc\0\0def"), b"abc".as_slice());
        assert_eq!(unpad(b"\0abc"), b"".as_slice());
        assert_eq!(unpad(b"abc"), b"abc".as_slice());
    }
}
