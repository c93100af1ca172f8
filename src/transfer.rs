use std::io::ErrorKind::Interrupted;
use std::io::{Read, Write};

use crate::block::{recv_exact, send_block, unpad};
use crate::error::Result;

// fread semantics: a chunk only comes back short at end of file
fn fill_chunk<R: Read>(src: &mut R, chunk: &mut [u8]) -> Result<usize> {
    let mut got = 0;
    while got < chunk.len() {
        match src.read(&mut chunk[got..]) {
            Ok(0) => break,
            Ok(n) => got += n,
            Err(e) if e.kind() == Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(got)
}

/// Stream a file as fixed blocks carrying `block - 1` payload bytes each.
/// The final short chunk loses its trailing byte, the text terminator; a
/// source that ends exactly on a chunk boundary loses nothing. Closing
/// the connection afterwards is the only end-of-file signal. Returns the
/// payload byte count put on the wire.
pub fn transmit_file<R: Read, W: Write>(src: &mut R, conn: &mut W, block: usize) -> Result<u64> {
    let mut chunk = vec![0u8; block - 1];
    let mut sent: u64 = 0;
    loop {
        let n = fill_chunk(src, &mut chunk)?;
        if n == 0 {
            break;
        }
        if n == chunk.len() {
            send_block(conn, &chunk, block)?;
            sent += n as u64;
        } else {
            send_block(conn, &chunk[..n - 1], block)?;
            sent += (n - 1) as u64;
            break;
        }
    }
    Ok(sent)
}

/// Inverse side: whole blocks until the sender closes, each block's
/// payload appended to the sink. Returns the bytes written.
pub fn receive_file<R: Read, W: Write>(conn: &mut R, sink: &mut W, block: usize) -> Result<u64> {
    let mut buf = vec![0u8; block];
    let mut written: u64 = 0;
    while recv_exact(conn, &mut buf)? {
        let payload = unpad(&buf);
        sink.write_all(payload)?;
        written += payload.len() as u64;
    }
    Ok(written)
}
