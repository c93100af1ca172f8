use std::io::ErrorKind::{TimedOut, WouldBlock};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;
use std::thread::sleep;
use std::time::{Duration, Instant};

use log::debug;

use crate::block::{recv_exact, unpad, BLOCK_SIZE};
use crate::error::{Error, Result};
use crate::files::{build_file_writer, digest_file};
use crate::network::{build_listener, connect_control};
use crate::transfer::receive_file;

const REPLY_TIMEOUT: Duration = Duration::from_secs(60);
const POLL_INTERVAL: Duration = Duration::from_millis(100);
const CLOSE_GRACE: Duration = Duration::from_millis(500);

#[derive(Debug)]
pub struct TransferReport {
    pub bytes: u64,
    pub digest: String,
}

enum Reply {
    Data(TcpStream),
    Text(String),
}

/// Connect the control channel and stand up the data listener before any
/// command goes out; the server may dial back the moment it parses one.
fn open_session(host: &str, port: u16, data_port: u16) -> Result<(TcpStream, TcpListener)> {
    let control = connect_control(host, port)?;
    let listener = build_listener(data_port)?;
    Ok((control, listener))
}

/// Poll the data listener against the control socket until the server
/// either dials back or replies with an error block. A data connection
/// can still be sitting in the listener backlog when the control side
/// closes; the grace pass after an early close picks it up.
fn await_reply(control: &mut TcpStream, listener: &TcpListener, block: usize) -> Result<Reply> {
    listener.set_nonblocking(true)?;
    control.set_read_timeout(Some(POLL_INTERVAL))?;
    let mut buf = vec![0u8; block];
    let mut got = 0;
    let deadline = Instant::now() + REPLY_TIMEOUT;
    loop {
        match listener.accept() {
            Ok((data, addr)) => {
                debug!("data connection from {}", addr);
                data.set_nonblocking(false)?;
                return Ok(Reply::Data(data));
            }
            Err(e) if e.kind() == WouldBlock => {}
            Err(e) => return Err(e.into()),
        }
        match control.read(&mut buf[got..]) {
            Ok(0) => {
                if got > 0 {
                    break;
                }
                return match accept_grace(listener)? {
                    Some(data) => Ok(Reply::Data(data)),
                    None => Err(Error::NoReply),
                };
            }
            Ok(n) => {
                got += n;
                if got == buf.len() {
                    break;
                }
            }
            Err(e) if matches!(e.kind(), WouldBlock | TimedOut) => {}
            Err(e) => return Err(e.into()),
        }
        if Instant::now() > deadline {
            return Err(Error::ReplyTimeout);
        }
    }
    let text = String::from_utf8_lossy(unpad(&buf[..got])).into_owned();
    Ok(Reply::Text(text))
}

fn accept_grace(listener: &TcpListener) -> Result<Option<TcpStream>> {
    let deadline = Instant::now() + CLOSE_GRACE;
    while Instant::now() < deadline {
        match listener.accept() {
            Ok((data, addr)) => {
                debug!("late data connection from {}", addr);
                data.set_nonblocking(false)?;
                return Ok(Some(data));
            }
            Err(e) if e.kind() == WouldBlock => sleep(Duration::from_millis(20)),
            Err(e) => return Err(e.into()),
        }
    }
    Ok(None)
}

fn send_command(control: &mut TcpStream, text: &str) -> Result<()> {
    // commands travel raw and unpadded, client to server only
    control.write_all(text.as_bytes())?;
    Ok(())
}

pub fn request_listing(host: &str, port: u16, data_port: u16) -> Result<Vec<String>> {
    let (mut control, listener) = open_session(host, port, data_port)?;
    let bound = listener.local_addr()?.port();
    send_command(&mut control, &format!("-l {}", bound))?;
    match await_reply(&mut control, &listener, BLOCK_SIZE)? {
        Reply::Data(mut data) => {
            let mut entries = Vec::new();
            let mut buf = vec![0u8; BLOCK_SIZE];
            while recv_exact(&mut data, &mut buf)? {
                entries.push(String::from_utf8_lossy(unpad(&buf)).into_owned());
            }
            Ok(entries)
        }
        Reply::Text(msg) => Err(Error::Rejected(msg)),
    }
}

pub fn request_file(
    host: &str,
    port: u16,
    data_port: u16,
    filename: &str,
    dest: &Path,
) -> Result<TransferReport> {
    let (mut control, listener) = open_session(host, port, data_port)?;
    let bound = listener.local_addr()?.port();
    send_command(&mut control, &format!("-g {} {}", filename, bound))?;
    match await_reply(&mut control, &listener, BLOCK_SIZE)? {
        Reply::Data(mut data) => {
            let mut writer = build_file_writer(dest)?;
            let received = receive_file(&mut data, &mut writer, BLOCK_SIZE)?;
            // the sender dropped the trailing terminator, put one back
            writer.write_all(b"\n")?;
            writer.flush()?;
            Ok(TransferReport {
                bytes: received + 1,
                digest: digest_file(dest)?,
            })
        }
        Reply::Text(msg) => Err(Error::Rejected(msg)),
    }
}
