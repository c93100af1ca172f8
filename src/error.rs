use std::io;
use std::net::{IpAddr, SocketAddrV4};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("payload of {len} bytes does not fit in a {block} byte block")]
    BlockOverflow { len: usize, block: usize },

    #[error("connection closed mid-block after {got} of {expected} bytes")]
    ShortBlock { got: usize, expected: usize },

    #[error("cannot bind to port {port}: {source}")]
    Bind { port: u16, source: io::Error },

    #[error("listening on port {port} failed: {source}")]
    Listen { port: u16, source: io::Error },

    #[error("cannot open data connection to {addr}: {source}")]
    DataConnect { addr: SocketAddrV4, source: io::Error },

    #[error("cannot connect to {addr}: {source}")]
    ControlConnect { addr: String, source: io::Error },

    #[error("peer address {0} is not ipv4")]
    NotIpv4(IpAddr),

    #[error("{0}")]
    Rejected(String),

    #[error("server closed the control connection without replying")]
    NoReply,

    #[error("timed out waiting for the server to reply")]
    ReplyTimeout,
}
