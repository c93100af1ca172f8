extern crate net2;

use std::net::{IpAddr, Ipv4Addr, SocketAddrV4, TcpListener, TcpStream};

use net2::TcpBuilder;

use crate::error::{Error, Result};

pub const LISTEN_BACKLOG: i32 = 5;

/// Dial the peer's announced data port. Ipv4 only; a refused dial fails
/// the request, not the process.
pub fn open_data_channel(peer: Ipv4Addr, port: u16) -> Result<TcpStream> {
    let addr = SocketAddrV4::new(peer, port);
    let builder = TcpBuilder::new_v4()?;
    let stream = builder
        .connect(addr)
        .map_err(|source| Error::DataConnect { addr, source })?;
    Ok(stream)
}

pub fn connect_control(host: &str, port: u16) -> Result<TcpStream> {
    let addr = format!("{}:{}", host, port);
    let builder = TcpBuilder::new_v4()?;
    let stream = builder
        .connect(addr.as_str())
        .map_err(|source| Error::ControlConnect { addr, source })?;
    Ok(stream)
}

/// Bind 0.0.0.0 and listen. Port 0 asks the OS for a free port; read it
/// back from the listener's local address.
pub fn build_listener(port: u16) -> Result<TcpListener> {
    let builder = TcpBuilder::new_v4()?;
    builder
        .bind(("0.0.0.0", port))
        .map_err(|source| Error::Bind { port, source })?;
    let listener = builder
        .listen(LISTEN_BACKLOG)
        .map_err(|source| Error::Listen { port, source })?;
    Ok(listener)
}

pub fn peer_v4(conn: &TcpStream) -> Result<Ipv4Addr> {
    match conn.peer_addr()?.ip() {
        IpAddr::V4(ip) => Ok(ip),
        ip => Err(Error::NotIpv4(ip)),
    }
}
