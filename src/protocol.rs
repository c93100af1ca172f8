use std::net::{Ipv4Addr, TcpStream};
use std::path::Path;

use log::{debug, info, warn};

use crate::block::{recv_once, send_block, unpad};
use crate::error::Result;
use crate::files::{build_file_reader, list_dir};
use crate::network::open_data_channel;
use crate::transfer::transmit_file;

pub const FILE_NOT_FOUND_MSG: &str = "Requested file not found";
pub const UNSUPPORTED_MSG: &str =
    "That command is not supported. Supported commands are -l and -g <filename>";
pub const LIST_FAILED_MSG: &str = "Could not read the served directory";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    List { data_port: u16 },
    Get { filename: String, data_port: u16 },
    Unsupported { raw: String },
}

// the announced port has to be a nonzero decimal u16
fn parse_port(token: &str) -> Option<u16> {
    match token.parse::<u16>() {
        Ok(0) | Err(_) => None,
        Ok(port) => Some(port),
    }
}

/// Whitespace tokenization. Anything that is not a well-formed `-l` or
/// `-g` command comes back as `Unsupported`; tokens after a well-formed
/// command are ignored.
pub fn parse_command(text: &str) -> Command {
    let mut tokens = text.split_whitespace();
    let parsed = match tokens.next() {
        Some("-l") => tokens
            .next()
            .and_then(parse_port)
            .map(|data_port| Command::List { data_port }),
        Some("-g") => match (tokens.next(), tokens.next().and_then(parse_port)) {
            (Some(filename), Some(data_port)) => Some(Command::Get {
                filename: filename.to_string(),
                data_port,
            }),
            _ => None,
        },
        _ => None,
    };
    match parsed {
        Some(command) => command,
        None => Command::Unsupported {
            raw: text.to_string(),
        },
    }
}

/// Serve exactly one command on an accepted control connection. Protocol
/// errors are reported to the client on the control channel; everything
/// else propagates to the accept loop.
pub fn serve_connection(
    control: &mut TcpStream,
    peer: Ipv4Addr,
    root: &Path,
    block: usize,
) -> Result<()> {
    let mut buf = vec![0u8; block];
    let got = recv_once(control, &mut buf)?;
    if got == 0 {
        debug!("{} closed without sending a command", peer);
        return Ok(());
    }
    let text = String::from_utf8_lossy(unpad(&buf[..got])).into_owned();
    info!("{} sent {:?}", peer, text);

    match parse_command(&text) {
        Command::List { data_port } => match list_dir(root) {
            Ok(entries) => {
                let mut data = open_data_channel(peer, data_port)?;
                for name in &entries {
                    send_block(&mut data, name.as_bytes(), block)?;
                }
                info!("sent {} entries to {}:{}", entries.len(), peer, data_port);
            }
            Err(e) => {
                warn!("cannot list {}: {}", root.display(), e);
                send_block(control, LIST_FAILED_MSG.as_bytes(), block)?;
            }
        },
        Command::Get {
            filename,
            data_port,
        } => match build_file_reader(root, &filename) {
            Ok(mut reader) => {
                let mut data = open_data_channel(peer, data_port)?;
                let sent = transmit_file(&mut reader, &mut data, block)?;
                info!("sent {} bytes of {} to {}:{}", sent, filename, peer, data_port);
            }
            Err(e) => {
                info!("cannot open {}: {}", filename, e);
                send_block(control, FILE_NOT_FOUND_MSG.as_bytes(), block)?;
            }
        },
        Command::Unsupported { raw } => {
            info!("unsupported command from {}: {:?}", peer, raw);
            send_block(control, UNSUPPORTED_MSG.as_bytes(), block)?;
        }
    }
    Ok(())
}
