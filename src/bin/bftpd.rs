use std::env;
use std::process::exit;

use log::{error, info};

use bftp::block::BLOCK_SIZE;
use bftp::cmd::parse_server_args;
use bftp::network::{build_listener, peer_v4};
use bftp::protocol::serve_connection;

fn main() {
    env_logger::init();

    let argv: Vec<String> = env::args().collect();
    let port = match parse_server_args(argv) {
        Ok(p) => p,
        Err(m) => {
            eprintln!("Error while parsing input arguments:\n  {}", m);
            exit(1);
        }
    };

    // the served directory is always the working directory
    let root = match env::current_dir() {
        Ok(d) => d,
        Err(m) => {
            eprintln!("Cannot resolve the working directory:\n  {}", m);
            exit(2);
        }
    };

    let listener = match build_listener(port) {
        Ok(l) => l,
        Err(m) => {
            eprintln!("Error while starting listener:\n  {}", m);
            exit(2);
        }
    };

    match hostname::get() {
        Ok(name) => println!("Server open on {} port {}", name.to_string_lossy(), port),
        Err(_) => println!("Server open on port {}", port),
    }

    for conn in listener.incoming() {
        let mut control = match conn {
            Ok(c) => c,
            Err(m) => {
                error!("accept failed: {}", m);
                continue;
            }
        };
        let peer = match peer_v4(&control) {
            Ok(p) => p,
            Err(m) => {
                error!("{}", m);
                continue;
            }
        };
        info!("control connection from {}", peer);
        if let Err(m) = serve_connection(&mut control, peer, &root, BLOCK_SIZE) {
            error!("request from {} failed: {}", peer, m);
        }
    }
}
