use std::env;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::exit;

use bftp::client::{request_file, request_listing};
use bftp::cmd::{parse_client_args, Request};
use bftp::Error;

fn confirm_overwrite(filename: &str) -> bool {
    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("{} already exists. Overwrite? (y/n) ", filename);
        if io::stdout().flush().is_err() {
            return false;
        }
        line.clear();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => return false,
            Ok(_) => {}
        }
        match line.trim() {
            "y" | "Y" => return true,
            "n" | "N" => return false,
            _ => {}
        }
    }
}

fn main() {
    env_logger::init();

    let argv: Vec<String> = env::args().collect();
    let args = match parse_client_args(argv) {
        Ok(a) => a,
        Err(m) => {
            eprintln!("Error while parsing input arguments:\n  {}", m);
            exit(1);
        }
    };

    match args.request {
        Request::List => {
            println!("Receiving directory structure from {}", args.host);
            match request_listing(&args.host, args.port, args.data_port) {
                Ok(entries) => {
                    for name in entries {
                        println!("{}", name);
                    }
                }
                Err(Error::Rejected(msg)) => {
                    eprintln!("{}:{} says {}", args.host, args.port, msg);
                    exit(1);
                }
                Err(m) => {
                    eprintln!("Error while receiving the listing:\n  {}", m);
                    exit(1);
                }
            }
        }
        Request::Get { filename } => {
            let dest = Path::new(&filename);
            if dest.exists() && !confirm_overwrite(&filename) {
                println!("Transfer cancelled");
                return;
            }
            println!("Receiving \"{}\" from {}", filename, args.host);
            match request_file(&args.host, args.port, args.data_port, &filename, dest) {
                Ok(report) => {
                    println!("Transfer Complete");
                    println!("{} bytes written, sha256 {}", report.bytes, report.digest);
                }
                Err(Error::Rejected(msg)) => {
                    eprintln!("{}:{} says {}", args.host, args.port, msg);
                    exit(1);
                }
                Err(m) => {
                    eprintln!("Error during transfer:\n  {}", m);
                    exit(1);
                }
            }
        }
    }
}
