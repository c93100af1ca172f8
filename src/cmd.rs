extern crate getopts;

use getopts::Options;

pub const SERVER_USAGE: &str = "usage: bftpd <port>";
pub const CLIENT_USAGE: &str = "usage: bftp <host> <port> -l <data port>\n       \
                                bftp <host> <port> -g <file> <data port>";

#[derive(Debug, PartialEq, Eq)]
pub enum Request {
    List,
    Get { filename: String },
}

#[derive(Debug, PartialEq, Eq)]
pub struct ClientArgs {
    pub host: String,
    pub port: u16,
    pub data_port: u16,
    pub request: Request,
}

fn parse_port_arg(token: &str) -> Result<u16, String> {
    match token.parse::<u16>() {
        Ok(0) | Err(_) => Err(format!("invalid port: {}", token)),
        Ok(port) => Ok(port),
    }
}

pub fn parse_server_args(argv: Vec<String>) -> Result<u16, String> {
    let opts = Options::new();
    let matches = match opts.parse(&argv[1..]) {
        Ok(m) => m,
        Err(m) => {
            return Err(m.to_string());
        }
    };
    if matches.free.len() != 1 {
        return Err(SERVER_USAGE.to_string());
    }
    parse_port_arg(&matches.free[0])
}

pub fn parse_client_args(argv: Vec<String>) -> Result<ClientArgs, String> {
    let mut opts = Options::new();
    opts.optflag("l", "", "request a directory listing");
    opts.optopt("g", "", "request a file", "FILE");
    let matches = match opts.parse(&argv[1..]) {
        Ok(m) => m,
        Err(m) => {
            return Err(m.to_string());
        }
    };
    let request = match (matches.opt_present("l"), matches.opt_str("g")) {
        (true, None) => Request::List,
        (false, Some(filename)) => Request::Get { filename },
        _ => {
            return Err(CLIENT_USAGE.to_string());
        }
    };
    if matches.free.len() != 3 {
        return Err(CLIENT_USAGE.to_string());
    }
    let host = matches.free[0].clone();
    let port = parse_port_arg(&matches.free[1])?;
    // data port 0 asks the client to pick a free port itself
    let data_port = match matches.free[2].parse::<u16>() {
        Ok(p) => p,
        Err(_) => {
            return Err(format!("invalid data port: {}", matches.free[2]));
        }
    };
    Ok(ClientArgs {
        host,
        port,
        data_port,
        request,
    })
}
