use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::Result;

pub fn build_file_reader(root: &Path, filename: &str) -> Result<BufReader<File>> {
    let file = File::open(root.join(filename))?;
    Ok(BufReader::new(file))
}

pub fn build_file_writer(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path)?;
    Ok(BufWriter::new(file))
}

/// Entry names exactly as the directory iterator yields them: no
/// filtering, no sorting, non-utf8 names forwarded lossily.
pub fn list_dir(root: &Path) -> Result<Vec<String>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        entries.push(entry.file_name().to_string_lossy().into_owned());
    }
    Ok(entries)
}

/// Streamed sha256 of a saved file, lowercase hex.
pub fn digest_file(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest.iter() {
        hex.push_str(&format!("{:02x}", byte));
    }
    Ok(hex)
}
