use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Longest UTF-8 encoding of a single character
const MAX_UTF8_BYTES: u64 = 4;

/// Read at most `max_chars` characters from the start of a file.
///
/// Undecodable byte sequences become U+FFFD instead of failing the read. Only
/// open/read errors are reported.
pub fn read_prefix(path: &Path, max_chars: usize) -> io::Result<String> {
    let byte_cap = (max_chars as u64).saturating_mul(MAX_UTF8_BYTES);
    let mut bytes = Vec::new();
    File::open(path)?.take(byte_cap).read_to_end(&mut bytes)?;

    let decoded = String::from_utf8_lossy(&bytes);
    Ok(match decoded.char_indices().nth(max_chars) {
        Some((cut, _)) => decoded[..cut].to_string(),
        None => decoded.into_owned(),
    })
}
