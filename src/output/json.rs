//! JSON output formatting

use std::io::{self, Write};

use serde::Serialize;

/// Serialize any report value as pretty-printed JSON.
pub fn to_json<T: Serialize>(value: &T) -> io::Result<String> {
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}

/// Write pretty-printed JSON followed by a newline.
pub fn write_json<T: Serialize, W: Write>(out: &mut W, value: &T) -> io::Result<()> {
    let json = to_json(value)?;
    writeln!(out, "{}", json)
}

/// Print pretty-printed JSON to stdout.
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_json(&mut lock, value)
}
