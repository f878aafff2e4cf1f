//! JSON line I/O for the CLI
//!
//! - Input: one JSON object per line
//! - Output: one JSON object per line on stdout
//! - UTF-8 only

use std::io::{self, BufRead, Write};

use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read one non-empty line from `reader`
pub fn read_request<R: BufRead>(reader: &mut R) -> CliResult<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;

    if line.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }
    Ok(line.trim_end().to_string())
}

/// Iterate over the non-empty lines of `reader` (for the start command)
pub fn read_requests<R: BufRead>(reader: R) -> impl Iterator<Item = CliResult<String>> {
    reader.lines().filter_map(|line| match line {
        Ok(l) if l.trim().is_empty() => None,
        Ok(l) => Some(Ok(l)),
        Err(e) => Some(Err(CliError::from(e))),
    })
}

/// Write a success response line
pub fn write_response<W: Write>(out: &mut W, data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });
    write_json(out, &response.to_string())
}

/// Write an error response line
pub fn write_error<W: Write>(out: &mut W, code: &str, message: &str) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    });
    write_json(out, &response.to_string())
}

/// Write a raw JSON string line
pub fn write_json<W: Write>(out: &mut W, json_str: &str) -> CliResult<()> {
    writeln!(out, "{}", json_str)?;
    out.flush()?;
    Ok(())
}

/// Locked stdout handle
pub fn stdout() -> io::StdoutLock<'static> {
    io::stdout().lock()
}
