use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Deserialize a request piped on stdin.
///
/// `None` when stdin is a terminal or the pipe carried only whitespace, so the
/// caller falls back to command-line flags.
pub fn read_request<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    let body = buffer.trim();
    if body.is_empty() {
        log::debug!("stdin is piped but empty, using flags");
        return Ok(None);
    }

    log::debug!("reading request from stdin ({} bytes)", body.len());
    serde_json::from_str(body)
        .map(Some)
        .map_err(|e| format!("invalid JSON request on stdin: {e}").into())
}
