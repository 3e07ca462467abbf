use crate::{FrameError, Result};
use bytes::Bytes;

/// A parsed HTTP request head.
///
/// Header lines are kept verbatim, in arrival order, duplicates included;
/// value lookup happens lazily via [`header_value`](HttpRequest::header_value).
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    pub version: String,
    pub headers: Vec<String>,
}

impl HttpRequest {
    /// Parses a raw request-line+headers block, terminator included.
    pub fn parse(head: Bytes) -> Result<Self> {
        let head = std::str::from_utf8(&head)
            .map_err(|e| FrameError::Protocol(format!("request head is not valid utf-8: {e}")))?;
        let lines: Vec<&str> = head.split("\r\n").collect();

        let mut request_line = lines[0].split(' ');
        let (method, path, version) = match (
            request_line.next(),
            request_line.next(),
            request_line.next(),
            request_line.next(),
        ) {
            (Some(method), Some(path), Some(version), None) if !method.is_empty() => {
                (method, path, version)
            }
            _ => {
                return Err(FrameError::Protocol(format!(
                    "malformed request line: {:?}",
                    lines[0]
                )));
            }
        };

        // a head cut at "\r\n\r\n" always splits into two trailing empty lines
        if lines.len() < 3 || !lines[lines.len() - 1].is_empty() || !lines[lines.len() - 2].is_empty()
        {
            return Err(FrameError::Protocol(
                "malformed head terminator".to_string(),
            ));
        }

        let headers = lines[1..lines.len() - 2]
            .iter()
            .map(|line| (*line).to_string())
            .collect();

        Ok(Self {
            method: method.to_string(),
            path: path.to_string(),
            version: version.to_string(),
            headers,
        })
    }

    /// Looks up a header value by ASCII-case-insensitive name.
    ///
    /// The first matching line wins; the value is whitespace-trimmed.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers.iter().find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim().eq_ignore_ascii_case(name).then(|| value.trim())
        })
    }
}
