//! Status line parsing

use crate::error::{NntpError, Result};
use crate::response::{NntpResponse, ResponseCode};

/// Longest prefix of a bad line kept in the error
const MAX_ERROR_TEXT: usize = 100;

fn invalid(line: &str) -> NntpError {
    NntpError::InvalidResponse(line.chars().take(MAX_ERROR_TEXT).collect())
}

/// Parse a status line (CRLF already stripped)
///
/// Accepted shapes are `NNN text`, `NNN-text` and a bare `NNN`. Anything else,
/// including a fourth digit or a missing separator, is
/// `NntpError::InvalidResponse`. A leading UTF-8 BOM is ignored.
pub fn parse_response_line(line: &str) -> Result<NntpResponse> {
    // Some broken proxies prefix the greeting with a BOM.
    let line = line.trim_start_matches('\u{FEFF}');

    let bytes = line.as_bytes();
    if bytes.len() < 3 || !bytes[..3].iter().all(u8::is_ascii_digit) {
        return Err(invalid(line));
    }

    let message = match bytes.get(3) {
        None => "",
        Some(b' ') | Some(b'-') => &line[4..],
        Some(_) => return Err(invalid(line)),
    };

    // Three ASCII digits always fit.
    let code = line[..3].parse::<u16>().map_err(|_| invalid(line))?;

    Ok(NntpResponse {
        code: ResponseCode::from_u16(code),
        message: message.to_string(),
    })
}

/// Strip the line terminator from a raw line
///
/// Removes a trailing LF and the CR before it, if any.
pub fn trim_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
