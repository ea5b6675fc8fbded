//! Line transport for NNTP protocol communication
//!
//! Every command goes through these primitives:
//! - command transmission, draining any unread body first
//! - status line reading and parsing
//! - dot-terminated block reading (as lines or as a header block)
//! - timeout management and broken-connection detection

use super::state::ConnectionState;
use super::{NntpClient, NntpIo};
use crate::article::Headers;
use crate::codec::{DotDecoder, DotReader, DotWriter};
use crate::commands;
use crate::error::{NntpError, Result};
use crate::response::{NntpResponse, ResponseCode};
use std::future::Future;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::time::timeout;
use tracing::{debug, trace};

/// Typical NNTP line length, for buffer pre-allocation
const LINE_CAPACITY: usize = 512;

/// Protocol error for a reply code the command does not accept
pub(super) fn unexpected(command: &'static str, response: NntpResponse) -> NntpError {
    NntpError::Protocol {
        command,
        code: response.raw_code(),
        message: response.message,
    }
}

/// Run an I/O future under a timeout
async fn with_timeout<T>(limit: Duration, fut: impl Future<Output = Result<T>>) -> Result<T> {
    timeout(limit, fut).await.unwrap_or(Err(NntpError::Timeout))
}

/// Text of a command line safe to log (AUTHINFO PASS argument masked)
fn loggable(command: &str) -> &str {
    let command = command.trim_end();
    let is_pass = command
        .get(..13)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("AUTHINFO PASS"));
    if is_pass {
        "AUTHINFO PASS ****"
    } else {
        command
    }
}

impl NntpClient {
    /// Fail fast on a connection that can no longer carry commands
    pub(super) fn ensure_usable(&self) -> Result<()> {
        if self.is_broken {
            return Err(NntpError::Broken);
        }
        if self.state == ConnectionState::Closed {
            return Err(NntpError::ConnectionClosed);
        }
        Ok(())
    }

    /// Mark the connection broken if `result` failed part-way through I/O
    fn check<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(
            NntpError::Io(_)
            | NntpError::Timeout
            | NntpError::ConnectionClosed
            | NntpError::InvalidResponse(_),
        ) = &result
        {
            self.mark_broken();
        }
        result
    }

    /// Read and discard the rest of a body the caller did not consume
    async fn drain_pending_body(&mut self) -> Result<()> {
        let Some(mut decoder) = self.pending_body.take() else {
            return Ok(());
        };

        if !decoder.is_finished() {
            debug!("Draining unread article body");
            let limit = self.config.multiline_timeout;
            let stream = &mut self.stream;
            let drain = async {
                let mut reader = DotReader::with_decoder(stream, &mut decoder);
                Ok::<_, NntpError>(tokio::io::copy(&mut reader, &mut tokio::io::sink()).await?)
            };
            let drained = with_timeout(limit, drain).await;
            match drained {
                Ok(n) => trace!("Drained {} body bytes", n),
                Err(e) => {
                    self.mark_broken();
                    return Err(e);
                }
            }
        }

        self.state = ConnectionState::Idle;
        Ok(())
    }

    /// Send a command line (CRLF included) to the server
    pub(super) async fn send_command(&mut self, command: &str) -> Result<()> {
        self.ensure_usable()?;
        self.drain_pending_body().await?;

        trace!("Sending command: {}", loggable(command));
        let limit = self.config.read_timeout;
        let stream = &mut self.stream;
        let write = async {
            stream.get_mut().write_all(command.as_bytes()).await?;
            stream.get_mut().flush().await?;
            Ok::<_, NntpError>(())
        };
        let result = with_timeout(limit, write).await;
        self.check(result)?;
        self.state = ConnectionState::AwaitingStatus;
        Ok(())
    }

    /// Read one CRLF-terminated line from the connection, terminator stripped
    async fn read_line(&mut self, limit: Duration) -> Result<String> {
        let stream = &mut self.stream;
        let read = async {
            let mut line_bytes = Vec::with_capacity(LINE_CAPACITY);
            stream.read_until(b'\n', &mut line_bytes).await?;
            if line_bytes.is_empty() {
                return Err(NntpError::ConnectionClosed);
            }
            let line = String::from_utf8_lossy(&line_bytes);
            Ok(commands::trim_line_ending(&line).to_string())
        };
        let result = with_timeout(limit, read).await;
        self.check(result)
    }

    /// Read and parse a status line
    pub(super) async fn read_response(&mut self) -> Result<NntpResponse> {
        let line = self.read_line(self.config.read_timeout).await?;
        trace!("Received: {}", line);

        let response = match commands::parse_response_line(&line) {
            Ok(response) => response,
            Err(e) => {
                self.mark_broken();
                return Err(e);
            }
        };
        self.state = ConnectionState::Idle;
        Ok(response)
    }

    /// Read a dot-terminated block as lines (lossy UTF-8, CRLF stripped)
    pub(super) async fn read_dot_lines(&mut self) -> Result<Vec<String>> {
        let limit = self.config.multiline_timeout;
        let stream = &mut self.stream;
        let read = async {
            // Only decoded bytes of this block are buffered; the decoder
            // itself stops at the terminator.
            let mut reader = BufReader::new(DotReader::new(stream));
            let mut lines = Vec::new();
            let mut line_bytes = Vec::with_capacity(LINE_CAPACITY);
            loop {
                line_bytes.clear();
                if reader.read_until(b'\n', &mut line_bytes).await? == 0 {
                    break;
                }
                lines.push(
                    commands::trim_line_ending(&String::from_utf8_lossy(&line_bytes)).to_string(),
                );
            }
            Ok::<_, NntpError>(lines)
        };
        let result = with_timeout(limit, read).await;
        let lines = self.check(result)?;
        trace!("Received {} block lines", lines.len());
        Ok(lines)
    }

    /// Send a command whose success reply carries a dot-terminated block
    ///
    /// Any code other than `accepted` is a protocol error naming `command`.
    pub(super) async fn block_command(
        &mut self,
        command: &'static str,
        request: &str,
        accepted: ResponseCode,
    ) -> Result<Vec<String>> {
        self.send_command(request).await?;
        let response = self.read_response().await?;
        if response.code != accepted {
            return Err(unexpected(command, response));
        }
        let lines = self.read_dot_lines().await?;
        debug!("{}: {} lines", command, lines.len());
        Ok(lines)
    }

    /// Read a header block through `decoder`, up to the blank line or the end
    /// of the block, whichever comes first
    ///
    /// Reads byte by byte so nothing past the header block is consumed; the
    /// decoder is left positioned at the start of the body.
    pub(super) async fn read_headers(&mut self, decoder: &mut DotDecoder) -> Result<Headers> {
        let limit = self.config.multiline_timeout;
        let stream = &mut self.stream;
        let read = async {
            let mut reader = DotReader::with_decoder(stream, decoder);
            let mut lines = Vec::new();
            let mut line_bytes = Vec::with_capacity(LINE_CAPACITY);
            loop {
                let byte = match reader.read_u8().await {
                    Ok(byte) => byte,
                    // End of block: DotReader reports EOF only after the terminator.
                    Err(e)
                        if e.kind() == std::io::ErrorKind::UnexpectedEof && reader.is_finished() =>
                    {
                        break;
                    }
                    Err(e) => return Err(NntpError::Io(e)),
                };
                if byte != b'\n' {
                    line_bytes.push(byte);
                    continue;
                }
                let line = commands::trim_line_ending(&String::from_utf8_lossy(&line_bytes)).to_string();
                line_bytes.clear();
                if line.is_empty() {
                    break;
                }
                lines.push(line);
            }
            if !line_bytes.is_empty() {
                lines.push(
                    commands::trim_line_ending(&String::from_utf8_lossy(&line_bytes)).to_string(),
                );
            }
            Headers::parse_lines(&lines)
        };
        let result = with_timeout(limit, read).await;
        let headers = self.check(result)?;
        trace!("Received {} header fields", headers.len());
        Ok(headers)
    }

    /// Dot-encoding writer over the connection's write half
    ///
    /// The block is terminated when the writer is shut down.
    pub(super) fn dot_writer(&mut self) -> DotWriter<&mut Box<dyn NntpIo>> {
        DotWriter::new(self.stream.get_mut())
    }

    /// Read and discard the remainder of a block through `decoder`
    pub(super) async fn skip_block(&mut self, decoder: &mut DotDecoder) -> Result<u64> {
        if decoder.is_finished() {
            return Ok(0);
        }
        let limit = self.config.multiline_timeout;
        let stream = &mut self.stream;
        let drain = async {
            let mut reader = DotReader::with_decoder(stream, decoder);
            Ok::<_, NntpError>(tokio::io::copy(&mut reader, &mut tokio::io::sink()).await?)
        };
        let result = with_timeout(limit, drain).await;
        self.check(result)
    }
}
