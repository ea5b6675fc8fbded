//! Dot-stuffing codec for multi-line data blocks (RFC 977 §2.4.1, RFC 3977 §3.1.1)
//!
//! Multi-line blocks end with a line holding a single `.`; a data line that
//! starts with `.` is sent with the dot doubled. [`DotReader`] undoes that on
//! the way in and [`DotWriter`] applies it on the way out.
//!
//! The reader is lazy: it only consumes from the underlying buffered source
//! the bytes it has decoded, and it never reads past the terminator line, so
//! it can sit directly on a live connection.

use std::borrow::{Borrow, BorrowMut};
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use tokio::io::{AsyncBufRead, AsyncRead, AsyncWrite, ReadBuf};

/// Terminator line of a dot-encoded block
pub const TERMINATOR: &[u8] = b".\r\n";

/// Decoder state, one per position class within a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DotState {
    /// At the first byte of a line
    #[default]
    BeginLine,
    /// Saw `.` as the first byte of a line
    Dot,
    /// Saw `.` CR at the start of a line
    DotCr,
    /// Saw a CR that may end the line
    Cr,
    /// Inside a line
    Data,
    /// Consumed the terminator line
    Done,
}

enum Step {
    Skip,
    Emit(u8),
    EmitCrThen(u8),
}

/// Byte-at-a-time dot decoding state machine
///
/// Kept separate from the I/O so the state can outlive a single reader: the
/// client stores it while an article body is handed out and resumes it to
/// drain whatever the caller left unread.
#[derive(Debug, Clone, Default)]
pub struct DotDecoder {
    state: DotState,
    /// Data byte owed to the caller after an emitted CR that had no room
    held: Option<u8>,
}

impl DotDecoder {
    /// Decoder positioned at the first byte after a status line
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> DotState {
        self.state
    }

    /// True once the terminator line has been consumed
    pub fn is_finished(&self) -> bool {
        self.state == DotState::Done && self.held.is_none()
    }

    fn step(&mut self, c: u8) -> Step {
        use DotState::*;

        let (next, step) = match (self.state, c) {
            (BeginLine, b'.') => (Dot, Step::Skip),
            (BeginLine, b'\r') => (Cr, Step::Emit(c)),
            (BeginLine, _) => (Data, Step::Emit(c)),

            // The leading dot is dropped; the CR is withheld until the next
            // byte shows whether this is the terminator.
            (Dot, b'\r') => (DotCr, Step::Skip),
            (Dot, b'\n') => (Done, Step::Skip),
            (Dot, _) => (Data, Step::Emit(c)),

            (DotCr, b'\n') => (Done, Step::Skip),
            (DotCr, _) => (Data, Step::EmitCrThen(c)),

            (Cr, b'\n') => (BeginLine, Step::Emit(c)),
            (Cr, _) => (Data, Step::Emit(c)),

            (Data, b'\r') => (Cr, Step::Emit(c)),
            (Data, b'\n') => (BeginLine, Step::Emit(c)),
            (Data, _) => (Data, Step::Emit(c)),

            (Done, _) => (Done, Step::Skip),
        };
        self.state = next;
        step
    }

    /// Decode as much of `input` as fits, appending to `output`
    ///
    /// Returns the number of input bytes consumed. Decoding stops right after
    /// the terminator line; bytes beyond it are left unconsumed.
    pub fn decode(&mut self, input: &[u8], output: &mut Vec<u8>) -> usize {
        if let Some(b) = self.held.take() {
            output.push(b);
        }
        let mut consumed = 0;
        for &c in input {
            if self.state == DotState::Done {
                break;
            }
            consumed += 1;
            match self.step(c) {
                Step::Skip => {}
                Step::Emit(b) => output.push(b),
                Step::EmitCrThen(b) => output.extend_from_slice(&[b'\r', b]),
            }
        }
        consumed
    }

    fn flush_held(&mut self, out: &mut ReadBuf<'_>) -> bool {
        if let Some(b) = self.held {
            if out.remaining() == 0 {
                return false;
            }
            out.put_slice(&[b]);
            self.held = None;
        }
        true
    }

    /// Same as [`decode`](Self::decode) but bounded by the room left in `out`
    fn decode_into(&mut self, input: &[u8], out: &mut ReadBuf<'_>) -> usize {
        let mut consumed = 0;
        for &c in input {
            if self.state == DotState::Done || !self.flush_held(out) || out.remaining() == 0 {
                break;
            }
            consumed += 1;
            match self.step(c) {
                Step::Skip => {}
                Step::Emit(b) => out.put_slice(&[b]),
                Step::EmitCrThen(b) => {
                    out.put_slice(b"\r");
                    self.held = Some(b);
                }
            }
        }
        self.flush_held(out);
        consumed
    }
}

/// Async reader yielding the decoded content of one dot-terminated block
///
/// Reports EOF once the terminator has been consumed and fails with
/// [`io::ErrorKind::UnexpectedEof`] if the source ends first. The decoder
/// can be owned (the default) or borrowed from elsewhere via
/// [`with_decoder`](Self::with_decoder).
#[derive(Debug)]
pub struct DotReader<R, D = DotDecoder> {
    inner: R,
    decoder: D,
}

impl<R> DotReader<R> {
    /// Start decoding a fresh block from `inner`
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            decoder: DotDecoder::new(),
        }
    }
}

impl<R, D> DotReader<R, D> {
    /// Resume decoding with an existing decoder state
    pub fn with_decoder(inner: R, decoder: D) -> Self {
        Self { inner, decoder }
    }

    /// Give back the underlying source
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R, D: Borrow<DotDecoder>> DotReader<R, D> {
    /// True once the terminator line has been consumed
    pub fn is_finished(&self) -> bool {
        self.decoder.borrow().is_finished()
    }
}

impl<R, D> AsyncRead for DotReader<R, D>
where
    R: AsyncBufRead + Unpin,
    D: BorrowMut<DotDecoder> + Unpin,
{
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let decoder = this.decoder.borrow_mut();
        let start = buf.filled().len();

        decoder.flush_held(buf);
        while buf.remaining() > 0 && decoder.state != DotState::Done {
            let available = match Pin::new(&mut this.inner).poll_fill_buf(cx) {
                Poll::Ready(Ok(available)) => available,
                Poll::Ready(Err(e)) => return Poll::Ready(Err(e)),
                Poll::Pending if buf.filled().len() > start => break,
                Poll::Pending => return Poll::Pending,
            };
            if available.is_empty() {
                if buf.filled().len() > start {
                    break;
                }
                return Poll::Ready(Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed before end of dot-terminated block",
                )));
            }
            let consumed = decoder.decode_into(available, buf);
            Pin::new(&mut this.inner).consume(consumed);
        }

        Poll::Ready(Ok(()))
    }
}

/// Async writer that dot-stuffs a block and terminates it on shutdown
///
/// Bare LFs go out as CRLF, so every line on the wire ends in CRLF.
/// `shutdown()` writes the terminator line (preceded by CRLF if the last
/// line was left open) and flushes, but leaves the underlying stream open.
/// A writer that is never shut down never terminates the block.
#[derive(Debug)]
pub struct DotWriter<W> {
    inner: W,
    at_line_start: bool,
    /// Last byte written was CR, possibly in an earlier write
    after_cr: bool,
    terminated: bool,
    pending: Vec<u8>,
    written: usize,
}

impl<W> DotWriter<W> {
    /// Start a new block on `inner`
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            at_line_start: true,
            after_cr: false,
            terminated: false,
            pending: Vec::new(),
            written: 0,
        }
    }

    /// Give back the underlying stream
    pub fn into_inner(self) -> W {
        self.inner
    }

    fn encode(&mut self, data: &[u8]) {
        self.pending.reserve(data.len() + 1);
        for &c in data {
            if self.at_line_start && c == b'.' {
                self.pending.push(b'.');
            }
            if c == b'\n' && !self.after_cr {
                self.pending.push(b'\r');
            }
            self.pending.push(c);
            self.at_line_start = c == b'\n';
            self.after_cr = c == b'\r';
        }
    }

    /// Queue the end of the block: close an open last line, then `.` CRLF
    fn finish(&mut self) {
        if self.after_cr {
            self.pending.push(b'\n');
        } else if !self.at_line_start {
            self.pending.extend_from_slice(b"\r\n");
        }
        self.pending.extend_from_slice(TERMINATOR);
        self.at_line_start = true;
        self.after_cr = false;
    }
}

impl<W: AsyncWrite + Unpin> DotWriter<W> {
    fn poll_drain(&mut self, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        while self.written < self.pending.len() {
            let n = ready!(Pin::new(&mut self.inner).poll_write(cx, &self.pending[self.written..]))?;
            if n == 0 {
                return Poll::Ready(Err(io::ErrorKind::WriteZero.into()));
            }
            self.written += n;
        }
        self.pending.clear();
        self.written = 0;
        Poll::Ready(Ok(()))
    }
}

impl<W: AsyncWrite + Unpin> AsyncWrite for DotWriter<W> {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        if this.terminated {
            return Poll::Ready(Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "dot-encoded block already terminated",
            )));
        }
        ready!(this.poll_drain(cx))?;
        this.encode(buf);
        if let Poll::Ready(Err(e)) = this.poll_drain(cx) {
            return Poll::Ready(Err(e));
        }
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        ready!(this.poll_drain(cx))?;
        Pin::new(&mut this.inner).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        if !this.terminated {
            this.finish();
            this.terminated = true;
        }
        ready!(this.poll_drain(cx))?;
        Pin::new(&mut this.inner).poll_flush(cx)
    }
}

/// Dot-encode a complete buffer, terminator included
pub fn dot_encode(data: &[u8]) -> Vec<u8> {
    let mut writer = DotWriter::new(());
    writer.encode(data);
    writer.finish();
    writer.pending
}

/// Decode one complete dot-terminated block held in memory
///
/// Returns the decoded bytes and the number of input bytes consumed, which
/// includes the terminator line. Fails with `UnexpectedEof` if `data` ends
/// before the terminator.
pub fn dot_decode(data: &[u8]) -> io::Result<(Vec<u8>, usize)> {
    let mut decoder = DotDecoder::new();
    let mut out = Vec::with_capacity(data.len());
    let consumed = decoder.decode(data, &mut out);
    if !decoder.is_finished() {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "dot-terminated block is missing its terminator",
        ));
    }
    Ok((out, consumed))
}
