//! Stdio framing for MCP messages.
//!
//! Two framings are accepted on input:
//!
//! ```text
//! {"jsonrpc": "2.0", "id": 1, "method": "ping"}\n          (newline-delimited)
//!
//! Content-Length: <length>\r\n                              (header-framed)
//! \r\n
//! {"jsonrpc": "2.0", "id": 1, "method": "ping"}
//! ```
//!
//! Replies are written in the framing of the message they answer.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::Result;

const CONTENT_LENGTH: &str = "content-length:";

/// Largest message body accepted, in bytes.
pub const MAX_MESSAGE_BYTES: usize = 4 * 1024 * 1024;

/// How a message was framed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// One JSON document per line.
    Line,
    /// `Content-Length` header block followed by the body.
    ContentLength,
}

/// A unit of input read from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A decoded message body.
    Message { body: String, framing: Framing },
    /// Input that could not be decoded into a message body.
    Malformed { reason: String, framing: Framing },
}

impl Frame {
    /// Framing to use for the reply.
    pub fn framing(&self) -> Framing {
        match self {
            Frame::Message { framing, .. } | Frame::Malformed { framing, .. } => *framing,
        }
    }
}

/// Outcome of reading one line.
enum LineRead {
    Eof,
    Line,
    TooLong,
}

/// Bidirectional message transport over a reader/writer pair.
pub struct StdioTransport<R, W> {
    reader: R,
    writer: W,
}

impl StdioTransport<tokio::io::BufReader<tokio::io::Stdin>, tokio::io::Stdout> {
    /// Transport over the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(
            tokio::io::BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
        )
    }
}

impl<R, W> StdioTransport<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Read the next message. `Ok(None)` means the input was closed.
    ///
    /// Blank lines between messages are skipped. Undecodable or oversized
    /// input yields [`Frame::Malformed`] and leaves the stream readable; only
    /// I/O failures are errors.
    pub async fn read_frame(&mut self) -> Result<Option<Frame>> {
        let mut line = Vec::new();
        loop {
            line.clear();
            match self.read_line_bytes(&mut line).await? {
                LineRead::Eof => return Ok(None),
                LineRead::TooLong => {
                    return Ok(Some(Frame::Malformed {
                        reason: too_large(None),
                        framing: Framing::Line,
                    }));
                }
                LineRead::Line => {}
            }

            let text = match std::str::from_utf8(&line) {
                Ok(text) => text.trim(),
                Err(e) => {
                    return Ok(Some(Frame::Malformed {
                        reason: format!("invalid UTF-8 in message: {}", e),
                        framing: Framing::Line,
                    }));
                }
            };
            if text.is_empty() {
                continue;
            }

            if is_content_length_header(text) {
                let length = parse_content_length(text);
                return self.read_framed_body(length).await;
            }

            tracing::trace!(json = %text, "received MCP message");
            return Ok(Some(Frame::Message {
                body: text.to_string(),
                framing: Framing::Line,
            }));
        }
    }

    /// Read one line, keeping at most [`MAX_MESSAGE_BYTES`] of it.
    ///
    /// The remainder of an overlong line is consumed and dropped.
    async fn read_line_bytes(&mut self, buf: &mut Vec<u8>) -> Result<LineRead> {
        let limit = MAX_MESSAGE_BYTES as u64 + 1;
        if (&mut self.reader).take(limit).read_until(b'\n', buf).await? == 0 {
            return Ok(LineRead::Eof);
        }
        if buf.len() <= MAX_MESSAGE_BYTES || buf.ends_with(b"\n") {
            return Ok(LineRead::Line);
        }

        let mut rest = Vec::new();
        loop {
            rest.clear();
            let read = (&mut self.reader).take(limit).read_until(b'\n', &mut rest).await?;
            if read == 0 || rest.ends_with(b"\n") {
                break;
            }
        }
        buf.clear();
        Ok(LineRead::TooLong)
    }

    /// Read the rest of a header block and the body it announces.
    ///
    /// An unusable length is reported as malformed once the header block
    /// ends; whatever follows is read as new input.
    async fn read_framed_body(
        &mut self,
        mut length: std::result::Result<usize, String>,
    ) -> Result<Option<Frame>> {
        let mut line = Vec::new();
        loop {
            line.clear();
            match self.read_line_bytes(&mut line).await? {
                LineRead::Eof => {
                    tracing::warn!("input closed inside header block");
                    return Ok(None);
                }
                LineRead::TooLong => {
                    length = Err("header line too long".to_string());
                    continue;
                }
                LineRead::Line => {}
            }

            let header = String::from_utf8_lossy(&line);
            let header = header.trim();
            if header.is_empty() {
                break;
            }
            if is_content_length_header(header) {
                length = parse_content_length(header);
            }
        }

        let malformed = |reason| {
            Ok(Some(Frame::Malformed {
                reason,
                framing: Framing::ContentLength,
            }))
        };

        let length = match length {
            Ok(length) => length,
            Err(reason) => return malformed(reason),
        };

        if length > MAX_MESSAGE_BYTES {
            tokio::io::copy(
                &mut (&mut self.reader).take(length as u64),
                &mut tokio::io::sink(),
            )
            .await?;
            return malformed(too_large(Some(length)));
        }

        let mut body = vec![0u8; length];
        self.reader.read_exact(&mut body).await?;
        match String::from_utf8(body) {
            Ok(body) => {
                tracing::trace!(content_length = length, json = %body, "received MCP message");
                Ok(Some(Frame::Message {
                    body,
                    framing: Framing::ContentLength,
                }))
            }
            Err(e) => malformed(format!("invalid UTF-8 in message: {}", e)),
        }
    }

    /// Write one message in the given framing and flush.
    pub async fn write_frame(&mut self, body: &str, framing: Framing) -> Result<()> {
        match framing {
            Framing::Line => {
                self.writer.write_all(body.as_bytes()).await?;
                self.writer.write_all(b"\n").await?;
            }
            Framing::ContentLength => {
                let header = format!("Content-Length: {}\r\n\r\n", body.len());
                self.writer.write_all(header.as_bytes()).await?;
                self.writer.write_all(body.as_bytes()).await?;
            }
        }
        self.writer.flush().await?;
        tracing::trace!(?framing, json = %body, "sent MCP message");
        Ok(())
    }

    /// Give back the reader and writer.
    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

fn is_content_length_header(line: &str) -> bool {
    line.get(..CONTENT_LENGTH.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(CONTENT_LENGTH))
}

fn parse_content_length(line: &str) -> std::result::Result<usize, String> {
    line.get(CONTENT_LENGTH.len()..)
        .unwrap_or_default()
        .trim()
        .parse()
        .map_err(|e| format!("invalid Content-Length: {}", e))
}

fn too_large(length: Option<usize>) -> String {
    match length {
        Some(length) => format!(
            "message of {} bytes exceeds the {} byte limit",
            length, MAX_MESSAGE_BYTES
        ),
        None => format!("message exceeds the {} byte limit", MAX_MESSAGE_BYTES),
    }
}
