use bytes::{Buf, Bytes, BytesMut};
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

const READ_BUFFER_SIZE: usize = 512;

/// Result of [`ByteStream::read_until`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadUntil {
    /// The delimiter was consumed; this many bytes precede it.
    Found(usize),
    /// The stream ended after this many bytes, without a delimiter.
    Eof(usize),
    /// The buffer filled up before the delimiter was seen.
    Overflow(usize),
}

/// An accepted connection, read one byte at a time.
///
/// Reads wait for the peer; implementations are expected to bound that wait
/// and fail with [`io::ErrorKind::TimedOut`] when it runs out.
#[allow(async_fn_in_trait)]
pub trait ByteStream {
    /// Reads a single byte. `None` means the peer closed its side.
    async fn read_byte(&mut self) -> io::Result<Option<u8>>;

    /// Number of bytes that can be read right now without waiting.
    fn available(&mut self) -> usize;

    async fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;

    async fn close(&mut self) -> io::Result<()>;

    /// Reads into `buf` until `delim` is consumed.
    ///
    /// The delimiter itself is not stored. Nothing is ever written past the
    /// end of `buf`: the byte that would overflow it is discarded and
    /// [`ReadUntil::Overflow`] is returned.
    async fn read_until(&mut self, delim: u8, buf: &mut [u8]) -> io::Result<ReadUntil> {
        let mut len = 0;
        loop {
            match self.read_byte().await? {
                None => return Ok(ReadUntil::Eof(len)),
                Some(byte) if byte == delim => return Ok(ReadUntil::Found(len)),
                Some(byte) => {
                    if len == buf.len() {
                        return Ok(ReadUntil::Overflow(len));
                    }
                    buf[len] = byte;
                    len += 1;
                }
            }
        }
    }
}

/// A TCP client connection with a small fixed read buffer.
pub struct TcpConnection {
    stream: TcpStream,
    buffer: [u8; READ_BUFFER_SIZE],
    pos: usize,
    len: usize,
    read_timeout: Duration,
}

impl TcpConnection {
    pub fn new(stream: TcpStream, read_timeout: Duration) -> Self {
        Self {
            stream,
            buffer: [0; READ_BUFFER_SIZE],
            pos: 0,
            len: 0,
            read_timeout,
        }
    }

    pub fn peer_addr(&self) -> io::Result<SocketAddr> {
        self.stream.peer_addr()
    }

    async fn fill(&mut self) -> io::Result<usize> {
        let n = timeout(self.read_timeout, self.stream.read(&mut self.buffer))
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "read timed out"))??;

        self.pos = 0;
        self.len = n;
        Ok(n)
    }
}

impl ByteStream for TcpConnection {
    async fn read_byte(&mut self) -> io::Result<Option<u8>> {
        if self.pos == self.len && self.fill().await? == 0 {
            return Ok(None);
        }

        let byte = self.buffer[self.pos];
        self.pos += 1;
        Ok(Some(byte))
    }

    fn available(&mut self) -> usize {
        if self.pos == self.len {
            // Top up without waiting; WouldBlock simply means nothing is there yet.
            match self.stream.try_read(&mut self.buffer) {
                Ok(n) => {
                    self.pos = 0;
                    self.len = n;
                }
                Err(_) => return 0,
            }
        }

        self.len - self.pos
    }

    async fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.stream.write_all(bytes).await?;
        self.stream.flush().await
    }

    async fn close(&mut self) -> io::Result<()> {
        self.stream.shutdown().await
    }
}

/// An in-memory connection: reads from a fixed input, records everything
/// written to it.
#[derive(Debug, Default)]
pub struct MemoryStream {
    input: Bytes,
    output: BytesMut,
    closed: bool,
    stalled: bool,
}

impl MemoryStream {
    pub fn new(input: impl Into<Bytes>) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }

    /// Once the input is exhausted, reads time out instead of reporting
    /// end of stream, like a client that stopped sending.
    pub fn stalled(mut self) -> Self {
        self.stalled = true;
        self
    }

    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Input bytes not consumed yet.
    pub fn remaining(&self) -> usize {
        self.input.remaining()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl ByteStream for MemoryStream {
    async fn read_byte(&mut self) -> io::Result<Option<u8>> {
        if self.input.has_remaining() {
            return Ok(Some(self.input.get_u8()));
        }
        if self.stalled {
            return Err(io::Error::new(io::ErrorKind::TimedOut, "read timed out"));
        }
        Ok(None)
    }

    fn available(&mut self) -> usize {
        self.input.remaining()
    }

    async fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        if self.closed {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "connection closed",
            ));
        }
        self.output.extend_from_slice(bytes);
        Ok(())
    }

    async fn close(&mut self) -> io::Result<()> {
        self.closed = true;
        Ok(())
    }
}
