//! WebSocket test client.
//!
//! Performs the opening handshake over a plain `TcpStream`, sends masked
//! frames and decodes the server's unmasked frames.

use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpStream};

use rawsock_ws::protocol::{Frame, OpCode, compute_accept_key};

pub const KEY: &str = "dGhlIHNhbXBsZSBub25jZQ==";

pub struct TestClient {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
    mask_counter: u32,
}

impl TestClient {
    /// Connect and complete the handshake.
    pub fn connect(addr: SocketAddr) -> io::Result<Self> {
        Self::connect_with_id(addr, 0)
    }

    pub fn connect_with_id(addr: SocketAddr, id: usize) -> io::Result<Self> {
        let mut client = Self::connect_raw(addr, id)?;
        client.write_raw(&upgrade_request(KEY))?;

        let (status, headers) = client.read_response_head()?;
        if !status.starts_with("HTTP/1.1 101") {
            return Err(io::Error::other(format!("unexpected status: {status}")));
        }
        let accept = headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("sec-websocket-accept"))
            .map(|(_, value)| value.as_str());
        if accept != Some(compute_accept_key(KEY).as_str()) {
            return Err(io::Error::other(format!("bad accept header: {accept:?}")));
        }
        Ok(client)
    }

    /// Connect without performing the handshake.
    pub fn connect_raw(addr: SocketAddr, id: usize) -> io::Result<Self> {
        let stream = TcpStream::connect(addr)?;
        Ok(Self {
            reader: BufReader::new(stream.try_clone()?),
            writer: stream,
            mask_counter: 0x9E37_79B9u32.wrapping_mul(id as u32 + 1),
        })
    }

    fn next_mask(&mut self) -> [u8; 4] {
        self.mask_counter = self.mask_counter.wrapping_add(0x9E37_79B9);
        self.mask_counter.to_le_bytes()
    }

    pub fn write_raw(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.writer.write_all(bytes)
    }

    pub fn send_frame(&mut self, frame: &Frame) -> io::Result<()> {
        let mask = self.next_mask();
        self.write_raw(&frame.encode_masked(mask))
    }

    pub fn send_text(&mut self, text: &str) -> io::Result<()> {
        self.send_frame(&Frame::text(text))
    }

    pub fn send_binary(&mut self, data: &[u8]) -> io::Result<()> {
        self.send_frame(&Frame::binary(data))
    }

    /// Read one server frame. Fails if the server masked it.
    pub fn recv_frame(&mut self) -> io::Result<Frame> {
        let mut header = [0u8; 2];
        self.reader.read_exact(&mut header)?;
        if header[1] & 0x80 != 0 {
            return Err(io::Error::other("server frame is masked"));
        }
        let len = match header[1] & 0x7f {
            126 => {
                let mut buf = [0u8; 2];
                self.reader.read_exact(&mut buf)?;
                u64::from(u16::from_be_bytes(buf))
            }
            127 => {
                let mut buf = [0u8; 8];
                self.reader.read_exact(&mut buf)?;
                u64::from_be_bytes(buf)
            }
            len => u64::from(len),
        };
        let opcode = OpCode::from_u8(header[0] & 0x0f).map_err(io::Error::other)?;
        let mut payload = vec![0u8; len as usize];
        self.reader.read_exact(&mut payload)?;
        Ok(Frame::new(header[0] & 0x80 != 0, opcode, payload))
    }

    pub fn recv_text(&mut self) -> io::Result<String> {
        let frame = self.recv_frame()?;
        if frame.opcode != OpCode::Text {
            return Err(io::Error::other(format!("expected text, got {}", frame.opcode)));
        }
        String::from_utf8(frame.into_payload()).map_err(io::Error::other)
    }

    /// Read an HTTP response head: status line and headers.
    pub fn read_response_head(&mut self) -> io::Result<(String, Vec<(String, String)>)> {
        let mut status = String::new();
        self.reader.read_line(&mut status)?;
        let mut headers = Vec::new();
        loop {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 || line == "\r\n" {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                headers.push((name.trim().to_string(), value.trim().to_string()));
            }
        }
        Ok((status.trim_end().to_string(), headers))
    }

    /// Bound every later read; a read past the deadline fails.
    pub fn set_read_timeout(&mut self, timeout: std::time::Duration) -> io::Result<()> {
        self.reader.get_ref().set_read_timeout(Some(timeout))
    }

    /// Read until the server closes the connection.
    pub fn read_to_end(&mut self) -> io::Result<Vec<u8>> {
        let mut rest = Vec::new();
        self.reader.read_to_end(&mut rest)?;
        Ok(rest)
    }

    /// Half-close: the server sees end of stream.
    pub fn close(self) -> io::Result<()> {
        self.writer.shutdown(std::net::Shutdown::Write)
    }
}

pub fn upgrade_request(key: &str) -> Vec<u8> {
    format!(
        "GET /chat HTTP/1.1\r\n\
         Host: localhost\r\n\
         Upgrade: websocket\r\n\
         Connection: Upgrade\r\n\
         Sec-WebSocket-Key: {key}\r\n\
         Sec-WebSocket-Version: 13\r\n\
         \r\n"
    )
    .into_bytes()
}
