//! TCP stream to a single chat server.
//!
//! A [`Connection`] is either disconnected or owns both halves of an open
//! stream; there is no in-between. Inbound bytes are framed into lines by
//! [`LineDecoder`](codec::LineDecoder), outbound lines are written verbatim.

mod codec;

use std::fmt;
use std::net::SocketAddr;

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio_util::codec::FramedRead;
use tracing::{debug, trace, warn};

use crate::error::ConnectionError;
use crate::util::MAX_LINE_LEN;

use self::codec::{Frame, LineDecoder};

enum State {
    Disconnected,
    Connected {
        reader: FramedRead<OwnedReadHalf, LineDecoder>,
        writer: OwnedWriteHalf,
        peer: SocketAddr,
    },
}

/// A redialable line stream to `host:port`.
///
/// Every I/O method takes `&mut self`; sharing one connection between tasks
/// requires the caller to serialise access.
pub struct Connection {
    host: String,
    port: u16,
    state: State,
}

fn endpoint(host: &str, port: u16) -> String {
    format!("{}:{}", host, port)
}

fn enable_keepalive(stream: &TcpStream) -> std::io::Result<()> {
    use socket2::{SockRef, TcpKeepalive};
    use std::time::Duration;

    let sock = SockRef::from(stream);
    let keepalive = TcpKeepalive::new()
        .with_time(Duration::from_secs(120))
        .with_interval(Duration::from_secs(30));

    sock.set_tcp_keepalive(&keepalive)
}

impl Connection {
    /// Creates a disconnected connection. No I/O happens until [`dial`](Self::dial).
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            state: State::Disconnected,
        }
    }

    /// Opens a fresh stream, closing any existing one first.
    ///
    /// On failure the connection is left disconnected and the transport
    /// error is returned unchanged. There is no retry.
    pub async fn dial(&mut self) -> Result<SocketAddr, ConnectionError> {
        self.teardown().await;

        let stream = TcpStream::connect((self.host.as_str(), self.port)).await?;
        if let Err(e) = enable_keepalive(&stream) {
            warn!("failed to enable TCP keepalive: {}", e);
        }
        let peer = stream.peer_addr()?;

        let (read, write) = stream.into_split();
        self.state = State::Connected {
            reader: FramedRead::new(read, LineDecoder::new(MAX_LINE_LEN)),
            writer: write,
            peer,
        };

        debug!(endpoint = %self, %peer, "connected");
        Ok(peer)
    }

    /// Closes the stream. Disconnecting twice is a no-op.
    ///
    /// The connection is disconnected afterwards even if the shutdown
    /// itself reports an error.
    pub async fn disconnect(&mut self) -> Result<(), ConnectionError> {
        match std::mem::replace(&mut self.state, State::Disconnected) {
            State::Connected { mut writer, .. } => {
                debug!(endpoint = %self, "disconnecting");
                writer.shutdown().await?;
                Ok(())
            }
            State::Disconnected => Ok(()),
        }
    }

    async fn teardown(&mut self) {
        if let State::Connected { mut writer, .. } =
            std::mem::replace(&mut self.state, State::Disconnected)
        {
            debug!(endpoint = %self, "closing previous stream before redial");
            if let Err(e) = writer.shutdown().await {
                debug!("shutdown of previous stream failed: {}", e);
            }
        }
    }

    /// Writes `line` exactly as given; include the `\n` terminator.
    ///
    /// Fails without touching the network when disconnected. Never redials.
    pub async fn send(&mut self, line: &str) -> Result<(), ConnectionError> {
        match &mut self.state {
            State::Connected { writer, .. } => {
                writer.write_all(line.as_bytes()).await?;
                trace!(bytes = line.len(), "sent line");
                Ok(())
            }
            State::Disconnected => Err(ConnectionError::Disconnected {
                message: line.to_string(),
                endpoint: endpoint(&self.host, self.port),
            }),
        }
    }

    /// Waits for the next line, returned without its terminator.
    ///
    /// Bytes that are not valid UTF-8 are replaced with `U+FFFD`. A line
    /// over [`MAX_LINE_LEN`] is skipped and reported as
    /// [`ConnectionError::LineTooLong`]; the next call returns the line after
    /// it. Only the peer closing the stream is reported as
    /// [`ConnectionError::Eof`].
    pub async fn read_line(&mut self) -> Result<String, ConnectionError> {
        let State::Connected { reader, .. } = &mut self.state else {
            return Err(ConnectionError::NotConnected {
                endpoint: endpoint(&self.host, self.port),
            });
        };

        match reader.next().await {
            Some(Ok(Frame::Line(line))) => {
                trace!(bytes = line.len(), "received line");
                Ok(line)
            }
            Some(Ok(Frame::Overflow)) => {
                debug!(endpoint = %self, limit = MAX_LINE_LEN, "skipped over-long line");
                Err(ConnectionError::LineTooLong { limit: MAX_LINE_LEN })
            }
            Some(Err(e)) => Err(e.into()),
            None => Err(ConnectionError::Eof {
                endpoint: endpoint(&self.host, self.port),
            }),
        }
    }

    /// Returns true while a stream is open.
    pub fn is_connected(&self) -> bool {
        matches!(self.state, State::Connected { .. })
    }

    /// `host:port`.
    pub fn endpoint(&self) -> String {
        endpoint(&self.host, self.port)
    }

    /// Host name given at construction.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port given at construction.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Address of the peer while connected.
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        match &self.state {
            State::Connected { peer, .. } => Some(*peer),
            State::Disconnected => None,
        }
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("peer", &self.peer_addr())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    async fn listener() -> (TcpListener, u16) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        (listener, port)
    }

    #[test]
    fn test_new_is_disconnected() {
        let conn = Connection::new("irc.chat.twitch.tv", 6667);
        assert!(!conn.is_connected());
        assert_eq!(conn.endpoint(), "irc.chat.twitch.tv:6667");
        assert_eq!(conn.to_string(), "irc.chat.twitch.tv:6667");
        assert!(conn.peer_addr().is_none());
    }

    #[tokio::test]
    async fn test_send_disconnected_fails() {
        let mut conn = Connection::new("localhost", 6667);
        let err = conn.send("JOIN #rust\n").await.unwrap_err();
        match &err {
            ConnectionError::Disconnected { message, endpoint } => {
                assert_eq!(message, "JOIN #rust\n");
                assert_eq!(endpoint, "localhost:6667");
            }
            other => panic!("Expected Disconnected, got {:?}", other),
        }
        assert!(err.to_string().contains("localhost:6667"));
    }

    #[tokio::test]
    async fn test_read_disconnected_fails() {
        let mut conn = Connection::new("localhost", 6667);
        assert!(matches!(
            conn.read_line().await,
            Err(ConnectionError::NotConnected { .. })
        ));
    }

    #[tokio::test]
    async fn test_dial_refused_leaves_disconnected() {
        let (listener, port) = listener().await;
        drop(listener);

        let mut conn = Connection::new("127.0.0.1", port);
        assert!(matches!(conn.dial().await, Err(ConnectionError::Io(_))));
        assert!(!conn.is_connected());
        assert!(conn.peer_addr().is_none());
    }

    #[tokio::test]
    async fn test_send_and_read_lines() {
        let (listener, port) = listener().await;
        let mut conn = Connection::new("127.0.0.1", port);
        let peer = conn.dial().await.unwrap();
        assert_eq!(peer.port(), port);
        assert!(conn.is_connected());

        let (mut server, _) = listener.accept().await.unwrap();
        server.write_all(b"PING :tmi.twitch.tv\r\n:a!a@h JOIN #c\n").await.unwrap();

        assert_eq!(conn.read_line().await.unwrap(), "PING :tmi.twitch.tv");
        assert_eq!(conn.read_line().await.unwrap(), ":a!a@h JOIN #c");

        conn.send("PONG\n").await.unwrap();
        let mut buf = [0u8; 5];
        server.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"PONG\n");
    }

    #[tokio::test]
    async fn test_read_eof() {
        let (listener, port) = listener().await;
        let mut conn = Connection::new("127.0.0.1", port);
        conn.dial().await.unwrap();

        let (server, _) = listener.accept().await.unwrap();
        drop(server);

        let err = conn.read_line().await.unwrap_err();
        assert!(err.is_eof());
    }

    #[tokio::test]
    async fn test_redial_closes_previous_stream() {
        let (listener, port) = listener().await;
        let mut conn = Connection::new("127.0.0.1", port);

        conn.dial().await.unwrap();
        let (mut first, _) = listener.accept().await.unwrap();

        conn.dial().await.unwrap();
        let (_second, _) = listener.accept().await.unwrap();
        assert!(conn.is_connected());

        let mut buf = [0u8; 16];
        assert_eq!(first.read(&mut buf).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failed_redial_resets_state() {
        let (listener, port) = listener().await;
        let mut conn = Connection::new("127.0.0.1", port);

        conn.dial().await.unwrap();
        let (mut first, _) = listener.accept().await.unwrap();
        drop(listener);

        assert!(conn.dial().await.is_err());
        assert!(!conn.is_connected());
        assert!(conn.peer_addr().is_none());
        assert!(matches!(
            conn.send("PING\n").await,
            Err(ConnectionError::Disconnected { .. })
        ));

        let mut buf = [0u8; 16];
        assert_eq!(first.read(&mut buf).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_disconnect_is_idempotent() {
        let (listener, port) = listener().await;
        let mut conn = Connection::new("127.0.0.1", port);
        conn.dial().await.unwrap();
        let (_server, _) = listener.accept().await.unwrap();

        conn.disconnect().await.unwrap();
        assert!(!conn.is_connected());
        conn.disconnect().await.unwrap();
    }

    #[tokio::test]
    async fn test_line_too_long() {
        let (listener, port) = listener().await;
        let mut conn = Connection::new("127.0.0.1", port);
        conn.dial().await.unwrap();

        let (mut server, _) = listener.accept().await.unwrap();
        let long = vec![b'a'; MAX_LINE_LEN + 10];
        server.write_all(&long).await.unwrap();
        server.write_all(b"\nPING :tmi.twitch.tv\n").await.unwrap();

        assert!(matches!(
            conn.read_line().await,
            Err(ConnectionError::LineTooLong { .. })
        ));
        assert_eq!(conn.read_line().await.unwrap(), "PING :tmi.twitch.tv");
        assert!(conn.is_connected());
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_replaced() {
        let (listener, port) = listener().await;
        let mut conn = Connection::new("127.0.0.1", port);
        conn.dial().await.unwrap();

        let (mut server, _) = listener.accept().await.unwrap();
        server.write_all(b"\xff\xfe bad\nPING :tmi.twitch.tv\n").await.unwrap();

        assert_eq!(conn.read_line().await.unwrap(), "\u{fffd}\u{fffd} bad");
        assert_eq!(conn.read_line().await.unwrap(), "PING :tmi.twitch.tv");
    }
}
