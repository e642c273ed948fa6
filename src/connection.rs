// ABOUTME: Length-prefixed PDU framing over any async byte stream
// ABOUTME: Reads exactly one PDU at a time and writes each PDU in full

use crate::client::error::{SmppError, SmppResult};
use crate::codec::{CodecError, DEFAULT_MAX_PDU_LENGTH, HEADER_LEN, Pdu};
use bytes::BytesMut;
use std::io;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::debug;

/// Frame-level transport for an SMPP session.
///
/// Every PDU starts with its own 4 byte `command_length`, so a read takes the
/// length first, validates it, then takes exactly the remaining bytes. The
/// stream is generic so a session can run over TCP in production and over an
/// in-memory pipe in tests.
///
/// The read side is buffered so [`Connection::wait_readable`] can wait for
/// data without consuming it.
#[derive(Debug)]
pub struct Connection<S> {
    stream: BufReader<S>,

    // Reads announcing more than this many bytes are refused.
    max_pdu_length: u32,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Create a new `Connection`, backed by `stream`.
    pub fn new(stream: S) -> Connection<S> {
        Self::with_max_pdu_length(stream, DEFAULT_MAX_PDU_LENGTH)
    }

    pub fn with_max_pdu_length(stream: S, max_pdu_length: u32) -> Connection<S> {
        Connection {
            stream: BufReader::new(stream),
            max_pdu_length,
        }
    }

    /// Read a single PDU from the underlying stream.
    ///
    /// A `command_length` outside `16..=max_pdu_length` fails with
    /// `MalformedPdu` before the body is read. If the stream ends before the
    /// announced number of bytes arrives, `TransportClosed` is returned.
    pub async fn read_pdu(&mut self) -> SmppResult<Pdu> {
        let mut length = [0u8; 4];
        self.read_exact(&mut length).await?;

        let command_length = u32::from_be_bytes(length);
        if command_length < HEADER_LEN as u32 || command_length > self.max_pdu_length {
            return Err(CodecError::InvalidPduLength {
                length: command_length,
                min: HEADER_LEN as u32,
                max: self.max_pdu_length,
            }
            .into());
        }

        let mut buf = BytesMut::zeroed(command_length as usize);
        buf[..4].copy_from_slice(&length);
        self.read_exact(&mut buf[4..]).await?;

        let pdu = Pdu::decode(buf.freeze())?;
        debug!(
            sequence_number = pdu.sequence_number(),
            "<- received PDU\n{pdu}"
        );
        Ok(pdu)
    }

    /// Write a single PDU to the underlying stream.
    ///
    /// The PDU is encoded up front and written in a loop until the transport
    /// has accepted every byte. A write that accepts nothing means the peer
    /// is gone.
    pub async fn write_pdu(&mut self, pdu: &Pdu) -> SmppResult<()> {
        debug!(
            sequence_number = pdu.sequence_number(),
            "-> sending PDU\n{pdu}"
        );

        let bytes = pdu.encode();
        let mut written = 0;
        while written < bytes.len() {
            let n = self
                .stream
                .write(&bytes[written..])
                .await
                .map_err(transport_error)?;
            if n == 0 {
                return Err(SmppError::TransportClosed);
            }
            written += n;
        }

        self.stream.flush().await.map_err(transport_error)?;
        Ok(())
    }

    /// Wait up to `timeout` for inbound data.
    ///
    /// Returns `Ok(true)` when at least one byte is buffered and
    /// `Ok(false)` on timeout. Nothing is consumed, so dropping this future
    /// (for instance from a `select!`) loses no data.
    pub async fn wait_readable(&mut self, timeout: Duration) -> SmppResult<bool> {
        match tokio::time::timeout(timeout, self.stream.fill_buf()).await {
            Err(_elapsed) => Ok(false),
            Ok(Ok(buf)) if buf.is_empty() => Err(SmppError::TransportClosed),
            Ok(Ok(_)) => Ok(true),
            Ok(Err(e)) => Err(transport_error(e)),
        }
    }

    /// Shut down the write half, signalling end-of-stream to the peer.
    pub async fn shutdown(&mut self) -> SmppResult<()> {
        self.stream.shutdown().await?;
        Ok(())
    }

    async fn read_exact(&mut self, buf: &mut [u8]) -> SmppResult<()> {
        self.stream.read_exact(buf).await.map_err(transport_error)?;
        Ok(())
    }
}

/// Errors meaning the peer is gone become `TransportClosed`; the rest stay `Io`.
fn transport_error(e: io::Error) -> SmppError {
    match e.kind() {
        io::ErrorKind::UnexpectedEof
        | io::ErrorKind::BrokenPipe
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted => SmppError::TransportClosed,
        _ => SmppError::Io(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::CommandId;
    use bytes::Bytes;
    use tokio::io::duplex;

    fn header(length: u32, id: u32, seq: u32) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&length.to_be_bytes());
        data.extend_from_slice(&id.to_be_bytes());
        data.extend_from_slice(&0u32.to_be_bytes());
        data.extend_from_slice(&seq.to_be_bytes());
        data
    }

    #[tokio::test]
    async fn header_only_frame_has_no_body() {
        let (client, mut server) = duplex(256);
        let mut conn = Connection::new(client);

        for id in [0x0000_0015u32, 0x0000_0004, 0x1234_5678] {
            server.write_all(&header(16, id, 9)).await.unwrap();
            let pdu = conn.read_pdu().await.unwrap();
            assert_eq!(pdu.command_id(), id);
            assert!(pdu.body().is_none());
        }
    }

    #[tokio::test]
    async fn frame_with_body() {
        let (client, mut server) = duplex(256);
        let mut conn = Connection::new(client);

        let mut data = header(20, 0x8000_0004, 2);
        data.extend_from_slice(b"abc\0");
        server.write_all(&data).await.unwrap();

        let pdu = conn.read_pdu().await.unwrap();
        assert_eq!(pdu.command(), Some(CommandId::SubmitSmResp));
        assert_eq!(pdu.body().unwrap().as_ref(), b"abc\0");
    }

    #[tokio::test]
    async fn consecutive_frames_are_split_correctly() {
        let (client, mut server) = duplex(256);
        let mut conn = Connection::new(client);

        let mut data = header(18, 0x0000_0005, 1);
        data.extend_from_slice(b"xy");
        data.extend_from_slice(&header(16, 0x0000_0015, 2));
        server.write_all(&data).await.unwrap();

        assert_eq!(conn.read_pdu().await.unwrap().sequence_number(), 1);
        assert_eq!(conn.read_pdu().await.unwrap().sequence_number(), 2);
    }

    #[tokio::test]
    async fn length_below_header_is_malformed() {
        let (client, mut server) = duplex(256);
        let mut conn = Connection::new(client);

        server.write_all(&header(15, 0x15, 1)).await.unwrap();
        let err = conn.read_pdu().await.unwrap_err();
        assert!(matches!(
            err,
            SmppError::MalformedPdu(CodecError::InvalidPduLength { length: 15, .. })
        ));
    }

    #[tokio::test]
    async fn length_above_ceiling_is_malformed() {
        let (client, mut server) = duplex(512);
        let mut conn = Connection::new(client);

        server.write_all(&header(255, 0x05, 1)).await.unwrap();
        let err = conn.read_pdu().await.unwrap_err();
        assert!(matches!(
            err,
            SmppError::MalformedPdu(CodecError::InvalidPduLength {
                length: 255,
                max: 254,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn raised_ceiling_accepts_larger_frames() {
        let (client, mut server) = duplex(1024);
        let mut conn = Connection::with_max_pdu_length(client, 1024);

        let mut data = header(300, 0x05, 1);
        data.resize(300, b'z');
        server.write_all(&data).await.unwrap();

        let pdu = conn.read_pdu().await.unwrap();
        assert_eq!(pdu.command_length(), 300);
    }

    #[tokio::test]
    async fn short_read_is_transport_closed() {
        let (client, mut server) = duplex(256);
        let mut conn = Connection::new(client);

        let mut data = header(24, 0x05, 1);
        data.extend_from_slice(b"abc");
        server.write_all(&data).await.unwrap();
        drop(server);

        assert!(matches!(conn.read_pdu().await, Err(SmppError::TransportClosed)));
    }

    #[tokio::test]
    async fn eof_before_length_is_transport_closed() {
        let (client, server) = duplex(256);
        let mut conn = Connection::new(client);
        drop(server);

        assert!(matches!(conn.read_pdu().await, Err(SmppError::TransportClosed)));
    }

    #[tokio::test]
    async fn write_survives_partial_writes() {
        // An 8 byte pipe forces the writer to loop.
        let (client, server) = duplex(8);
        let mut writer = Connection::new(client);
        let mut reader = Connection::new(server);

        let pdu = Pdu::request(CommandId::SubmitSm, 5, Some(Bytes::from(vec![7u8; 40])));
        let (written, read) = tokio::join!(writer.write_pdu(&pdu), reader.read_pdu());

        written.unwrap();
        assert_eq!(read.unwrap(), pdu);
    }

    #[tokio::test]
    async fn write_to_closed_peer_fails() {
        let (client, server) = duplex(64);
        let mut conn = Connection::new(client);
        drop(server);

        let result = conn.write_pdu(&Pdu::request(CommandId::EnquireLink, 1, None)).await;
        assert!(matches!(result, Err(SmppError::TransportClosed)));
    }

    #[test]
    fn peer_gone_errors_map_to_transport_closed() {
        for kind in [
            io::ErrorKind::UnexpectedEof,
            io::ErrorKind::BrokenPipe,
            io::ErrorKind::ConnectionReset,
            io::ErrorKind::ConnectionAborted,
        ] {
            assert!(matches!(
                transport_error(io::Error::from(kind)),
                SmppError::TransportClosed
            ));
        }
        assert!(matches!(
            transport_error(io::Error::from(io::ErrorKind::PermissionDenied)),
            SmppError::Io(_)
        ));
    }

    #[tokio::test]
    async fn wait_readable_times_out_then_sees_data() {
        let (client, mut server) = duplex(64);
        let mut conn = Connection::new(client);

        assert!(!conn.wait_readable(Duration::from_millis(10)).await.unwrap());

        server.write_all(&header(16, 0x15, 3)).await.unwrap();
        assert!(conn.wait_readable(Duration::from_secs(1)).await.unwrap());

        // data seen by the readiness check is still there for the read
        assert_eq!(conn.read_pdu().await.unwrap().sequence_number(), 3);
    }

    #[tokio::test]
    async fn wait_readable_reports_closed_stream() {
        let (client, server) = duplex(64);
        let mut conn = Connection::new(client);
        drop(server);

        assert!(matches!(
            conn.wait_readable(Duration::from_secs(1)).await,
            Err(SmppError::TransportClosed)
        ));
    }
}
