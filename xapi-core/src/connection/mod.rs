//! The framed wire connection.

pub mod socket;
pub use socket::Socket;

use core::sync::atomic::{AtomicUsize, Ordering};

use memchr::memchr;
use serde::de::Error as _;
use socket::{ReadHalf, WriteHalf};
use tracing::trace;

use crate::{
    fault::Fault,
    wire::{Context, Value},
    Call, Error, Reply, Result, Transport,
};

/// The initial size of the connection buffers.
pub(crate) const BUFFER_SIZE: usize = 16 * 1024;
/// Don't allow messages over 100MB.
const MAX_BUFFER_SIZE: usize = 100 * 1024 * 1024;

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// A request/response connection over a byte stream.
///
/// This is the shipped [`Transport`]: each call is serialized as one JSON
/// document followed by a single NUL byte, and the paired reply is read back
/// the same way. The framing assumes nothing about the stream beyond the
/// [`Socket`] traits, so the same type serves TCP, Unix domain sockets and
/// in-memory test sockets.
///
/// Each connection is assigned a process-unique id, used only in trace logs.
///
/// # Cancel safety
///
/// [`Connection::receive_reply`] is cancel safe: partial messages are kept
/// in the connection's buffer, so the call can be dropped and re-issued
/// freely. [`Connection::send_call`] and [`Connection::call`] are not —
/// cancelling them can leave a partial request or an unread reply on the
/// stream. After such a cancellation (e.g. a caller-side timeout), discard
/// the connection.
#[derive(Debug)]
pub struct Connection<S: Socket> {
    read: S::ReadHalf,
    write: S::WriteHalf,
    read_buffer: Vec<u8>,
    read_pos: usize,
    msg_pos: usize,
    write_buffer: Vec<u8>,
    id: usize,
}

impl<S: Socket> Connection<S> {
    /// Create a connection over `socket`.
    pub fn new(socket: S) -> Self {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        let (read, write) = socket.split();

        Self {
            read,
            write,
            read_buffer: vec![0; BUFFER_SIZE],
            read_pos: 0,
            msg_pos: 0,
            write_buffer: Vec::with_capacity(BUFFER_SIZE),
            id,
        }
    }

    /// The process-unique identifier of the connection.
    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Perform one call: send it and receive the paired reply.
    pub async fn call(&mut self, call: &Call<'_>) -> Result<Value> {
        self.send_call(call).await?;
        self.receive_reply(call.method()).await
    }

    /// Send a method call.
    pub async fn send_call(&mut self, call: &Call<'_>) -> Result<()> {
        trace!("connection {}: sending call: {}", self.id, call.method());
        self.write_buffer.clear();
        serde_json::to_writer(&mut self.write_buffer, call).map_err(|source| {
            Error::Serialize { context: call.method().to_string(), source }
        })?;
        self.write_buffer.push(b'\0');

        self.write.write(&self.write_buffer).await
    }

    /// Receive one reply and unpack its envelope.
    ///
    /// A success envelope yields the raw wire result; a failure envelope
    /// becomes [`Error::Fault`]. `method` is only used to attribute decode
    /// errors, which is also what a failure envelope with an empty
    /// description turns into.
    pub async fn receive_reply(&mut self, method: &str) -> Result<Value> {
        let id = self.id;
        let buffer = self.read_message_bytes().await?;
        trace!("connection {}: received message: {}", id, String::from_utf8_lossy(buffer));

        let reply: Reply = serde_json::from_slice(buffer)
            .map_err(|source| Error::Deserialize { context: Context::result(method).to_string(), source })?;

        match reply {
            Reply::Success { value } => Ok(value),
            Reply::Failure { error_description } => {
                match Fault::from_description(error_description) {
                    Some(fault) => Err(Error::Fault(fault)),
                    None => Err(Error::Deserialize {
                        context: Context::result(method).to_string(),
                        source: serde_json::Error::custom("empty ErrorDescription"),
                    }),
                }
            }
        }
    }

    // Returns the bytes of a single message, reading more from the socket
    // only when none is buffered.
    async fn read_message_bytes(&mut self) -> Result<&[u8]> {
        self.read_from_socket().await?;

        // Unwrap is safe because `read_from_socket` ensures at least one
        // null byte in the buffer.
        let null_index = memchr(b'\0', &self.read_buffer[self.msg_pos..]).unwrap() + self.msg_pos;
        let buffer = &self.read_buffer[self.msg_pos..null_index];
        if self.read_buffer[null_index + 1] == b'\0' {
            // That was the last buffered message; reset the indices.
            self.read_pos = 0;
            self.msg_pos = 0;
        } else {
            self.msg_pos = null_index + 1;
        }

        Ok(buffer)
    }

    // Reads at least one full message from the socket.
    async fn read_from_socket(&mut self) -> Result<()> {
        if self.msg_pos > 0 {
            // At least one full message is already buffered.
            return Ok(());
        }

        loop {
            let bytes_read = self.read.read(&mut self.read_buffer[self.read_pos..]).await?;
            if bytes_read == 0 {
                return Err(Error::UnexpectedEof);
            }
            self.read_pos += bytes_read;

            if self.read_pos == self.read_buffer.len() {
                if self.read_pos >= MAX_BUFFER_SIZE {
                    return Err(Error::BufferOverflow);
                }

                self.read_buffer.extend(core::iter::repeat_n(0, BUFFER_SIZE));
            }

            // Marks the end of all messages: once the loop finishes there
            // are two consecutive null bytes at the end, which is how
            // `read_message_bytes` knows it has drained the buffer and can
            // reset `read_pos`.
            self.read_buffer[self.read_pos] = b'\0';

            if self.read_buffer[self.read_pos - 1] == b'\0' {
                // One or more full messages were read.
                break;
            }
        }

        Ok(())
    }
}

impl<S: Socket> Transport for Connection<S> {
    async fn call(&mut self, call: &Call<'_>) -> Result<Value> {
        Connection::call(self, call).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{test_utils::mock_socket::MockSocket, ErrorKind};

    #[test_log::test(tokio::test)]
    async fn success_reply_unpacks_to_its_value() {
        let socket = MockSocket::new(&[r#"{"Status":"Success","Value":"OpaqueRef:sr"}"#]);
        let written = socket.written();
        let mut conn = Connection::new(socket);

        let params = [Value::from("OpaqueRef:session")];
        let value = conn.call(&Call::new("SR.get_all", &params)).await.unwrap();
        assert_eq!(value, Value::from("OpaqueRef:sr"));

        let written = written.lock().unwrap();
        let text = core::str::from_utf8(&written[..written.len() - 1]).unwrap();
        assert_eq!(
            serde_json::from_str::<Value>(text).unwrap(),
            serde_json::json!({"method": "SR.get_all", "params": ["OpaqueRef:session"]}),
        );
        assert_eq!(*written.last().unwrap(), b'\0');
    }

    #[test_log::test(tokio::test)]
    async fn failure_reply_becomes_a_fault() {
        let socket =
            MockSocket::new(&[r#"{"Status":"Failure","ErrorDescription":["SR_HAS_PBD","OpaqueRef:pbd"]}"#]);
        let mut conn = Connection::new(socket);

        let err = conn.call(&Call::new("SR.forget", &[])).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Fault);
        let fault = err.as_fault().unwrap();
        assert_eq!(fault.code(), "SR_HAS_PBD");
        assert_eq!(fault.params(), ["OpaqueRef:pbd"]);
    }

    #[test_log::test(tokio::test)]
    async fn empty_error_description_is_a_decode_error() {
        let socket = MockSocket::new(&[r#"{"Status":"Failure","ErrorDescription":[]}"#]);
        let mut conn = Connection::new(socket);

        let err = conn.call(&Call::new("SR.forget", &[])).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Deserialize);
        assert!(err.to_string().contains("SR.forget"), "{err}");
    }

    #[test_log::test(tokio::test)]
    async fn unknown_status_is_a_decode_error() {
        let socket = MockSocket::new(&[r#"{"Status":"Partial","Value":1}"#]);
        let mut conn = Connection::new(socket);

        let err = conn.call(&Call::new("task.get_status", &[])).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Deserialize);
    }

    #[test_log::test(tokio::test)]
    async fn eof_mid_reply_is_a_transport_error() {
        // No trailing NUL: the stream ends before the message does.
        let socket = MockSocket::raw(br#"{"Status":"Succ"#.to_vec());
        let mut conn = Connection::new(socket);

        let err = conn.call(&Call::new("SR.get_all", &[])).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(matches!(err, Error::UnexpectedEof));
    }

    #[test_log::test(tokio::test)]
    async fn replies_larger_than_one_buffer_are_reassembled() {
        let big = "x".repeat(BUFFER_SIZE * 2);
        let reply = format!(r#"{{"Status":"Success","Value":"{big}"}}"#);
        // Trickle the bytes to exercise the buffering loop.
        let socket = MockSocket::chunked(&[&reply], 512);
        let mut conn = Connection::new(socket);

        let value = conn.call(&Call::new("SR.probe", &[])).await.unwrap();
        assert_eq!(value, Value::from(big));
    }

    #[test_log::test(tokio::test)]
    async fn replies_over_the_size_cap_are_rejected() {
        // A NUL-free stream that fills the buffer to its limit.
        let socket = MockSocket::raw(vec![b'x'; MAX_BUFFER_SIZE]);
        let mut conn = Connection::new(socket);

        let err = conn.call(&Call::new("SR.get_all", &[])).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(matches!(err, Error::BufferOverflow));
    }

    #[test_log::test(tokio::test)]
    async fn batched_replies_are_consumed_in_order() {
        let socket = MockSocket::new(&[
            r#"{"Status":"Success","Value":"first"}"#,
            r#"{"Status":"Success","Value":"second"}"#,
        ]);
        let mut conn = Connection::new(socket);

        conn.send_call(&Call::new("task.get_uuid", &[])).await.unwrap();
        conn.send_call(&Call::new("task.get_uuid", &[])).await.unwrap();
        assert_eq!(conn.receive_reply("task.get_uuid").await.unwrap(), Value::from("first"));
        assert_eq!(conn.receive_reply("task.get_uuid").await.unwrap(), Value::from("second"));
    }
}
