//! A scripted in-memory socket.

use std::sync::{Arc, Mutex};

use crate::connection::socket::{ReadHalf, Socket, WriteHalf};

/// A socket that reads from a pre-loaded script and captures writes.
///
/// Each response string is NUL-terminated, with one extra NUL at the end to
/// mark the end of all messages. Grab a handle to the captured writes with
/// [`MockSocket::written`] before handing the socket to a connection.
#[derive(Debug)]
pub(crate) struct MockSocket {
    read_data: Vec<u8>,
    chunk: usize,
    written: Arc<Mutex<Vec<u8>>>,
}

impl MockSocket {
    /// A socket scripted with the given responses.
    pub(crate) fn new(responses: &[&str]) -> Self {
        let mut data = Vec::new();
        for response in responses {
            data.extend_from_slice(response.as_bytes());
            data.push(b'\0');
        }
        data.push(b'\0');

        Self::raw(data)
    }

    /// Like [`MockSocket::new`], but each read hands out at most `chunk`
    /// bytes, to exercise reassembly.
    pub(crate) fn chunked(responses: &[&str], chunk: usize) -> Self {
        let mut socket = Self::new(responses);
        socket.chunk = chunk;
        socket
    }

    /// A socket that replays `data` exactly as given, framing included.
    pub(crate) fn raw(data: Vec<u8>) -> Self {
        Self { read_data: data, chunk: usize::MAX, written: Arc::default() }
    }

    /// Handle to everything written to this socket.
    pub(crate) fn written(&self) -> Arc<Mutex<Vec<u8>>> {
        self.written.clone()
    }
}

impl Socket for MockSocket {
    type ReadHalf = MockReadHalf;
    type WriteHalf = MockWriteHalf;

    fn split(self) -> (Self::ReadHalf, Self::WriteHalf) {
        (
            MockReadHalf { data: self.read_data, pos: 0, chunk: self.chunk },
            MockWriteHalf { written: self.written },
        )
    }
}

#[derive(Debug)]
pub(crate) struct MockReadHalf {
    data: Vec<u8>,
    pos: usize,
    chunk: usize,
}

impl ReadHalf for MockReadHalf {
    async fn read(&mut self, buf: &mut [u8]) -> crate::Result<usize> {
        let remaining = self.data.len().saturating_sub(self.pos);
        if remaining == 0 {
            return Ok(0);
        }

        let to_read = remaining.min(buf.len()).min(self.chunk);
        buf[..to_read].copy_from_slice(&self.data[self.pos..self.pos + to_read]);
        self.pos += to_read;
        Ok(to_read)
    }
}

#[derive(Debug)]
pub(crate) struct MockWriteHalf {
    written: Arc<Mutex<Vec<u8>>>,
}

impl WriteHalf for MockWriteHalf {
    async fn write(&mut self, buf: &[u8]) -> crate::Result<()> {
        self.written.lock().unwrap().extend_from_slice(buf);
        Ok(())
    }
}
