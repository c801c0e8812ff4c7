//! The byte-stream traits a connection runs over.

use core::future::Future;

/// A bidirectional byte stream a [`Connection`](super::Connection) can run
/// over.
///
/// Implementations wrap a concrete stream type (TCP, Unix domain, a TLS
/// session, an in-memory pipe in tests) and only have to know how to split
/// it; all framing lives in the connection.
pub trait Socket: core::fmt::Debug {
    /// The read half of the socket.
    type ReadHalf: ReadHalf;
    /// The write half of the socket.
    type WriteHalf: WriteHalf;

    /// Split the socket into its read and write halves.
    fn split(self) -> (Self::ReadHalf, Self::WriteHalf);
}

/// The read half of a socket.
pub trait ReadHalf: core::fmt::Debug {
    /// Read whatever is available into `buf`.
    ///
    /// On completion, the number of bytes read is returned; `0` means the
    /// peer closed the stream.
    ///
    /// The returned future must be cancel safe: dropping it must be
    /// equivalent to never having called `read`.
    fn read(&mut self, buf: &mut [u8]) -> impl Future<Output = crate::Result<usize>>;
}

/// The write half of a socket.
pub trait WriteHalf: core::fmt::Debug {
    /// Write all of `buf` to the socket.
    fn write(&mut self, buf: &[u8]) -> impl Future<Output = crate::Result<()>>;
}
