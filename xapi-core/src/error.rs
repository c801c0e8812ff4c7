use crate::fault::Fault;

/// The error type for the xapi crates.
///
/// Every failure a call can produce falls into one of four kinds (see
/// [`ErrorKind`]): the arguments failed to serialize locally, the transport
/// failed before a complete reply arrived, the server answered with a
/// structured [`Fault`], or the reply arrived but did not decode as the
/// expected shape. The distinction matters to callers: transport failures on
/// read-only calls are reasonable to retry, faults and decode failures are
/// not. This crate never retries on its own.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// A native value could not be encoded as a wire value.
    ///
    /// Rare for well-typed arguments; the usual culprit is an
    /// unrepresentable leaf such as a non-finite float. The call never
    /// reached the network.
    Serialize {
        /// The method and argument the value was meant for.
        context: String,
        /// The underlying encoder error.
        source: serde_json::Error,
    },
    /// A wire value did not have the shape the caller expected.
    ///
    /// Wrong arity, wrong field type, an enum tag outside the known set, or
    /// a reply that is not a recognized envelope.
    Deserialize {
        /// The method result (or argument) that failed to decode.
        context: String,
        /// The underlying decoder error.
        source: serde_json::Error,
    },
    /// An I/O error while talking to the endpoint.
    Io(std::io::Error),
    /// The peer closed the stream before a full reply arrived.
    UnexpectedEof,
    /// A message grew past the maximum buffer size.
    BufferOverflow,
    /// A structured failure reported by the server.
    Fault(Fault),
}

/// The result type for the xapi crates.
pub type Result<T> = std::result::Result<T, Error>;

/// The four coarse kinds of [`Error`].
///
/// See [`Error::kind`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Local serialization failure; nothing was sent.
    Serialize,
    /// The transport failed before a complete reply was received.
    Transport,
    /// The server answered with a structured fault.
    Fault,
    /// The reply did not decode as the expected shape.
    Deserialize,
}

impl Error {
    /// The coarse kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Serialize { .. } => ErrorKind::Serialize,
            Error::Deserialize { .. } => ErrorKind::Deserialize,
            Error::Io(_) | Error::UnexpectedEof | Error::BufferOverflow => ErrorKind::Transport,
            Error::Fault(_) => ErrorKind::Fault,
        }
    }

    /// The server fault, if that is what this error is.
    pub fn as_fault(&self) -> Option<&Fault> {
        match self {
            Error::Fault(fault) => Some(fault),
            _ => None,
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Error::Serialize { source, .. } | Error::Deserialize { source, .. } => Some(source),
            Error::Io(e) => Some(e),
            Error::Fault(fault) => Some(fault),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Serialize { context, source } => {
                write!(f, "failed to serialize {context}: {source}")
            }
            Error::Deserialize { context, source } => {
                write!(f, "failed to deserialize {context}: {source}")
            }
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::UnexpectedEof => write!(f, "unexpected end of stream"),
            Error::BufferOverflow => write!(f, "message exceeds the maximum buffer size"),
            Error::Fault(fault) => write!(f, "server fault: {fault}"),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<Fault> for Error {
    fn from(fault: Fault) -> Self {
        Error::Fault(fault)
    }
}
