//! Shared test doubles.

pub(crate) mod mock_socket;
pub(crate) mod mock_transport;
