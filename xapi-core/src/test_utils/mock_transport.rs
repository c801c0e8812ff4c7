//! A scripted transport.

use std::collections::VecDeque;

use crate::{fault::Fault, wire::Value, Call, Error, Result, Session, Transport};

/// The session token [`MockTransport::session`] wraps its sessions around.
pub(crate) const TOKEN: &str = "OpaqueRef:test-session";

/// A transport that answers from a scripted reply queue and records every
/// call it dispatches.
///
/// Script replies with the builder methods, then inspect what was sent with
/// [`MockTransport::calls`] (via `Session::into_parts` when a session owns
/// the transport). A call beyond the end of the script panics.
#[derive(Debug, Default)]
pub(crate) struct MockTransport {
    replies: VecDeque<Result<Value>>,
    calls: Vec<(String, Vec<Value>)>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Script a success reply.
    pub(crate) fn reply(mut self, value: Value) -> Self {
        self.replies.push_back(Ok(value));
        self
    }

    /// Script a fault reply.
    pub(crate) fn fault(mut self, code: &str, params: &[&str]) -> Self {
        let fault = Fault::new(code, params.iter().map(|p| p.to_string()).collect());
        self.replies.push_back(Err(Error::Fault(fault)));
        self
    }

    /// Wrap this transport in a session with a fixed token.
    pub(crate) fn session(self) -> Session<Self> {
        Session::from_parts(self, crate::object::SessionRef::new(TOKEN))
    }

    /// Every dispatched call, in order: method name and wire parameters.
    pub(crate) fn calls(&self) -> &[(String, Vec<Value>)] {
        &self.calls
    }
}

impl Transport for MockTransport {
    async fn call(&mut self, call: &Call<'_>) -> Result<Value> {
        self.calls.push((call.method().to_owned(), call.params().to_vec()));
        self.replies
            .pop_front()
            .unwrap_or_else(|| panic!("unscripted call to {}", call.method()))
    }
}
