//! The call dispatcher contract.

use core::future::Future;

use crate::{wire::Value, Call, Result};

/// A client-side call dispatcher.
///
/// One invocation performs one remote round trip: encode and send the
/// [`Call`], receive the paired reply, and hand back the raw wire result. A
/// server-side failure must surface as [`Error::Fault`](crate::Error::Fault)
/// so that callers can always tell "the server said no" apart from "the
/// reply never arrived". Implementations never retry; that judgement
/// belongs to the caller, who knows which methods are idempotent.
///
/// The shipped implementation is [`Connection`](crate::Connection); tests
/// and alternative protocols plug in their own.
pub trait Transport: core::fmt::Debug {
    /// Perform one call and return the raw wire result.
    fn call(&mut self, call: &Call<'_>) -> impl Future<Output = Result<Value>>;
}
