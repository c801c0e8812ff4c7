//! The request and reply envelopes.

use serde::{Deserialize, Serialize};

use crate::wire::Value;

/// One wire method call.
///
/// A dot-qualified method name plus the ordered, already-encoded arguments.
/// Task-spawning variants use the same envelope with an `Async.` prefix on
/// the name. Serializes as `{"method": …, "params": […]}`.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Call<'c> {
    method: &'c str,
    params: &'c [Value],
}

impl<'c> Call<'c> {
    /// Create a call from a method name and its encoded arguments.
    pub fn new(method: &'c str, params: &'c [Value]) -> Self {
        Self { method, params }
    }

    /// The dot-qualified method name, e.g. `SR.get_record`.
    pub fn method(&self) -> &'c str {
        self.method
    }

    /// The ordered wire arguments.
    pub fn params(&self) -> &'c [Value] {
        self.params
    }
}

/// The discriminated reply envelope.
///
/// Every reply is either a success carrying the wire result or a failure
/// carrying the fault description. Anything else — an unknown `Status`, a
/// failure without a description — fails to decode, which surfaces as a
/// deserialization error to the caller.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(tag = "Status")]
pub enum Reply {
    /// The call succeeded.
    Success {
        /// The wire result. Void methods omit it or send an empty string;
        /// an omitted result decodes as null.
        #[serde(rename = "Value", default)]
        value: Value,
    },
    /// The server refused the call.
    Failure {
        /// The fault code followed by its positional parameters.
        #[serde(rename = "ErrorDescription")]
        error_description: Vec<String>,
    },
}
