//! The authenticated session all calls are scoped to.

use futures_util::lock::Mutex;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    object::SessionRef,
    wire::{self, Context, Value},
    Call, Result, Transport,
};

/// An authenticated session with a server.
///
/// The protocol scopes every method call to a session: the opaque session
/// token travels as the first wire argument of each call, ahead of the
/// method's own arguments. A `Session` owns that token together with the
/// [`Transport`] it was obtained on and prepends it automatically, so the
/// generated methods never mention it.
///
/// The transport sits behind an async mutex: a session can be shared by
/// reference between concurrent callers, and overlapping calls are
/// serialized onto the transport in lock-acquisition order. Dropping a
/// caller's future before its reply arrives can leave the transport
/// desynchronized (see [`Connection`](crate::Connection) on cancel safety);
/// prefer timing out the whole session and discarding it.
///
/// Obtain one with [`Session::login_with_password`], or wrap an externally
/// obtained token with [`Session::from_parts`].
#[derive(Debug)]
pub struct Session<T> {
    transport: Mutex<T>,
    token: SessionRef,
    token_wire: Value,
}

impl<T> Session<T> {
    /// Wrap an already-established session token and its transport.
    pub fn from_parts(transport: T, token: SessionRef) -> Self {
        let token_wire = Value::from(token.as_str());

        Self { transport: Mutex::new(transport), token, token_wire }
    }

    /// The session token.
    pub fn token(&self) -> &SessionRef {
        &self.token
    }

    /// Unwrap into the transport and the session token.
    ///
    /// The token remains valid on the server; the caller becomes
    /// responsible for logging it out.
    pub fn into_parts(self) -> (T, SessionRef) {
        (self.transport.into_inner(), self.token)
    }
}

impl<T: Transport> Session<T> {
    /// Authenticate against the server and return the session.
    ///
    /// `version` is the API version the client speaks and `originator` is a
    /// free-form client name; both end up in the server's audit log. On
    /// rejected credentials the server faults with
    /// [`SESSION_AUTHENTICATION_FAILED`](crate::fault::codes::SESSION_AUTHENTICATION_FAILED).
    pub async fn login_with_password(
        mut transport: T,
        uname: &str,
        pwd: &str,
        version: &str,
        originator: &str,
    ) -> Result<Self> {
        const METHOD: &str = "session.login_with_password";

        let params = [
            wire::arg(METHOD, "uname", uname)?,
            wire::arg(METHOD, "pwd", pwd)?,
            wire::arg(METHOD, "version", version)?,
            wire::arg(METHOD, "originator", originator)?,
        ];
        let value = transport.call(&Call::new(METHOD, &params)).await?;
        let token = wire::from_wire(Context::result(METHOD), value)?;
        debug!("established a session for {uname}");

        Ok(Self::from_parts(transport, token))
    }

    /// Invalidate the session token on the server.
    ///
    /// Consumes the session; the transport is dropped with it.
    pub async fn logout(self) -> Result<()> {
        const METHOD: &str = "session.logout";

        let params = [self.token_wire];
        self.transport.into_inner().call(&Call::new(METHOD, &params)).await?;

        Ok(())
    }

    /// Dispatch `method` with the session token prepended and decode the
    /// result.
    ///
    /// The generated methods in [`api`](crate::api) are thin wrappers over
    /// this; it is public so that callers can reach methods without a
    /// binding.
    pub async fn call<R>(&self, method: &str, params: Vec<Value>) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let value = self.call_raw(method, params).await?;

        wire::from_wire(Context::result(method), value)
    }

    /// Like [`Session::call`], for methods that return nothing.
    ///
    /// Servers answer void methods with an empty string (some omit the
    /// value entirely); either way the result is discarded rather than
    /// decoded.
    pub async fn call_unit(&self, method: &str, params: Vec<Value>) -> Result<()> {
        self.call_raw(method, params).await?;

        Ok(())
    }

    async fn call_raw(&self, method: &str, mut params: Vec<Value>) -> Result<Value> {
        params.insert(0, self.token_wire.clone());

        self.transport.lock().await.call(&Call::new(method, &params)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::mock_transport::MockTransport;

    #[test_log::test(tokio::test)]
    async fn token_is_prepended_to_every_call() {
        let transport = MockTransport::new().reply(Value::from("OpaqueRef:sr1"));
        let session = Session::from_parts(transport, SessionRef::new("OpaqueRef:tok"));

        let sr: String = session
            .call("SR.get_uuid", vec![Value::from("OpaqueRef:sr1")])
            .await
            .unwrap();
        assert_eq!(sr, "OpaqueRef:sr1");

        let (transport, token) = session.into_parts();
        assert_eq!(token.as_str(), "OpaqueRef:tok");
        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "SR.get_uuid");
        assert_eq!(calls[0].1[0], Value::from("OpaqueRef:tok"));
        assert_eq!(calls[0].1[1], Value::from("OpaqueRef:sr1"));
    }

    #[test_log::test(tokio::test)]
    async fn login_sends_credentials_in_order_and_keeps_the_token() {
        let transport = MockTransport::new().reply(Value::from("OpaqueRef:fresh"));
        let session =
            Session::login_with_password(transport, "root", "hunter2", "2.3", "tests")
                .await
                .unwrap();
        assert_eq!(session.token().as_str(), "OpaqueRef:fresh");

        let (transport, _) = session.into_parts();
        let calls = transport.calls();
        assert_eq!(calls[0].0, "session.login_with_password");
        // No token yet: the credentials are the whole parameter list.
        assert_eq!(
            calls[0].1,
            vec![
                Value::from("root"),
                Value::from("hunter2"),
                Value::from("2.3"),
                Value::from("tests"),
            ],
        );
    }

    #[test_log::test(tokio::test)]
    async fn logout_consumes_the_session() {
        let transport = MockTransport::new()
            .reply(Value::from("OpaqueRef:tok"))
            .reply(Value::from(""));
        let session = Session::login_with_password(transport, "root", "pw", "2.3", "tests")
            .await
            .unwrap();

        session.logout().await.unwrap();
    }

    #[test_log::test(tokio::test)]
    async fn void_replies_are_discarded_not_decoded() {
        let transport = MockTransport::new().reply(Value::from(""));
        let session = Session::from_parts(transport, SessionRef::new("OpaqueRef:tok"));

        session
            .call_unit("SR.set_name_label", vec![Value::from("OpaqueRef:sr"), Value::from("db")])
            .await
            .unwrap();
    }
}
