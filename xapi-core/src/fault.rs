//! Structured failures reported by the server.

/// A structured failure reported by the server.
///
/// A fault is a machine-matchable error code plus positional string
/// parameters whose meaning depends on the code; for example `SR_HAS_PBD`
/// carries the reference of the offending repository as its only parameter.
/// Match on [`code`](Fault::code) against the constants in [`codes`], never
/// on rendered text. The set of codes is open: servers introduce new ones
/// without notice.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Fault {
    code: String,
    params: Vec<String>,
}

impl Fault {
    /// Create a fault from a code and its positional parameters.
    pub fn new(code: impl Into<String>, params: Vec<String>) -> Self {
        Self { code: code.into(), params }
    }

    /// Decode a fault from a wire `ErrorDescription` sequence.
    ///
    /// The first element is the code, the rest are its parameters. Returns
    /// `None` for an empty sequence, which no conforming server sends.
    pub fn from_description(description: Vec<String>) -> Option<Self> {
        let mut elements = description.into_iter();
        let code = elements.next()?;

        Some(Self { code, params: elements.collect() })
    }

    /// The error code, e.g. `SR_HAS_PBD`.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The positional parameters of the code.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Unwrap into the code and its parameters.
    pub fn into_parts(self) -> (String, Vec<String>) {
        (self.code, self.params)
    }
}

impl core::fmt::Display for Fault {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.code)?;
        for param in &self.params {
            write!(f, " {param}")?;
        }

        Ok(())
    }
}

impl core::error::Error for Fault {}

/// Well-known fault codes.
///
/// A convenience subset of the codes the server defines; the wire carries
/// them as plain strings, so codes absent from this list still round-trip
/// fine.
pub mod codes {
    /// The credentials given to `session.login_with_password` were rejected.
    pub const SESSION_AUTHENTICATION_FAILED: &str = "SESSION_AUTHENTICATION_FAILED";
    /// The session token has been logged out or has expired.
    pub const SESSION_INVALID: &str = "SESSION_INVALID";
    /// The method was dispatched to a pool member instead of the coordinator.
    pub const HOST_IS_SLAVE: &str = "HOST_IS_SLAVE";
    /// A reference argument does not name a live object.
    pub const HANDLE_INVALID: &str = "HANDLE_INVALID";
    /// A uuid argument does not name a live object.
    pub const UUID_INVALID: &str = "UUID_INVALID";
    /// The operation is not allowed in the object's current state.
    pub const OPERATION_NOT_ALLOWED: &str = "OPERATION_NOT_ALLOWED";
    /// A batch operation succeeded for some of its objects only.
    pub const OPERATION_PARTIALLY_FAILED: &str = "OPERATION_PARTIALLY_FAILED";
    /// Another operation on the same object is in progress.
    pub const OTHER_OPERATION_IN_PROGRESS: &str = "OTHER_OPERATION_IN_PROGRESS";
    /// The server recognizes the method but does not implement it.
    pub const NOT_IMPLEMENTED: &str = "NOT_IMPLEMENTED";
    /// The server does not recognize the method name.
    pub const MESSAGE_METHOD_UNKNOWN: &str = "MESSAGE_METHOD_UNKNOWN";
    /// The call carried the wrong number of arguments.
    pub const MESSAGE_PARAMETER_COUNT_MISMATCH: &str = "MESSAGE_PARAMETER_COUNT_MISMATCH";
    /// An argument had the wrong wire type.
    pub const FIELD_TYPE_ERROR: &str = "FIELD_TYPE_ERROR";
    /// The session is not authorized to perform the operation.
    pub const PERMISSION_DENIED: &str = "PERMISSION_DENIED";
    /// Role-based access control denied the operation.
    pub const RBAC_PERMISSION_DENIED: &str = "RBAC_PERMISSION_DENIED";
    /// The storage repository has no space for the requested allocation.
    pub const SR_FULL: &str = "SR_FULL";
    /// The storage repository still has at least one attachment record.
    pub const SR_HAS_PBD: &str = "SR_HAS_PBD";
    /// The storage repository still contains virtual disks.
    pub const SR_NOT_EMPTY: &str = "SR_NOT_EMPTY";
    /// No storage driver of the requested type exists.
    pub const SR_UNKNOWN_DRIVER: &str = "SR_UNKNOWN_DRIVER";
    /// The storage driver does not support the requested operation.
    pub const SR_OPERATION_NOT_SUPPORTED: &str = "SR_OPERATION_NOT_SUPPORTED";
    /// The virtual disk is attached and cannot be operated on.
    pub const VDI_IN_USE: &str = "VDI_IN_USE";
    /// The virtual machine has a disk on a repository that is not usable.
    pub const VM_REQUIRES_SR: &str = "VM_REQUIRES_SR";
    /// The task was cancelled before it completed.
    pub const TASK_CANCELLED: &str = "TASK_CANCELLED";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_decoding() {
        let fault = Fault::from_description(vec![
            "SR_HAS_PBD".into(),
            "OpaqueRef:8a2b1c".into(),
        ])
        .unwrap();
        assert_eq!(fault.code(), codes::SR_HAS_PBD);
        assert_eq!(fault.params(), ["OpaqueRef:8a2b1c"]);

        let bare = Fault::from_description(vec!["SESSION_INVALID".into()]).unwrap();
        assert_eq!(bare.code(), codes::SESSION_INVALID);
        assert!(bare.params().is_empty());

        assert!(Fault::from_description(vec![]).is_none());
    }

    #[test]
    fn display() {
        let fault = Fault::new("SR_HAS_PBD", vec!["OpaqueRef:8a2b1c".into()]);
        assert_eq!(fault.to_string(), "SR_HAS_PBD OpaqueRef:8a2b1c");
        assert_eq!(Fault::new("SR_FULL", vec![]).to_string(), "SR_FULL");
    }
}
