//! The `Observer` class: tracing configuration for toolstack components.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    object::{HostRef, ObserverRef, TaskRef},
    wire::arg,
    Result, Session, Transport,
};

/// A point-in-time snapshot of one observer's fields.
///
/// Also the argument of [`create`]; the `uuid` field is server-assigned and
/// ignored on the way in.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverRecord {
    /// Unique identifier/object reference.
    pub uuid: String,
    /// A human-readable name.
    pub name_label: String,
    /// A notes field containing human-readable description.
    pub name_description: String,
    /// The hosts the observer is active on; empty means all of them.
    pub hosts: Vec<HostRef>,
    /// Attributes attached to everything the observer emits.
    pub attributes: HashMap<String, String>,
    /// The trace collector endpoints to export to.
    pub endpoints: Vec<String>,
    /// The toolstack components being observed; empty means all of them.
    pub components: Vec<String>,
    /// Whether the observer is active.
    pub enabled: bool,
}

/// Return a list of all the observers known to the system.
pub async fn get_all<T: Transport>(session: &Session<T>) -> Result<Vec<ObserverRef>> {
    session.call("Observer.get_all", Vec::new()).await
}

/// Return a map of all observers to their records.
pub async fn get_all_records<T: Transport>(
    session: &Session<T>,
) -> Result<HashMap<ObserverRef, ObserverRecord>> {
    session.call("Observer.get_all_records", Vec::new()).await
}

/// Get a reference to the observer with the given uuid.
pub async fn get_by_uuid<T: Transport>(session: &Session<T>, uuid: &str) -> Result<ObserverRef> {
    let method = "Observer.get_by_uuid";
    session.call(method, vec![arg(method, "uuid", uuid)?]).await
}

/// Get all the observers with the given name label.
pub async fn get_by_name_label<T: Transport>(
    session: &Session<T>,
    label: &str,
) -> Result<Vec<ObserverRef>> {
    let method = "Observer.get_by_name_label";
    session.call(method, vec![arg(method, "label", label)?]).await
}

/// Get a record containing the current state of the given observer.
pub async fn get_record<T: Transport>(
    session: &Session<T>,
    observer: &ObserverRef,
) -> Result<ObserverRecord> {
    let method = "Observer.get_record";
    session.call(method, vec![arg(method, "self", observer)?]).await
}

/// Get the uuid field of the given observer.
pub async fn get_uuid<T: Transport>(
    session: &Session<T>,
    observer: &ObserverRef,
) -> Result<String> {
    let method = "Observer.get_uuid";
    session.call(method, vec![arg(method, "self", observer)?]).await
}

/// Get the name/label field of the given observer.
pub async fn get_name_label<T: Transport>(
    session: &Session<T>,
    observer: &ObserverRef,
) -> Result<String> {
    let method = "Observer.get_name_label";
    session.call(method, vec![arg(method, "self", observer)?]).await
}

/// Get the name/description field of the given observer.
pub async fn get_name_description<T: Transport>(
    session: &Session<T>,
    observer: &ObserverRef,
) -> Result<String> {
    let method = "Observer.get_name_description";
    session.call(method, vec![arg(method, "self", observer)?]).await
}

/// Get the hosts the given observer is active on.
pub async fn get_hosts<T: Transport>(
    session: &Session<T>,
    observer: &ObserverRef,
) -> Result<Vec<HostRef>> {
    let method = "Observer.get_hosts";
    session.call(method, vec![arg(method, "self", observer)?]).await
}

/// Get the attributes the given observer attaches to what it emits.
pub async fn get_attributes<T: Transport>(
    session: &Session<T>,
    observer: &ObserverRef,
) -> Result<HashMap<String, String>> {
    let method = "Observer.get_attributes";
    session.call(method, vec![arg(method, "self", observer)?]).await
}

/// Get the trace collector endpoints of the given observer.
pub async fn get_endpoints<T: Transport>(
    session: &Session<T>,
    observer: &ObserverRef,
) -> Result<Vec<String>> {
    let method = "Observer.get_endpoints";
    session.call(method, vec![arg(method, "self", observer)?]).await
}

/// Get the components observed by the given observer.
pub async fn get_components<T: Transport>(
    session: &Session<T>,
    observer: &ObserverRef,
) -> Result<Vec<String>> {
    let method = "Observer.get_components";
    session.call(method, vec![arg(method, "self", observer)?]).await
}

/// Get the enabled field of the given observer.
pub async fn get_enabled<T: Transport>(
    session: &Session<T>,
    observer: &ObserverRef,
) -> Result<bool> {
    let method = "Observer.get_enabled";
    session.call(method, vec![arg(method, "self", observer)?]).await
}

/// Set the name/label of the given observer.
pub async fn set_name_label<T: Transport>(
    session: &Session<T>,
    observer: &ObserverRef,
    value: &str,
) -> Result<()> {
    let method = "Observer.set_name_label";
    session
        .call_unit(method, vec![arg(method, "self", observer)?, arg(method, "value", value)?])
        .await
}

/// Set the name/description of the given observer.
pub async fn set_name_description<T: Transport>(
    session: &Session<T>,
    observer: &ObserverRef,
    value: &str,
) -> Result<()> {
    let method = "Observer.set_name_description";
    session
        .call_unit(method, vec![arg(method, "self", observer)?, arg(method, "value", value)?])
        .await
}

/// Set the hosts the given observer is active on.
pub async fn set_hosts<T: Transport>(
    session: &Session<T>,
    observer: &ObserverRef,
    value: &[HostRef],
) -> Result<()> {
    let method = "Observer.set_hosts";
    session
        .call_unit(method, vec![arg(method, "self", observer)?, arg(method, "value", value)?])
        .await
}

/// Set the attributes the given observer attaches to what it emits.
pub async fn set_attributes<T: Transport>(
    session: &Session<T>,
    observer: &ObserverRef,
    value: &HashMap<String, String>,
) -> Result<()> {
    let method = "Observer.set_attributes";
    session
        .call_unit(method, vec![arg(method, "self", observer)?, arg(method, "value", value)?])
        .await
}

/// Set the trace collector endpoints of the given observer.
pub async fn set_endpoints<T: Transport>(
    session: &Session<T>,
    observer: &ObserverRef,
    value: &[String],
) -> Result<()> {
    let method = "Observer.set_endpoints";
    session
        .call_unit(method, vec![arg(method, "self", observer)?, arg(method, "value", value)?])
        .await
}

/// Set the components observed by the given observer.
pub async fn set_components<T: Transport>(
    session: &Session<T>,
    observer: &ObserverRef,
    value: &[String],
) -> Result<()> {
    let method = "Observer.set_components";
    session
        .call_unit(method, vec![arg(method, "self", observer)?, arg(method, "value", value)?])
        .await
}

/// Enable or disable the given observer.
pub async fn set_enabled<T: Transport>(
    session: &Session<T>,
    observer: &ObserverRef,
    value: bool,
) -> Result<()> {
    let method = "Observer.set_enabled";
    session
        .call_unit(method, vec![arg(method, "self", observer)?, arg(method, "value", &value)?])
        .await
}

/// Create a new observer from the given record and return its reference.
pub async fn create<T: Transport>(
    session: &Session<T>,
    args: &ObserverRecord,
) -> Result<ObserverRef> {
    let method = "Observer.create";
    session.call(method, vec![arg(method, "args", args)?]).await
}

/// Destroy the given observer.
pub async fn destroy<T: Transport>(session: &Session<T>, observer: &ObserverRef) -> Result<()> {
    let method = "Observer.destroy";
    session.call_unit(method, vec![arg(method, "self", observer)?]).await
}

/// Queue [`create`] and return the task tracking it.
pub async fn async_create<T: Transport>(
    session: &Session<T>,
    args: &ObserverRecord,
) -> Result<TaskRef> {
    let method = "Async.Observer.create";
    session.call(method, vec![arg(method, "args", args)?]).await
}

/// Queue [`destroy`] and return the task tracking it.
pub async fn async_destroy<T: Transport>(
    session: &Session<T>,
    observer: &ObserverRef,
) -> Result<TaskRef> {
    let method = "Async.Observer.destroy";
    session.call(method, vec![arg(method, "self", observer)?]).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test_utils::mock_transport::{MockTransport, TOKEN},
        wire::Value,
    };

    #[test_log::test(tokio::test)]
    async fn set_enabled_sends_reference_then_flag() {
        let transport = MockTransport::new().reply(Value::from(""));
        let session = transport.session();

        let observer = ObserverRef::new("OpaqueRef:obs0");
        set_enabled(&session, &observer, true).await.unwrap();

        let (transport, _) = session.into_parts();
        let (method, params) = &transport.calls()[0];
        assert_eq!(method, "Observer.set_enabled");
        assert_eq!(
            *params,
            vec![Value::from(TOKEN), Value::from("OpaqueRef:obs0"), Value::from(true)],
        );
    }

    #[test]
    fn records_tolerate_sparse_replies() {
        let record: ObserverRecord = serde_json::from_value(serde_json::json!({
            "uuid": "o1",
            "name_label": "smapi-tracing",
            "enabled": true,
        }))
        .unwrap();
        assert!(record.enabled);
        assert!(record.hosts.is_empty());
        assert!(record.endpoints.is_empty());
    }
}
