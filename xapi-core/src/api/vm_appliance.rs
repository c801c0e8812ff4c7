//! The `VM_appliance` class: sets of virtual machines managed as one unit.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    object::{SessionRef, SrRef, TaskRef, VmApplianceRef, VmRef},
    wire::arg,
    Result, Session, Transport,
};

/// Lifecycle operations that can run on an appliance.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplianceOperation {
    /// Starting all the appliance's virtual machines.
    #[default]
    Start,
    /// Shutting the virtual machines down cleanly.
    CleanShutdown,
    /// Powering the virtual machines off forcibly.
    HardShutdown,
    /// Shutting down cleanly where possible, forcibly otherwise.
    Shutdown,
}

/// A point-in-time snapshot of one appliance's fields.
///
/// Also the argument of [`create`]; the server-assigned fields (`uuid`, the
/// operation lists) are ignored on the way in.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VmApplianceRecord {
    /// Unique identifier/object reference.
    pub uuid: String,
    /// A human-readable name.
    pub name_label: String,
    /// A notes field containing human-readable description.
    pub name_description: String,
    /// Operations allowed in this state.
    pub allowed_operations: Vec<ApplianceOperation>,
    /// Operations currently in progress, keyed by task handle.
    pub current_operations: HashMap<String, ApplianceOperation>,
    /// The virtual machines in this appliance.
    #[serde(rename = "VMs")]
    pub vms: Vec<VmRef>,
}

/// Return a list of all the appliances known to the system.
pub async fn get_all<T: Transport>(session: &Session<T>) -> Result<Vec<VmApplianceRef>> {
    session.call("VM_appliance.get_all", Vec::new()).await
}

/// Return a map of all appliances to their records.
pub async fn get_all_records<T: Transport>(
    session: &Session<T>,
) -> Result<HashMap<VmApplianceRef, VmApplianceRecord>> {
    session.call("VM_appliance.get_all_records", Vec::new()).await
}

/// Get a reference to the appliance with the given uuid.
pub async fn get_by_uuid<T: Transport>(
    session: &Session<T>,
    uuid: &str,
) -> Result<VmApplianceRef> {
    let method = "VM_appliance.get_by_uuid";
    session.call(method, vec![arg(method, "uuid", uuid)?]).await
}

/// Get all the appliances with the given name label.
pub async fn get_by_name_label<T: Transport>(
    session: &Session<T>,
    label: &str,
) -> Result<Vec<VmApplianceRef>> {
    let method = "VM_appliance.get_by_name_label";
    session.call(method, vec![arg(method, "label", label)?]).await
}

/// Get a record containing the current state of the given appliance.
pub async fn get_record<T: Transport>(
    session: &Session<T>,
    appliance: &VmApplianceRef,
) -> Result<VmApplianceRecord> {
    let method = "VM_appliance.get_record";
    session.call(method, vec![arg(method, "self", appliance)?]).await
}

/// Get the uuid field of the given appliance.
pub async fn get_uuid<T: Transport>(
    session: &Session<T>,
    appliance: &VmApplianceRef,
) -> Result<String> {
    let method = "VM_appliance.get_uuid";
    session.call(method, vec![arg(method, "self", appliance)?]).await
}

/// Get the name/label field of the given appliance.
pub async fn get_name_label<T: Transport>(
    session: &Session<T>,
    appliance: &VmApplianceRef,
) -> Result<String> {
    let method = "VM_appliance.get_name_label";
    session.call(method, vec![arg(method, "self", appliance)?]).await
}

/// Get the name/description field of the given appliance.
pub async fn get_name_description<T: Transport>(
    session: &Session<T>,
    appliance: &VmApplianceRef,
) -> Result<String> {
    let method = "VM_appliance.get_name_description";
    session.call(method, vec![arg(method, "self", appliance)?]).await
}

/// Get the list of operations allowed in the appliance's current state.
pub async fn get_allowed_operations<T: Transport>(
    session: &Session<T>,
    appliance: &VmApplianceRef,
) -> Result<Vec<ApplianceOperation>> {
    let method = "VM_appliance.get_allowed_operations";
    session.call(method, vec![arg(method, "self", appliance)?]).await
}

/// Get the operations currently in progress on the appliance.
pub async fn get_current_operations<T: Transport>(
    session: &Session<T>,
    appliance: &VmApplianceRef,
) -> Result<HashMap<String, ApplianceOperation>> {
    let method = "VM_appliance.get_current_operations";
    session.call(method, vec![arg(method, "self", appliance)?]).await
}

/// Get the VMs field of the given appliance.
pub async fn get_vms<T: Transport>(
    session: &Session<T>,
    appliance: &VmApplianceRef,
) -> Result<Vec<VmRef>> {
    let method = "VM_appliance.get_VMs";
    session.call(method, vec![arg(method, "self", appliance)?]).await
}

/// Set the name/label of the given appliance.
pub async fn set_name_label<T: Transport>(
    session: &Session<T>,
    appliance: &VmApplianceRef,
    value: &str,
) -> Result<()> {
    let method = "VM_appliance.set_name_label";
    session
        .call_unit(method, vec![arg(method, "self", appliance)?, arg(method, "value", value)?])
        .await
}

/// Set the name/description of the given appliance.
pub async fn set_name_description<T: Transport>(
    session: &Session<T>,
    appliance: &VmApplianceRef,
    value: &str,
) -> Result<()> {
    let method = "VM_appliance.set_name_description";
    session
        .call_unit(method, vec![arg(method, "self", appliance)?, arg(method, "value", value)?])
        .await
}

/// Create a new appliance from the given record and return its reference.
pub async fn create<T: Transport>(
    session: &Session<T>,
    args: &VmApplianceRecord,
) -> Result<VmApplianceRef> {
    let method = "VM_appliance.create";
    session.call(method, vec![arg(method, "args", args)?]).await
}

/// Destroy the given appliance; its virtual machines survive it.
pub async fn destroy<T: Transport>(
    session: &Session<T>,
    appliance: &VmApplianceRef,
) -> Result<()> {
    let method = "VM_appliance.destroy";
    session.call_unit(method, vec![arg(method, "self", appliance)?]).await
}

/// Start all the virtual machines in the given appliance.
///
/// With `paused` the machines are left in the paused state once created on
/// their hosts.
pub async fn start<T: Transport>(
    session: &Session<T>,
    appliance: &VmApplianceRef,
    paused: bool,
) -> Result<()> {
    let method = "VM_appliance.start";
    session
        .call_unit(method, vec![arg(method, "self", appliance)?, arg(method, "paused", &paused)?])
        .await
}

/// Ask every virtual machine in the given appliance to shut down cleanly.
pub async fn clean_shutdown<T: Transport>(
    session: &Session<T>,
    appliance: &VmApplianceRef,
) -> Result<()> {
    let method = "VM_appliance.clean_shutdown";
    session.call_unit(method, vec![arg(method, "self", appliance)?]).await
}

/// Power off every virtual machine in the given appliance without asking.
pub async fn hard_shutdown<T: Transport>(
    session: &Session<T>,
    appliance: &VmApplianceRef,
) -> Result<()> {
    let method = "VM_appliance.hard_shutdown";
    session.call_unit(method, vec![arg(method, "self", appliance)?]).await
}

/// Shut down every virtual machine in the given appliance, cleanly where
/// the machine supports it and forcibly otherwise.
pub async fn shutdown<T: Transport>(
    session: &Session<T>,
    appliance: &VmApplianceRef,
) -> Result<()> {
    let method = "VM_appliance.shutdown";
    session.call_unit(method, vec![arg(method, "self", appliance)?]).await
}

/// Check that the given appliance could be recovered through `session_to`,
/// a session on the pool holding the recovery target.
pub async fn assert_can_be_recovered<T: Transport>(
    session: &Session<T>,
    appliance: &VmApplianceRef,
    session_to: &SessionRef,
) -> Result<()> {
    let method = "VM_appliance.assert_can_be_recovered";
    session
        .call_unit(
            method,
            vec![arg(method, "self", appliance)?, arg(method, "session_to", session_to)?],
        )
        .await
}

/// Return the storage repositories required to recover the given appliance
/// through `session_to`.
pub async fn get_srs_required_for_recovery<T: Transport>(
    session: &Session<T>,
    appliance: &VmApplianceRef,
    session_to: &SessionRef,
) -> Result<Vec<SrRef>> {
    let method = "VM_appliance.get_SRs_required_for_recovery";
    session
        .call(
            method,
            vec![arg(method, "self", appliance)?, arg(method, "session_to", session_to)?],
        )
        .await
}

/// Recover the given appliance on the pool `session_to` is logged into,
/// overwriting an existing appliance there if `force` is set.
pub async fn recover<T: Transport>(
    session: &Session<T>,
    appliance: &VmApplianceRef,
    session_to: &SessionRef,
    force: bool,
) -> Result<()> {
    let method = "VM_appliance.recover";
    session
        .call_unit(
            method,
            vec![
                arg(method, "self", appliance)?,
                arg(method, "session_to", session_to)?,
                arg(method, "force", &force)?,
            ],
        )
        .await
}

/// Queue [`create`] and return the task tracking it.
pub async fn async_create<T: Transport>(
    session: &Session<T>,
    args: &VmApplianceRecord,
) -> Result<TaskRef> {
    let method = "Async.VM_appliance.create";
    session.call(method, vec![arg(method, "args", args)?]).await
}

/// Queue [`destroy`] and return the task tracking it.
pub async fn async_destroy<T: Transport>(
    session: &Session<T>,
    appliance: &VmApplianceRef,
) -> Result<TaskRef> {
    let method = "Async.VM_appliance.destroy";
    session.call(method, vec![arg(method, "self", appliance)?]).await
}

/// Queue [`start`] and return the task tracking it.
pub async fn async_start<T: Transport>(
    session: &Session<T>,
    appliance: &VmApplianceRef,
    paused: bool,
) -> Result<TaskRef> {
    let method = "Async.VM_appliance.start";
    session
        .call(method, vec![arg(method, "self", appliance)?, arg(method, "paused", &paused)?])
        .await
}

/// Queue [`clean_shutdown`] and return the task tracking it.
pub async fn async_clean_shutdown<T: Transport>(
    session: &Session<T>,
    appliance: &VmApplianceRef,
) -> Result<TaskRef> {
    let method = "Async.VM_appliance.clean_shutdown";
    session.call(method, vec![arg(method, "self", appliance)?]).await
}

/// Queue [`hard_shutdown`] and return the task tracking it.
pub async fn async_hard_shutdown<T: Transport>(
    session: &Session<T>,
    appliance: &VmApplianceRef,
) -> Result<TaskRef> {
    let method = "Async.VM_appliance.hard_shutdown";
    session.call(method, vec![arg(method, "self", appliance)?]).await
}

/// Queue [`shutdown`] and return the task tracking it.
pub async fn async_shutdown<T: Transport>(
    session: &Session<T>,
    appliance: &VmApplianceRef,
) -> Result<TaskRef> {
    let method = "Async.VM_appliance.shutdown";
    session.call(method, vec![arg(method, "self", appliance)?]).await
}

/// Queue [`recover`] and return the task tracking it.
pub async fn async_recover<T: Transport>(
    session: &Session<T>,
    appliance: &VmApplianceRef,
    session_to: &SessionRef,
    force: bool,
) -> Result<TaskRef> {
    let method = "Async.VM_appliance.recover";
    session
        .call(
            method,
            vec![
                arg(method, "self", appliance)?,
                arg(method, "session_to", session_to)?,
                arg(method, "force", &force)?,
            ],
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test_utils::mock_transport::{MockTransport, TOKEN},
        wire::Value,
    };

    #[test_log::test(tokio::test)]
    async fn start_sends_the_paused_flag_after_the_reference() {
        let transport = MockTransport::new().reply(Value::from(""));
        let session = transport.session();

        start(&session, &VmApplianceRef::new("OpaqueRef:app0"), true).await.unwrap();

        let (transport, _) = session.into_parts();
        let (method, params) = &transport.calls()[0];
        assert_eq!(method, "VM_appliance.start");
        assert_eq!(
            *params,
            vec![Value::from(TOKEN), Value::from("OpaqueRef:app0"), Value::from(true)],
        );
    }

    #[test]
    fn record_uses_the_wire_casing_for_vms() {
        let record: VmApplianceRecord = serde_json::from_value(serde_json::json!({
            "uuid": "a0",
            "name_label": "three-tier",
            "VMs": ["OpaqueRef:vm1", "OpaqueRef:vm2"],
            "allowed_operations": ["clean_shutdown", "start"],
        }))
        .unwrap();
        assert_eq!(record.vms.len(), 2);
        assert_eq!(
            record.allowed_operations,
            [ApplianceOperation::CleanShutdown, ApplianceOperation::Start],
        );

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("VMs").is_some());
        assert!(json.get("vms").is_none());
    }
}
