//! The `SR` class: storage repositories.
//!
//! A storage repository holds virtual disks and is attached to hosts
//! through PBD records. Most of its behavior lives in the storage driver
//! named by the `type` field, which is also the sole interpreter of the
//! `device_config` and `sm_config` maps.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    object::{BlobRef, DrTaskRef, HostRef, PbdRef, SrRef, TaskRef, VdiRef},
    wire::arg,
    Result, Session, Transport,
};

/// Storage operations that can run on a storage repository.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageOperation {
    /// Scanning backing storage for new or removed virtual disks.
    #[default]
    Scan,
    /// Destroying the repository and its contents.
    Destroy,
    /// Forgetting the repository while leaving its contents intact.
    Forget,
    /// Plugging a PBD into a host.
    Plug,
    /// Unplugging a PBD from a host.
    Unplug,
    /// Refreshing the repository's fields from backing storage.
    Update,
    /// Creating a new virtual disk.
    VdiCreate,
    /// Introducing an existing virtual disk.
    VdiIntroduce,
    /// Destroying a virtual disk.
    VdiDestroy,
    /// Resizing a virtual disk.
    VdiResize,
    /// Cloning a virtual disk.
    VdiClone,
    /// Snapshotting a virtual disk.
    VdiSnapshot,
    /// Mirroring a virtual disk.
    VdiMirror,
    /// Creating a PBD for this repository.
    PbdCreate,
    /// Destroying one of this repository's PBDs.
    PbdDestroy,
}

/// A point-in-time snapshot of one storage repository's fields.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SrRecord {
    /// Unique identifier/object reference.
    pub uuid: String,
    /// A human-readable name.
    pub name_label: String,
    /// A notes field containing human-readable description.
    pub name_description: String,
    /// Operations allowed in this state.
    pub allowed_operations: Vec<StorageOperation>,
    /// Operations currently in progress, keyed by task handle.
    pub current_operations: HashMap<String, StorageOperation>,
    /// The virtual disks present on this repository.
    #[serde(rename = "VDIs")]
    pub vdis: Vec<VdiRef>,
    /// The host attachment records for this repository.
    #[serde(rename = "PBDs")]
    pub pbds: Vec<PbdRef>,
    /// Sum of the virtual sizes of all disks, in bytes.
    pub virtual_allocation: i64,
    /// Physical space currently used, in bytes.
    pub physical_utilisation: i64,
    /// Total physical size, in bytes.
    pub physical_size: i64,
    /// The storage driver, e.g. `lvm` or `nfs`.
    pub r#type: String,
    /// The content type of contained disks, e.g. `iso` or `user`.
    pub content_type: String,
    /// Whether the repository is sharable between hosts.
    pub shared: bool,
    /// Additional configuration.
    pub other_config: HashMap<String, String>,
    /// User-specified tags for categorization.
    pub tags: Vec<String>,
    /// Driver-dependent configuration.
    pub sm_config: HashMap<String, String>,
    /// Binary blobs associated with this repository.
    pub blobs: HashMap<String, BlobRef>,
    /// Whether this repository caches VDI data on its hosts.
    pub local_cache_enabled: bool,
    /// The disaster-recovery task that introduced this repository, if any.
    pub introduced_by: DrTaskRef,
    /// Whether the repository lives on shared, clustered local storage.
    pub clustered: bool,
    /// Whether this is the repository that hosts the tools ISOs.
    pub is_tools_sr: bool,
}

/// Return a list of all the storage repositories known to the system.
pub async fn get_all<T: Transport>(session: &Session<T>) -> Result<Vec<SrRef>> {
    session.call("SR.get_all", Vec::new()).await
}

/// Return a map of all storage repositories to their records.
pub async fn get_all_records<T: Transport>(
    session: &Session<T>,
) -> Result<HashMap<SrRef, SrRecord>> {
    session.call("SR.get_all_records", Vec::new()).await
}

/// Get a reference to the repository with the given uuid.
pub async fn get_by_uuid<T: Transport>(session: &Session<T>, uuid: &str) -> Result<SrRef> {
    let method = "SR.get_by_uuid";
    session.call(method, vec![arg(method, "uuid", uuid)?]).await
}

/// Get all the repositories with the given name label.
pub async fn get_by_name_label<T: Transport>(
    session: &Session<T>,
    label: &str,
) -> Result<Vec<SrRef>> {
    let method = "SR.get_by_name_label";
    session.call(method, vec![arg(method, "label", label)?]).await
}

/// Get a record containing the current state of the given repository.
pub async fn get_record<T: Transport>(session: &Session<T>, sr: &SrRef) -> Result<SrRecord> {
    let method = "SR.get_record";
    session.call(method, vec![arg(method, "self", sr)?]).await
}

/// Get the uuid field of the given repository.
pub async fn get_uuid<T: Transport>(session: &Session<T>, sr: &SrRef) -> Result<String> {
    let method = "SR.get_uuid";
    session.call(method, vec![arg(method, "self", sr)?]).await
}

/// Get the name/label field of the given repository.
pub async fn get_name_label<T: Transport>(session: &Session<T>, sr: &SrRef) -> Result<String> {
    let method = "SR.get_name_label";
    session.call(method, vec![arg(method, "self", sr)?]).await
}

/// Get the name/description field of the given repository.
pub async fn get_name_description<T: Transport>(
    session: &Session<T>,
    sr: &SrRef,
) -> Result<String> {
    let method = "SR.get_name_description";
    session.call(method, vec![arg(method, "self", sr)?]).await
}

/// Get the list of operations allowed in the repository's current state.
pub async fn get_allowed_operations<T: Transport>(
    session: &Session<T>,
    sr: &SrRef,
) -> Result<Vec<StorageOperation>> {
    let method = "SR.get_allowed_operations";
    session.call(method, vec![arg(method, "self", sr)?]).await
}

/// Get the operations currently in progress on the repository.
pub async fn get_current_operations<T: Transport>(
    session: &Session<T>,
    sr: &SrRef,
) -> Result<HashMap<String, StorageOperation>> {
    let method = "SR.get_current_operations";
    session.call(method, vec![arg(method, "self", sr)?]).await
}

/// Get the VDIs field of the given repository.
pub async fn get_vdis<T: Transport>(session: &Session<T>, sr: &SrRef) -> Result<Vec<VdiRef>> {
    let method = "SR.get_VDIs";
    session.call(method, vec![arg(method, "self", sr)?]).await
}

/// Get the PBDs field of the given repository.
pub async fn get_pbds<T: Transport>(session: &Session<T>, sr: &SrRef) -> Result<Vec<PbdRef>> {
    let method = "SR.get_PBDs";
    session.call(method, vec![arg(method, "self", sr)?]).await
}

/// Get the virtual allocation of the given repository, in bytes.
pub async fn get_virtual_allocation<T: Transport>(
    session: &Session<T>,
    sr: &SrRef,
) -> Result<i64> {
    let method = "SR.get_virtual_allocation";
    session.call(method, vec![arg(method, "self", sr)?]).await
}

/// Get the physical utilisation of the given repository, in bytes.
pub async fn get_physical_utilisation<T: Transport>(
    session: &Session<T>,
    sr: &SrRef,
) -> Result<i64> {
    let method = "SR.get_physical_utilisation";
    session.call(method, vec![arg(method, "self", sr)?]).await
}

/// Get the physical size of the given repository, in bytes.
pub async fn get_physical_size<T: Transport>(session: &Session<T>, sr: &SrRef) -> Result<i64> {
    let method = "SR.get_physical_size";
    session.call(method, vec![arg(method, "self", sr)?]).await
}

/// Get the type of the given repository.
pub async fn get_type<T: Transport>(session: &Session<T>, sr: &SrRef) -> Result<String> {
    let method = "SR.get_type";
    session.call(method, vec![arg(method, "self", sr)?]).await
}

/// Get the content type of the given repository.
pub async fn get_content_type<T: Transport>(session: &Session<T>, sr: &SrRef) -> Result<String> {
    let method = "SR.get_content_type";
    session.call(method, vec![arg(method, "self", sr)?]).await
}

/// Get the shared field of the given repository.
pub async fn get_shared<T: Transport>(session: &Session<T>, sr: &SrRef) -> Result<bool> {
    let method = "SR.get_shared";
    session.call(method, vec![arg(method, "self", sr)?]).await
}

/// Get the other_config field of the given repository.
pub async fn get_other_config<T: Transport>(
    session: &Session<T>,
    sr: &SrRef,
) -> Result<HashMap<String, String>> {
    let method = "SR.get_other_config";
    session.call(method, vec![arg(method, "self", sr)?]).await
}

/// Get the tags field of the given repository.
pub async fn get_tags<T: Transport>(session: &Session<T>, sr: &SrRef) -> Result<Vec<String>> {
    let method = "SR.get_tags";
    session.call(method, vec![arg(method, "self", sr)?]).await
}

/// Get the sm_config field of the given repository.
pub async fn get_sm_config<T: Transport>(
    session: &Session<T>,
    sr: &SrRef,
) -> Result<HashMap<String, String>> {
    let method = "SR.get_sm_config";
    session.call(method, vec![arg(method, "self", sr)?]).await
}

/// Get the blobs field of the given repository.
pub async fn get_blobs<T: Transport>(
    session: &Session<T>,
    sr: &SrRef,
) -> Result<HashMap<String, BlobRef>> {
    let method = "SR.get_blobs";
    session.call(method, vec![arg(method, "self", sr)?]).await
}

/// Get the local_cache_enabled field of the given repository.
pub async fn get_local_cache_enabled<T: Transport>(
    session: &Session<T>,
    sr: &SrRef,
) -> Result<bool> {
    let method = "SR.get_local_cache_enabled";
    session.call(method, vec![arg(method, "self", sr)?]).await
}

/// Get the disaster-recovery task that introduced the given repository.
pub async fn get_introduced_by<T: Transport>(
    session: &Session<T>,
    sr: &SrRef,
) -> Result<DrTaskRef> {
    let method = "SR.get_introduced_by";
    session.call(method, vec![arg(method, "self", sr)?]).await
}

/// Get the clustered field of the given repository.
pub async fn get_clustered<T: Transport>(session: &Session<T>, sr: &SrRef) -> Result<bool> {
    let method = "SR.get_clustered";
    session.call(method, vec![arg(method, "self", sr)?]).await
}

/// Get the is_tools_sr field of the given repository.
pub async fn get_is_tools_sr<T: Transport>(session: &Session<T>, sr: &SrRef) -> Result<bool> {
    let method = "SR.get_is_tools_sr";
    session.call(method, vec![arg(method, "self", sr)?]).await
}

/// Set the name/label of the given repository.
pub async fn set_name_label<T: Transport>(
    session: &Session<T>,
    sr: &SrRef,
    value: &str,
) -> Result<()> {
    let method = "SR.set_name_label";
    session
        .call_unit(method, vec![arg(method, "self", sr)?, arg(method, "value", value)?])
        .await
}

/// Set the name/description of the given repository.
pub async fn set_name_description<T: Transport>(
    session: &Session<T>,
    sr: &SrRef,
    value: &str,
) -> Result<()> {
    let method = "SR.set_name_description";
    session
        .call_unit(method, vec![arg(method, "self", sr)?, arg(method, "value", value)?])
        .await
}

/// Set the physical size of the given repository, in bytes.
pub async fn set_physical_size<T: Transport>(
    session: &Session<T>,
    sr: &SrRef,
    value: i64,
) -> Result<()> {
    let method = "SR.set_physical_size";
    session
        .call_unit(method, vec![arg(method, "self", sr)?, arg(method, "value", &value)?])
        .await
}

/// Set the other_config field of the given repository.
pub async fn set_other_config<T: Transport>(
    session: &Session<T>,
    sr: &SrRef,
    value: &HashMap<String, String>,
) -> Result<()> {
    let method = "SR.set_other_config";
    session
        .call_unit(method, vec![arg(method, "self", sr)?, arg(method, "value", value)?])
        .await
}

/// Add a key/value pair to the other_config field of the given repository.
pub async fn add_to_other_config<T: Transport>(
    session: &Session<T>,
    sr: &SrRef,
    key: &str,
    value: &str,
) -> Result<()> {
    let method = "SR.add_to_other_config";
    session
        .call_unit(
            method,
            vec![arg(method, "self", sr)?, arg(method, "key", key)?, arg(method, "value", value)?],
        )
        .await
}

/// Remove a key from the other_config field of the given repository.
pub async fn remove_from_other_config<T: Transport>(
    session: &Session<T>,
    sr: &SrRef,
    key: &str,
) -> Result<()> {
    let method = "SR.remove_from_other_config";
    session
        .call_unit(method, vec![arg(method, "self", sr)?, arg(method, "key", key)?])
        .await
}

/// Set the tags field of the given repository.
pub async fn set_tags<T: Transport>(
    session: &Session<T>,
    sr: &SrRef,
    value: &[String],
) -> Result<()> {
    let method = "SR.set_tags";
    session
        .call_unit(method, vec![arg(method, "self", sr)?, arg(method, "value", value)?])
        .await
}

/// Add the given value to the tags of the given repository, if it is not
/// already there.
pub async fn add_tags<T: Transport>(session: &Session<T>, sr: &SrRef, value: &str) -> Result<()> {
    let method = "SR.add_tags";
    session
        .call_unit(method, vec![arg(method, "self", sr)?, arg(method, "value", value)?])
        .await
}

/// Remove the given value from the tags of the given repository.
pub async fn remove_tags<T: Transport>(
    session: &Session<T>,
    sr: &SrRef,
    value: &str,
) -> Result<()> {
    let method = "SR.remove_tags";
    session
        .call_unit(method, vec![arg(method, "self", sr)?, arg(method, "value", value)?])
        .await
}

/// Set the sm_config field of the given repository.
pub async fn set_sm_config<T: Transport>(
    session: &Session<T>,
    sr: &SrRef,
    value: &HashMap<String, String>,
) -> Result<()> {
    let method = "SR.set_sm_config";
    session
        .call_unit(method, vec![arg(method, "self", sr)?, arg(method, "value", value)?])
        .await
}

/// Add a key/value pair to the sm_config field of the given repository.
pub async fn add_to_sm_config<T: Transport>(
    session: &Session<T>,
    sr: &SrRef,
    key: &str,
    value: &str,
) -> Result<()> {
    let method = "SR.add_to_sm_config";
    session
        .call_unit(
            method,
            vec![arg(method, "self", sr)?, arg(method, "key", key)?, arg(method, "value", value)?],
        )
        .await
}

/// Remove a key from the sm_config field of the given repository.
pub async fn remove_from_sm_config<T: Transport>(
    session: &Session<T>,
    sr: &SrRef,
    key: &str,
) -> Result<()> {
    let method = "SR.remove_from_sm_config";
    session
        .call_unit(method, vec![arg(method, "self", sr)?, arg(method, "key", key)?])
        .await
}

/// Create a new storage repository on disk and introduce it into the
/// managed system, attached to the given host.
///
/// The driver named by `r#type` interprets `device_config`; the server and
/// the driver are the sole validators of it.
#[allow(clippy::too_many_arguments)]
pub async fn create<T: Transport>(
    session: &Session<T>,
    host: &HostRef,
    device_config: &HashMap<String, String>,
    physical_size: i64,
    name_label: &str,
    name_description: &str,
    r#type: &str,
    content_type: &str,
    shared: bool,
    sm_config: &HashMap<String, String>,
) -> Result<SrRef> {
    let method = "SR.create";
    session
        .call(
            method,
            vec![
                arg(method, "host", host)?,
                arg(method, "device_config", device_config)?,
                arg(method, "physical_size", &physical_size)?,
                arg(method, "name_label", name_label)?,
                arg(method, "name_description", name_description)?,
                arg(method, "type", r#type)?,
                arg(method, "content_type", content_type)?,
                arg(method, "shared", &shared)?,
                arg(method, "sm_config", sm_config)?,
            ],
        )
        .await
}

/// Introduce an existing storage repository into the managed system without
/// touching its contents.
#[allow(clippy::too_many_arguments)]
pub async fn introduce<T: Transport>(
    session: &Session<T>,
    uuid: &str,
    name_label: &str,
    name_description: &str,
    r#type: &str,
    content_type: &str,
    shared: bool,
    sm_config: &HashMap<String, String>,
) -> Result<SrRef> {
    let method = "SR.introduce";
    session
        .call(
            method,
            vec![
                arg(method, "uuid", uuid)?,
                arg(method, "name_label", name_label)?,
                arg(method, "name_description", name_description)?,
                arg(method, "type", r#type)?,
                arg(method, "content_type", content_type)?,
                arg(method, "shared", &shared)?,
                arg(method, "sm_config", sm_config)?,
            ],
        )
        .await
}

/// Destroy the given repository along with its contents.
///
/// The repository must be detached from all hosts first, or the server
/// faults with [`SR_HAS_PBD`](crate::fault::codes::SR_HAS_PBD).
pub async fn destroy<T: Transport>(session: &Session<T>, sr: &SrRef) -> Result<()> {
    let method = "SR.destroy";
    session.call_unit(method, vec![arg(method, "self", sr)?]).await
}

/// Remove the given repository from the managed system, leaving its
/// contents untouched.
///
/// Like [`destroy`], refused with
/// [`SR_HAS_PBD`](crate::fault::codes::SR_HAS_PBD) while attachment records
/// exist.
pub async fn forget<T: Transport>(session: &Session<T>, sr: &SrRef) -> Result<()> {
    let method = "SR.forget";
    session.call_unit(method, vec![arg(method, "self", sr)?]).await
}

/// Refresh the fields of the given repository from backing storage.
pub async fn update<T: Transport>(session: &Session<T>, sr: &SrRef) -> Result<()> {
    let method = "SR.update";
    session.call_unit(method, vec![arg(method, "self", sr)?]).await
}

/// Rescan the given repository, syncing database VDI records with what is
/// on the storage substrate.
pub async fn scan<T: Transport>(session: &Session<T>, sr: &SrRef) -> Result<()> {
    let method = "SR.scan";
    session.call_unit(method, vec![arg(method, "self", sr)?]).await
}

/// Ask the driver on the given host what repositories it can see behind
/// `device_config`; returns the driver's report verbatim.
pub async fn probe<T: Transport>(
    session: &Session<T>,
    host: &HostRef,
    device_config: &HashMap<String, String>,
    r#type: &str,
    sm_config: &HashMap<String, String>,
) -> Result<String> {
    let method = "SR.probe";
    session
        .call(
            method,
            vec![
                arg(method, "host", host)?,
                arg(method, "device_config", device_config)?,
                arg(method, "type", r#type)?,
                arg(method, "sm_config", sm_config)?,
            ],
        )
        .await
}

/// Return the storage driver types this server supports.
pub async fn get_supported_types<T: Transport>(session: &Session<T>) -> Result<Vec<String>> {
    session.call("SR.get_supported_types", Vec::new()).await
}

/// Queue [`create`] and return the task tracking it.
#[allow(clippy::too_many_arguments)]
pub async fn async_create<T: Transport>(
    session: &Session<T>,
    host: &HostRef,
    device_config: &HashMap<String, String>,
    physical_size: i64,
    name_label: &str,
    name_description: &str,
    r#type: &str,
    content_type: &str,
    shared: bool,
    sm_config: &HashMap<String, String>,
) -> Result<TaskRef> {
    let method = "Async.SR.create";
    session
        .call(
            method,
            vec![
                arg(method, "host", host)?,
                arg(method, "device_config", device_config)?,
                arg(method, "physical_size", &physical_size)?,
                arg(method, "name_label", name_label)?,
                arg(method, "name_description", name_description)?,
                arg(method, "type", r#type)?,
                arg(method, "content_type", content_type)?,
                arg(method, "shared", &shared)?,
                arg(method, "sm_config", sm_config)?,
            ],
        )
        .await
}

/// Queue [`introduce`] and return the task tracking it.
#[allow(clippy::too_many_arguments)]
pub async fn async_introduce<T: Transport>(
    session: &Session<T>,
    uuid: &str,
    name_label: &str,
    name_description: &str,
    r#type: &str,
    content_type: &str,
    shared: bool,
    sm_config: &HashMap<String, String>,
) -> Result<TaskRef> {
    let method = "Async.SR.introduce";
    session
        .call(
            method,
            vec![
                arg(method, "uuid", uuid)?,
                arg(method, "name_label", name_label)?,
                arg(method, "name_description", name_description)?,
                arg(method, "type", r#type)?,
                arg(method, "content_type", content_type)?,
                arg(method, "shared", &shared)?,
                arg(method, "sm_config", sm_config)?,
            ],
        )
        .await
}

/// Queue [`destroy`] and return the task tracking it.
pub async fn async_destroy<T: Transport>(session: &Session<T>, sr: &SrRef) -> Result<TaskRef> {
    let method = "Async.SR.destroy";
    session.call(method, vec![arg(method, "self", sr)?]).await
}

/// Queue [`forget`] and return the task tracking it.
pub async fn async_forget<T: Transport>(session: &Session<T>, sr: &SrRef) -> Result<TaskRef> {
    let method = "Async.SR.forget";
    session.call(method, vec![arg(method, "self", sr)?]).await
}

/// Queue [`update`] and return the task tracking it.
pub async fn async_update<T: Transport>(session: &Session<T>, sr: &SrRef) -> Result<TaskRef> {
    let method = "Async.SR.update";
    session.call(method, vec![arg(method, "self", sr)?]).await
}

/// Queue [`scan`] and return the task tracking it.
pub async fn async_scan<T: Transport>(session: &Session<T>, sr: &SrRef) -> Result<TaskRef> {
    let method = "Async.SR.scan";
    session.call(method, vec![arg(method, "self", sr)?]).await
}

/// Queue [`probe`] and return the task tracking it.
pub async fn async_probe<T: Transport>(
    session: &Session<T>,
    host: &HostRef,
    device_config: &HashMap<String, String>,
    r#type: &str,
    sm_config: &HashMap<String, String>,
) -> Result<TaskRef> {
    let method = "Async.SR.probe";
    session
        .call(
            method,
            vec![
                arg(method, "host", host)?,
                arg(method, "device_config", device_config)?,
                arg(method, "type", r#type)?,
                arg(method, "sm_config", sm_config)?,
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
        ErrorKind,
    };

    #[test_log::test(tokio::test)]
    async fn create_sends_token_then_arguments_in_declaration_order() {
        let transport = MockTransport::new().reply(Value::from("OpaqueRef:new-sr"));
        let session = transport.session();

        let host = HostRef::new("OpaqueRef:host0");
        let device_config = HashMap::from([("device".to_string(), "/dev/sdb".to_string())]);
        let sr = create(
            &session,
            &host,
            &device_config,
            107374182400,
            "Local storage",
            "backing for dom0",
            "lvm",
            "user",
            false,
            &HashMap::new(),
        )
        .await
        .unwrap();
        assert_eq!(sr.as_str(), "OpaqueRef:new-sr");

        let (transport, _) = session.into_parts();
        let (method, params) = &transport.calls()[0];
        assert_eq!(method, "SR.create");
        assert_eq!(
            *params,
            vec![
                Value::from(TOKEN),
                Value::from("OpaqueRef:host0"),
                serde_json::json!({"device": "/dev/sdb"}),
                Value::from(107374182400i64),
                Value::from("Local storage"),
                Value::from("backing for dom0"),
                Value::from("lvm"),
                Value::from("user"),
                Value::from(false),
                serde_json::json!({}),
            ],
        );
    }

    #[test_log::test(tokio::test)]
    async fn async_create_returns_the_tracking_task() {
        let transport = MockTransport::new().reply(Value::from("OpaqueRef:task42"));
        let session = transport.session();

        let task = async_create(
            &session,
            &HostRef::new("OpaqueRef:host0"),
            &HashMap::new(),
            0,
            "scratch",
            "",
            "nfs",
            "user",
            true,
            &HashMap::new(),
        )
        .await
        .unwrap();
        assert_eq!(task.as_str(), "OpaqueRef:task42");

        let (transport, _) = session.into_parts();
        assert_eq!(transport.calls()[0].0, "Async.SR.create");
    }

    #[test_log::test(tokio::test)]
    async fn forget_surfaces_the_server_fault() {
        let transport = MockTransport::new().fault("SR_HAS_PBD", &["OpaqueRef:pbd0"]);
        let session = transport.session();

        let err = forget(&session, &SrRef::new("OpaqueRef:sr0")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Fault);
        let fault = err.as_fault().unwrap();
        assert_eq!(fault.code(), "SR_HAS_PBD");
        assert_eq!(fault.params(), ["OpaqueRef:pbd0"]);
    }

    #[test]
    fn omitted_record_fields_decode_to_zero_values() {
        let record: SrRecord = serde_json::from_value(serde_json::json!({
            "uuid": "b2a1",
            "name_label": "Local storage",
            "type": "lvm",
            "PBDs": ["OpaqueRef:pbd0"],
            "physical_size": 107374182400i64,
        }))
        .unwrap();

        assert_eq!(record.name_description, "");
        assert_eq!(record.r#type, "lvm");
        assert_eq!(record.pbds, [PbdRef::new("OpaqueRef:pbd0")]);
        assert!(record.vdis.is_empty());
        assert_eq!(record.virtual_allocation, 0);
        assert!(!record.shared);
        assert!(record.introduced_by.is_null());
        assert!(record.other_config.is_empty());
    }

    #[test]
    fn unknown_operation_tags_are_rejected() {
        let err = crate::wire::from_wire::<Vec<StorageOperation>>(
            crate::wire::Context::result("SR.get_allowed_operations"),
            serde_json::json!(["scan", "defragment"]),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Deserialize);
        assert!(err.to_string().contains("SR.get_allowed_operations"), "{err}");
    }

    #[test]
    fn operation_tags_use_snake_case() {
        assert_eq!(
            serde_json::to_value(StorageOperation::VdiSnapshot).unwrap(),
            serde_json::json!("vdi_snapshot"),
        );
        assert_eq!(
            serde_json::from_value::<StorageOperation>(serde_json::json!("pbd_destroy")).unwrap(),
            StorageOperation::PbdDestroy,
        );
    }
}
