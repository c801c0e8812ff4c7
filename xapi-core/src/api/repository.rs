//! The `Repository` class: package update repositories.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    object::{RepositoryRef, TaskRef},
    wire::arg,
    Result, Session, Transport,
};

/// Where a repository's content comes from.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// A remote YUM repository.
    #[default]
    Remote,
    /// An uploaded bundle file.
    Bundle,
    /// The repository of a remote pool coordinator.
    RemotePool,
}

/// A point-in-time snapshot of one repository's fields.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryRecord {
    /// Unique identifier/object reference.
    pub uuid: String,
    /// A human-readable name.
    pub name_label: String,
    /// A notes field containing human-readable description.
    pub name_description: String,
    /// Base URL of binary packages in this repository.
    pub binary_url: String,
    /// Base URL of source packages in this repository.
    pub source_url: String,
    /// Whether this repository is an update repository.
    pub update: bool,
    /// SHA256 checksum of the repository metadata.
    pub hash: String,
    /// Whether the hosts are up to date with this repository.
    pub up_to_date: bool,
    /// Path of the host's GPG public key used to verify metadata.
    pub gpgkey_path: String,
    /// Where this repository's content comes from.
    pub origin: Origin,
    /// Certificate trusted when syncing from a remote pool.
    pub certificate: String,
}

/// Return a list of all the repositories known to the system.
pub async fn get_all<T: Transport>(session: &Session<T>) -> Result<Vec<RepositoryRef>> {
    session.call("Repository.get_all", Vec::new()).await
}

/// Return a map of all repositories to their records.
pub async fn get_all_records<T: Transport>(
    session: &Session<T>,
) -> Result<HashMap<RepositoryRef, RepositoryRecord>> {
    session.call("Repository.get_all_records", Vec::new()).await
}

/// Get a reference to the repository with the given uuid.
pub async fn get_by_uuid<T: Transport>(session: &Session<T>, uuid: &str) -> Result<RepositoryRef> {
    let method = "Repository.get_by_uuid";
    session.call(method, vec![arg(method, "uuid", uuid)?]).await
}

/// Get all the repositories with the given name label.
pub async fn get_by_name_label<T: Transport>(
    session: &Session<T>,
    label: &str,
) -> Result<Vec<RepositoryRef>> {
    let method = "Repository.get_by_name_label";
    session.call(method, vec![arg(method, "label", label)?]).await
}

/// Get a record containing the current state of the given repository.
pub async fn get_record<T: Transport>(
    session: &Session<T>,
    repository: &RepositoryRef,
) -> Result<RepositoryRecord> {
    let method = "Repository.get_record";
    session.call(method, vec![arg(method, "self", repository)?]).await
}

/// Get the uuid field of the given repository.
pub async fn get_uuid<T: Transport>(
    session: &Session<T>,
    repository: &RepositoryRef,
) -> Result<String> {
    let method = "Repository.get_uuid";
    session.call(method, vec![arg(method, "self", repository)?]).await
}

/// Get the name/label field of the given repository.
pub async fn get_name_label<T: Transport>(
    session: &Session<T>,
    repository: &RepositoryRef,
) -> Result<String> {
    let method = "Repository.get_name_label";
    session.call(method, vec![arg(method, "self", repository)?]).await
}

/// Get the name/description field of the given repository.
pub async fn get_name_description<T: Transport>(
    session: &Session<T>,
    repository: &RepositoryRef,
) -> Result<String> {
    let method = "Repository.get_name_description";
    session.call(method, vec![arg(method, "self", repository)?]).await
}

/// Get the binary_url field of the given repository.
pub async fn get_binary_url<T: Transport>(
    session: &Session<T>,
    repository: &RepositoryRef,
) -> Result<String> {
    let method = "Repository.get_binary_url";
    session.call(method, vec![arg(method, "self", repository)?]).await
}

/// Get the source_url field of the given repository.
pub async fn get_source_url<T: Transport>(
    session: &Session<T>,
    repository: &RepositoryRef,
) -> Result<String> {
    let method = "Repository.get_source_url";
    session.call(method, vec![arg(method, "self", repository)?]).await
}

/// Get the update field of the given repository.
pub async fn get_update<T: Transport>(
    session: &Session<T>,
    repository: &RepositoryRef,
) -> Result<bool> {
    let method = "Repository.get_update";
    session.call(method, vec![arg(method, "self", repository)?]).await
}

/// Get the metadata hash of the given repository.
pub async fn get_hash<T: Transport>(
    session: &Session<T>,
    repository: &RepositoryRef,
) -> Result<String> {
    let method = "Repository.get_hash";
    session.call(method, vec![arg(method, "self", repository)?]).await
}

/// Get the up_to_date field of the given repository.
pub async fn get_up_to_date<T: Transport>(
    session: &Session<T>,
    repository: &RepositoryRef,
) -> Result<bool> {
    let method = "Repository.get_up_to_date";
    session.call(method, vec![arg(method, "self", repository)?]).await
}

/// Get the gpgkey_path field of the given repository.
pub async fn get_gpgkey_path<T: Transport>(
    session: &Session<T>,
    repository: &RepositoryRef,
) -> Result<String> {
    let method = "Repository.get_gpgkey_path";
    session.call(method, vec![arg(method, "self", repository)?]).await
}

/// Get the origin of the given repository's content.
pub async fn get_origin<T: Transport>(
    session: &Session<T>,
    repository: &RepositoryRef,
) -> Result<Origin> {
    let method = "Repository.get_origin";
    session.call(method, vec![arg(method, "self", repository)?]).await
}

/// Get the certificate trusted when syncing the given repository from a
/// remote pool.
pub async fn get_certificate<T: Transport>(
    session: &Session<T>,
    repository: &RepositoryRef,
) -> Result<String> {
    let method = "Repository.get_certificate";
    session.call(method, vec![arg(method, "self", repository)?]).await
}

/// Set the name/label of the given repository.
pub async fn set_name_label<T: Transport>(
    session: &Session<T>,
    repository: &RepositoryRef,
    value: &str,
) -> Result<()> {
    let method = "Repository.set_name_label";
    session
        .call_unit(method, vec![arg(method, "self", repository)?, arg(method, "value", value)?])
        .await
}

/// Set the name/description of the given repository.
pub async fn set_name_description<T: Transport>(
    session: &Session<T>,
    repository: &RepositoryRef,
    value: &str,
) -> Result<()> {
    let method = "Repository.set_name_description";
    session
        .call_unit(method, vec![arg(method, "self", repository)?, arg(method, "value", value)?])
        .await
}

/// Set the GPG public key path used to verify the given repository's
/// metadata.
pub async fn set_gpgkey_path<T: Transport>(
    session: &Session<T>,
    repository: &RepositoryRef,
    value: &str,
) -> Result<()> {
    let method = "Repository.set_gpgkey_path";
    session
        .call_unit(method, vec![arg(method, "self", repository)?, arg(method, "value", value)?])
        .await
}

/// Add the configuration of a remote YUM repository.
pub async fn introduce<T: Transport>(
    session: &Session<T>,
    name_label: &str,
    name_description: &str,
    binary_url: &str,
    source_url: &str,
    update: bool,
) -> Result<RepositoryRef> {
    let method = "Repository.introduce";
    session
        .call(
            method,
            vec![
                arg(method, "name_label", name_label)?,
                arg(method, "name_description", name_description)?,
                arg(method, "binary_url", binary_url)?,
                arg(method, "source_url", source_url)?,
                arg(method, "update", &update)?,
            ],
        )
        .await
}

/// Add the configuration of a repository fed by uploaded bundle files.
pub async fn introduce_bundle<T: Transport>(
    session: &Session<T>,
    name_label: &str,
    name_description: &str,
) -> Result<RepositoryRef> {
    let method = "Repository.introduce_bundle";
    session
        .call(
            method,
            vec![
                arg(method, "name_label", name_label)?,
                arg(method, "name_description", name_description)?,
            ],
        )
        .await
}

/// Add the configuration of a repository mirrored from a remote pool
/// coordinator.
pub async fn introduce_remote_pool<T: Transport>(
    session: &Session<T>,
    name_label: &str,
    name_description: &str,
    binary_url: &str,
    certificate: &str,
) -> Result<RepositoryRef> {
    let method = "Repository.introduce_remote_pool";
    session
        .call(
            method,
            vec![
                arg(method, "name_label", name_label)?,
                arg(method, "name_description", name_description)?,
                arg(method, "binary_url", binary_url)?,
                arg(method, "certificate", certificate)?,
            ],
        )
        .await
}

/// Remove the given repository's configuration from the managed system.
pub async fn forget<T: Transport>(
    session: &Session<T>,
    repository: &RepositoryRef,
) -> Result<()> {
    let method = "Repository.forget";
    session.call_unit(method, vec![arg(method, "self", repository)?]).await
}

/// Queue [`introduce`] and return the task tracking it.
pub async fn async_introduce<T: Transport>(
    session: &Session<T>,
    name_label: &str,
    name_description: &str,
    binary_url: &str,
    source_url: &str,
    update: bool,
) -> Result<TaskRef> {
    let method = "Async.Repository.introduce";
    session
        .call(
            method,
            vec![
                arg(method, "name_label", name_label)?,
                arg(method, "name_description", name_description)?,
                arg(method, "binary_url", binary_url)?,
                arg(method, "source_url", source_url)?,
                arg(method, "update", &update)?,
            ],
        )
        .await
}

/// Queue [`introduce_bundle`] and return the task tracking it.
pub async fn async_introduce_bundle<T: Transport>(
    session: &Session<T>,
    name_label: &str,
    name_description: &str,
) -> Result<TaskRef> {
    let method = "Async.Repository.introduce_bundle";
    session
        .call(
            method,
            vec![
                arg(method, "name_label", name_label)?,
                arg(method, "name_description", name_description)?,
            ],
        )
        .await
}

/// Queue [`introduce_remote_pool`] and return the task tracking it.
pub async fn async_introduce_remote_pool<T: Transport>(
    session: &Session<T>,
    name_label: &str,
    name_description: &str,
    binary_url: &str,
    certificate: &str,
) -> Result<TaskRef> {
    let method = "Async.Repository.introduce_remote_pool";
    session
        .call(
            method,
            vec![
                arg(method, "name_label", name_label)?,
                arg(method, "name_description", name_description)?,
                arg(method, "binary_url", binary_url)?,
                arg(method, "certificate", certificate)?,
            ],
        )
        .await
}

/// Queue [`forget`] and return the task tracking it.
pub async fn async_forget<T: Transport>(
    session: &Session<T>,
    repository: &RepositoryRef,
) -> Result<TaskRef> {
    let method = "Async.Repository.forget";
    session.call(method, vec![arg(method, "self", repository)?]).await
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
    async fn get_record_decodes_the_full_record() {
        let transport = MockTransport::new().reply(serde_json::json!({
            "uuid": "6ad6e064",
            "name_label": "base",
            "name_description": "Base updates",
            "binary_url": "https://updates.example.com/8.4/base",
            "source_url": "https://updates.example.com/8.4/base-src",
            "update": true,
            "hash": "5891b5b522",
            "up_to_date": false,
            "gpgkey_path": "RPM-GPG-KEY",
            "origin": "remote",
        }));
        let session = transport.session();

        let repository = RepositoryRef::new("OpaqueRef:repo0");
        let record = get_record(&session, &repository).await.unwrap();
        assert_eq!(record.uuid, "6ad6e064");
        assert_eq!(record.binary_url, "https://updates.example.com/8.4/base");
        assert!(record.update);
        assert_eq!(record.origin, Origin::Remote);
        // Not sent by this server version.
        assert_eq!(record.certificate, "");

        let (transport, _) = session.into_parts();
        let (method, params) = &transport.calls()[0];
        assert_eq!(method, "Repository.get_record");
        assert_eq!(*params, vec![Value::from(TOKEN), Value::from("OpaqueRef:repo0")]);
    }

    #[test_log::test(tokio::test)]
    async fn unknown_origin_tags_are_rejected() {
        let transport =
            MockTransport::new().reply(serde_json::json!({"uuid": "x", "origin": "sideload"}));
        let session = transport.session();

        let err = get_record(&session, &RepositoryRef::new("OpaqueRef:repo0"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Deserialize);
        assert!(err.to_string().contains("Repository.get_record"), "{err}");
    }

    #[test_log::test(tokio::test)]
    async fn introduce_variants_dispatch_distinct_methods() {
        let transport = MockTransport::new()
            .reply(Value::from("OpaqueRef:r1"))
            .reply(Value::from("OpaqueRef:r2"));
        let session = transport.session();

        introduce(&session, "base", "", "https://u.example.com/base", "", true).await.unwrap();
        introduce_bundle(&session, "bundle", "offline updates").await.unwrap();

        let (transport, _) = session.into_parts();
        assert_eq!(transport.calls()[0].0, "Repository.introduce");
        assert_eq!(transport.calls()[1].0, "Repository.introduce_bundle");
        assert_eq!(
            transport.calls()[1].1,
            vec![Value::from(TOKEN), Value::from("bundle"), Value::from("offline updates")],
        );
    }
}
