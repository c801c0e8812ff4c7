//! The `Feature` class: advertised host capabilities.
//!
//! Features are read-only: hosts declare them, clients only list them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    object::{FeatureRef, HostRef},
    wire::arg,
    Result, Session, Transport,
};

/// A point-in-time snapshot of one feature's fields.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureRecord {
    /// Unique identifier/object reference.
    pub uuid: String,
    /// A human-readable name.
    pub name_label: String,
    /// A notes field containing human-readable description.
    pub name_description: String,
    /// Whether the feature is enabled.
    pub enabled: bool,
    /// Whether the feature is experimental.
    pub experimental: bool,
    /// The version of the feature.
    pub version: String,
    /// The host where this feature is available.
    pub host: HostRef,
}

/// Return a list of all the features known to the system.
pub async fn get_all<T: Transport>(session: &Session<T>) -> Result<Vec<FeatureRef>> {
    session.call("Feature.get_all", Vec::new()).await
}

/// Return a map of all features to their records.
pub async fn get_all_records<T: Transport>(
    session: &Session<T>,
) -> Result<HashMap<FeatureRef, FeatureRecord>> {
    session.call("Feature.get_all_records", Vec::new()).await
}

/// Get a reference to the feature with the given uuid.
pub async fn get_by_uuid<T: Transport>(session: &Session<T>, uuid: &str) -> Result<FeatureRef> {
    let method = "Feature.get_by_uuid";
    session.call(method, vec![arg(method, "uuid", uuid)?]).await
}

/// Get all the features with the given name label.
pub async fn get_by_name_label<T: Transport>(
    session: &Session<T>,
    label: &str,
) -> Result<Vec<FeatureRef>> {
    let method = "Feature.get_by_name_label";
    session.call(method, vec![arg(method, "label", label)?]).await
}

/// Get a record containing the current state of the given feature.
pub async fn get_record<T: Transport>(
    session: &Session<T>,
    feature: &FeatureRef,
) -> Result<FeatureRecord> {
    let method = "Feature.get_record";
    session.call(method, vec![arg(method, "self", feature)?]).await
}

/// Get the uuid field of the given feature.
pub async fn get_uuid<T: Transport>(session: &Session<T>, feature: &FeatureRef) -> Result<String> {
    let method = "Feature.get_uuid";
    session.call(method, vec![arg(method, "self", feature)?]).await
}

/// Get the name/label field of the given feature.
pub async fn get_name_label<T: Transport>(
    session: &Session<T>,
    feature: &FeatureRef,
) -> Result<String> {
    let method = "Feature.get_name_label";
    session.call(method, vec![arg(method, "self", feature)?]).await
}

/// Get the name/description field of the given feature.
pub async fn get_name_description<T: Transport>(
    session: &Session<T>,
    feature: &FeatureRef,
) -> Result<String> {
    let method = "Feature.get_name_description";
    session.call(method, vec![arg(method, "self", feature)?]).await
}

/// Get the enabled field of the given feature.
pub async fn get_enabled<T: Transport>(
    session: &Session<T>,
    feature: &FeatureRef,
) -> Result<bool> {
    let method = "Feature.get_enabled";
    session.call(method, vec![arg(method, "self", feature)?]).await
}

/// Get the experimental field of the given feature.
pub async fn get_experimental<T: Transport>(
    session: &Session<T>,
    feature: &FeatureRef,
) -> Result<bool> {
    let method = "Feature.get_experimental";
    session.call(method, vec![arg(method, "self", feature)?]).await
}

/// Get the version of the given feature.
pub async fn get_version<T: Transport>(
    session: &Session<T>,
    feature: &FeatureRef,
) -> Result<String> {
    let method = "Feature.get_version";
    session.call(method, vec![arg(method, "self", feature)?]).await
}

/// Get the host where the given feature is available.
pub async fn get_host<T: Transport>(
    session: &Session<T>,
    feature: &FeatureRef,
) -> Result<HostRef> {
    let method = "Feature.get_host";
    session.call(method, vec![arg(method, "self", feature)?]).await
}
