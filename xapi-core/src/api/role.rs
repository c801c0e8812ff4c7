//! The `role` class: static RBAC roles and permissions.
//!
//! Roles form a hierarchy: a named role contains sub-roles, whose leaves
//! are individual permissions. The whole tree is read-only; it ships with
//! the server.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{object::RoleRef, wire::arg, Result, Session, Transport};

/// A point-in-time snapshot of one role's fields.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleRecord {
    /// Unique identifier/object reference.
    pub uuid: String,
    /// A short user-friendly name for the role.
    pub name_label: String,
    /// What this role is for.
    pub name_description: String,
    /// The roles contained in this one.
    pub subroles: Vec<RoleRef>,
    /// Whether the role is only used internally by the server.
    pub is_internal: bool,
}

/// Return a list of all the roles known to the system.
pub async fn get_all<T: Transport>(session: &Session<T>) -> Result<Vec<RoleRef>> {
    session.call("role.get_all", Vec::new()).await
}

/// Return a map of all roles to their records.
pub async fn get_all_records<T: Transport>(
    session: &Session<T>,
) -> Result<HashMap<RoleRef, RoleRecord>> {
    session.call("role.get_all_records", Vec::new()).await
}

/// Get a reference to the role with the given uuid.
pub async fn get_by_uuid<T: Transport>(session: &Session<T>, uuid: &str) -> Result<RoleRef> {
    let method = "role.get_by_uuid";
    session.call(method, vec![arg(method, "uuid", uuid)?]).await
}

/// Get all the roles with the given name label.
pub async fn get_by_name_label<T: Transport>(
    session: &Session<T>,
    label: &str,
) -> Result<Vec<RoleRef>> {
    let method = "role.get_by_name_label";
    session.call(method, vec![arg(method, "label", label)?]).await
}

/// Get a record containing the current state of the given role.
pub async fn get_record<T: Transport>(session: &Session<T>, role: &RoleRef) -> Result<RoleRecord> {
    let method = "role.get_record";
    session.call(method, vec![arg(method, "self", role)?]).await
}

/// Get the uuid field of the given role.
pub async fn get_uuid<T: Transport>(session: &Session<T>, role: &RoleRef) -> Result<String> {
    let method = "role.get_uuid";
    session.call(method, vec![arg(method, "self", role)?]).await
}

/// Get the name/label field of the given role.
pub async fn get_name_label<T: Transport>(session: &Session<T>, role: &RoleRef) -> Result<String> {
    let method = "role.get_name_label";
    session.call(method, vec![arg(method, "self", role)?]).await
}

/// Get the name/description field of the given role.
pub async fn get_name_description<T: Transport>(
    session: &Session<T>,
    role: &RoleRef,
) -> Result<String> {
    let method = "role.get_name_description";
    session.call(method, vec![arg(method, "self", role)?]).await
}

/// Get the subroles of the given role.
pub async fn get_subroles<T: Transport>(
    session: &Session<T>,
    role: &RoleRef,
) -> Result<Vec<RoleRef>> {
    let method = "role.get_subroles";
    session.call(method, vec![arg(method, "self", role)?]).await
}

/// Get the is_internal field of the given role.
pub async fn get_is_internal<T: Transport>(session: &Session<T>, role: &RoleRef) -> Result<bool> {
    let method = "role.get_is_internal";
    session.call(method, vec![arg(method, "self", role)?]).await
}

/// Return the set of permissions granted by the given role, transitively
/// through its subroles.
pub async fn get_permissions<T: Transport>(
    session: &Session<T>,
    role: &RoleRef,
) -> Result<Vec<RoleRef>> {
    let method = "role.get_permissions";
    session.call(method, vec![arg(method, "self", role)?]).await
}

/// Like [`get_permissions`], returning the permissions' name labels.
pub async fn get_permissions_name_label<T: Transport>(
    session: &Session<T>,
    role: &RoleRef,
) -> Result<Vec<String>> {
    let method = "role.get_permissions_name_label";
    session.call(method, vec![arg(method, "self", role)?]).await
}

/// Return the roles that grant the given permission.
pub async fn get_by_permission<T: Transport>(
    session: &Session<T>,
    permission: &RoleRef,
) -> Result<Vec<RoleRef>> {
    let method = "role.get_by_permission";
    session.call(method, vec![arg(method, "permission", permission)?]).await
}

/// Return the roles that grant the permission with the given name label.
pub async fn get_by_permission_name_label<T: Transport>(
    session: &Session<T>,
    label: &str,
) -> Result<Vec<RoleRef>> {
    let method = "role.get_by_permission_name_label";
    session.call(method, vec![arg(method, "label", label)?]).await
}
