//! The `subject` class: users and groups allowed to log in.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    object::{RoleRef, SubjectRef, TaskRef},
    wire::arg,
    Result, Session, Transport,
};

/// A point-in-time snapshot of one subject's fields.
///
/// Also the argument of [`create`], whose server-assigned fields (`uuid`,
/// `roles`) are ignored on the way in.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectRecord {
    /// Unique identifier/object reference.
    pub uuid: String,
    /// The external identity of the user or group, as provided by the
    /// directory service.
    pub subject_identifier: String,
    /// Additional configuration.
    pub other_config: HashMap<String, String>,
    /// The roles granted to this subject.
    pub roles: Vec<RoleRef>,
}

/// Return a list of all the subjects known to the system.
pub async fn get_all<T: Transport>(session: &Session<T>) -> Result<Vec<SubjectRef>> {
    session.call("subject.get_all", Vec::new()).await
}

/// Return a map of all subjects to their records.
pub async fn get_all_records<T: Transport>(
    session: &Session<T>,
) -> Result<HashMap<SubjectRef, SubjectRecord>> {
    session.call("subject.get_all_records", Vec::new()).await
}

/// Get a reference to the subject with the given uuid.
pub async fn get_by_uuid<T: Transport>(session: &Session<T>, uuid: &str) -> Result<SubjectRef> {
    let method = "subject.get_by_uuid";
    session.call(method, vec![arg(method, "uuid", uuid)?]).await
}

/// Get a record containing the current state of the given subject.
pub async fn get_record<T: Transport>(
    session: &Session<T>,
    subject: &SubjectRef,
) -> Result<SubjectRecord> {
    let method = "subject.get_record";
    session.call(method, vec![arg(method, "self", subject)?]).await
}

/// Get the uuid field of the given subject.
pub async fn get_uuid<T: Transport>(session: &Session<T>, subject: &SubjectRef) -> Result<String> {
    let method = "subject.get_uuid";
    session.call(method, vec![arg(method, "self", subject)?]).await
}

/// Get the external identity of the given subject.
pub async fn get_subject_identifier<T: Transport>(
    session: &Session<T>,
    subject: &SubjectRef,
) -> Result<String> {
    let method = "subject.get_subject_identifier";
    session.call(method, vec![arg(method, "self", subject)?]).await
}

/// Get the other_config field of the given subject.
pub async fn get_other_config<T: Transport>(
    session: &Session<T>,
    subject: &SubjectRef,
) -> Result<HashMap<String, String>> {
    let method = "subject.get_other_config";
    session.call(method, vec![arg(method, "self", subject)?]).await
}

/// Get the roles granted to the given subject.
pub async fn get_roles<T: Transport>(
    session: &Session<T>,
    subject: &SubjectRef,
) -> Result<Vec<RoleRef>> {
    let method = "subject.get_roles";
    session.call(method, vec![arg(method, "self", subject)?]).await
}

/// Create a new subject from the given record and return its reference.
pub async fn create<T: Transport>(
    session: &Session<T>,
    args: &SubjectRecord,
) -> Result<SubjectRef> {
    let method = "subject.create";
    session.call(method, vec![arg(method, "args", args)?]).await
}

/// Destroy the given subject.
pub async fn destroy<T: Transport>(session: &Session<T>, subject: &SubjectRef) -> Result<()> {
    let method = "subject.destroy";
    session.call_unit(method, vec![arg(method, "self", subject)?]).await
}

/// Grant a role to the given subject.
pub async fn add_to_roles<T: Transport>(
    session: &Session<T>,
    subject: &SubjectRef,
    role: &RoleRef,
) -> Result<()> {
    let method = "subject.add_to_roles";
    session
        .call_unit(method, vec![arg(method, "self", subject)?, arg(method, "role", role)?])
        .await
}

/// Revoke a role from the given subject.
pub async fn remove_from_roles<T: Transport>(
    session: &Session<T>,
    subject: &SubjectRef,
    role: &RoleRef,
) -> Result<()> {
    let method = "subject.remove_from_roles";
    session
        .call_unit(method, vec![arg(method, "self", subject)?, arg(method, "role", role)?])
        .await
}

/// Queue [`create`] and return the task tracking it.
pub async fn async_create<T: Transport>(
    session: &Session<T>,
    args: &SubjectRecord,
) -> Result<TaskRef> {
    let method = "Async.subject.create";
    session.call(method, vec![arg(method, "args", args)?]).await
}

/// Queue [`destroy`] and return the task tracking it.
pub async fn async_destroy<T: Transport>(
    session: &Session<T>,
    subject: &SubjectRef,
) -> Result<TaskRef> {
    let method = "Async.subject.destroy";
    session.call(method, vec![arg(method, "self", subject)?]).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test_utils::mock_transport::{MockTransport, TOKEN},
        wire::Value,
    };

    #[test_log::test(tokio::test)]
    async fn create_sends_the_record_as_one_argument() {
        let transport = MockTransport::new().reply(Value::from("OpaqueRef:subj0"));
        let session = transport.session();

        let args = SubjectRecord {
            subject_identifier: "S-1-5-21-2906064-18".into(),
            other_config: HashMap::from([("origin".to_string(), "ldap".to_string())]),
            ..SubjectRecord::default()
        };
        let subject = create(&session, &args).await.unwrap();
        assert_eq!(subject.as_str(), "OpaqueRef:subj0");

        let (transport, _) = session.into_parts();
        let (method, params) = &transport.calls()[0];
        assert_eq!(method, "subject.create");
        assert_eq!(params[0], Value::from(TOKEN));
        assert_eq!(params[1]["subject_identifier"], Value::from("S-1-5-21-2906064-18"));
        assert_eq!(params[1]["other_config"]["origin"], Value::from("ldap"));
    }

    #[test_log::test(tokio::test)]
    async fn role_membership_calls_pass_both_references() {
        let transport = MockTransport::new().reply(Value::from("")).reply(Value::from(""));
        let session = transport.session();

        let subject = SubjectRef::new("OpaqueRef:subj0");
        let role = RoleRef::new("OpaqueRef:pool-admin");
        add_to_roles(&session, &subject, &role).await.unwrap();
        remove_from_roles(&session, &subject, &role).await.unwrap();

        let (transport, _) = session.into_parts();
        for (method, params) in transport.calls() {
            assert!(method.starts_with("subject."), "{method}");
            assert_eq!(
                *params,
                vec![
                    Value::from(TOKEN),
                    Value::from("OpaqueRef:subj0"),
                    Value::from("OpaqueRef:pool-admin"),
                ],
            );
        }
    }
}
