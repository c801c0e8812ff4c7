//! The `task` class: long-running asynchronous operations.
//!
//! Every `Async.*` method returns one of these. Poll [`get_status`] (or
//! [`get_record`] for everything at once) until the task leaves
//! [`TaskStatus::Pending`]; the outcome is then in the `result` or
//! `error_info` field.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    object::{HostRef, TaskRef},
    wire::arg,
    DateTime, Result, Session, Transport,
};

/// The life-cycle state of a task.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// The task is in progress.
    #[default]
    Pending,
    /// The task completed successfully.
    Success,
    /// The task failed; `error_info` holds the fault description.
    Failure,
    /// Cancellation has been requested but not yet honored.
    Cancelling,
    /// The task was cancelled.
    Cancelled,
}

/// Operations that can run on a task itself.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskAllowedOperation {
    /// Requesting the task stop early.
    #[default]
    Cancel,
    /// Removing the finished task's record.
    Destroy,
}

/// A point-in-time snapshot of one task's fields.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskRecord {
    /// Unique identifier/object reference.
    pub uuid: String,
    /// A human-readable name.
    pub name_label: String,
    /// A notes field containing human-readable description.
    pub name_description: String,
    /// Operations allowed in this state.
    pub allowed_operations: Vec<TaskAllowedOperation>,
    /// Operations currently in progress, keyed by task handle.
    pub current_operations: HashMap<String, TaskAllowedOperation>,
    /// When the task was created.
    pub created: DateTime,
    /// When the task finished; meaningless while still pending.
    pub finished: DateTime,
    /// The life-cycle state of the task.
    pub status: TaskStatus,
    /// The host on which the task is running.
    pub resident_on: HostRef,
    /// Completion estimate between 0 and 1.
    pub progress: f64,
    /// The wire type of the result, if the task produces one.
    pub r#type: String,
    /// The serialized result, once the task has succeeded.
    pub result: String,
    /// Fault code and parameters, once the task has failed.
    pub error_info: Vec<String>,
    /// Additional configuration.
    pub other_config: HashMap<String, String>,
    /// The parent of this task, if it runs as a subtask.
    pub subtask_of: TaskRef,
    /// The subtasks spawned by this task.
    pub subtasks: Vec<TaskRef>,
    /// Server-side backtrace of a failed task, for support bundles.
    pub backtrace: String,
}

/// Return a list of all the tasks known to the system.
pub async fn get_all<T: Transport>(session: &Session<T>) -> Result<Vec<TaskRef>> {
    session.call("task.get_all", Vec::new()).await
}

/// Return a map of all tasks to their records.
pub async fn get_all_records<T: Transport>(
    session: &Session<T>,
) -> Result<HashMap<TaskRef, TaskRecord>> {
    session.call("task.get_all_records", Vec::new()).await
}

/// Get a reference to the task with the given uuid.
pub async fn get_by_uuid<T: Transport>(session: &Session<T>, uuid: &str) -> Result<TaskRef> {
    let method = "task.get_by_uuid";
    session.call(method, vec![arg(method, "uuid", uuid)?]).await
}

/// Get all the tasks with the given name label.
pub async fn get_by_name_label<T: Transport>(
    session: &Session<T>,
    label: &str,
) -> Result<Vec<TaskRef>> {
    let method = "task.get_by_name_label";
    session.call(method, vec![arg(method, "label", label)?]).await
}

/// Get a record containing the current state of the given task.
pub async fn get_record<T: Transport>(session: &Session<T>, task: &TaskRef) -> Result<TaskRecord> {
    let method = "task.get_record";
    session.call(method, vec![arg(method, "self", task)?]).await
}

/// Get the uuid field of the given task.
pub async fn get_uuid<T: Transport>(session: &Session<T>, task: &TaskRef) -> Result<String> {
    let method = "task.get_uuid";
    session.call(method, vec![arg(method, "self", task)?]).await
}

/// Get the name/label field of the given task.
pub async fn get_name_label<T: Transport>(session: &Session<T>, task: &TaskRef) -> Result<String> {
    let method = "task.get_name_label";
    session.call(method, vec![arg(method, "self", task)?]).await
}

/// Get the name/description field of the given task.
pub async fn get_name_description<T: Transport>(
    session: &Session<T>,
    task: &TaskRef,
) -> Result<String> {
    let method = "task.get_name_description";
    session.call(method, vec![arg(method, "self", task)?]).await
}

/// Get the list of operations allowed on the task in its current state.
pub async fn get_allowed_operations<T: Transport>(
    session: &Session<T>,
    task: &TaskRef,
) -> Result<Vec<TaskAllowedOperation>> {
    let method = "task.get_allowed_operations";
    session.call(method, vec![arg(method, "self", task)?]).await
}

/// Get the operations currently in progress on the task.
pub async fn get_current_operations<T: Transport>(
    session: &Session<T>,
    task: &TaskRef,
) -> Result<HashMap<String, TaskAllowedOperation>> {
    let method = "task.get_current_operations";
    session.call(method, vec![arg(method, "self", task)?]).await
}

/// Get the creation time of the given task.
pub async fn get_created<T: Transport>(session: &Session<T>, task: &TaskRef) -> Result<DateTime> {
    let method = "task.get_created";
    session.call(method, vec![arg(method, "self", task)?]).await
}

/// Get the completion time of the given task.
pub async fn get_finished<T: Transport>(session: &Session<T>, task: &TaskRef) -> Result<DateTime> {
    let method = "task.get_finished";
    session.call(method, vec![arg(method, "self", task)?]).await
}

/// Get the life-cycle state of the given task.
pub async fn get_status<T: Transport>(session: &Session<T>, task: &TaskRef) -> Result<TaskStatus> {
    let method = "task.get_status";
    session.call(method, vec![arg(method, "self", task)?]).await
}

/// Get the host the given task is running on.
pub async fn get_resident_on<T: Transport>(
    session: &Session<T>,
    task: &TaskRef,
) -> Result<HostRef> {
    let method = "task.get_resident_on";
    session.call(method, vec![arg(method, "self", task)?]).await
}

/// Get the progress of the given task, between 0 and 1.
pub async fn get_progress<T: Transport>(session: &Session<T>, task: &TaskRef) -> Result<f64> {
    let method = "task.get_progress";
    session.call(method, vec![arg(method, "self", task)?]).await
}

/// Get the wire type of the given task's result.
pub async fn get_type<T: Transport>(session: &Session<T>, task: &TaskRef) -> Result<String> {
    let method = "task.get_type";
    session.call(method, vec![arg(method, "self", task)?]).await
}

/// Get the serialized result of the given task.
pub async fn get_result<T: Transport>(session: &Session<T>, task: &TaskRef) -> Result<String> {
    let method = "task.get_result";
    session.call(method, vec![arg(method, "self", task)?]).await
}

/// Get the fault description of the given failed task.
pub async fn get_error_info<T: Transport>(
    session: &Session<T>,
    task: &TaskRef,
) -> Result<Vec<String>> {
    let method = "task.get_error_info";
    session.call(method, vec![arg(method, "self", task)?]).await
}

/// Get the other_config field of the given task.
pub async fn get_other_config<T: Transport>(
    session: &Session<T>,
    task: &TaskRef,
) -> Result<HashMap<String, String>> {
    let method = "task.get_other_config";
    session.call(method, vec![arg(method, "self", task)?]).await
}

/// Set the other_config field of the given task.
pub async fn set_other_config<T: Transport>(
    session: &Session<T>,
    task: &TaskRef,
    value: &HashMap<String, String>,
) -> Result<()> {
    let method = "task.set_other_config";
    session
        .call_unit(method, vec![arg(method, "self", task)?, arg(method, "value", value)?])
        .await
}

/// Add a key/value pair to the other_config field of the given task.
pub async fn add_to_other_config<T: Transport>(
    session: &Session<T>,
    task: &TaskRef,
    key: &str,
    value: &str,
) -> Result<()> {
    let method = "task.add_to_other_config";
    session
        .call_unit(
            method,
            vec![
                arg(method, "self", task)?,
                arg(method, "key", key)?,
                arg(method, "value", value)?,
            ],
        )
        .await
}

/// Remove a key from the other_config field of the given task.
pub async fn remove_from_other_config<T: Transport>(
    session: &Session<T>,
    task: &TaskRef,
    key: &str,
) -> Result<()> {
    let method = "task.remove_from_other_config";
    session
        .call_unit(method, vec![arg(method, "self", task)?, arg(method, "key", key)?])
        .await
}

/// Get the parent of the given task.
pub async fn get_subtask_of<T: Transport>(
    session: &Session<T>,
    task: &TaskRef,
) -> Result<TaskRef> {
    let method = "task.get_subtask_of";
    session.call(method, vec![arg(method, "self", task)?]).await
}

/// Get the subtasks spawned by the given task.
pub async fn get_subtasks<T: Transport>(
    session: &Session<T>,
    task: &TaskRef,
) -> Result<Vec<TaskRef>> {
    let method = "task.get_subtasks";
    session.call(method, vec![arg(method, "self", task)?]).await
}

/// Get the server-side backtrace of the given failed task.
pub async fn get_backtrace<T: Transport>(session: &Session<T>, task: &TaskRef) -> Result<String> {
    let method = "task.get_backtrace";
    session.call(method, vec![arg(method, "self", task)?]).await
}

/// Create a client-managed task.
///
/// The server never touches such a task; clients use them to tie their own
/// multi-call operations together. The caller is responsible for the
/// eventual [`destroy`].
pub async fn create<T: Transport>(
    session: &Session<T>,
    label: &str,
    description: &str,
) -> Result<TaskRef> {
    let method = "task.create";
    session
        .call(
            method,
            vec![arg(method, "label", label)?, arg(method, "description", description)?],
        )
        .await
}

/// Destroy the record of a finished task.
pub async fn destroy<T: Transport>(session: &Session<T>, task: &TaskRef) -> Result<()> {
    let method = "task.destroy";
    session.call_unit(method, vec![arg(method, "self", task)?]).await
}

/// Request that the given task be cancelled.
///
/// Cancellation is cooperative: the task moves to
/// [`TaskStatus::Cancelling`] until the operation notices, and not every
/// operation can be interrupted.
pub async fn cancel<T: Transport>(session: &Session<T>, task: &TaskRef) -> Result<()> {
    let method = "task.cancel";
    session.call_unit(method, vec![arg(method, "self", task)?]).await
}

/// Queue [`cancel`] and return the task tracking it.
pub async fn async_cancel<T: Transport>(session: &Session<T>, task: &TaskRef) -> Result<TaskRef> {
    let method = "Async.task.cancel";
    session.call(method, vec![arg(method, "self", task)?]).await
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
    async fn records_decode_timestamps_and_status() {
        let transport = MockTransport::new().reply(serde_json::json!({
            "uuid": "t1",
            "name_label": "Async.SR.create",
            "created": "20250824T09:30:00Z",
            "finished": "20250824T09:30:17Z",
            "status": "success",
            "resident_on": "OpaqueRef:host0",
            "progress": 1.0,
            "result": "<value>OpaqueRef:new-sr</value>",
            "allowed_operations": ["destroy"],
        }));
        let session = transport.session();

        let record = get_record(&session, &TaskRef::new("OpaqueRef:t1")).await.unwrap();
        assert_eq!(record.status, TaskStatus::Success);
        assert_eq!(record.created.to_string(), "20250824T09:30:00Z");
        assert!(record.finished > record.created);
        assert_eq!(record.progress, 1.0);
        assert_eq!(record.allowed_operations, [TaskAllowedOperation::Destroy]);
        // Omitted fields come back as zero values.
        assert!(record.error_info.is_empty());
        assert!(record.subtask_of.is_null());
    }

    #[test_log::test(tokio::test)]
    async fn unknown_status_tags_are_rejected() {
        let transport = MockTransport::new().reply(Value::from("paused"));
        let session = transport.session();

        let err = get_status(&session, &TaskRef::new("OpaqueRef:t1")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Deserialize);
        assert!(err.to_string().contains("task.get_status"), "{err}");
    }

    #[test_log::test(tokio::test)]
    async fn create_then_cancel_round_trip() {
        let transport = MockTransport::new()
            .reply(Value::from("OpaqueRef:t9"))
            .reply(Value::from(""));
        let session = transport.session();

        let task = create(&session, "bulk import", "imports from the NFS share").await.unwrap();
        cancel(&session, &task).await.unwrap();

        let (transport, _) = session.into_parts();
        let calls = transport.calls();
        assert_eq!(calls[0].0, "task.create");
        assert_eq!(
            calls[0].1,
            vec![
                Value::from(TOKEN),
                Value::from("bulk import"),
                Value::from("imports from the NFS share"),
            ],
        );
        assert_eq!(calls[1].0, "task.cancel");
        assert_eq!(calls[1].1, vec![Value::from(TOKEN), Value::from("OpaqueRef:t9")]);
    }
}
