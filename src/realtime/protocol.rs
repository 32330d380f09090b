//! Realtime Wire Protocol
//!
//! Phoenix v1 JSON frames as spoken by the backend's realtime socket:
//! channel join/leave, heartbeats, and `postgres_changes` notifications.

use std::cell::Cell;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::board::TaskChange;
use crate::error::RealtimeError;
use crate::models::Task;

const PHOENIX_TOPIC: &str = "phoenix";
const TASKS_TABLE: &str = "tasks";

// ========================================================================
// Frames
// ========================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoenixMessage {
    pub topic: String,
    pub event: String,
    #[serde(default)]
    pub payload: serde_json::Value,
    #[serde(rename = "ref", default)]
    pub msg_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_ref: Option<String>,
}

/// Channel topic carrying one project's task changes
pub fn topic_for(project_id: &str) -> String {
    format!("realtime:tasks-{}", project_id)
}

impl PhoenixMessage {
    /// Join request subscribing to every change of the project's task rows
    pub fn join(topic: &str, project_id: &str, access_token: &str, join_ref: &str) -> Self {
        Self {
            topic: topic.to_string(),
            event: "phx_join".to_string(),
            payload: json!({
                "config": {
                    "broadcast": { "self": false },
                    "presence": { "key": "" },
                    "postgres_changes": [{
                        "event": "*",
                        "schema": "public",
                        "table": TASKS_TABLE,
                        "filter": format!("project_id=eq.{}", project_id),
                    }],
                },
                "access_token": access_token,
            }),
            msg_ref: Some(join_ref.to_string()),
            join_ref: Some(join_ref.to_string()),
        }
    }

    pub fn heartbeat(msg_ref: &str) -> Self {
        Self {
            topic: PHOENIX_TOPIC.to_string(),
            event: "heartbeat".to_string(),
            payload: json!({}),
            msg_ref: Some(msg_ref.to_string()),
            join_ref: None,
        }
    }

    pub fn leave(topic: &str, msg_ref: &str, join_ref: &str) -> Self {
        Self {
            topic: topic.to_string(),
            event: "phx_leave".to_string(),
            payload: json!({}),
            msg_ref: Some(msg_ref.to_string()),
            join_ref: Some(join_ref.to_string()),
        }
    }

    pub fn encode(&self) -> Result<String, RealtimeError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Monotonic message refs, one counter per socket
#[derive(Debug, Default)]
pub struct RefCounter(Cell<u64>);

impl RefCounter {
    pub fn next(&self) -> String {
        let value = self.0.get() + 1;
        self.0.set(value);
        value.to_string()
    }
}

// ========================================================================
// Inbound
// ========================================================================

/// What an inbound frame means for one joined channel
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Change(TaskChange),
    Joined,
    Rejected(String),
    /// Server closed or crashed the channel
    Closed,
    /// Heartbeat replies, presence, frames for other topics
    Ignored,
}

#[derive(Deserialize)]
struct ChangePayload {
    data: ChangeData,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum ChangeData {
    #[serde(rename = "INSERT")]
    Insert { record: Task },
    #[serde(rename = "UPDATE")]
    Update { record: Task },
    #[serde(rename = "DELETE")]
    Delete { old_record: OldRecord },
}

#[derive(Deserialize)]
struct OldRecord {
    id: String,
}

/// Interpret a text frame for the channel `topic` joined with `join_ref`
pub fn decode(text: &str, topic: &str, join_ref: &str) -> Result<Inbound, RealtimeError> {
    let message: PhoenixMessage = serde_json::from_str(text)?;
    if message.topic != topic {
        return Ok(Inbound::Ignored);
    }

    match message.event.as_str() {
        "postgres_changes" => {
            let payload: ChangePayload = serde_json::from_value(message.payload)?;
            let change = match payload.data {
                ChangeData::Insert { record } => TaskChange::Insert(record),
                ChangeData::Update { record } => TaskChange::Update(record),
                ChangeData::Delete { old_record } => TaskChange::Delete { id: old_record.id },
            };
            Ok(Inbound::Change(change))
        }
        "phx_reply" if message.msg_ref.as_deref() == Some(join_ref) => {
            if status_of(&message.payload) == Some("ok") {
                Ok(Inbound::Joined)
            } else {
                Ok(Inbound::Rejected(reason_of(&message.payload)))
            }
        }
        "system" if status_of(&message.payload) == Some("error") => {
            Ok(Inbound::Rejected(reason_of(&message.payload)))
        }
        "phx_error" | "phx_close" => Ok(Inbound::Closed),
        _ => Ok(Inbound::Ignored),
    }
}

fn status_of(payload: &serde_json::Value) -> Option<&str> {
    payload.get("status")?.as_str()
}

fn reason_of(payload: &serde_json::Value) -> String {
    payload
        .pointer("/response/reason")
        .or_else(|| payload.get("message"))
        .and_then(|v| v.as_str())
        .unwrap_or("unknown reason")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;

    const TOPIC: &str = "realtime:tasks-p-1";

    fn change_frame(kind: &str, record: serde_json::Value, old: serde_json::Value) -> String {
        json!({
            "topic": TOPIC,
            "event": "postgres_changes",
            "ref": null,
            "payload": {
                "ids": [1],
                "data": {
                    "schema": "public",
                    "table": "tasks",
                    "commit_timestamp": "2024-01-01T10:00:00Z",
                    "type": kind,
                    "record": record,
                    "old_record": old,
                    "errors": null
                }
            }
        })
        .to_string()
    }

    fn row(status: &str) -> serde_json::Value {
        json!({
            "id": "t-1",
            "project_id": "p-1",
            "title": "Draft spec",
            "description": null,
            "status": status,
            "created_at": "2024-01-01T09:00:00+00:00"
        })
    }

    #[test]
    fn test_join_frame_shape() {
        let frame = PhoenixMessage::join(&topic_for("p-1"), "p-1", "jwt", "1");
        let value: serde_json::Value = serde_json::from_str(&frame.encode().unwrap()).unwrap();
        assert_eq!(value["topic"], "realtime:tasks-p-1");
        assert_eq!(value["event"], "phx_join");
        assert_eq!(value["ref"], "1");
        assert_eq!(value["join_ref"], "1");
        assert_eq!(value["payload"]["access_token"], "jwt");
        let filter = &value["payload"]["config"]["postgres_changes"][0];
        assert_eq!(filter["table"], "tasks");
        assert_eq!(filter["filter"], "project_id=eq.p-1");
    }

    #[test]
    fn test_heartbeat_omits_join_ref() {
        let text = PhoenixMessage::heartbeat("7").encode().unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["topic"], "phoenix");
        assert_eq!(value["event"], "heartbeat");
        assert!(value.get("join_ref").is_none());
    }

    #[test]
    fn test_decode_changes() {
        let insert = decode(&change_frame("INSERT", row("todo"), json!({})), TOPIC, "1").unwrap();
        match insert {
            Inbound::Change(TaskChange::Insert(task)) => {
                assert_eq!(task.id, "t-1");
                assert_eq!(task.status, TaskStatus::Todo);
            }
            other => panic!("unexpected {:?}", other),
        }

        let update = decode(&change_frame("UPDATE", row("done"), json!({"id": "t-1"})), TOPIC, "1").unwrap();
        assert!(matches!(update, Inbound::Change(TaskChange::Update(ref t)) if t.status == TaskStatus::Done));

        let delete = decode(&change_frame("DELETE", json!({}), json!({"id": "t-1"})), TOPIC, "1").unwrap();
        assert_eq!(delete, Inbound::Change(TaskChange::Delete { id: "t-1".to_string() }));
    }

    #[test]
    fn test_decode_join_replies() {
        let ok = json!({"topic": TOPIC, "event": "phx_reply", "ref": "1", "payload": {"status": "ok", "response": {}}});
        assert_eq!(decode(&ok.to_string(), TOPIC, "1").unwrap(), Inbound::Joined);

        let err = json!({"topic": TOPIC, "event": "phx_reply", "ref": "1", "payload": {"status": "error", "response": {"reason": "unauthorized"}}});
        assert_eq!(
            decode(&err.to_string(), TOPIC, "1").unwrap(),
            Inbound::Rejected("unauthorized".to_string())
        );

        // Reply to some other push on the same topic
        let other = json!({"topic": TOPIC, "event": "phx_reply", "ref": "5", "payload": {"status": "ok"}});
        assert_eq!(decode(&other.to_string(), TOPIC, "1").unwrap(), Inbound::Ignored);
    }

    #[test]
    fn test_decode_ignores_foreign_frames() {
        let heartbeat_reply = json!({"topic": "phoenix", "event": "phx_reply", "ref": "2", "payload": {"status": "ok"}});
        assert_eq!(decode(&heartbeat_reply.to_string(), TOPIC, "1").unwrap(), Inbound::Ignored);

        let closed = json!({"topic": TOPIC, "event": "phx_close", "ref": null, "payload": {}});
        assert_eq!(decode(&closed.to_string(), TOPIC, "1").unwrap(), Inbound::Closed);

        assert!(matches!(decode("not json", TOPIC, "1"), Err(RealtimeError::Protocol(_))));
    }

    #[test]
    fn test_ref_counter_increments() {
        let refs = RefCounter::default();
        assert_eq!(refs.next(), "1");
        assert_eq!(refs.next(), "2");
    }
}
