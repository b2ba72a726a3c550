use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    #[serde(deserialize_with = "de_opaque_id::deserialize")]
    pub id: String,

    #[serde(alias = "userId", deserialize_with = "de_opaque_id::deserialize")]
    pub owner_id: String,

    #[serde(alias = "type")]
    pub category: NotificationCategory,

    pub message: String,

    /// Category specific payload, never interpreted by the inbox
    #[serde(default, alias = "data", skip_serializing_if = "Option::is_none")]
    pub auxiliary_data: Option<serde_json::Value>,

    #[serde(default, alias = "read")]
    pub is_read: bool,

    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationCategory {
    AppointmentCreated,
    AppointmentAssigned,
    AppointmentStarted,
    AppointmentCompleted,
    VehicleAdded,
    VehicleUpdated,
    VehicleDeleted,
    LoginSuccess,
    ChatMessage,

    /// Any category this client doesn't know about yet
    #[serde(other)]
    Other,
}

mod de_opaque_id {
    //!
    //! Ids are opaque for the client, but servers send them
    //! either as JSON strings or numbers. Both end up as String
    //!

    use serde::{de, Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OpaqueId {
        Text(String),
        Unsigned(u64),
        Signed(i64),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        let id = match OpaqueId::deserialize(d)? {
            OpaqueId::Text(text) => text,
            OpaqueId::Unsigned(number) => number.to_string(),
            OpaqueId::Signed(number) => number.to_string(),
        };

        if id.is_empty() {
            return Err(de::Error::custom("id cannot be empty"));
        }

        Ok(id)
    }
}
