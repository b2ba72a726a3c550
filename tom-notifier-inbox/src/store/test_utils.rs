use crate::dto::{NotificationCategory, NotificationRecord};
use time::{Duration, OffsetDateTime};

pub const OWNER_ID: &str = "owner";

pub fn create_record(id: &str, is_read: bool, minutes_ago: i64) -> NotificationRecord {
    NotificationRecord {
        id: id.to_string(),
        owner_id: OWNER_ID.to_string(),
        category: NotificationCategory::AppointmentCreated,
        message: format!("notification {id}"),
        auxiliary_data: None,
        is_read,
        created_at: OffsetDateTime::now_utc() - Duration::minutes(minutes_ago),
    }
}
