use crate::dto::NotificationCategory;

pub fn category_title(category: NotificationCategory) -> &'static str {
    match category {
        NotificationCategory::AppointmentCreated => "New appointment",
        NotificationCategory::AppointmentAssigned => "Appointment assigned",
        NotificationCategory::AppointmentStarted => "Appointment started",
        NotificationCategory::AppointmentCompleted => "Appointment completed",
        NotificationCategory::VehicleAdded => "Vehicle added",
        NotificationCategory::VehicleUpdated => "Vehicle updated",
        NotificationCategory::VehicleDeleted => "Vehicle deleted",
        NotificationCategory::LoginSuccess => "New sign-in",
        NotificationCategory::ChatMessage => "New message",
        NotificationCategory::Other => "Notification",
    }
}
