use time::{macros::format_description, OffsetDateTime};

///
/// Human readable age of the notification.
/// Timestamps from the future (clock skew) are displayed as `just now`
///
pub fn format_relative(created_at: OffsetDateTime, now: OffsetDateTime) -> String {
    let elapsed = now - created_at;

    let minutes = elapsed.whole_minutes();
    if minutes < 1 {
        return "just now".to_string();
    }

    let hours = elapsed.whole_hours();
    if hours < 1 {
        return format!("{minutes}m ago");
    }

    let days = elapsed.whole_days();
    if days < 1 {
        return format!("{hours}h ago");
    }
    if days < 7 {
        return format!("{days}d ago");
    }

    let format = format_description!("[year]-[month]-[day]");
    created_at
        .date()
        .format(&format)
        .unwrap_or_else(|_| created_at.date().to_string())
}

#[cfg(test)]
mod test {
    use super::*;
    use time::{macros::datetime, Duration};

    const NOW: OffsetDateTime = datetime!(2024-08-15 12:00:00 UTC);

    #[test]
    fn format_relative_just_now() {
        assert_eq!(format_relative(NOW - Duration::seconds(59), NOW), "just now");
        assert_eq!(format_relative(NOW + Duration::minutes(3), NOW), "just now");
    }

    #[test]
    fn format_relative_minutes() {
        assert_eq!(format_relative(NOW - Duration::minutes(1), NOW), "1m ago");
        assert_eq!(format_relative(NOW - Duration::minutes(59), NOW), "59m ago");
    }

    #[test]
    fn format_relative_hours() {
        assert_eq!(format_relative(NOW - Duration::minutes(60), NOW), "1h ago");
        assert_eq!(format_relative(NOW - Duration::hours(23), NOW), "23h ago");
    }

    #[test]
    fn format_relative_days() {
        assert_eq!(format_relative(NOW - Duration::hours(24), NOW), "1d ago");
        assert_eq!(format_relative(NOW - Duration::days(6), NOW), "6d ago");
    }

    #[test]
    fn format_relative_date() {
        assert_eq!(format_relative(NOW - Duration::days(7), NOW), "2024-08-08");
        assert_eq!(
            format_relative(datetime!(2023-01-05 08:00:00 UTC), NOW),
            "2023-01-05"
        );
    }
}
