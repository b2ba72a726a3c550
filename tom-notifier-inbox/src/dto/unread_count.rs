use serde::Deserialize;

///
/// Unread count is returned either as a bare number or wrapped in an object
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum UnreadCount {
    Bare(u64),
    Wrapped { count: u64 },
}

impl UnreadCount {
    pub fn value(&self) -> usize {
        let count = match self {
            UnreadCount::Bare(count) => *count,
            UnreadCount::Wrapped { count } => *count,
        };

        usize::try_from(count).unwrap_or(usize::MAX)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unread_count_json_deserialize_bare() {
        let count = serde_json::from_str::<UnreadCount>("3").unwrap();

        assert_eq!(count.value(), 3);
    }

    #[test]
    fn unread_count_json_deserialize_wrapped() {
        let count = serde_json::from_str::<UnreadCount>(r#"{ "count": 5 }"#).unwrap();

        assert_eq!(count.value(), 5);
    }

    #[test]
    fn unread_count_json_deserialize_negative() {
        let count = serde_json::from_str::<UnreadCount>("-1");

        assert!(count.is_err());
    }
}
