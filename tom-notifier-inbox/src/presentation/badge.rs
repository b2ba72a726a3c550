pub const DEFAULT_BADGE_LIMIT: usize = 9;

///
/// Text of the unread indicator.
///
/// ### Returns
/// None when there is nothing unread, `"{limit}+"` when count exceeds limit
///
pub fn unread_badge(count: usize, limit: usize) -> Option<String> {
    match count {
        0 => None,
        count if count > limit => Some(format!("{limit}+")),
        count => Some(count.to_string()),
    }
}
