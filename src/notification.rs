use chrono::NaiveDateTime;

/// Name of the tracked video as shown in every post
pub const VIDEO_LABEL: &str = "YAJU&U";

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Build the post for a view count captured at `captured_at`.
///
/// ```
/// # use chrono::NaiveDate;
/// # use view_relay::notification::compose;
/// let at = NaiveDate::from_ymd_opt(2024, 1, 1)
///     .and_then(|d| d.and_hms_opt(0, 0, 0))
///     .unwrap();
/// assert_eq!(
///     compose(at, 1_234_567),
///     "[2024-01-01 00:00:00] YAJU&U re-generation count: 1,234,567 times"
/// );
/// ```
pub fn compose(captured_at: NaiveDateTime, count: u64) -> String {
    format!(
        "[{}] {} re-generation count: {} times",
        captured_at.format(TIMESTAMP_FORMAT),
        VIDEO_LABEL,
        group_digits(count)
    )
}

/// Render `value` with a comma between every group of three digits.
pub fn group_digits(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    grouped
}
