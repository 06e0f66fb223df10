use chrono::NaiveDate;

/// Formats a review date relative to `today`
///
/// Examples:
/// - No date: "not scheduled"
/// - Today or past: "now"
/// - 1 day away: "tomorrow"
/// - 3 days away: "in 3 days"
/// - 30 days or more away: "on 2026-12-10"
pub fn format_due(today: NaiveDate, due: Option<NaiveDate>) -> String {
    let Some(due) = due else {
        return "not scheduled".to_string();
    };

    let days = due.signed_duration_since(today).num_days();
    if days <= 0 {
        "now".to_string()
    } else if days == 1 {
        "tomorrow".to_string()
    } else if days < 30 {
        format!("in {} days", days)
    } else {
        format!("on {}", due.format("%Y-%m-%d"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 1).unwrap()
    }

    fn days_ahead(n: u64) -> Option<NaiveDate> {
        today().checked_add_days(Days::new(n))
    }

    #[test]
    fn test_not_scheduled() {
        assert_eq!(format_due(today(), None), "not scheduled");
    }

    #[test]
    fn test_past_and_today_are_now() {
        assert_eq!(format_due(today(), today().checked_sub_days(Days::new(3))), "now");
        assert_eq!(format_due(today(), Some(today())), "now");
    }

    #[test]
    fn test_tomorrow() {
        assert_eq!(format_due(today(), days_ahead(1)), "tomorrow");
    }

    #[test]
    fn test_days() {
        assert_eq!(format_due(today(), days_ahead(2)), "in 2 days");
        assert_eq!(format_due(today(), days_ahead(29)), "in 29 days");
    }

    #[test]
    fn test_far_dates_show_calendar_date() {
        assert_eq!(format_due(today(), days_ahead(30)), "on 2026-05-31");
        assert_eq!(format_due(today(), days_ahead(95)), "on 2026-08-04");
    }
}
