use chrono::{DateTime, NaiveDate, Timelike, Utc};

/// Source of "now" for scheduling and session bookkeeping
///
/// Review dates are compared at day granularity, so most callers only need
/// [`DateProvider::today`].
pub trait DateProvider: Send + Sync {
    /// Get the current date/time
    fn get_current_time(&self) -> DateTime<Utc>;

    /// Calendar day used for due-date arithmetic
    fn today(&self) -> NaiveDate {
        self.get_current_time().date_naive()
    }
}

/// Default date provider that uses the system's current date/time
pub struct SystemDateProvider;

impl DateProvider for SystemDateProvider {
    fn get_current_time(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Date provider pinned to a given calendar day
/// Preserves the current hours/minutes/seconds from system time
pub struct OverrideDateProvider {
    override_date: NaiveDate,
}

impl OverrideDateProvider {
    pub fn new(override_date: NaiveDate) -> Self {
        Self { override_date }
    }
}

impl DateProvider for OverrideDateProvider {
    fn get_current_time(&self) -> DateTime<Utc> {
        let now = Utc::now();
        let naive_datetime = self
            .override_date
            .and_hms_opt(now.hour(), now.minute(), now.second())
            .unwrap_or_else(|| self.override_date.and_time(chrono::NaiveTime::MIN));
        DateTime::from_naive_utc_and_offset(naive_datetime, Utc)
    }

    fn today(&self) -> NaiveDate {
        self.override_date
    }
}
