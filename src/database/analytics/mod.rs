pub mod accuracy;
pub mod time_statistics;

use rusqlite::Connection;

pub use accuracy::{AccuracyRepository, AccuracyStats};
pub use time_statistics::TimeStatisticsRepository;

/// Analytics facade over the answer log
pub struct Analytics<'a> {
    pub conn: &'a Connection,
}

impl<'a> Analytics<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Analytics { conn }
    }

    pub fn accuracy(&self) -> AccuracyRepository<'a> {
        AccuracyRepository::new(self.conn)
    }

    pub fn time_statistics(&self) -> TimeStatisticsRepository<'a> {
        TimeStatisticsRepository::new(self.conn)
    }
}
