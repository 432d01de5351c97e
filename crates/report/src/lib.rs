#![forbid(unsafe_code)]

mod csv;
mod summary;

pub use csv::summary_csv;
pub use summary::{
    CategoryStats, GoalSummaryRow, StatusTally, UpcomingDeadline, category_stats, status_tally,
    summary_rows, upcoming_deadlines,
};
