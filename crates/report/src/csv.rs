#![forbid(unsafe_code)]

use crate::summary::GoalSummaryRow;
use sg_core::progress::parse_deadline;

const HEADER: &str = "Type,Title,Status,Progress,Due Date,Tasks";

/// Renders summary rows as CSV. Cells are not quoted; embedded commas
/// become semicolons so the column count stays stable.
pub fn summary_csv(rows: &[GoalSummaryRow]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(HEADER.to_string());
    for row in rows {
        lines.push(
            [
                sanitize(&row.goal_type),
                sanitize(&row.title),
                row.status.as_str().to_string(),
                format!("{}%", row.progress),
                due_date_cell(&row.time_bound),
                format!("{}/{}", row.tasks_completed, row.tasks_total),
            ]
            .join(","),
        );
    }
    lines.join("\n")
}

fn sanitize(value: &str) -> String {
    value.replace(',', ";")
}

fn due_date_cell(time_bound: &str) -> String {
    match parse_deadline(time_bound) {
        Ok(deadline) => {
            let date = deadline.date();
            format!(
                "{:04}-{:02}-{:02}",
                date.year(),
                u8::from(date.month()),
                date.day()
            )
        }
        Err(_) => sanitize(time_bound),
    }
}
