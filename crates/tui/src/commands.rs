use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::db::Database;
use crate::model::DayView;
use crate::parser::format_heading;

const COLUMN_GAP: usize = 2;
const HEADERS: [&str; 5] = ["#", "Task", "Priority", "Time", "Done"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Table,
    Json,
}

impl ReportFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            ReportFormat::Json
        } else {
            ReportFormat::Table
        }
    }
}

/// Write one day view without starting the TUI.
pub fn print_day<W: Write>(
    database: &Database,
    date: NaiveDate,
    context: &str,
    format: ReportFormat,
    mut writer: W,
) -> Result<()> {
    let view = database
        .day_view(date, context)
        .with_context(|| format!("failed to load tasks for {}", date))?;
    match format {
        ReportFormat::Table => DayReport::new(&view).write_to(&mut writer)?,
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, &view)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

struct DayReport<'a> {
    view: &'a DayView,
    rows: Vec<[String; 5]>,
}

impl<'a> DayReport<'a> {
    fn new(view: &'a DayView) -> Self {
        let rows = view
            .tasks
            .iter()
            .enumerate()
            .map(|(idx, task)| {
                [
                    (idx + 1).to_string(),
                    task.display_description(),
                    task.priority.to_string(),
                    task.time_estimate.clone(),
                    task.done_display().to_string(),
                ]
            })
            .collect();
        Self { view, rows }
    }

    fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(
            writer,
            "{} [{}]",
            format_heading(self.view.date),
            self.view.context
        )?;
        writeln!(writer)?;

        if self.rows.is_empty() {
            writeln!(writer, "No tasks for this day.")?;
            return Ok(());
        }

        let widths = self.column_widths();
        writeln!(writer, "{}", pad_row(&HEADERS, &widths))?;
        for row in &self.rows {
            writeln!(writer, "{}", pad_row(row, &widths))?;
        }
        writeln!(writer)?;
        writeln!(writer, "{}", self.view.summary)?;
        Ok(())
    }

    fn column_widths(&self) -> [usize; 5] {
        let mut widths = HEADERS.map(|header| header.chars().count());
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
        widths
    }
}

fn pad_row<S: AsRef<str>>(cells: &[S], widths: &[usize; 5]) -> String {
    let mut line = String::new();
    for (cell, width) in cells.iter().zip(widths) {
        let cell = cell.as_ref();
        line.push_str(cell);
        let pad = width + COLUMN_GAP - cell.chars().count();
        line.extend(std::iter::repeat(' ').take(pad));
    }
    line.trim_end().to_string()
}
