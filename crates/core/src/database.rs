use std::fs;

use chrono::NaiveDate;
use rusqlite::{named_params, params, Connection, OptionalExtension, Row, Transaction};
use tracing::{debug, info};

use crate::capture::TaskInput;
use crate::config::AppConfig;
use crate::error::StoreError;
use crate::model::{DayView, Priority, Task};

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

const TASK_COLUMNS: &str =
    "id, date, context, description, priority, time_estimate, is_completed, carried_from_id";

/// Durable task store backed by a single SQLite file.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn initialize(config: &AppConfig) -> Result<Self> {
        if let Some(parent) = config.db_path().parent() {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(config.db_path())?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        debug!(path = %config.db_path().display(), "opened task database");
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let db = Self { conn };
        db.apply_migrations()?;
        Ok(db)
    }

    /// Release the underlying connection, surfacing any error from closing it.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, err)| StoreError::Storage(err))
    }

    pub fn tasks_for_date(&self, date: NaiveDate, context: &str) -> Result<Vec<Task>> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks \
             WHERE date = :date AND context = :context \
             ORDER BY priority, id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(named_params![":date": date, ":context": context])?;
        collect_tasks(&mut rows)
    }

    pub fn day_view(&self, date: NaiveDate, context: &str) -> Result<DayView> {
        let tasks = self.tasks_for_date(date, context)?;
        Ok(DayView::new(date, context, tasks))
    }

    pub fn add_task(&self, date: NaiveDate, context: &str, input: &TaskInput) -> Result<i64> {
        let input = input.clone().validate()?;
        self.conn.execute(
            "INSERT INTO tasks (date, context, description, priority, time_estimate)
             VALUES (:date, :context, :description, :priority, :time_estimate)",
            named_params![
                ":date": date,
                ":context": context,
                ":description": &input.description,
                ":priority": input.priority.as_str(),
                ":time_estimate": &input.time_estimate,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(id, %date, context, "added task");
        Ok(id)
    }

    pub fn update_task(&self, id: i64, input: &TaskInput) -> Result<()> {
        let input = input.clone().validate()?;
        let affected = self.conn.execute(
            "UPDATE tasks SET
                description = :description,
                priority = :priority,
                time_estimate = :time_estimate
             WHERE id = :id",
            named_params![
                ":description": &input.description,
                ":priority": input.priority.as_str(),
                ":time_estimate": &input.time_estimate,
                ":id": id,
            ],
        )?;
        ensure_found(id, affected)?;
        debug!(id, "updated task");
        Ok(())
    }

    pub fn delete_task(&self, id: i64) -> Result<()> {
        let affected = self
            .conn
            .execute("DELETE FROM tasks WHERE id = :id", named_params![":id": id])?;
        ensure_found(id, affected)?;
        debug!(id, "deleted task");
        Ok(())
    }

    pub fn mark_complete(&self, id: i64) -> Result<()> {
        self.set_completed(id, true)
    }

    pub fn mark_incomplete(&self, id: i64) -> Result<()> {
        self.set_completed(id, false)
    }

    fn set_completed(&self, id: i64, completed: bool) -> Result<()> {
        // SQLite counts matched rows, so re-applying the current state still reports 1.
        let affected = self.conn.execute(
            "UPDATE tasks SET is_completed = :completed WHERE id = :id",
            named_params![":completed": completed, ":id": id],
        )?;
        ensure_found(id, affected)?;
        debug!(id, completed, "updated completion");
        Ok(())
    }

    pub fn task(&self, id: i64) -> Result<Task> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ? LIMIT 1");
        self.conn
            .query_row(&sql, [id], map_task)
            .optional()?
            .ok_or(StoreError::NotFound(id))
    }

    /// Incomplete tasks on `from` that have not yet been carried to `to`.
    pub fn carry_over_candidates(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        context: &str,
    ) -> Result<Vec<Task>> {
        fetch_candidates(&self.conn, from, to, context)
    }

    /// Copy `tasks` onto `to` in one transaction, recording each source id.
    pub fn carry_over_tasks(&mut self, tasks: &[Task], to: NaiveDate, context: &str) -> Result<usize> {
        if tasks.is_empty() {
            return Ok(0);
        }
        let tx = self.conn.transaction()?;
        let copied = insert_copies(&tx, tasks, to, context)?;
        tx.commit()?;
        info!(copied, %to, context, "carried tasks over");
        Ok(copied)
    }

    /// Most recent day strictly before `before` that still has open work.
    pub fn latest_date_with_incomplete(
        &self,
        before: NaiveDate,
        context: &str,
    ) -> Result<Option<NaiveDate>> {
        let latest = self.conn.query_row(
            "SELECT MAX(date) FROM tasks
             WHERE context = :context AND date < :before AND is_completed = 0",
            named_params![":context": context, ":before": before],
            |row| row.get::<_, Option<NaiveDate>>(0),
        )?;
        Ok(latest)
    }

    /// Import every open task from `from` onto `to`. Shares the carry-over
    /// guard, so tasks already brought forward are skipped.
    pub fn copy_incomplete_tasks(
        &mut self,
        from: NaiveDate,
        to: NaiveDate,
        context: &str,
    ) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let candidates = fetch_candidates(&tx, from, to, context)?;
        let copied = insert_copies(&tx, &candidates, to, context)?;
        tx.commit()?;
        info!(copied, %from, %to, context, "imported open tasks");
        Ok(copied)
    }

    fn apply_migrations(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS tasks (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                date            TEXT    NOT NULL,
                context         TEXT    NOT NULL DEFAULT 'default',
                description     TEXT    NOT NULL CHECK (length(description) > 0),
                priority        TEXT    NOT NULL DEFAULT 'B' CHECK (priority IN ('A', 'B', 'C', 'D')),
                time_estimate   TEXT    NOT NULL CHECK (length(time_estimate) > 0),
                is_completed    INTEGER NOT NULL DEFAULT 0,
                carried_from_id INTEGER REFERENCES tasks(id)
             );",
        )?;

        if !self.has_column("tasks", "context")? {
            info!("adding context column to legacy tasks table");
            self.conn.execute_batch(
                "ALTER TABLE tasks ADD COLUMN context TEXT NOT NULL DEFAULT 'default';",
            )?;
        }

        self.conn.execute_batch(
            "CREATE INDEX IF NOT EXISTS idx_tasks_day ON tasks(context, date);
             CREATE INDEX IF NOT EXISTS idx_tasks_carried_from ON tasks(carried_from_id);",
        )?;
        Ok(())
    }

    fn has_column(&self, table: &str, column: &str) -> Result<bool> {
        let mut stmt = self.conn.prepare(&format!("PRAGMA table_info({table})"))?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let name: String = row.get(1)?;
            if name == column {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

fn fetch_candidates(
    conn: &Connection,
    from: NaiveDate,
    to: NaiveDate,
    context: &str,
) -> Result<Vec<Task>> {
    let sql = format!(
        "SELECT {TASK_COLUMNS} FROM tasks t
         WHERE t.date = :from
           AND t.context = :context
           AND t.is_completed = 0
           AND t.id NOT IN (
               SELECT carried_from_id FROM tasks
               WHERE date = :to AND context = :context AND carried_from_id IS NOT NULL
           )
         ORDER BY t.priority, t.id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(named_params![":from": from, ":to": to, ":context": context])?;
    collect_tasks(&mut rows)
}

fn insert_copies(tx: &Transaction<'_>, tasks: &[Task], to: NaiveDate, context: &str) -> Result<usize> {
    let mut stmt = tx.prepare(
        "INSERT INTO tasks (date, context, description, priority, time_estimate, is_completed, carried_from_id)
         VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
    )?;
    for task in tasks {
        stmt.execute(params![
            to,
            context,
            &task.description,
            task.priority.as_str(),
            &task.time_estimate,
            task.id,
        ])?;
    }
    Ok(tasks.len())
}

fn collect_tasks(rows: &mut rusqlite::Rows<'_>) -> Result<Vec<Task>> {
    let mut tasks = Vec::new();
    while let Some(row) = rows.next()? {
        tasks.push(map_task(row)?);
    }
    Ok(tasks)
}

fn map_task(row: &Row<'_>) -> rusqlite::Result<Task> {
    let priority: String = row.get(4)?;
    let priority = priority.parse::<Priority>().map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(err))
    })?;

    Ok(Task {
        id: row.get(0)?,
        date: row.get(1)?,
        context: row.get(2)?,
        description: row.get(3)?,
        priority,
        time_estimate: row.get(5)?,
        is_completed: row.get(6)?,
        carried_from_id: row.get(7)?,
    })
}

fn ensure_found(id: i64, affected: usize) -> Result<()> {
    if affected == 0 {
        Err(StoreError::NotFound(id))
    } else {
        Ok(())
    }
}
