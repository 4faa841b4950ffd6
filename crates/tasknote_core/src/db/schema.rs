//! Table definition for the relational task store.

use super::DbResult;
use rusqlite::Connection;

pub const TASKS_TABLE: &str = "tasks";

const CREATE_TASKS_SQL: &str = "CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT,
    done INTEGER NOT NULL
);";

/// Creates the `tasks` table when missing.
pub fn ensure_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(CREATE_TASKS_SQL)?;
    Ok(())
}
