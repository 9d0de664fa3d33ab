//! Time-block repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over canonical `time_blocks` storage and the
//!   single-row calendar settings.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths must call `TimeBlock::validate()` before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - `list_blocks` returns rows in insertion (`rowid`) order.

use crate::db::DbError;
use crate::model::time_block::{BlockId, BlockStatus, BlockValidationError, Priority, TimeBlock};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const BLOCK_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    start_ms,
    end_ms,
    priority,
    delegatable,
    status,
    created_at,
    updated_at
FROM time_blocks";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for time-block persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(BlockValidationError),
    Db(DbError),
    NotFound(BlockId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "time-block not found: {id}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted time-block data: {message}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<BlockValidationError> for RepoError {
    fn from(value: BlockValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for time-block CRUD and calendar settings.
pub trait BlockRepository {
    fn create_block(&self, block: &TimeBlock) -> RepoResult<BlockId>;
    fn update_block(&self, block: &TimeBlock) -> RepoResult<()>;
    fn get_block(&self, id: BlockId) -> RepoResult<Option<TimeBlock>>;
    fn list_blocks(&self) -> RepoResult<Vec<TimeBlock>>;
    fn delete_block(&self, id: BlockId) -> RepoResult<()>;
    fn replace_all_blocks(&mut self, blocks: &[TimeBlock]) -> RepoResult<()>;
    /// Owner's hourly rate, persisted alongside the blocks.
    fn hourly_rate(&self) -> RepoResult<f64>;
    fn set_hourly_rate(&self, rate: f64) -> RepoResult<()>;
}

/// SQLite-backed time-block repository.
pub struct SqliteBlockRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteBlockRepository<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl BlockRepository for SqliteBlockRepository<'_> {
    fn create_block(&self, block: &TimeBlock) -> RepoResult<BlockId> {
        block.validate()?;

        self.conn.execute(
            "INSERT INTO time_blocks (
                uuid,
                title,
                start_ms,
                end_ms,
                priority,
                delegatable,
                status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                block.uuid.to_string(),
                block.title.as_str(),
                block.start_ms,
                block.end_ms,
                priority_to_db(block.priority),
                bool_to_int(block.delegatable),
                status_to_db(block.status),
            ],
        )?;

        Ok(block.uuid)
    }

    fn update_block(&self, block: &TimeBlock) -> RepoResult<()> {
        block.validate()?;

        let changed = self.conn.execute(
            "UPDATE time_blocks
             SET
                title = ?1,
                start_ms = ?2,
                end_ms = ?3,
                priority = ?4,
                delegatable = ?5,
                status = ?6,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?7;",
            params![
                block.title.as_str(),
                block.start_ms,
                block.end_ms,
                priority_to_db(block.priority),
                bool_to_int(block.delegatable),
                status_to_db(block.status),
                block.uuid.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(block.uuid));
        }

        Ok(())
    }

    fn get_block(&self, id: BlockId) -> RepoResult<Option<TimeBlock>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BLOCK_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_block_row(row)?));
        }

        Ok(None)
    }

    fn list_blocks(&self) -> RepoResult<Vec<TimeBlock>> {
        // rowid order is insertion order; the resolver's end-time tie-break
        // is defined in terms of it.
        let mut stmt = self
            .conn
            .prepare(&format!("{BLOCK_SELECT_SQL} ORDER BY rowid ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut blocks = Vec::new();

        while let Some(row) = rows.next()? {
            blocks.push(parse_block_row(row)?);
        }

        Ok(blocks)
    }

    fn delete_block(&self, id: BlockId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM time_blocks WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn replace_all_blocks(&mut self, blocks: &[TimeBlock]) -> RepoResult<()> {
        for block in blocks {
            block.validate()?;
        }

        let tx = self.conn.transaction().map_err(DbError::Sqlite)?;
        tx.execute("DELETE FROM time_blocks;", [])?;
        for block in blocks {
            tx.execute(
                "INSERT INTO time_blocks (
                    uuid,
                    title,
                    start_ms,
                    end_ms,
                    priority,
                    delegatable,
                    status
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
                params![
                    block.uuid.to_string(),
                    block.title.as_str(),
                    block.start_ms,
                    block.end_ms,
                    priority_to_db(block.priority),
                    bool_to_int(block.delegatable),
                    status_to_db(block.status),
                ],
            )?;
        }
        tx.commit().map_err(DbError::Sqlite)?;

        Ok(())
    }

    fn hourly_rate(&self) -> RepoResult<f64> {
        // Migration 0001 seeds the single settings row.
        let rate = self
            .conn
            .query_row("SELECT hourly_rate FROM calendar_settings WHERE id = 1;", [], |row| {
                row.get::<_, f64>(0)
            })?;
        Ok(rate)
    }

    fn set_hourly_rate(&self, rate: f64) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE calendar_settings SET hourly_rate = ?1 WHERE id = 1;",
            [rate],
        )?;

        if changed == 0 {
            return Err(RepoError::InvalidData(
                "calendar_settings row is missing".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_block_row(row: &Row<'_>) -> RepoResult<TimeBlock> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in time_blocks.uuid"))
    })?;

    let priority_text: String = row.get("priority")?;
    let priority = parse_priority(&priority_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid priority `{priority_text}` in time_blocks.priority"
        ))
    })?;

    let status_text: String = row.get("status")?;
    let status = parse_status(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid status `{status_text}` in time_blocks.status"
        ))
    })?;

    let delegatable = match row.get::<_, i64>("delegatable")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid delegatable value `{other}` in time_blocks.delegatable"
            )));
        }
    };

    let block = TimeBlock {
        uuid,
        title: row.get("title")?,
        start_ms: row.get("start_ms")?,
        end_ms: row.get("end_ms")?,
        priority,
        delegatable,
        status,
        created_at_ms: row.get("created_at")?,
        updated_at_ms: row.get("updated_at")?,
    };
    block.validate()?;
    Ok(block)
}

fn priority_to_db(priority: Priority) -> &'static str {
    match priority {
        Priority::UrgentImportant => "urgent-important",
        Priority::Important => "important",
        Priority::Urgent => "urgent",
        Priority::Neither => "neither",
    }
}

fn parse_priority(value: &str) -> Option<Priority> {
    match value {
        "urgent-important" => Some(Priority::UrgentImportant),
        "important" => Some(Priority::Important),
        "urgent" => Some(Priority::Urgent),
        "neither" => Some(Priority::Neither),
        _ => None,
    }
}

fn status_to_db(status: BlockStatus) -> &'static str {
    match status {
        BlockStatus::Scheduled => "scheduled",
        BlockStatus::Delegated => "delegated",
        BlockStatus::Completed => "completed",
        BlockStatus::Cancelled => "cancelled",
    }
}

fn parse_status(value: &str) -> Option<BlockStatus> {
    match value {
        "scheduled" => Some(BlockStatus::Scheduled),
        "delegated" => Some(BlockStatus::Delegated),
        "completed" => Some(BlockStatus::Completed),
        "cancelled" => Some(BlockStatus::Cancelled),
        _ => None,
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
