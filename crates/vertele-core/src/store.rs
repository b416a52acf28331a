//! Channel store — a single SQLite table seeded from the bundled list.
//!
//! The store is opened once by the composing application and owned for the
//! rest of the process. Rows are only ever written by the first-run seed.

use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::channel::{Channel, DEFAULT_CATEGORY};
use crate::error::StoreError;
use crate::seed;

const CREATE_CHANNELS: &str = "
    CREATE TABLE IF NOT EXISTS channels (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL UNIQUE,
        instance TEXT NOT NULL UNIQUE,
        page_url TEXT,
        stream_url TEXT NOT NULL CHECK (length(stream_url) > 0),
        category TEXT DEFAULT 'General'
    )";

const SELECT_COLUMNS: &str = "SELECT title, instance, page_url, stream_url, category FROM channels";

/// Where the store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// Volatile, process-lifetime store. Used by tests.
    InMemory,
    File(PathBuf),
}

impl StoreLocation {
    fn describe(&self) -> PathBuf {
        match self {
            StoreLocation::InMemory => PathBuf::from(":memory:"),
            StoreLocation::File(path) => path.clone(),
        }
    }
}

#[derive(Debug)]
pub struct ChannelStore {
    conn: Option<Connection>,
    location: StoreLocation,
}

impl ChannelStore {
    /// Open (or create) the store, create the table and seed it when empty.
    pub fn open(location: StoreLocation) -> Result<Self, StoreError> {
        let conn = match &location {
            StoreLocation::InMemory => Connection::open_in_memory(),
            StoreLocation::File(path) => {
                ensure_parent_dir(path)?;
                Connection::open(path)
            }
        }
        .map_err(|source| StoreError::Open {
            path: location.describe(),
            source,
        })?;

        conn.execute(CREATE_CHANNELS, [])
            .map_err(|source| StoreError::Open {
                path: location.describe(),
                source,
            })?;

        let mut store = Self {
            conn: Some(conn),
            location,
        };
        store.seed_if_empty()?;
        info!(
            "channel store ready at {} ({} channels)",
            store.location.describe().display(),
            store.count()?
        );
        Ok(store)
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    fn conn(&self) -> Result<&Connection, StoreError> {
        self.conn.as_ref().ok_or(StoreError::Closed)
    }

    fn seed_if_empty(&mut self) -> Result<(), StoreError> {
        if self.count()? > 0 {
            debug!("channel store already populated, skipping seed");
            return Ok(());
        }

        let channels = seed::builtin_channels()?;
        let conn = self.conn.as_mut().ok_or(StoreError::Closed)?;
        let tx = conn.transaction()?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO channels (title, instance, page_url, stream_url, category)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for ch in &channels {
                insert.execute(params![
                    ch.title,
                    ch.instance,
                    ch.page_url,
                    ch.stream_url,
                    ch.category
                ])?;
            }
        }
        tx.commit()?;
        info!("seeded channel store with {} built-in channels", channels.len());
        Ok(())
    }

    /// All channels ordered by title.
    pub fn list_all(&self) -> Result<Vec<Channel>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY title"))?;
        let rows = stmt.query_map([], channel_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Channels whose stored category equals `category`, ordered by title.
    /// A NULL category counts as the default one, as everywhere else.
    pub fn list_by_category(&self, category: &str) -> Result<Vec<Channel>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "{SELECT_COLUMNS} WHERE COALESCE(category, ?2) = ?1 ORDER BY title"
        ))?;
        let rows = stmt.query_map(params![category, DEFAULT_CATEGORY], channel_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Exact lookup by instance key. `Ok(None)` when nothing matches.
    pub fn find_by_instance(&self, instance: &str) -> Result<Option<Channel>, StoreError> {
        let conn = self.conn()?;
        let channel = conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE instance = ?1"),
                [instance],
                channel_from_row,
            )
            .optional()?;
        Ok(channel)
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM channels", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Distinct stored categories, sorted.
    pub fn categories(&self) -> Result<Vec<String>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT COALESCE(category, ?1) AS c FROM channels ORDER BY c",
        )?;
        let rows = stmt.query_map([DEFAULT_CATEGORY], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Release the connection. Safe to call more than once.
    pub fn close(&mut self) -> Result<(), StoreError> {
        if let Some(conn) = self.conn.take() {
            conn.close().map_err(|(_, e)| StoreError::Sqlite(e))?;
            debug!("channel store closed");
        }
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.conn.is_none()
    }
}

fn channel_from_row(row: &Row<'_>) -> rusqlite::Result<Channel> {
    Ok(Channel {
        title: row.get(0)?,
        instance: row.get(1)?,
        page_url: row.get(2)?,
        stream_url: row.get(3)?,
        category: row
            .get::<_, Option<String>>(4)?
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
    })
}

fn ensure_parent_dir(path: &Path) -> Result<(), StoreError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Directory {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}
