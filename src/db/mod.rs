mod schema;

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::error::Result;

/// Durable key → text document storage.
pub(crate) trait BlobStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&mut self, key: &str, value: &str) -> Result<()>;
    /// Write several documents as one unit.
    fn put_many(&mut self, entries: &[(&str, &str)]) -> Result<()> {
        for (key, value) in entries {
            self.put(key, value)?;
        }
        Ok(())
    }
    /// Drop every key and write `entries` in their place, as one unit.
    fn reset_to(&mut self, entries: &[(&str, &str)]) -> Result<()>;
}

/// SQLite-backed blob store: one row per key.
pub(crate) struct SqliteBlobStore {
    conn: Connection,
}

impl SqliteBlobStore {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        let mut store = Self { conn };
        store.migrate()?;
        tracing::debug!(path = %path.display(), "opened blob store");
        Ok(store)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        // Every statement in SCHEMA_V1 is `IF NOT EXISTS`, so this only
        // creates what a fresh file is missing.
        tx.execute_batch(schema::SCHEMA_V1)?;
        let stored: Option<i32> =
            tx.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;

        match stored {
            None => {
                tx.execute(
                    "INSERT INTO schema_version (version) VALUES (?1)",
                    params![schema::CURRENT_VERSION],
                )?;
                tracing::debug!(version = schema::CURRENT_VERSION, "created blob store schema");
            }
            Some(version) if version < schema::CURRENT_VERSION => {
                for &(from, sql) in schema::MIGRATIONS.iter().filter(|(from, _)| *from >= version) {
                    tracing::debug!(from, "applying blob store migration");
                    tx.execute_batch(sql)?;
                }
                tx.execute(
                    "UPDATE schema_version SET version = ?1",
                    params![schema::CURRENT_VERSION],
                )?;
            }
            Some(_) => {}
        }

        tx.commit()?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv_store ORDER BY key")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}

impl BlobStore for SqliteBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        self.put_many(&[(key, value)])
    }

    fn put_many(&mut self, entries: &[(&str, &str)]) -> Result<()> {
        let tx = self.conn.transaction()?;
        upsert_rows(&tx, entries)?;
        tx.commit()?;
        Ok(())
    }

    fn reset_to(&mut self, entries: &[(&str, &str)]) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM kv_store", [])?;
        upsert_rows(&tx, entries)?;
        tx.commit()?;
        Ok(())
    }
}

fn upsert_rows(tx: &rusqlite::Transaction<'_>, entries: &[(&str, &str)]) -> Result<()> {
    let now = chrono::Utc::now().to_rfc3339();
    let mut stmt = tx.prepare(
        "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
    )?;
    for (key, value) in entries {
        stmt.execute(params![key, value, now])?;
    }
    Ok(())
}

/// Non-durable blob store for tests. Clones share the same entries so a test
/// can keep a handle after moving one into a record store.
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct MemoryBlobStore {
    entries: std::rc::Rc<std::cell::RefCell<std::collections::HashMap<String, String>>>,
    fail_writes: std::rc::Rc<std::cell::Cell<bool>>,
}

#[cfg(test)]
impl MemoryBlobStore {
    pub(crate) fn with(entries: &[(&str, &str)]) -> Self {
        let store = Self::default();
        for (key, value) in entries {
            store
                .entries
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
        }
        store
    }

    pub(crate) fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Make every subsequent write fail with an IO error.
    pub(crate) fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.get() {
            return Err(std::io::Error::other("disk full").into());
        }
        Ok(())
    }
}

#[cfg(test)]
impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.raw(key))
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        self.check_writable()?;
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn put_many(&mut self, entries: &[(&str, &str)]) -> Result<()> {
        self.check_writable()?;
        for (key, value) in entries {
            self.put(key, value)?;
        }
        Ok(())
    }

    fn reset_to(&mut self, entries: &[(&str, &str)]) -> Result<()> {
        self.check_writable()?;
        let mut stored = self.entries.borrow_mut();
        stored.clear();
        for (key, value) in entries {
            stored.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }
}
