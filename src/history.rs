//! Durable analysis history — single-writer SQLite append log
//!
//! Any number of analysis tasks enqueue [`HistoryRecord`]s onto an
//! unbounded channel; one dedicated writer thread owns the only database
//! connection and appends them in arrival order. This keeps concurrent
//! producers off a single-writer store and avoids per-write connection
//! churn.
//!
//! History is best-effort telemetry: a failed append is logged and dropped,
//! and producers are never blocked or notified.

use crate::models::HistoryRecord;
use anyhow::{Context, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, error, warn};

enum QueueItem {
    Record(HistoryRecord),
    Shutdown,
}

/// Cloneable producer handle to the history writer
#[derive(Clone)]
pub struct HistoryChannel {
    tx: Sender<QueueItem>,
}

impl HistoryChannel {
    /// Enqueue a record for appending. Never blocks; a record sent after
    /// shutdown is silently dropped.
    pub fn enqueue(&self, record: HistoryRecord) {
        let _ = self.tx.send(QueueItem::Record(record));
    }
}

/// Owner of the writer thread. Constructed at startup, shut down at
/// teardown by the top-level process.
pub struct HistoryWriter {
    channel: HistoryChannel,
    done_rx: Receiver<()>,
    handle: Option<JoinHandle<()>>,
}

impl HistoryWriter {
    /// Spawn the writer thread for the store at `db_path`.
    ///
    /// The connection is opened and the schema created inside the writer
    /// thread; an open failure downgrades the writer to a sink that drains
    /// and discards, so producers stay unaffected.
    pub fn spawn(db_path: PathBuf) -> Self {
        let (tx, rx) = unbounded();
        let (done_tx, done_rx) = unbounded();

        let handle = std::thread::Builder::new()
            .name("history-writer".to_string())
            .spawn(move || {
                writer_loop(&db_path, rx);
                let _ = done_tx.send(());
            })
            .expect("failed to spawn history writer thread");

        Self {
            channel: HistoryChannel { tx },
            done_rx,
            handle: Some(handle),
        }
    }

    /// Producer handle for analysis tasks
    pub fn channel(&self) -> HistoryChannel {
        self.channel.clone()
    }

    /// Request drain-and-stop. Blocks until every record enqueued before
    /// this call is appended, or `timeout` elapses. Returns whether the
    /// writer finished in time.
    pub fn shutdown(mut self, timeout: Duration) -> bool {
        let _ = self.channel.tx.send(QueueItem::Shutdown);
        match self.done_rx.recv_timeout(timeout) {
            Ok(()) => {
                if let Some(handle) = self.handle.take() {
                    let _ = handle.join();
                }
                true
            }
            Err(_) => {
                warn!("history writer did not drain within {:?}", timeout);
                false
            }
        }
    }
}

fn writer_loop(db_path: &Path, rx: Receiver<QueueItem>) {
    let conn = match open_store(db_path) {
        Ok(conn) => Some(conn),
        Err(e) => {
            error!("history store unavailable, records will be dropped: {e:#}");
            None
        }
    };

    let mut appended = 0u64;
    while let Ok(item) = rx.recv() {
        match item {
            QueueItem::Record(record) => {
                if let Some(conn) = conn.as_ref() {
                    if let Err(e) = append(conn, &record) {
                        warn!("dropping history record for {}: {e:#}", record.filename);
                    } else {
                        appended += 1;
                    }
                }
            }
            QueueItem::Shutdown => break,
        }
    }
    debug!("history writer stopped after {appended} appends");
}

/// Open the database and create the schema if absent
fn open_store(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let conn = Connection::open(db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;
    conn.execute(
        "CREATE TABLE IF NOT EXISTS history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp TEXT NOT NULL,
            filename TEXT NOT NULL,
            score INTEGER NOT NULL,
            persona TEXT NOT NULL,
            method TEXT NOT NULL
        )",
        [],
    )
    .context("failed to create history schema")?;
    Ok(conn)
}

/// Append one record, stamping the server-side timestamp
fn append(conn: &Connection, record: &HistoryRecord) -> Result<()> {
    conn.execute(
        "INSERT INTO history (timestamp, filename, score, persona, method)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            chrono::Utc::now().to_rfc3339(),
            record.filename,
            record.score,
            record.persona,
            record.method,
        ],
    )?;
    Ok(())
}
