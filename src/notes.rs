use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use log::{info, warn};
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};

use crate::state::Slide;

const DATA_DIR: &str = "opposition_planner";
const NOTES_FILE: &str = "analyst_comments.json";
const NOTES_DB: &str = "analyst_comments.sqlite";
const NOTES_VERSION: u32 = 1;
const KEY_PREFIX: &str = "analyst_comments_";

/// Per-key analyst comment storage. Writing a blank value removes the key.
pub trait NotesStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

pub fn comment_key(slide: &Slide) -> String {
    format!("{KEY_PREFIX}{}", slide.slide_id())
}

/// The slide's saved comment, if it has any non-blank text. Read failures
/// are logged and treated as no comment.
pub fn notes_for(store: &dyn NotesStore, slide: &Slide) -> Option<String> {
    match store.get(&comment_key(slide)) {
        Ok(value) => value.filter(|v| !v.trim().is_empty()),
        Err(err) => {
            warn!("notes read failed for {}: {err:#}", slide.slide_id());
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotesBackend {
    #[default]
    File,
    Sqlite,
    Memory,
}

impl NotesBackend {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "file" | "json" => Some(NotesBackend::File),
            "sqlite" | "db" => Some(NotesBackend::Sqlite),
            "memory" | "mem" => Some(NotesBackend::Memory),
            _ => None,
        }
    }

    pub fn from_env() -> Self {
        std::env::var("OPP_NOTES_BACKEND")
            .ok()
            .and_then(|raw| Self::parse(&raw))
            .unwrap_or_default()
    }
}

/// `$XDG_CACHE_HOME/opposition_planner`, falling back to `~/.cache`.
pub fn data_dir() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(DATA_DIR));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(DATA_DIR))
}

/// Opens the configured backend under the data directory. Without a usable
/// directory the notes live in memory for this run only.
pub fn open_notes_store(backend: NotesBackend) -> Result<Box<dyn NotesStore>> {
    let dir = match (backend, data_dir()) {
        (NotesBackend::Memory, _) => return Ok(Box::new(MemoryNotes::default())),
        (_, Some(dir)) => dir,
        (_, None) => {
            warn!("no cache directory available; analyst notes will not persist");
            return Ok(Box::new(MemoryNotes::default()));
        }
    };
    let store: Box<dyn NotesStore> = match backend {
        NotesBackend::Sqlite => Box::new(SqliteNotes::open(&dir.join(NOTES_DB))?),
        _ => Box::new(FileNotes::open(dir.join(NOTES_FILE))),
    };
    info!("analyst notes backend: {backend:?} in {}", dir.display());
    Ok(store)
}

#[derive(Default)]
pub struct MemoryNotes {
    entries: Mutex<HashMap<String, String>>,
}

impl NotesStore for MemoryNotes {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let guard = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("notes lock poisoned"))?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("notes lock poisoned"))?;
        if value.trim().is_empty() {
            guard.remove(key);
        } else {
            guard.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct NotesFile {
    version: u32,
    comments: BTreeMap<String, String>,
}

/// Whole-file JSON store, rewritten through a temp file on every change.
pub struct FileNotes {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileNotes {
    /// A missing, unreadable or older-version file starts empty.
    pub fn open(path: PathBuf) -> Self {
        let entries = load_notes_file(&path)
            .filter(|file| file.version == NOTES_VERSION)
            .map(|file| file.comments)
            .unwrap_or_default();
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn save(&self, comments: &BTreeMap<String, String>) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("create notes dir {}", dir.display()))?;
        }
        let file = NotesFile {
            version: NOTES_VERSION,
            comments: comments.clone(),
        };
        let json = serde_json::to_string_pretty(&file).context("serialize notes")?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replace {}", self.path.display()))?;
        Ok(())
    }
}

impl NotesStore for FileNotes {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let guard = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("notes lock poisoned"))?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("notes lock poisoned"))?;
        if value.trim().is_empty() {
            guard.remove(key);
        } else {
            guard.insert(key.to_string(), value.to_string());
        }
        self.save(&guard)
    }
}

fn load_notes_file(path: &Path) -> Option<NotesFile> {
    let raw = fs::read_to_string(path).ok()?;
    serde_json::from_str::<NotesFile>(&raw).ok()
}

pub struct SqliteNotes {
    conn: Mutex<Connection>,
}

impl SqliteNotes {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).ok();
        }
        let conn =
            Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory sqlite")?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS analyst_comments (
            comment_key TEXT PRIMARY KEY,
            body TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

impl NotesStore for SqliteNotes {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| anyhow::anyhow!("notes db lock poisoned"))?;
        conn.query_row(
            "SELECT body FROM analyst_comments WHERE comment_key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .with_context(|| format!("read comment {key}"))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| anyhow::anyhow!("notes db lock poisoned"))?;
        if value.trim().is_empty() {
            conn.execute(
                "DELETE FROM analyst_comments WHERE comment_key = ?1",
                params![key],
            )
            .with_context(|| format!("delete comment {key}"))?;
        } else {
            let now = chrono::Utc::now().to_rfc3339();
            conn.execute(
                r#"
                INSERT INTO analyst_comments (comment_key, body, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(comment_key) DO UPDATE SET
                    body = excluded.body,
                    updated_at = excluded.updated_at
                "#,
                params![key, value, now],
            )
            .with_context(|| format!("write comment {key}"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SlideKind;

    #[test]
    fn keys_follow_slide_identity() {
        let slide = Slide::new(SlideKind::Venue, "Wankhede Stadium", 3);
        assert_eq!(comment_key(&slide), "analyst_comments_venue_Wankhede Stadium");
    }

    #[test]
    fn blank_write_clears() {
        let store = MemoryNotes::default();
        store.set("k", "text").expect("set");
        store.set("k", "   ").expect("clear");
        assert_eq!(store.get("k").expect("get"), None);
    }

    #[test]
    fn backend_names() {
        assert_eq!(NotesBackend::parse("SQLite"), Some(NotesBackend::Sqlite));
        assert_eq!(NotesBackend::parse("redis"), None);
    }
}
