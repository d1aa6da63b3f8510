//! Per-user reply history kept as one pretty-printed JSON array per user,
//! newest first.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use mailgenie_core::error::{MailGenieError, Result};
use mailgenie_core::types::{HistoryItem, HistoryPage, HistoryQuery, Pagination, Tone};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Receives finished replies for later listing. Implementations must not
/// block reply delivery; callers treat failures as log-only.
#[async_trait]
pub trait HistoryRecorder: Send + Sync {
    async fn record(
        &self,
        user_id: &str,
        email_content: &str,
        tone: Tone,
        reply: &str,
    ) -> Result<HistoryItem>;
}

pub struct JsonHistoryStore {
    dir: PathBuf,
    // Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl JsonHistoryStore {
    /// Opens (and creates) `<data_dir>/history`.
    pub async fn new<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let dir = data_dir.as_ref().join("history");
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| MailGenieError::Storage(format!("Failed to create {}: {}", dir.display(), e)))?;

        info!("History store at {}", dir.display());
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_for(&self, user_id: &str) -> Result<PathBuf> {
        let valid = !user_id.is_empty()
            && user_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(MailGenieError::Input(format!("Invalid user id '{}'", user_id)));
        }
        Ok(self.dir.join(format!("{}.json", user_id)))
    }

    /// Raw array entries; rewrites go through these so undeserializable entries
    /// survive. A missing or unparseable document is empty, any other read
    /// failure is an error.
    async fn load(&self, user_id: &str) -> Result<Vec<Value>> {
        let path = self.file_for(user_id)?;
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(MailGenieError::Storage(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(entries)) => Ok(entries),
            Ok(_) => {
                warn!("History document for {} is not an array", user_id);
                Ok(Vec::new())
            }
            Err(e) => {
                warn!("History document for {} is not valid JSON: {}", user_id, e);
                Ok(Vec::new())
            }
        }
    }

    /// Unreadable documents read as an empty history; malformed entries are skipped.
    pub async fn read(&self, user_id: &str) -> Result<Vec<HistoryItem>> {
        let entries = match self.load(user_id).await {
            Ok(entries) => entries,
            Err(MailGenieError::Storage(e)) => {
                warn!("{}", e);
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        let items = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<HistoryItem>(entry) {
                Ok(item) => Some(item),
                Err(e) => {
                    warn!("Skipping malformed history entry for {}: {}", user_id, e);
                    None
                }
            })
            .collect();

        Ok(items)
    }

    async fn write(&self, user_id: &str, entries: &[Value]) -> Result<()> {
        let path = self.file_for(user_id)?;
        let tmp = path.with_extension("json.tmp");
        let body = serde_json::to_string_pretty(entries)
            .map_err(|e| MailGenieError::Internal(e.to_string()))?;

        tokio::fs::write(&tmp, body)
            .await
            .map_err(|e| MailGenieError::Storage(format!("Failed to write {}: {}", tmp.display(), e)))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| MailGenieError::Storage(format!("Failed to replace {}: {}", path.display(), e)))?;

        debug!("Wrote {} history entries for {}", entries.len(), user_id);
        Ok(())
    }

    pub async fn append(
        &self,
        user_id: &str,
        email_content: &str,
        tone: &str,
        reply: &str,
    ) -> Result<HistoryItem> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load(user_id).await?;

        let item = HistoryItem {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            email_content: email_content.to_string(),
            tone: tone.to_string(),
            reply: reply.to_string(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        let entry =
            serde_json::to_value(&item).map_err(|e| MailGenieError::Internal(e.to_string()))?;
        entries.insert(0, entry);

        self.write(user_id, &entries).await?;
        Ok(item)
    }

    /// Returns `false` when no entry carries `item_id`; the document is left untouched.
    pub async fn delete(&self, user_id: &str, item_id: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load(user_id).await?;
        let before = entries.len();

        entries.retain(|entry| entry.get("id").and_then(Value::as_str) != Some(item_id));
        if entries.len() == before {
            return Ok(false);
        }

        self.write(user_id, &entries).await?;
        info!("Deleted history item {} for {}", item_id, user_id);
        Ok(true)
    }

    pub async fn clear(&self, user_id: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.write(user_id, &[]).await
    }

    pub async fn query(&self, user_id: &str, query: &HistoryQuery) -> Result<HistoryPage> {
        let mut items = self.read(user_id).await?;

        if let Some(tone) = query.tone.as_deref() {
            items.retain(|item| item.tone == tone);
        }

        if let Some(search) = query.search.as_deref() {
            let needle = search.to_lowercase();
            items.retain(|item| {
                item.email_content.to_lowercase().contains(&needle)
                    || item.reply.to_lowercase().contains(&needle)
            });
        }

        items.sort_by_key(|item| std::cmp::Reverse(parse_timestamp(&item.created_at)));

        let page = query.page.max(1);
        let limit = query.limit.max(1);
        let total = items.len();
        let history = items
            .into_iter()
            .skip((page - 1).saturating_mul(limit))
            .take(limit)
            .collect();

        Ok(HistoryPage {
            history,
            pagination: Pagination {
                page,
                limit,
                total,
                total_pages: total.div_ceil(limit),
            },
        })
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[async_trait]
impl HistoryRecorder for JsonHistoryStore {
    async fn record(
        &self,
        user_id: &str,
        email_content: &str,
        tone: Tone,
        reply: &str,
    ) -> Result<HistoryItem> {
        self.append(user_id, email_content, tone.as_ref(), reply).await
    }
}
