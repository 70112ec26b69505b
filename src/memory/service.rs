//! Memory Service
//!
//! Typed QR operations over the cache engine. Decides the key layout and TTL
//! class of every record and keeps the search index in step with stores.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::cache::{BulkEntry, CacheInfo, CacheStats, CacheStore, ValidationReport};
use crate::error::Result;
use crate::memory::TtlClass;
use crate::qr::{QrCode, QrFormDraft, QrHistoryItem, QrTemplate, TemplateCategory, User};

/// Default number of search results.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

const TEMPLATES_ALL_KEY: &str = "templates:all";
const USER_CURRENT_KEY: &str = "user:current";
const HISTORY_GLOBAL_KEY: &str = "history:global";
const FORM_CURRENT_KEY: &str = "form:current";

// == Index Kinds ==
const QR_KIND: &str = "qr";
const HISTORY_KIND: &str = "history";
const TEMPLATE_KIND: &str = "template";

fn qr_key(id: &str) -> String {
    format!("qr:{id}")
}

fn template_key(id: &str) -> String {
    format!("template:{id}")
}

fn user_key(id: u64) -> String {
    format!("user:{id}")
}

/// User id 0 is treated as no user.
fn history_key(user_id: Option<u64>) -> String {
    match user_id.filter(|id| *id > 0) {
        Some(id) => format!("history:user:{id}"),
        None => HISTORY_GLOBAL_KEY.to_string(),
    }
}

/// An empty session id is treated as no session.
fn form_key(session_id: Option<&str>) -> String {
    match session_id.filter(|session| !session.is_empty()) {
        Some(session) => format!("form:{session}"),
        None => FORM_CURRENT_KEY.to_string(),
    }
}

// == Memory Service ==
/// Cache of QR codes, history, drafts, templates and users.
#[derive(Debug)]
pub struct MemoryService {
    store: CacheStore,
}

impl MemoryService {
    /// Creates a service whose cache holds at most `max_entries` entries (0 = unbounded).
    pub fn new(max_entries: usize) -> Self {
        Self {
            store: CacheStore::new(max_entries),
        }
    }

    /// Read access to the underlying engine.
    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Mutable access to the underlying engine.
    pub fn store_mut(&mut self) -> &mut CacheStore {
        &mut self.store
    }

    // == QR Codes ==
    /// Caches a QR code under `qr:<id>` and indexes its content and type.
    ///
    /// `ttl` is in milliseconds; absent or zero means the QR code class.
    pub fn store_qr_code(&mut self, qr: &QrCode, ttl: Option<u64>) -> Result<()> {
        let ttl = ttl
            .filter(|ttl| *ttl > 0)
            .unwrap_or(TtlClass::QrCodes.millis());
        self.put(qr_key(&qr.id), qr, Some(ttl))?;
        self.store
            .index(QR_KIND, &qr.id, &[qr.content.as_str(), qr.content_type_or_text()]);
        Ok(())
    }

    pub fn get_qr_code(&mut self, id: &str) -> Option<QrCode> {
        self.fetch(&qr_key(id))
    }

    /// Caches QR codes individually without TTL or indexing.
    pub fn bulk_store_qr_codes(&mut self, qrs: &[QrCode]) -> Result<()> {
        let entries = qrs
            .iter()
            .map(|qr| -> Result<BulkEntry> {
                Ok(BulkEntry {
                    key: qr_key(&qr.id),
                    data: serde_json::to_value(qr)?,
                    ttl: None,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        self.store.bulk_store(entries);
        Ok(())
    }

    // == History ==
    /// Caches a history list, per user when `user_id` is given, and indexes each item.
    pub fn store_qr_history(&mut self, history: &[QrHistoryItem], user_id: Option<u64>) -> Result<()> {
        self.put(history_key(user_id), history, Some(TtlClass::QrCodes.millis()))?;
        for item in history {
            self.store.index(
                HISTORY_KIND,
                &item.qr.id,
                &[item.qr.content.as_str(), item.qr.content_type_or_text()],
            );
        }
        Ok(())
    }

    pub fn get_qr_history(&mut self, user_id: Option<u64>) -> Option<Vec<QrHistoryItem>> {
        self.fetch(&history_key(user_id))
    }

    // == Form Drafts ==
    pub fn store_form_data(&mut self, draft: &QrFormDraft, session_id: Option<&str>) -> Result<()> {
        self.put(form_key(session_id), draft, Some(TtlClass::FormData.millis()))
    }

    pub fn get_form_data(&mut self, session_id: Option<&str>) -> Option<QrFormDraft> {
        self.fetch(&form_key(session_id))
    }

    // == Templates ==
    /// Caches the template list plus each template under `template:<id>`.
    pub fn store_templates(&mut self, templates: &[QrTemplate]) -> Result<()> {
        let ttl = Some(TtlClass::Templates.millis());
        self.put(TEMPLATES_ALL_KEY.to_string(), templates, ttl)?;

        for template in templates {
            self.put(template_key(&template.id), template, ttl)?;
            self.store.index(
                TEMPLATE_KIND,
                &template.id,
                &[
                    template.name.as_str(),
                    template.description.as_str(),
                    template.category.as_str(),
                ],
            );
        }
        Ok(())
    }

    pub fn get_templates(&mut self) -> Option<Vec<QrTemplate>> {
        self.fetch(TEMPLATES_ALL_KEY)
    }

    pub fn get_template(&mut self, id: &str) -> Option<QrTemplate> {
        self.fetch(&template_key(id))
    }

    /// Caches templates individually without TTL or indexing.
    pub fn bulk_store_templates(&mut self, templates: &[QrTemplate]) -> Result<()> {
        let entries = templates
            .iter()
            .map(|template| -> Result<BulkEntry> {
                Ok(BulkEntry {
                    key: template_key(&template.id),
                    data: serde_json::to_value(template)?,
                    ttl: None,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        self.store.bulk_store(entries);
        Ok(())
    }

    // == Users ==
    /// Caches a user under `user:<id>` and as the current user.
    pub fn store_user_data(&mut self, user: &User) -> Result<()> {
        let ttl = Some(TtlClass::UserData.millis());
        self.put(user_key(user.id), user, ttl)?;
        self.put(USER_CURRENT_KEY.to_string(), user, ttl)
    }

    /// Returns the user with `id`, or the current user when no id (or id 0) is given.
    pub fn get_user_data(&mut self, id: Option<u64>) -> Option<User> {
        match id.filter(|id| *id > 0) {
            Some(id) => self.fetch(&user_key(id)),
            None => self.fetch(USER_CURRENT_KEY),
        }
    }

    // == Search ==
    /// Finds cached QR codes whose content or type contains `query`.
    ///
    /// IDs whose record has expired or been cleared are dropped, so fewer
    /// than `limit` results may come back.
    pub fn search_qr_codes(&mut self, query: &str, limit: usize) -> Vec<QrCode> {
        self.store
            .search(QR_KIND, query, limit)
            .into_iter()
            .filter_map(|id| self.get_qr_code(&id))
            .collect()
    }

    /// Finds cached templates whose name, description or category contains `query`.
    ///
    /// The category filter applies after the limit.
    pub fn search_templates(
        &mut self,
        query: &str,
        category: Option<TemplateCategory>,
        limit: usize,
    ) -> Vec<QrTemplate> {
        self.store
            .search(TEMPLATE_KIND, query, limit)
            .into_iter()
            .filter_map(|id| self.get_template(&id))
            .filter(|template| category.map_or(true, |c| template.category == c))
            .collect()
    }

    // == Management ==
    pub fn clear_cache(&mut self, pattern: Option<&str>) -> Result<usize> {
        self.store.remove_matching(pattern)
    }

    pub fn clear_expired_entries(&mut self) -> usize {
        self.store.cleanup_expired()
    }

    pub fn validate_data_integrity(&mut self) -> ValidationReport {
        self.store.validate()
    }

    pub fn stats(&self) -> CacheStats {
        self.store.stats()
    }

    pub fn cache_info(&self) -> CacheInfo {
        self.store.info()
    }

    pub fn export_cache(&self) -> Result<String> {
        self.store.export()
    }

    pub fn import_cache(&mut self, data: &str) -> bool {
        self.store.import(data)
    }

    // == Internal Helpers ==
    fn put<T: Serialize + ?Sized>(&mut self, key: String, value: &T, ttl: Option<u64>) -> Result<()> {
        let data = serde_json::to_value(value)?;
        self.store.store(key, data, ttl);
        Ok(())
    }

    /// Reads a key and decodes it; a payload of the wrong shape reads as absent.
    fn fetch<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let value: Value = self.store.get(key)?;
        serde_json::from_value(value).ok()
    }
}
