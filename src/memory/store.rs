//! Memory Store
//!
//! State container over [`MemoryService`]. The `cache_enabled` switch turns
//! every read into a miss-free `None` and every write into a no-op; cache
//! management calls always reach the service. Settings changes are saved
//! immediately.

use tracing::{info, warn};

use crate::cache::{CacheInfo, CacheStats, ValidationReport};
use crate::error::Result;
use crate::memory::{CacheSettings, MemoryService, SettingsFile, SettingsUpdate};
use crate::qr::{QrCode, QrFormDraft, QrHistoryItem, QrTemplate, TemplateCategory, User};

/// Cache service plus its persisted settings.
#[derive(Debug)]
pub struct MemoryStore {
    service: MemoryService,
    settings: CacheSettings,
    settings_file: SettingsFile,
}

impl MemoryStore {
    /// Creates a store with the given settings, sizing the cache from `max_cache_size`.
    pub fn new(settings: CacheSettings, settings_file: SettingsFile) -> Self {
        Self {
            service: MemoryService::new(settings.max_cache_size),
            settings,
            settings_file,
        }
    }

    /// Creates a store from saved settings, or from `fallback` when none were saved.
    pub fn load(settings_file: SettingsFile, fallback: CacheSettings) -> Self {
        let settings = settings_file.load().unwrap_or(fallback);
        Self::new(settings, settings_file)
    }

    // == Settings ==
    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.cache_enabled
    }

    pub fn enable_cache(&mut self) {
        self.settings.cache_enabled = true;
        self.persist();
    }

    pub fn disable_cache(&mut self) {
        self.settings.cache_enabled = false;
        self.persist();
    }

    pub fn toggle_auto_cleanup(&mut self) {
        self.settings.auto_cleanup = !self.settings.auto_cleanup;
        self.persist();
    }

    /// Changes the size limit; returns how many entries were evicted to fit.
    pub fn set_max_cache_size(&mut self, size: usize) -> usize {
        self.settings.max_cache_size = size;
        self.persist();
        self.service.store_mut().set_max_entries(size)
    }

    /// Applies a partial update and returns the resulting settings.
    pub fn update_settings(&mut self, update: SettingsUpdate) -> CacheSettings {
        if let Some(enabled) = update.cache_enabled {
            self.settings.cache_enabled = enabled;
        }
        if let Some(auto_cleanup) = update.auto_cleanup {
            self.settings.auto_cleanup = auto_cleanup;
        }
        if let Some(size) = update.max_cache_size {
            self.settings.max_cache_size = size;
            let evicted = self.service.store_mut().set_max_entries(size);
            if evicted > 0 {
                info!("Cache size limit lowered to {}: evicted {} entries", size, evicted);
            }
        }
        self.persist();
        self.settings.clone()
    }

    // == QR Codes ==
    pub fn cache_qr_code(&mut self, qr: &QrCode, ttl: Option<u64>) -> Result<()> {
        if !self.is_enabled() {
            return Ok(());
        }
        self.service.store_qr_code(qr, ttl)
    }

    pub fn get_cached_qr_code(&mut self, id: &str) -> Option<QrCode> {
        if !self.is_enabled() {
            return None;
        }
        self.service.get_qr_code(id)
    }

    pub fn cache_qr_history(&mut self, history: &[QrHistoryItem], user_id: Option<u64>) -> Result<()> {
        if !self.is_enabled() {
            return Ok(());
        }
        self.service.store_qr_history(history, user_id)
    }

    pub fn get_cached_qr_history(&mut self, user_id: Option<u64>) -> Option<Vec<QrHistoryItem>> {
        if !self.is_enabled() {
            return None;
        }
        self.service.get_qr_history(user_id)
    }

    // == Form Drafts ==
    pub fn cache_form_data(&mut self, draft: &QrFormDraft, session_id: Option<&str>) -> Result<()> {
        if !self.is_enabled() {
            return Ok(());
        }
        self.service.store_form_data(draft, session_id)
    }

    pub fn get_cached_form_data(&mut self, session_id: Option<&str>) -> Option<QrFormDraft> {
        if !self.is_enabled() {
            return None;
        }
        self.service.get_form_data(session_id)
    }

    // == Templates ==
    pub fn cache_templates(&mut self, templates: &[QrTemplate]) -> Result<()> {
        if !self.is_enabled() {
            return Ok(());
        }
        self.service.store_templates(templates)
    }

    pub fn get_cached_templates(&mut self) -> Option<Vec<QrTemplate>> {
        if !self.is_enabled() {
            return None;
        }
        self.service.get_templates()
    }

    pub fn get_cached_template(&mut self, id: &str) -> Option<QrTemplate> {
        if !self.is_enabled() {
            return None;
        }
        self.service.get_template(id)
    }

    // == Users ==
    pub fn cache_user(&mut self, user: &User) -> Result<()> {
        if !self.is_enabled() {
            return Ok(());
        }
        self.service.store_user_data(user)
    }

    pub fn get_cached_user(&mut self, id: Option<u64>) -> Option<User> {
        if !self.is_enabled() {
            return None;
        }
        self.service.get_user_data(id)
    }

    // == Search ==
    pub fn search_cached_qr_codes(&mut self, query: &str, limit: usize) -> Vec<QrCode> {
        if !self.is_enabled() {
            return Vec::new();
        }
        self.service.search_qr_codes(query, limit)
    }

    pub fn search_cached_templates(
        &mut self,
        query: &str,
        category: Option<TemplateCategory>,
        limit: usize,
    ) -> Vec<QrTemplate> {
        if !self.is_enabled() {
            return Vec::new();
        }
        self.service.search_templates(query, category, limit)
    }

    // == Bulk ==
    pub fn bulk_cache_qr_codes(&mut self, qrs: &[QrCode]) -> Result<()> {
        if !self.is_enabled() {
            return Ok(());
        }
        self.service.bulk_store_qr_codes(qrs)
    }

    pub fn bulk_cache_templates(&mut self, templates: &[QrTemplate]) -> Result<()> {
        if !self.is_enabled() {
            return Ok(());
        }
        self.service.bulk_store_templates(templates)
    }

    // == Management ==
    pub fn clear_cache(&mut self, pattern: Option<&str>) -> Result<usize> {
        self.service.clear_cache(pattern)
    }

    pub fn clear_expired_entries(&mut self) -> usize {
        self.service.clear_expired_entries()
    }

    pub fn validate_cache(&mut self) -> ValidationReport {
        self.service.validate_data_integrity()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.service.stats()
    }

    pub fn cache_info(&self) -> CacheInfo {
        self.service.cache_info()
    }

    pub fn export_cache(&self) -> Result<String> {
        self.service.export_cache()
    }

    pub fn import_cache(&mut self, data: &str) -> bool {
        self.service.import_cache(data)
    }

    fn persist(&self) {
        if let Err(e) = self.settings_file.save(&self.settings) {
            warn!("Failed to save cache settings: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryStore {
        MemoryStore::new(CacheSettings::default(), SettingsFile::in_memory())
    }

    fn qr(id: &str) -> QrCode {
        QrCode {
            id: id.to_string(),
            content: format!("https://example.com/{id}"),
            content_type: None,
            created_at: String::new(),
            user_id: None,
            user: None,
            download_url: None,
        }
    }

    #[test]
    fn test_enabled_store_passes_through() {
        let mut store = store();
        store.cache_qr_code(&qr("1"), None).unwrap();

        assert_eq!(store.get_cached_qr_code("1"), Some(qr("1")));
        assert_eq!(store.search_cached_qr_codes("example", 10).len(), 1);
    }

    #[test]
    fn test_disabled_store_reads_nothing_and_writes_nothing() {
        let mut store = store();
        store.cache_qr_code(&qr("1"), None).unwrap();
        store.disable_cache();

        assert!(store.get_cached_qr_code("1").is_none());
        assert!(store.search_cached_qr_codes("example", 10).is_empty());

        store.cache_qr_code(&qr("2"), None).unwrap();
        store.bulk_cache_qr_codes(&[qr("3")]).unwrap();
        assert_eq!(store.cache_info().keys, vec!["qr:1"]);

        // Disabled reads do not count as misses
        assert_eq!(store.cache_stats().misses, 0);

        store.enable_cache();
        assert_eq!(store.get_cached_qr_code("1"), Some(qr("1")));
    }

    #[test]
    fn test_management_works_while_disabled() {
        let mut store = store();
        store.cache_qr_code(&qr("1"), None).unwrap();
        store.disable_cache();

        assert_eq!(store.clear_cache(None).unwrap(), 1);
        assert_eq!(store.cache_info().size, 0);
    }

    #[test]
    fn test_max_cache_size_is_enforced() {
        let mut store = store();
        for i in 0..5 {
            store.cache_qr_code(&qr(&i.to_string()), None).unwrap();
        }

        assert_eq!(store.set_max_cache_size(3), 2);
        store.cache_qr_code(&qr("new"), None).unwrap();

        assert_eq!(store.cache_info().size, 3);
        assert!(store.get_cached_qr_code("new").is_some());
        assert!(store.get_cached_qr_code("0").is_none());
    }

    #[test]
    fn test_toggle_auto_cleanup() {
        let mut store = store();
        store.toggle_auto_cleanup();
        assert!(!store.settings().auto_cleanup);
        store.toggle_auto_cleanup();
        assert!(store.settings().auto_cleanup);
    }

    #[test]
    fn test_settings_persist_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        {
            let mut store = MemoryStore::load(SettingsFile::new(&path), CacheSettings::default());
            store.update_settings(SettingsUpdate {
                cache_enabled: Some(false),
                auto_cleanup: None,
                max_cache_size: Some(42),
            });
            store.cache_qr_code(&qr("1"), None).unwrap();
        }

        let store = MemoryStore::load(SettingsFile::new(&path), CacheSettings::default());
        assert!(!store.settings().cache_enabled);
        assert!(store.settings().auto_cleanup);
        assert_eq!(store.settings().max_cache_size, 42);
        // Cache contents are never persisted
        assert_eq!(store.cache_info().size, 0);
    }

    #[test]
    fn test_load_uses_fallback_without_file() {
        let fallback = CacheSettings {
            max_cache_size: 7,
            ..Default::default()
        };
        let store = MemoryStore::load(SettingsFile::in_memory(), fallback.clone());
        assert_eq!(store.settings(), &fallback);
    }
}
