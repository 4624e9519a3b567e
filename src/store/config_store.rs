//! The config store: mode detection, fail-soft load, mode-following save, split.

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use serde::Serialize;

use crate::config::StorageConfig;
use crate::dynamic::DynamicConfig;
use crate::store::backend::{FsBackend, StorageBackend};
use crate::store::codec;
use crate::store::layout::{SplitFile, StorageLayout, StorageMode};
use crate::store::PersistenceError;

/// Single source of truth for reading and writing the dynamic configuration.
///
/// The store holds no document between calls. Every [`load`](Self::load)
/// reads storage afresh and every [`save`](Self::save) overwrites it.
pub struct ConfigStore<B = FsBackend> {
    backend: B,
    layout: StorageLayout,
    /// Serializes read-modify-write cycles issued through this store.
    writer: Mutex<()>,
}

impl ConfigStore<FsBackend> {
    /// Store over the local filesystem.
    pub fn open(layout: StorageLayout) -> Self {
        Self::new(FsBackend::new(), layout)
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::open(StorageLayout::from(config))
    }
}

impl<B: StorageBackend> ConfigStore<B> {
    pub fn new(backend: B, layout: StorageLayout) -> Self {
        Self {
            backend,
            layout,
            writer: Mutex::new(()),
        }
    }

    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// `Split` if any split file exists right now, else `Monolithic`.
    pub fn detect_mode(&self) -> StorageMode {
        let split = SplitFile::ALL
            .iter()
            .any(|file| self.backend.exists(&self.layout.split_path(*file)));
        if split {
            StorageMode::Split
        } else {
            StorageMode::Monolithic
        }
    }

    /// Load the document from whichever storage mode is active.
    ///
    /// Never fails: unreadable or malformed content degrades to empty
    /// sections (split mode) or an empty document (monolithic mode).
    pub fn load(&self) -> DynamicConfig {
        match self.detect_mode() {
            StorageMode::Monolithic => self.load_monolithic(),
            StorageMode::Split => self.load_split(),
        }
    }

    fn load_monolithic(&self) -> DynamicConfig {
        let path = self.layout.dynamic_file();
        let text = match self.backend.read(path) {
            Ok(text) => text,
            Err(e) if e.is_not_found() => {
                tracing::debug!(path = %path.display(), "No dynamic configuration yet, starting empty");
                return DynamicConfig::default();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read dynamic configuration, using empty document");
                return DynamicConfig::default();
            }
        };

        codec::parse_document(&text).unwrap_or_else(|e| {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Malformed dynamic configuration, using empty document"
            );
            DynamicConfig::default()
        })
    }

    fn load_split(&self) -> DynamicConfig {
        let mut doc = DynamicConfig::default();
        for file in SplitFile::ALL {
            let path = self.layout.split_path(file);
            let text = match self.backend.read(&path) {
                Ok(text) => text,
                Err(e) if e.is_not_found() => {
                    tracing::debug!(path = %path.display(), "Split file absent, section left empty");
                    continue;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read split file, section left empty");
                    continue;
                }
            };
            if let Err(e) = codec::parse_section(file, &text, &mut doc) {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Malformed split file, section left empty"
                );
            }
        }
        doc
    }

    /// Write `doc` back in the mode active at call time.
    pub fn save(&self, doc: &DynamicConfig) -> Result<(), PersistenceError> {
        match self.detect_mode() {
            StorageMode::Monolithic => self.save_monolithic(doc),
            StorageMode::Split => self.write_split(doc),
        }
    }

    fn save_monolithic(&self, doc: &DynamicConfig) -> Result<(), PersistenceError> {
        let path = self.layout.dynamic_file();
        let text = codec::render_document(doc).map_err(|source| PersistenceError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;
        self.backend.write(path, &text)?;
        tracing::debug!(path = %path.display(), "Dynamic configuration saved");
        Ok(())
    }

    /// Render all three sections, then overwrite the files one by one.
    ///
    /// A failed write leaves earlier files in their new state.
    fn write_split(&self, doc: &DynamicConfig) -> Result<(), PersistenceError> {
        let mut rendered = Vec::with_capacity(SplitFile::ALL.len());
        for file in SplitFile::ALL {
            let path = self.layout.split_path(file);
            let text = codec::render_section(file, doc)
                .map_err(|source| PersistenceError::Serialize { path: path.clone(), source })?;
            rendered.push((path, text));
        }

        for (written, (path, text)) in rendered.iter().enumerate() {
            if let Err(e) = self.backend.write(path, text) {
                if written > 0 {
                    tracing::warn!(
                        failed = %path.display(),
                        files_already_written = written,
                        "Split write interrupted, split files are now inconsistent"
                    );
                }
                return Err(e.into());
            }
        }
        tracing::debug!(dir = %self.layout.config_dir().display(), "Split configuration saved");
        Ok(())
    }

    /// Write `doc` as split files regardless of the current mode.
    ///
    /// Afterwards [`detect_mode`](Self::detect_mode) reports `Split`.
    /// Writing the same document twice produces identical files.
    pub fn split(&self, doc: &DynamicConfig) -> Result<(), PersistenceError> {
        self.backend.create_dir_all(self.layout.config_dir())?;
        self.write_split(doc)?;
        tracing::info!(
            dir = %self.layout.config_dir().display(),
            routers = doc.routers.len(),
            services = doc.services.len(),
            middlewares = doc.middlewares.len(),
            "Configuration split into separate files"
        );
        Ok(())
    }

    /// Split whatever is currently stored. Returns the document written.
    pub fn split_current(&self) -> Result<DynamicConfig, PersistenceError> {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let doc = self.load();
        self.split(&doc)?;
        Ok(doc)
    }

    /// Load, apply `f`, save. Cycles on the same store never interleave.
    pub fn modify<T>(&self, f: impl FnOnce(&mut DynamicConfig) -> T) -> Result<T, PersistenceError> {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let mut doc = self.load();
        let out = f(&mut doc);
        self.save(&doc)?;
        Ok(out)
    }

    /// Snapshot of mode, files present and entity counts.
    pub fn status(&self) -> StoreStatus {
        let split_files: Vec<PathBuf> = SplitFile::ALL
            .iter()
            .map(|file| self.layout.split_path(*file))
            .filter(|path| self.backend.exists(path))
            .collect();
        let mode = if split_files.is_empty() {
            StorageMode::Monolithic
        } else {
            StorageMode::Split
        };
        let doc = self.load();
        let monolithic_present = self.backend.exists(self.layout.dynamic_file());

        StoreStatus {
            mode,
            dynamic_file: self.layout.dynamic_file().to_path_buf(),
            config_dir: self.layout.config_dir().to_path_buf(),
            split_files,
            stale_monolithic: mode == StorageMode::Split && monolithic_present,
            routers: doc.routers.len(),
            services: doc.services.len(),
            middlewares: doc.middlewares.len(),
        }
    }
}

/// What [`ConfigStore::status`] reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStatus {
    pub mode: StorageMode,
    pub dynamic_file: PathBuf,
    pub config_dir: PathBuf,
    /// Split files that currently exist.
    pub split_files: Vec<PathBuf>,
    /// Split mode is active but the monolithic file is still on disk and ignored.
    pub stale_monolithic: bool,
    pub routers: usize,
    pub services: usize,
    pub middlewares: usize,
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use super::*;
    use crate::dynamic::Service;
    use crate::store::MemoryBackend;

    fn memory_store() -> (Arc<MemoryBackend>, ConfigStore<Arc<MemoryBackend>>) {
        let backend = Arc::new(MemoryBackend::new());
        let store = ConfigStore::new(backend.clone(), StorageLayout::under(Path::new("/srv")));
        (backend, store)
    }

    #[test]
    fn test_mode_follows_any_single_split_file() {
        let (backend, store) = memory_store();
        assert_eq!(store.detect_mode(), StorageMode::Monolithic);

        backend.insert("/srv/config/middlewares.yml", "");
        assert_eq!(store.detect_mode(), StorageMode::Split);

        backend.remove(Path::new("/srv/config/middlewares.yml"));
        assert_eq!(store.detect_mode(), StorageMode::Monolithic);
    }

    #[test]
    fn test_malformed_monolithic_loads_empty() {
        let (backend, store) = memory_store();
        backend.insert("/srv/dynamic.yml", "http: {routers: [");
        assert_eq!(store.load(), DynamicConfig::default());
    }

    #[test]
    fn test_save_targets_split_files_that_appeared_after_load() {
        let (backend, store) = memory_store();
        let mut doc = store.load();
        doc.services.insert("svc".into(), Service::with_urls(["http://a:80"]));

        backend.insert("/srv/config/routers.yml", "http:\n  routers: {}\n");
        store.save(&doc).unwrap();

        assert!(backend.contents(Path::new("/srv/dynamic.yml")).is_none());
        let services = backend.contents(Path::new("/srv/config/services.yml")).unwrap();
        assert!(services.contains("http://a:80"));
    }

    #[test]
    fn test_status_flags_stale_monolithic_file() {
        let (backend, store) = memory_store();
        backend.insert("/srv/dynamic.yml", "http: {}\n");
        assert!(!store.status().stale_monolithic);

        store.split(&DynamicConfig::default()).unwrap();
        let status = store.status();
        assert_eq!(status.mode, StorageMode::Split);
        assert_eq!(status.split_files.len(), 3);
        assert!(status.stale_monolithic);
    }

    #[test]
    fn test_modify_returns_closure_output() {
        let store = ConfigStore::new(MemoryBackend::new(), StorageLayout::under(Path::new("/srv")));
        let existed = store
            .modify(|doc| doc.services.insert("svc".into(), Service::with_urls(["http://a:80"])).is_some())
            .unwrap();
        assert!(!existed);
        assert_eq!(store.load().services.len(), 1);

        let written = store.backend().contents(Path::new("/srv/dynamic.yml")).unwrap();
        assert!(written.contains("http://a:80"));
    }

    #[test]
    fn test_modify_keeps_content_outside_the_model() {
        let store = ConfigStore::new(MemoryBackend::new(), StorageLayout::under(Path::new("/srv")));
        let original = "http:\n  middlewares:\n    strip:\n      stripPrefix:\n        prefixes: [/api]\ntcp:\n  routers: {}\n";
        store.backend().insert("/srv/dynamic.yml", original);

        store
            .modify(|doc| doc.services.insert("svc".into(), Service::with_urls(["http://a:80"])))
            .unwrap();

        let written = store.backend().contents(Path::new("/srv/dynamic.yml")).unwrap();
        let mut after: serde_yaml::Value = serde_yaml::from_str(&written).unwrap();
        let before: serde_yaml::Value = serde_yaml::from_str(original).unwrap();
        assert_eq!(after["tcp"], before["tcp"]);
        assert_eq!(after["http"]["middlewares"], before["http"]["middlewares"]);

        after["http"].as_mapping_mut().unwrap().remove("services");
        after["http"].as_mapping_mut().unwrap().remove("routers");
        assert_eq!(after, before);
    }
}
