use anyhow::Context;
use kobe_core::config::AppConfig;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> anyhow::Result<AppConfig> {
        let bytes = std::fs::read(&self.path)
            .with_context(|| format!("read config: {}", self.path.display()))?;
        let cfg: AppConfig = serde_json::from_slice(&bytes).context("decode config JSON")?;
        Ok(cfg)
    }

    /// Like [`ConfigStore::load`], but a missing file yields the built-in defaults.
    pub fn load_or_default(&self) -> anyhow::Result<AppConfig> {
        if !self.path.exists() {
            log::info!(
                "no config at {}; using built-in defaults",
                self.path.display()
            );
            return Ok(crate::defaults::default_app_config());
        }
        self.load()
    }

    pub fn save(&self, cfg: &AppConfig) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(cfg).context("encode config JSON")?;
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create config directory: {}", parent.display()))?;

        // Write next to the target, then rename over it.
        let mut tmp = tempfile::NamedTempFile::new_in(parent)
            .with_context(|| format!("create temp file in {}", parent.display()))?;
        tmp.write_all(&json).context("write temp config")?;
        tmp.as_file().sync_all().context("flush temp config")?;
        tmp.persist(&self.path)
            .map_err(|e| anyhow::Error::new(e.error))
            .with_context(|| format!("replace file: {}", self.path.display()))?;

        log::debug!("config saved to {}", self.path.display());
        Ok(())
    }

    /// Loads the stored config (or defaults), applies `f` and saves the result.
    ///
    /// Works on what is on disk, so in-memory overrides held by the caller are not persisted.
    pub fn update(&self, f: impl FnOnce(&mut AppConfig)) -> anyhow::Result<AppConfig> {
        let mut cfg = self.load_or_default()?;
        f(&mut cfg);
        self.save(&cfg)?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kobe_core::types::{ChatMode, GrammarTopic, Language};

    #[test]
    fn round_trips_config() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::at_path(dir.path().join("nested").join("config.json"));

        let mut cfg = crate::defaults::default_app_config();
        cfg.language = Language::En;
        cfg.chat_mode = ChatMode::Study;
        cfg.grammar_topic = GrammarTopic::Keigo;
        cfg.player_name = "Gakusei".into();
        cfg.last_persona_id = Some("haku".into());

        store.save(&cfg).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, cfg);

        // Saving again replaces the previous file.
        cfg.learning_goal = "Order ramen".into();
        store.save(&cfg).unwrap();
        assert_eq!(store.load().unwrap().learning_goal, "Order ramen");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::at_path(dir.path().join("absent.json"));

        assert!(store.load().is_err());
        let cfg = store.load_or_default().unwrap();
        assert_eq!(cfg.personas.len(), 5);
    }

    #[test]
    fn update_applies_change_to_stored_config() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::at_path(dir.path().join("config.json"));

        // First update starts from defaults.
        let cfg = store
            .update(|c| c.last_persona_id = Some("hikari".into()))
            .unwrap();
        assert_eq!(cfg.last_persona_id.as_deref(), Some("hikari"));

        store.update(|c| c.api_key_present = true).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.last_persona_id.as_deref(), Some("hikari"));
        assert!(loaded.api_key_present);
        assert_eq!(loaded.personas.len(), 5);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, b"{not json").unwrap();

        let err = ConfigStore::at_path(path).load_or_default().unwrap_err();
        assert!(format!("{err:#}").contains("decode config JSON"));
    }
}
