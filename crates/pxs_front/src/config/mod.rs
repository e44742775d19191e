//! The config file and the windows editing what goes into it.
//!
//! The file is a single JSON object. "gui" holds the layout as a string, "emulator" the
//! emulation settings, and the "SPU" and "GPU" objects are read by their owners.

pub mod emulation;
pub mod gpu;
pub mod spu;

use crate::layout::Layout;

use pxs_core::System;

use directories_next::ProjectDirs;
use serde_json::{json, Value};
use thiserror::Error;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to access config file: {0}")]
    Io(#[from] io::Error),

    #[error("invalid config file: {0}")]
    Json(#[from] serde_json::Error),
}

const FILE_NAME: &str = "psxscope.json";

pub struct ConfigFile {
    path: PathBuf,
    /// The layout as it was last loaded or saved.
    saved_layout: Option<String>,
}

impl ConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            saved_layout: None,
        }
    }

    /// The config file in the platform's config directory, or in the working directory if there
    /// is none.
    pub fn default_location() -> Self {
        let path = match ProjectDirs::from("", "", "psxscope") {
            Some(dirs) => dirs.config_dir().join(FILE_NAME),
            None => {
                warn!("failed to find config directory");
                PathBuf::from(FILE_NAME)
            }
        };
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the config file into 'system' and 'layout'. A missing file isn't an error, and
    /// nothing is changed if the file can't be parsed.
    ///
    /// Whatever the outcome, the resulting layout counts as saved, so the file is only written
    /// once something is changed.
    pub fn load(&mut self, system: &mut System, layout: &mut Layout) -> Result<(), ConfigError> {
        let res = self.read(system, layout);
        self.saved_layout = Some(layout.to_json());
        res
    }

    fn read(&mut self, system: &mut System, layout: &mut Layout) -> Result<(), ConfigError> {
        let source = match fs::read_to_string(&self.path) {
            Ok(source) => source,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!("no config file at '{}', using defaults", self.path.display());
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };
        let doc: Value = serde_json::from_str(&source)?;
        self.apply(&doc, system, layout);
        info!("loaded config from '{}'", self.path.display());
        Ok(())
    }

    fn apply(&self, doc: &Value, system: &mut System, layout: &mut Layout) {
        if let Some(gui) = doc.get("gui").and_then(Value::as_str) {
            match Layout::parse(gui) {
                Ok(loaded) => *layout = loaded,
                Err(err) => warn!("ignoring GUI layout: {err}"),
            }
        }
        if let Some(emulator) = doc.get("emulator").filter(|val| val.is_object()) {
            system.settings.deserialize(emulator);
        }
        system.spu.set_config(doc);
        system.gpu.set_config(doc);
    }

    fn document(system: &System, layout: &Layout) -> Value {
        json!({
            "gui": layout.to_json(),
            "SPU": system.spu.config(),
            "GPU": system.gpu.config(),
            "emulator": system.settings.serialize(),
        })
    }

    /// Write the config file. A failed write isn't retried until something changes.
    pub fn save(&mut self, system: &System, layout: &Layout) -> Result<(), ConfigError> {
        self.saved_layout = Some(layout.to_json());
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let mut source = serde_json::to_string_pretty(&Self::document(system, layout))?;
        source.push('\n');
        fs::write(&self.path, source)?;
        debug!("saved config to '{}'", self.path.display());
        Ok(())
    }

    /// If the file is out of date, either because a config window changed something or the
    /// layout is different from the one on disc.
    pub fn needs_save(&self, changed: bool, layout: &Layout) -> bool {
        changed || self.saved_layout.as_deref() != Some(layout.to_json().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pxs_core::settings::{CddaType, VideoType};

    fn config_in(dir: &tempfile::TempDir) -> ConfigFile {
        ConfigFile::new(dir.path().join("nested").join(FILE_NAME))
    }

    #[test]
    fn missing_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(&dir);
        let mut system = System::default();
        let mut layout = Layout::default();
        assert!(config.load(&mut system, &mut layout).is_ok());
        assert_eq!(layout, Layout::default());
        assert!(system.settings.xa);
        assert!(!config.needs_save(false, &layout));
        assert!(!config.path().exists());
    }

    #[test]
    fn malformed_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        fs::write(&path, "{ \"gui\": ").unwrap();

        let mut config = ConfigFile::new(&path);
        let mut system = System::default();
        let mut layout = Layout::default();
        assert!(matches!(
            config.load(&mut system, &mut layout),
            Err(ConfigError::Json(_))
        ));
        assert_eq!(layout, Layout::default());
    }

    #[test]
    fn malformed_file_isnt_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        let source = "{ \"emulator\": { \"Xa\": false, } }";
        fs::write(&path, source).unwrap();

        let mut config = ConfigFile::new(&path);
        let mut system = System::default();
        let mut layout = Layout::default();
        assert!(config.load(&mut system, &mut layout).is_err());
        assert!(!config.needs_save(false, &layout));
        assert_eq!(fs::read_to_string(&path).unwrap(), source);

        // Only a real change writes the file.
        layout.windows.logs = true;
        assert!(config.needs_save(false, &layout));
    }

    #[test]
    fn file_without_layout_isnt_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        fs::write(&path, r#"{ "emulator": { "HLE": false } }"#).unwrap();

        let mut config = ConfigFile::new(&path);
        let mut system = System::default();
        let mut layout = Layout::default();
        config.load(&mut system, &mut layout).unwrap();
        assert!(!system.settings.hle);
        assert!(!config.needs_save(false, &layout));
    }

    #[test]
    fn wrongly_typed_sections_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        fs::write(&path, r#"{ "gui": 12, "emulator": "nope", "SPU": [] }"#).unwrap();

        let mut config = ConfigFile::new(&path);
        let mut system = System::default();
        let mut layout = Layout::default();
        config.load(&mut system, &mut layout).unwrap();
        assert_eq!(layout, Layout::default());
        assert!(system.settings.xa);
        assert!(system.settings.hle);
        assert_eq!(system.spu.config, Default::default());
    }

    #[test]
    fn malformed_layout_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        fs::write(&path, r#"{ "gui": "not json", "emulator": { "Xa": false } }"#).unwrap();

        let mut config = ConfigFile::new(&path);
        let mut system = System::default();
        let mut layout = Layout::default();
        config.load(&mut system, &mut layout).unwrap();
        assert_eq!(layout, Layout::default());
        assert!(!system.settings.xa);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();

        let mut system = System::default();
        system.settings.xa = false;
        system.settings.auto_video = false;
        system.settings.video = VideoType::Pal;
        system.settings.cdda = CddaType::BigEndian;
        system.spu.config.mono = true;
        system.gpu.config.show_fps = true;

        let mut layout = Layout::default();
        layout.windows.logs = true;
        layout.mem_editors[3] = true;

        let mut config = config_in(&dir);
        config.save(&system, &layout).unwrap();
        assert!(!config.needs_save(false, &layout));

        let source = fs::read_to_string(config.path()).unwrap();
        assert!(source.ends_with("}\n"));
        assert!(source.contains("\n  \"emulator\""));

        let mut loaded = System::default();
        let mut loaded_layout = Layout::default();
        let mut config = config_in(&dir);
        config.load(&mut loaded, &mut loaded_layout).unwrap();

        assert_eq!(loaded_layout, layout);
        assert!(!loaded.settings.xa);
        assert!(!loaded.settings.auto_video);
        assert_eq!(loaded.settings.video, VideoType::Pal);
        assert_eq!(loaded.settings.cdda, CddaType::BigEndian);
        assert!(loaded.spu.config.mono);
        assert!(loaded.gpu.config.show_fps);
        assert!(!config.needs_save(false, &loaded_layout));
    }

    #[test]
    fn layout_change_needs_save() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(&dir);
        let mut layout = Layout::default();

        // Never loaded or saved.
        assert!(config.needs_save(false, &layout));

        config.save(&System::default(), &layout).unwrap();
        assert!(!config.needs_save(false, &layout));
        assert!(config.needs_save(true, &layout));

        layout.show_menu = true;
        assert!(config.needs_save(false, &layout));
    }
}
