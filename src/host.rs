use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::file_utils::FileManager;
use crate::timeline::Timeline;

// @module: Scene host seam, where finished timelines leave the core

/// Consumer of finished timelines.
///
/// The core's only obligation towards a host is to hand over well-formed
/// timelines; a failed pipeline never reaches `attach`, so hosts never see a
/// partially-built one.
pub trait SceneHost {
    /// Take ownership of one synthesized timeline under a display label
    fn attach(&mut self, label: &str, timeline: Timeline) -> Result<()>;
}

/// Default host: persists each timeline as a pretty-printed JSON asset file
/// next to the imported media, named `<stem> - <label>.timeline.json`.
pub struct JsonAssetHost {
    output_dir: PathBuf,
    stem: String,
    written: Vec<PathBuf>,
}

impl JsonAssetHost {
    pub fn new(output_dir: PathBuf, stem: impl Into<String>) -> Self {
        JsonAssetHost {
            output_dir,
            stem: stem.into(),
            written: Vec::new(),
        }
    }

    /// Paths of all asset files written so far
    pub fn written_assets(&self) -> &[PathBuf] {
        &self.written
    }
}

impl SceneHost for JsonAssetHost {
    fn attach(&mut self, label: &str, timeline: Timeline) -> Result<()> {
        let filename = format!("{} - {}.timeline.json", self.stem, label);
        let path = self.output_dir.join(filename);

        let json = serde_json::to_string_pretty(&timeline)
            .context("Failed to serialize timeline to JSON")?;
        FileManager::write_to_file(&path, &json)?;

        self.written.push(path);
        Ok(())
    }
}
