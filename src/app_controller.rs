use anyhow::Result;
use log::{error, warn, info, debug};
use std::fs;
use std::path::{Path, PathBuf};
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::Config;
use crate::clean;
use crate::cue::{self, ParseOptions, SubtitleFormat};
use crate::demux::{self, SubtitleTrackInfo};
use crate::errors::ImportError;
use crate::file_utils::{FileManager, FileType};
use crate::host::{JsonAssetHost, SceneHost};
use crate::language_utils;
use crate::sanitize::sanitize_line;
use crate::timeline::{self, Timeline};

// @module: Application controller for subtitle import

/// Main application controller for subtitle-to-timeline import
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            microdvd_fps: self.config.microdvd_fps,
        }
    }

    /// Import one on-disk subtitle file into a keyframe timeline.
    ///
    /// Synchronous pipeline over in-memory data: sniff the format, strip the
    /// format's markup dialect, parse the cue list, synthesize the timeline.
    /// Every failure path returns a typed error; no partially-built timeline
    /// ever escapes.
    pub fn import_subtitle_file(&self, path: &Path) -> Result<Timeline, ImportError> {
        let content = fs::read_to_string(path)?;

        let format = SubtitleFormat::sniff(&content).ok_or_else(|| ImportError::UnknownFormat {
            path: path.to_path_buf(),
        })?;
        debug!("Detected {} content in {:?}", format, path);

        let sanitized = match clean::dialect_for_format(format) {
            Some(dialect) => content
                .lines()
                .map(|line| sanitize_line(line, dialect))
                .collect::<Vec<_>>()
                .join("\n"),
            None => content,
        };

        let cues = cue::parse(&sanitized, format, &self.parse_options())?;
        let timeline = timeline::synthesize(cues)?;

        Ok(timeline)
    }

    /// Import every usable subtitle track of a media file and hand the
    /// resulting timelines to the scene host.
    ///
    /// One bad track is logged and skipped; it never aborts the remaining
    /// tracks. Returns the number of timelines attached.
    pub async fn import_media<H: SceneHost>(
        &self,
        media_path: &Path,
        host: &mut H,
    ) -> Result<usize> {
        if !self.config.import_enabled {
            info!("Subtitle import is disabled in the configuration");
            return Ok(0);
        }

        if !media_path.exists() {
            return Err(anyhow::anyhow!("Media file does not exist: {:?}", media_path));
        }

        let tracks = demux::list_subtitle_tracks(media_path).await?;
        if tracks.is_empty() {
            info!("No subtitle tracks found in {:?}", media_path);
            return Ok(0);
        }

        let text_tracks: Vec<&SubtitleTrackInfo> = demux::text_tracks(&tracks);
        if text_tracks.is_empty() {
            warn!("All subtitle tracks in {:?} are bitmap-based, nothing to import", media_path);
            return Ok(0);
        }

        let selected = self.select_tracks(&text_tracks);
        info!("Importing {} subtitle track(s) from {:?}", selected.len(), media_path);

        // Intermediate files live in a scratch directory unless configured
        // to stay next to the media file
        let media_dir = media_path.parent().unwrap_or(Path::new(".")).to_path_buf();
        // the guard keeps the scratch directory alive until the import ends
        let _scratch_guard;
        let work_dir = if self.config.keep_intermediate_files {
            media_dir
        } else {
            let scratch = tempfile::tempdir()?;
            let path = scratch.path().to_path_buf();
            _scratch_guard = scratch;
            path
        };

        let stem = media_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "media".to_string());

        let progress = ProgressBar::new(selected.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} tracks {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress.set_style(style);

        let mut imported = 0;
        for (position, track) in selected.iter().enumerate() {
            let label = demux::track_label(position, track);
            progress.set_message(format!("track {}", label));

            match self
                .import_one_track(media_path, track, &label, &stem, &work_dir)
                .await
            {
                Ok(timeline) => {
                    if let Err(e) = host.attach(&label, timeline) {
                        error!("Scene host rejected track '{}': {}", label, e);
                    } else {
                        imported += 1;
                    }
                }
                Err(e) => {
                    // per-track isolation, keep going with the other tracks
                    error!("Skipping track '{}': {}", label, e);
                }
            }
            progress.inc(1);
        }
        progress.finish_with_message("import complete");

        info!("Imported {}/{} subtitle track(s)", imported, selected.len());
        Ok(imported)
    }

    /// Extract, clean, parse and synthesize a single track
    async fn import_one_track(
        &self,
        media_path: &Path,
        track: &SubtitleTrackInfo,
        label: &str,
        stem: &str,
        work_dir: &Path,
    ) -> Result<Timeline, ImportError> {
        let format = track.extraction_format();
        let extract_name = format!("{} - {}.{}", stem, label, format.extension());
        let extract_path = work_dir.join(&extract_name);
        let cleaned_path = work_dir.join(format!("cleaned_{}", extract_name));

        demux::extract_track(media_path, track, &extract_path).await?;

        // On cleaning failure fall back to the raw extract rather than
        // losing the track
        let input_path = match clean::dialect_for_format(format) {
            Some(dialect) => match clean::clean_file(&extract_path, &cleaned_path, dialect) {
                Ok(()) => cleaned_path.clone(),
                Err(e) => {
                    warn!("Cleaning subtitles failed for '{}': {}", label, e);
                    extract_path.clone()
                }
            },
            None => extract_path.clone(),
        };

        let content = fs::read_to_string(&input_path)?;

        // Sniff the extracted content instead of trusting the container
        // codec; ffmpeg may have converted the track on the way out
        let parsed_format = SubtitleFormat::sniff(&content).unwrap_or(format);
        let cues = cue::parse(&content, parsed_format, &self.parse_options())?;
        let timeline = timeline::synthesize(cues)?;

        Ok(timeline)
    }

    /// Apply the preferred-language filter to the text tracks.
    ///
    /// Falls back to all tracks when nothing matches, an import that yields
    /// the wrong language still beats importing nothing.
    fn select_tracks<'a>(&self, tracks: &[&'a SubtitleTrackInfo]) -> Vec<&'a SubtitleTrackInfo> {
        let Some(preferred) = &self.config.preferred_language else {
            return tracks.to_vec();
        };

        let matching: Vec<&SubtitleTrackInfo> = tracks
            .iter()
            .copied()
            .filter(|t| {
                t.language
                    .as_deref()
                    .is_some_and(|lang| language_utils::language_codes_match(lang, preferred))
            })
            .collect();

        if matching.is_empty() {
            warn!(
                "No subtitle track matches preferred language '{}', importing all tracks",
                preferred
            );
            return tracks.to_vec();
        }
        matching
    }

    /// Run the import workflow for a single input path.
    ///
    /// Subtitle files go straight through the synchronous pipeline; media
    /// containers go through the demuxer first.
    pub async fn run(&self, input_path: PathBuf) -> Result<()> {
        if !input_path.exists() {
            return Err(anyhow::anyhow!("Input path does not exist: {:?}", input_path));
        }

        let output_dir = input_path.parent().unwrap_or(Path::new(".")).to_path_buf();
        let stem = input_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "subtitle".to_string());
        let mut host = JsonAssetHost::new(output_dir, stem);

        match FileManager::detect_file_type(&input_path)? {
            FileType::Subtitle(format) => {
                info!("Detected {} subtitle file, skipping extraction", format);
                let timeline = self.import_subtitle_file(&input_path)?;
                host.attach(&format.to_string(), timeline)?;
            }
            FileType::Video => {
                self.import_media(&input_path, &mut host).await?;
            }
            FileType::Unknown => {
                return Err(anyhow::anyhow!(
                    "Unsupported input file (neither subtitle nor media): {:?}",
                    input_path
                ));
            }
        }

        for asset in host.written_assets() {
            info!("Success: {}", asset.display());
        }
        Ok(())
    }

    /// Run the import workflow for every media file in a directory tree
    pub async fn run_folder(&self, input_dir: PathBuf) -> Result<()> {
        let start_time = std::time::Instant::now();

        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow::anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let media_files = FileManager::find_media_files(&input_dir)?;
        if media_files.is_empty() {
            return Err(anyhow::anyhow!("No media files found in directory: {:?}", input_dir));
        }

        let mut success_count = 0;
        let mut error_count = 0;

        for media_file in media_files.iter() {
            let file_name = media_file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());

            match self.run(media_file.clone()).await {
                Ok(()) => success_count += 1,
                Err(e) => {
                    error!("Error processing file {}: {}", file_name, e);
                    error_count += 1;
                }
            }
        }

        info!(
            "Folder processing completed: {} processed, {} errors in {}",
            success_count,
            error_count,
            Self::format_duration(start_time.elapsed())
        );
        Ok(())
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
