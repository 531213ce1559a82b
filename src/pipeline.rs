//! File-level orchestration.
//!
//! The core transforms are pure text-to-text functions; this module wires
//! them to the filesystem: it reads the input, runs the requested
//! transform, writes the result and the collected font list, and logs
//! every warning the transform reported.

use crate::chapter::{self, ChapterMark};
use crate::config::{Config, StyleProfile};
use crate::error::{EpisubError, Result};
use crate::subtitle::{rescale_ass, srt_to_ass};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What one pipeline run produced.
#[derive(Debug)]
pub struct PipelineOutcome {
    /// Path the rewritten document was written to.
    pub output_path: PathBuf,
    /// Path of the font list, when one was written.
    pub font_list_path: Option<PathBuf>,
    /// Distinct font names referenced by the output, in first-seen order.
    pub fonts: Vec<String>,
    /// Warnings reported by the transform.
    pub warnings: Vec<String>,
}

/// Convert an SRT file into a styled ASS file.
///
/// The style profile resolution order is: explicit argument, `.th.` tag in
/// the file name, configured default. The output defaults to the input
/// name with an `.ass` extension.
pub fn convert_subtitle(
    input: &Path,
    output: Option<&Path>,
    style: Option<StyleProfile>,
    config: &Config,
) -> Result<PipelineOutcome> {
    let content = read_input(input)?;

    let profile = resolve_profile(input, style, config);
    debug!("Converting with the {} style profile", profile);

    let outcome = srt_to_ass(&content, profile)?;
    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.with_extension("ass"));

    finish_subtitle(
        input,
        output_path,
        outcome.document,
        outcome.fonts,
        outcome.warnings,
        config,
    )
}

/// Rescale an ASS file's styles for muxing.
///
/// Without an output path the file is rewritten in place.
pub fn rescale_subtitle(
    input: &Path,
    output: Option<&Path>,
    config: &Config,
) -> Result<PipelineOutcome> {
    let content = read_input(input)?;

    let outcome = rescale_ass(&content);
    if !outcome.changed {
        warn!(
            "{} has no usable style section or events; leaving it untouched",
            input.display()
        );
    }

    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.to_path_buf());

    finish_subtitle(
        input,
        output_path,
        outcome.document,
        outcome.fonts,
        outcome.warnings,
        config,
    )
}

/// Pick the transform from the input's extension: `.srt` converts, `.ass`
/// rescales. Anything else is unsupported.
pub fn process_subtitle(
    input: &Path,
    output: Option<&Path>,
    style: Option<StyleProfile>,
    config: &Config,
) -> Result<PipelineOutcome> {
    let extension = input
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "srt" => convert_subtitle(input, output, style, config),
        "ass" => rescale_subtitle(input, output, config),
        other => Err(EpisubError::UnsupportedFormat(format!(
            "{} (expected .srt or .ass)",
            other
        ))),
    }
}

fn read_input(input: &Path) -> Result<String> {
    if !input.exists() {
        return Err(EpisubError::FileNotFound(input.display().to_string()));
    }
    Ok(fs::read_to_string(input)?)
}

fn finish_subtitle(
    input: &Path,
    output_path: PathBuf,
    document: String,
    fonts: Vec<String>,
    warnings: Vec<String>,
    config: &Config,
) -> Result<PipelineOutcome> {
    for warning in &warnings {
        warn!("{}: {}", input.display(), warning);
    }

    fs::write(&output_path, &document)?;
    info!("Wrote {}", output_path.display());

    let font_list_path = if config.write_font_list && !fonts.is_empty() {
        let path = output_path.with_extension("fonts.txt");
        fs::write(&path, format!("{}\n", fonts.join("\n")))?;
        debug!("Wrote font list {}", path.display());
        Some(path)
    } else {
        None
    };

    Ok(PipelineOutcome {
        output_path,
        font_list_path,
        fonts,
        warnings,
    })
}

fn resolve_profile(input: &Path, style: Option<StyleProfile>, config: &Config) -> StyleProfile {
    if let Some(style) = style {
        return style;
    }

    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    match StyleProfile::for_source_id(&file_name) {
        StyleProfile::Thai => StyleProfile::Thai,
        StyleProfile::Latin => config.default_style,
    }
}

/// Raw chapter marks as found in the platform metadata dump.
#[derive(Debug, Deserialize)]
struct RawChapterMark {
    start: f64,
    end: f64,
    title: String,
}

/// Synthesize an OGM chapter file from a JSON array of raw marks.
///
/// Returns `Ok(None)` when the source has no chapter marks at all; nothing
/// is written in that case and the caller should mux without chapters.
pub fn process_chapters(
    input: &Path,
    output: Option<&Path>,
    total_duration: f64,
) -> Result<Option<PipelineOutcome>> {
    let content = read_input(input)?;

    let raw: Vec<RawChapterMark> = serde_json::from_str(&content)?;
    let marks: Vec<ChapterMark> = raw
        .into_iter()
        .map(|m| ChapterMark {
            start: m.start,
            end: m.end,
            title: m.title,
        })
        .collect();

    let Some(outcome) = chapter::synthesize(marks, total_duration)? else {
        info!("{} has no chapter marks; skipping", input.display());
        return Ok(None);
    };

    for warning in &outcome.warnings {
        warn!("{}: {}", input.display(), warning);
    }

    let rendered = chapter::render_ogm(&outcome.chapters)?;
    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.with_extension("chapters.txt"));
    fs::write(&output_path, rendered)?;
    info!(
        "Wrote {} chapters to {}",
        outcome.chapters.len(),
        output_path.display()
    );

    Ok(Some(PipelineOutcome {
        output_path,
        font_list_path: None,
        fonts: Vec::new(),
        warnings: outcome.warnings,
    }))
}
