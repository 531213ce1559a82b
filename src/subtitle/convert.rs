//! SRT to ASS conversion.
//!
//! Rewrites plain-text cues into a styled document with a single embedded
//! style, translating the small set of inline HTML-ish tags SRT allows into
//! ASS override codes.

use super::ass::{AssDocument, AssEvent, AssStyle, EVENT_FORMAT, STYLE_FORMAT};
use super::gapfill::{close_frame_gaps, TimedEvent, CENTI_TOLERANCE};
use super::srt;
use crate::config::StyleProfile;
use crate::error::Result;
use crate::timecode;
use regex::Regex;
use std::sync::OnceLock;

/// Result of one conversion: the rendered document, the fonts it references
/// and any warnings produced while parsing the source.
#[derive(Debug)]
pub struct ConvertOutcome {
    pub document: String,
    pub fonts: Vec<String>,
    pub warnings: Vec<String>,
}

/// Convert a complete SRT document into a styled ASS document.
///
/// A source with zero parseable cues still yields a valid header with an
/// empty event body; deciding whether that is useful is the caller's call.
pub fn srt_to_ass(content: &str, profile: StyleProfile) -> Result<ConvertOutcome> {
    let parsed = srt::parse(content);

    let events: Vec<TimedEvent<String>> = parsed
        .cues
        .into_iter()
        .map(|cue| TimedEvent {
            start: cue.start,
            end: cue.end,
            payload: convert_inline_markup(&cue.text),
        })
        .collect();

    let events = close_frame_gaps(events, CENTI_TOLERANCE);

    let mut doc = AssDocument {
        script_info: script_info_lines(),
        styles_format: STYLE_FORMAT.iter().map(|f| f.to_string()).collect(),
        styles: vec![AssStyle {
            values: style_values(profile),
        }],
        events_format: EVENT_FORMAT.iter().map(|f| f.to_string()).collect(),
        events: Vec::new(),
    };

    for event in events {
        doc.events.push(AssEvent {
            kind: "Dialogue".to_string(),
            values: vec![
                "0".to_string(),
                timecode::format_ass_timestamp(event.start)?,
                timecode::format_ass_timestamp(event.end)?,
                "Default".to_string(),
                String::new(),
                "0".to_string(),
                "0".to_string(),
                "0".to_string(),
                String::new(),
                event.payload,
            ],
        });
    }

    Ok(ConvertOutcome {
        document: doc.render(),
        fonts: vec![base_font(profile).to_string()],
        warnings: parsed.warnings,
    })
}

/// Base font family of a profile's embedded style.
pub fn base_font(profile: StyleProfile) -> &'static str {
    match profile {
        StyleProfile::Latin => "Trebuchet MS",
        StyleProfile::Thai => "Loma",
    }
}

fn script_info_lines() -> Vec<String> {
    [
        "ScriptType: v4.00+",
        "WrapStyle: 0",
        "PlayResX: 640",
        "PlayResY: 360",
        "ScaledBorderAndShadow: yes",
    ]
    .iter()
    .map(|l| l.to_string())
    .collect()
}

fn style_values(profile: StyleProfile) -> Vec<String> {
    let (fontname, fontsize, encoding) = match profile {
        StyleProfile::Latin => ("Trebuchet MS", "24", "1"),
        // 222 is the legacy Thai charset id
        StyleProfile::Thai => ("Loma", "26", "222"),
    };

    [
        "Default", fontname, fontsize, "&H00FFFFFF", "&H000000FF", "&H00000000", "&H00000000",
        "0", "0", "0", "0", "100", "100", "0", "0", "1", "1.5", "0", "2", "20", "20", "22",
        encoding,
    ]
    .iter()
    .map(|v| v.to_string())
    .collect()
}

fn unknown_tag_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag regex"))
}

/// Translate inline SRT markup into ASS override codes.
///
/// `<i>`, `<b>` and `<u>` pairs map to their override counterparts; any
/// other angle-bracket tag is dropped. Literal newlines become the forced
/// line break token.
fn convert_inline_markup(text: &str) -> String {
    let mut out = text.to_string();

    for (tag, code) in [
        ("<i>", r"{\i1}"),
        ("</i>", r"{\i0}"),
        ("<b>", r"{\b1}"),
        ("</b>", r"{\b0}"),
        ("<u>", r"{\u1}"),
        ("</u>", r"{\u0}"),
    ] {
        out = out.replace(tag, code);
    }

    let out = unknown_tag_regex().replace_all(&out, "");

    out.replace('\n', "\\N ")
}
