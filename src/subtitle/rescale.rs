//! ASS style rescaling.
//!
//! Platform-sourced ASS tracks are authored for a larger canvas than the
//! muxed output uses, so every size-ish attribute is scaled down by a fixed
//! factor. Along the way the document is tidied: unused styles are pruned,
//! the outline colour is normalized to black, and dialogue margins are
//! recomputed from the script resolution.

use super::ass::{self, AssDocument};
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Fixed factor applied to font sizes, outline widths and shadow depths.
pub const STYLE_SCALE: f64 = 0.8;

/// Horizontal margins as a share of PlayResX.
const MARGIN_H_RATIO: f64 = 0.08;

/// Vertical margin as a share of PlayResY.
const MARGIN_V_RATIO: f64 = 0.06;

const OUTLINE_BLACK: &str = "&H00000000";

/// Result of one rescale: the rewritten document, every font the document
/// still references, and any warnings. `changed` is false when the input
/// had no usable style section or no events and was returned as-is.
#[derive(Debug)]
pub struct RescaleOutcome {
    pub document: String,
    pub fonts: Vec<String>,
    pub warnings: Vec<String>,
    pub changed: bool,
}

/// Rescale an ASS document's styles and inline overrides.
pub fn rescale_ass(content: &str) -> RescaleOutcome {
    let Some(mut doc) = ass::parse(content) else {
        return RescaleOutcome {
            document: content.to_string(),
            fonts: Vec::new(),
            warnings: Vec::new(),
            changed: false,
        };
    };

    let mut warnings = Vec::new();

    rescale_styles(&mut doc);

    // Cues pointing at a style the document never defines cannot survive
    // pruning; drop them and say so.
    let defined: Vec<String> = doc
        .styles
        .iter()
        .filter_map(|s| s.get(&doc.styles_format, "Name").map(str::to_string))
        .collect();
    let events_format = doc.events_format.clone();
    doc.events.retain(|event| {
        let style = event.get(&events_format, "Style").unwrap_or("");
        if defined.iter().any(|name| name == style) {
            true
        } else {
            warnings.push(format!(
                "dropping {} line with unresolved style reference {:?}",
                event.kind.to_lowercase(),
                style
            ));
            false
        }
    });

    let mut inline_fonts = Vec::new();
    for event in &mut doc.events {
        if let Some(text) = event.get(&events_format, "Text") {
            let scaled = scale_inline_overrides(text);
            for font in collect_inline_fonts(&scaled) {
                push_unique(&mut inline_fonts, font);
            }
            event.set(&events_format, "Text", scaled);
        }
    }

    // Prune styles nothing references, before serialization
    let referenced: Vec<String> = doc
        .events
        .iter()
        .filter_map(|e| e.get(&events_format, "Style").map(str::to_string))
        .collect();
    let styles_format = doc.styles_format.clone();
    doc.styles.retain(|style| {
        let name = style.get(&styles_format, "Name").unwrap_or("");
        referenced.iter().any(|r| r == name)
    });

    let mut fonts = Vec::new();
    for style in &doc.styles {
        let family = style.get(&styles_format, "Fontname").unwrap_or("");
        let bold = flag_set(style.get(&styles_format, "Bold"));
        let italic = flag_set(style.get(&styles_format, "Italic"));
        push_unique(&mut fonts, font_key(family, bold, italic));
    }
    for font in inline_fonts {
        push_unique(&mut fonts, font);
    }

    RescaleOutcome {
        document: doc.render(),
        fonts,
        warnings,
        changed: true,
    }
}

fn rescale_styles(doc: &mut AssDocument) {
    let format = doc.styles_format.clone();
    let res_x = doc.play_res_x();
    let res_y = doc.play_res_y();

    for style in &mut doc.styles {
        for field in ["Fontsize", "Outline", "Shadow"] {
            if let Some(value) = style.get(&format, field).and_then(|v| v.parse::<f64>().ok()) {
                style.set(&format, field, format_scaled(scale(value)));
            }
        }

        style.set(&format, "OutlineColour", OUTLINE_BLACK.to_string());

        // Hyphenated names mark positioned sign styles whose margins are
        // authored deliberately; everything else gets resolution-derived
        // margins.
        let plain_name = !style.get(&format, "Name").unwrap_or("").contains('-');
        if plain_name {
            if let (Some(x), Some(y)) = (res_x, res_y) {
                let horizontal = (x * MARGIN_H_RATIO).floor() as i64;
                let vertical = (y * MARGIN_V_RATIO).floor() as i64;
                style.set(&format, "MarginL", horizontal.to_string());
                style.set(&format, "MarginR", horizontal.to_string());
                style.set(&format, "MarginV", vertical.to_string());
            }
        }
    }
}

/// Scale and round to two decimal places.
fn scale(value: f64) -> f64 {
    (value * STYLE_SCALE * 100.0).round() / 100.0
}

/// Integral values print without a fractional part, everything else keeps
/// its rounded decimal form.
fn format_scaled(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

fn override_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"\\(fs|bord|shad)(\d+(?:\.\d+)?)").expect("override regex"))
}

fn font_override_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"\\fn([^\\}]+)").expect("font override regex"))
}

/// Scale `\fs`, `\bord` and `\shad` override values embedded in cue text,
/// independent of the style-level pass.
fn scale_inline_overrides(text: &str) -> String {
    override_regex()
        .replace_all(text, |caps: &Captures| match caps[2].parse::<f64>() {
            Ok(value) => format!("\\{}{}", &caps[1], format_scaled(scale(value))),
            Err(_) => caps[0].to_string(),
        })
        .into_owned()
}

fn collect_inline_fonts(text: &str) -> Vec<String> {
    font_override_regex()
        .captures_iter(text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|f| !f.is_empty())
        .collect()
}

/// Attachment lookups key bold/italic variants by a suffix on the family
/// name.
fn font_key(family: &str, bold: bool, italic: bool) -> String {
    if bold {
        format!("{}::Bold", family)
    } else if italic {
        format!("{}::Italic", family)
    } else {
        family.to_string()
    }
}

fn flag_set(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some("-1") | Some("1"))
}

fn push_unique(fonts: &mut Vec<String>, font: String) {
    if !fonts.contains(&font) {
        fonts.push(font);
    }
}
