//! ASS (Advanced SubStation Alpha) document model.
//!
//! The model is positional: style and event lines are kept as field vectors
//! aligned with their section's `Format:` line, so fields this crate never
//! touches round-trip untouched.

/// Standard V4+ style format fields, used when building a document from
/// scratch.
pub const STYLE_FORMAT: &[&str] = &[
    "Name",
    "Fontname",
    "Fontsize",
    "PrimaryColour",
    "SecondaryColour",
    "OutlineColour",
    "BackColour",
    "Bold",
    "Italic",
    "Underline",
    "StrikeOut",
    "ScaleX",
    "ScaleY",
    "Spacing",
    "Angle",
    "BorderStyle",
    "Outline",
    "Shadow",
    "Alignment",
    "MarginL",
    "MarginR",
    "MarginV",
    "Encoding",
];

/// Standard event format fields.
pub const EVENT_FORMAT: &[&str] = &[
    "Layer", "Start", "End", "Style", "Name", "MarginL", "MarginR", "MarginV", "Effect", "Text",
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssDocument {
    /// Raw `[Script Info]` lines, order and comments preserved.
    pub script_info: Vec<String>,
    /// Field names from the `Format:` line of `[V4+ Styles]`.
    pub styles_format: Vec<String>,
    pub styles: Vec<AssStyle>,
    /// Field names from the `Format:` line of `[Events]`.
    pub events_format: Vec<String>,
    pub events: Vec<AssEvent>,
}

/// One `Style:` line, values aligned with the document's style format.
#[derive(Debug, Clone, PartialEq)]
pub struct AssStyle {
    pub values: Vec<String>,
}

/// One `Dialogue:` or `Comment:` line, values aligned with the document's
/// event format. The final `Text` field keeps its embedded commas.
#[derive(Debug, Clone, PartialEq)]
pub struct AssEvent {
    pub kind: String,
    pub values: Vec<String>,
}

/// Position of a field name within a `Format:` line, case-insensitive.
pub fn field_index(format: &[String], name: &str) -> Option<usize> {
    format.iter().position(|f| f.eq_ignore_ascii_case(name))
}

impl AssStyle {
    pub fn get<'a>(&'a self, format: &[String], field: &str) -> Option<&'a str> {
        field_index(format, field).and_then(|i| self.values.get(i).map(String::as_str))
    }

    pub fn set(&mut self, format: &[String], field: &str, value: String) {
        if let Some(i) = field_index(format, field) {
            if i < self.values.len() {
                self.values[i] = value;
            }
        }
    }
}

impl AssEvent {
    pub fn get<'a>(&'a self, format: &[String], field: &str) -> Option<&'a str> {
        field_index(format, field).and_then(|i| self.values.get(i).map(String::as_str))
    }

    pub fn set(&mut self, format: &[String], field: &str, value: String) {
        if let Some(i) = field_index(format, field) {
            if i < self.values.len() {
                self.values[i] = value;
            }
        }
    }
}

impl AssDocument {
    /// Look up a `Key: Value` entry in the `[Script Info]` section.
    pub fn info_value(&self, key: &str) -> Option<&str> {
        self.script_info.iter().find_map(|line| {
            let (k, v) = line.split_once(':')?;
            if k.trim().eq_ignore_ascii_case(key) {
                Some(v.trim())
            } else {
                None
            }
        })
    }

    pub fn play_res_x(&self) -> Option<f64> {
        self.info_value("PlayResX").and_then(|v| v.parse().ok())
    }

    pub fn play_res_y(&self) -> Option<f64> {
        self.info_value("PlayResY").and_then(|v| v.parse().ok())
    }

    /// Serialize back to ASS text.
    pub fn render(&self) -> String {
        let mut out = String::from("[Script Info]\n");
        for line in &self.script_info {
            out.push_str(line);
            out.push('\n');
        }

        out.push_str("\n[V4+ Styles]\n");
        out.push_str("Format: ");
        out.push_str(&self.styles_format.join(", "));
        out.push('\n');
        for style in &self.styles {
            out.push_str("Style: ");
            out.push_str(&style.values.join(","));
            out.push('\n');
        }

        out.push_str("\n[Events]\n");
        out.push_str("Format: ");
        out.push_str(&self.events_format.join(", "));
        out.push('\n');
        for event in &self.events {
            out.push_str(&event.kind);
            out.push_str(": ");
            out.push_str(&event.values.join(","));
            out.push('\n');
        }

        out
    }
}

#[derive(PartialEq)]
enum Section {
    None,
    ScriptInfo,
    Styles,
    Events,
    Other,
}

/// Parse an ASS document.
///
/// Returns `None` when the text has no usable style section or no events;
/// callers treat that as "leave the document alone", not as an error.
pub fn parse(content: &str) -> Option<AssDocument> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut doc = AssDocument::default();
    let mut section = Section::None;

    for line in content.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with('[') {
            section = match trimmed.to_ascii_lowercase().as_str() {
                "[script info]" => Section::ScriptInfo,
                "[v4+ styles]" | "[v4 styles]" => Section::Styles,
                "[events]" => Section::Events,
                _ => Section::Other,
            };
            continue;
        }

        match section {
            Section::ScriptInfo => {
                if !trimmed.is_empty() {
                    doc.script_info.push(line.to_string());
                }
            }
            Section::Styles => {
                if let Some(rest) = strip_line_prefix(trimmed, "Format:") {
                    doc.styles_format = split_format(rest);
                } else if let Some(rest) = strip_line_prefix(trimmed, "Style:") {
                    let values: Vec<String> =
                        rest.split(',').map(|v| v.trim().to_string()).collect();
                    // A style line that disagrees with the format is unusable
                    if values.len() == doc.styles_format.len() && !doc.styles_format.is_empty() {
                        doc.styles.push(AssStyle { values });
                    }
                }
            }
            Section::Events => {
                if let Some(rest) = strip_line_prefix(trimmed, "Format:") {
                    doc.events_format = split_format(rest);
                } else if !doc.events_format.is_empty() {
                    for kind in ["Dialogue", "Comment"] {
                        let prefix = format!("{}:", kind);
                        if let Some(rest) = strip_line_prefix(trimmed, &prefix) {
                            let n = doc.events_format.len();
                            let mut values: Vec<String> =
                                rest.splitn(n, ',').map(|v| v.to_string()).collect();
                            // Non-text fields are comma-free; normalize them
                            for v in values.iter_mut().take(n.saturating_sub(1)) {
                                *v = v.trim().to_string();
                            }
                            if values.len() == n {
                                doc.events.push(AssEvent {
                                    kind: kind.to_string(),
                                    values,
                                });
                            }
                            break;
                        }
                    }
                }
            }
            Section::None | Section::Other => {}
        }
    }

    if doc.styles.is_empty() || doc.events.is_empty() {
        return None;
    }

    Some(doc)
}

fn strip_line_prefix<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let head = line.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(line[prefix.len()..].trim_start())
    } else {
        None
    }
}

fn split_format(rest: &str) -> Vec<String> {
    rest.split(',').map(|f| f.trim().to_string()).collect()
}
