// SRT subtitle parsing
use crate::timecode;

/// A single SRT cue. The sequence number from the source file is not kept:
/// downstream formats have no use for it.
#[derive(Debug, Clone, PartialEq)]
pub struct SrtCue {
    pub start: f64,
    pub end: f64,
    /// Cue text with literal newlines between source lines.
    pub text: String,
}

/// Parse result: the cues that survived plus one warning per skipped block.
#[derive(Debug, Default)]
pub struct SrtDocument {
    pub cues: Vec<SrtCue>,
    pub warnings: Vec<String>,
}

/// Parse a complete SRT document.
///
/// A cue block is an index line, a `start --> end` line and one or more text
/// lines, separated by blank lines. The final block may end at EOF without a
/// trailing blank line. Malformed blocks are skipped and reported as
/// warnings; they never fail the document.
pub fn parse(content: &str) -> SrtDocument {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let lines: Vec<&str> = content.lines().collect();

    let mut doc = SrtDocument::default();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].trim().is_empty() {
            i += 1;
            continue;
        }

        let block_start = i;

        // Index line; tolerate blocks that jump straight to the timing line.
        let mut j = i;
        if lines[j].trim().parse::<usize>().is_ok() {
            j += 1;
        }

        let timing = match lines.get(j).map(|l| parse_timing_line(l)) {
            Some(Ok(timing)) => timing,
            Some(Err(reason)) => {
                doc.warnings.push(format!(
                    "skipping malformed cue block at line {}: {}",
                    block_start + 1,
                    reason
                ));
                i = skip_block(&lines, j);
                continue;
            }
            None => break,
        };
        j += 1;

        let text_start = j;
        while j < lines.len() && !lines[j].trim().is_empty() {
            j += 1;
        }

        if text_start == j {
            doc.warnings.push(format!(
                "skipping cue block at line {}: no text lines",
                block_start + 1
            ));
        } else {
            doc.cues.push(SrtCue {
                start: timing.0,
                end: timing.1,
                text: lines[text_start..j].join("\n"),
            });
        }

        i = j;
    }

    doc
}

fn parse_timing_line(line: &str) -> Result<(f64, f64), String> {
    let (start_raw, end_raw) = line
        .split_once("-->")
        .ok_or_else(|| format!("expected a timing line, got {:?}", line.trim()))?;

    let start = timecode::parse_srt_timestamp(start_raw).map_err(|e| e.to_string())?;
    let end = timecode::parse_srt_timestamp(end_raw).map_err(|e| e.to_string())?;

    if end < start {
        return Err(format!("cue ends before it starts: {}", line.trim()));
    }

    Ok((start, end))
}

fn skip_block(lines: &[&str], from: usize) -> usize {
    let mut i = from;
    while i < lines.len() && !lines[i].trim().is_empty() {
        i += 1;
    }
    i
}
