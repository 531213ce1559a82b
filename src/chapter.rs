//! Chapter classification and synthesis.
//!
//! The platform only marks a handful of segments per episode (intro, outro,
//! the occasional recap). This module turns that sparse list into a
//! complete, labeled, contiguous chapter track and renders it in the OGM
//! `CHAPTERxx=` convention for muxing.

use crate::error::{EpisubError, Result};
use crate::timecode;

/// A chapter shorter than this that sits right before an intro mark is a
/// scene-detection artifact and is absorbed into the intro.
const INTRO_ABSORB_MAX_SECS: f64 = 2.0;

/// Below this duration an unlabeled segment is sponsor branding.
const BRANDING_MAX_SECS: f64 = 25.0;

/// Between branding and this duration an unlabeled segment is a recap.
const RECAP_MAX_SECS: f64 = 40.0;

/// An intro longer than this is not an opening sequence.
const OPENING_MAX_SECS: f64 = 120.0;

/// Unaccounted runtime up to this long extends the final chapter instead of
/// getting its own.
const TAIL_EXTEND_MAX_SECS: f64 = 10.0;

/// A trailing segment under this long is a next-episode preview.
const PREVIEW_MAX_SECS: f64 = 60.0;

/// Boundaries closer than this count as contiguous.
const GAP_EPSILON_SECS: f64 = 0.001;

/// A raw chapter mark as delivered by the platform metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterMark {
    pub start: f64,
    pub end: f64,
    pub title: String,
}

/// A finished chapter in the synthesized track.
#[derive(Debug, Clone, PartialEq)]
pub struct Chapter {
    pub start: f64,
    pub end: f64,
    pub title: String,
}

/// Result of one synthesis: the complete track plus any warnings.
#[derive(Debug)]
pub struct ChapterOutcome {
    pub chapters: Vec<Chapter>,
    pub warnings: Vec<String>,
}

/// A chapter plus its origin: classified from an input mark, or synthesized
/// to cover a hole or the tail.
struct Labeled {
    chapter: Chapter,
    synthesized: bool,
}

/// Build a complete chapter track from raw marks and the total runtime.
///
/// Returns `Ok(None)` for an empty mark list: a chapter-less source is a
/// defined terminal state, not an error. Negative or inverted mark times
/// are programmer errors and fail the call.
pub fn synthesize(marks: Vec<ChapterMark>, total_duration: f64) -> Result<Option<ChapterOutcome>> {
    for mark in &marks {
        if mark.start < 0.0 || mark.end < mark.start {
            return Err(EpisubError::Chapters(format!(
                "invalid mark {:?}: times must satisfy 0 <= start <= end",
                mark.title
            )));
        }
    }
    if total_duration < 0.0 {
        return Err(EpisubError::Chapters(format!(
            "invalid total duration: {}",
            total_duration
        )));
    }

    if marks.is_empty() {
        return Ok(None);
    }

    let mut warnings = Vec::new();
    let mut marks = marks;

    // A video covered by exactly two back-to-back marks is an episode with
    // a credits roll, whatever the platform called the segments.
    if is_two_part_video(&marks, total_duration) {
        marks[0].title = "Episode".to_string();
        marks[1].title = "Outro".to_string();
    }

    let merged = absorb_short_pre_intro(marks);
    let (mut labeled, mut next_part) = classify(&merged);

    insert_gap_chapters(&mut labeled, &mut next_part);
    handle_tail(&mut labeled, total_duration, &mut next_part, &mut warnings);
    simplify_lone_part(&mut labeled);

    Ok(Some(ChapterOutcome {
        chapters: labeled.into_iter().map(|l| l.chapter).collect(),
        warnings,
    }))
}

fn is_two_part_video(marks: &[ChapterMark], total_duration: f64) -> bool {
    marks.len() == 2
        && (marks[1].start - marks[0].end).abs() <= GAP_EPSILON_SECS
        && (total_duration - marks[1].end).abs() <= TAIL_EXTEND_MAX_SECS
}

/// Merge pass: a sub-2s chapter immediately followed by an `Intro` mark
/// becomes part of that intro. Left-to-right, non-overlapping.
fn absorb_short_pre_intro(marks: Vec<ChapterMark>) -> Vec<ChapterMark> {
    let mut merged = Vec::with_capacity(marks.len());
    let mut i = 0;

    while i < marks.len() {
        let current = &marks[i];
        let is_short = current.end - current.start < INTRO_ABSORB_MAX_SECS;
        let next_is_intro = marks.get(i + 1).is_some_and(|n| n.title == "Intro");

        if is_short && next_is_intro {
            let mut intro = marks[i + 1].clone();
            intro.start = current.start;
            merged.push(intro);
            i += 2;
        } else {
            merged.push(current.clone());
            i += 1;
        }
    }

    merged
}

/// Classify each mark into its final label. The lookahead reads the raw
/// label of the following mark, which has not been renamed yet.
///
/// Returns the labeled chapters and the next free part index.
fn classify(marks: &[ChapterMark]) -> (Vec<Labeled>, usize) {
    let mut labeled = Vec::with_capacity(marks.len());
    let mut next_part = 0;

    for (i, mark) in marks.iter().enumerate() {
        let duration = mark.end - mark.start;
        let next_is_intro = marks.get(i + 1).is_some_and(|n| n.title == "Intro");

        let title = match mark.title.as_str() {
            "Intro" if duration > OPENING_MAX_SECS => take_part_title(&mut next_part),
            "Intro" => "Opening".to_string(),
            "Outro" => "Ending".to_string(),
            // Assigned by the two-mark rule; already final
            "Episode" => "Episode".to_string(),
            _ if duration < BRANDING_MAX_SECS => "Brandings".to_string(),
            _ if duration <= RECAP_MAX_SECS => "Recap".to_string(),
            _ if next_is_intro => "Prologue".to_string(),
            _ => take_part_title(&mut next_part),
        };

        labeled.push(Labeled {
            chapter: Chapter {
                start: mark.start,
                end: mark.end,
                title,
            },
            synthesized: false,
        });
    }

    (labeled, next_part)
}

/// Synthesize a chapter for every hole wider than the contiguity epsilon.
fn insert_gap_chapters(labeled: &mut Vec<Labeled>, next_part: &mut usize) {
    let mut i = 0;
    while i + 1 < labeled.len() {
        let gap_start = labeled[i].chapter.end;
        let gap_end = labeled[i + 1].chapter.start;
        if gap_end - gap_start > GAP_EPSILON_SECS {
            labeled.insert(
                i + 1,
                Labeled {
                    chapter: Chapter {
                        start: gap_start,
                        end: gap_end,
                        title: take_part_title(next_part),
                    },
                    synthesized: true,
                },
            );
            i += 1;
        }
        i += 1;
    }
}

/// Account for runtime past the last mark: short tails extend the final
/// chapter, longer ones become a preview or another part.
fn handle_tail(
    labeled: &mut Vec<Labeled>,
    total_duration: f64,
    next_part: &mut usize,
    warnings: &mut Vec<String>,
) {
    let Some(last) = labeled.last_mut() else {
        return;
    };

    let tail = total_duration - last.chapter.end;
    if tail <= GAP_EPSILON_SECS {
        if -tail > GAP_EPSILON_SECS {
            warnings.push(format!(
                "last chapter ends {:.3}s past the reported duration",
                -tail
            ));
        }
        return;
    }

    if tail <= TAIL_EXTEND_MAX_SECS {
        last.chapter.end = total_duration;
    } else {
        let start = last.chapter.end;
        let title = if tail < PREVIEW_MAX_SECS {
            "Preview".to_string()
        } else {
            take_part_title(next_part)
        };
        labeled.push(Labeled {
            chapter: Chapter {
                start,
                end: total_duration,
                title,
            },
            synthesized: true,
        });
    }
}

/// A single part among the classified chapters is just "the episode".
/// Synthesized gap and tail chapters never suppress the rename; when they
/// are the only parts around, a lone one is renamed instead.
fn simplify_lone_part(labeled: &mut [Labeled]) {
    let part_indices = |synthesized: bool, labeled: &[Labeled]| -> Vec<usize> {
        labeled
            .iter()
            .enumerate()
            .filter(|(_, l)| l.synthesized == synthesized && l.chapter.title.starts_with("Part "))
            .map(|(i, _)| i)
            .collect()
    };

    let classified = part_indices(false, labeled);
    if classified.len() == 1 {
        labeled[classified[0]].chapter.title = "Episode".to_string();
        return;
    }

    if classified.is_empty() {
        let synthesized = part_indices(true, labeled);
        if synthesized.len() == 1 {
            labeled[synthesized[0]].chapter.title = "Episode".to_string();
        }
    }
}

fn take_part_title(next_part: &mut usize) -> String {
    let title = format!("Part {}", part_letter(*next_part));
    *next_part += 1;
    title
}

/// Bijective base-26 letter sequence: 0 is `A`, 25 is `Z`, 26 is `AA`.
pub fn part_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut label = String::new();
    while n > 0 {
        n -= 1;
        label.insert(0, char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }
    label
}

/// Render a synthesized track in the OGM chapter convention.
pub fn render_ogm(chapters: &[Chapter]) -> Result<String> {
    let mut out = String::new();
    for (i, chapter) in chapters.iter().enumerate() {
        let index = i + 1;
        out.push_str(&format!(
            "CHAPTER{:02}={}\n",
            index,
            timecode::format_chapter_timestamp(chapter.start)?
        ));
        out.push_str(&format!("CHAPTER{:02}NAME={}\n", index, chapter.title));
    }
    Ok(out)
}
