//! Integration tests for episub
//!
//! These tests validate the integration between components working on
//! realistic documents, without touching the network or external tools.

use episub::chapter::{self, Chapter, ChapterMark};
use episub::config::{Config, StyleProfile};
use episub::subtitle::{
    ass, close_frame_gaps, rescale_ass, srt_to_ass, TimedEvent, CENTI_TOLERANCE, MILLI_TOLERANCE,
};
use episub::timecode;

// ============================================================================
// Timecode Integration Tests
// ============================================================================

mod timecode_tests {
    use super::*;

    #[test]
    fn test_srt_round_trip_within_a_millisecond() {
        for &x in &[0.0, 0.4321, 61.061, 3599.999, 7265.5] {
            let text = timecode::format_srt_timestamp(x).unwrap();
            let back = timecode::parse_srt_timestamp(&text).unwrap();
            assert!((back - x).abs() <= 0.001, "{} -> {} -> {}", x, text, back);
        }
    }

    #[test]
    fn test_ass_round_trip_within_a_centisecond() {
        for &x in &[0.0, 0.4321, 61.061, 3599.999, 7265.5] {
            let text = timecode::format_ass_timestamp(x).unwrap();
            let back = timecode::parse_ass_timestamp(&text).unwrap();
            assert!((back - x).abs() <= 0.01, "{} -> {} -> {}", x, text, back);
        }
    }

    #[test]
    fn test_formats_disagree_only_in_convention() {
        assert_eq!(timecode::format_srt_timestamp(90.5).unwrap(), "00:01:30,500");
        assert_eq!(timecode::format_ass_timestamp(90.5).unwrap(), "0:01:30.50");
        assert_eq!(
            timecode::format_chapter_timestamp(90.5).unwrap(),
            "00:01:30.500"
        );
    }
}

// ============================================================================
// Gap Filler Integration Tests
// ============================================================================

mod gapfill_tests {
    use super::*;

    fn events() -> Vec<TimedEvent<&'static str>> {
        vec![
            TimedEvent {
                start: 0.0,
                end: 1.9,
                payload: "a",
            },
            TimedEvent {
                start: 2.025,
                end: 3.0,
                payload: "b",
            },
        ]
    }

    #[test]
    fn test_frame_gap_closed_at_centisecond_tolerance() {
        let filled = close_frame_gaps(events(), CENTI_TOLERANCE);
        assert_eq!(filled[0].end, 2.025);
    }

    #[test]
    fn test_same_gap_rejected_at_millisecond_tolerance() {
        // 0.125s gap matches exactly, but the cues above sit at 2.025
        // which is 24fps-aligned; millisecond callers still accept it
        let filled = close_frame_gaps(events(), MILLI_TOLERANCE);
        assert_eq!(filled[0].end, 2.025);

        // A gap 5ms off the frame interval is out of reach for millisecond
        // callers but fine for centisecond ones
        let skewed = vec![
            TimedEvent {
                start: 0.0,
                end: 1.9,
                payload: "a",
            },
            TimedEvent {
                start: 2.03,
                end: 3.0,
                payload: "b",
            },
        ];
        let filled = close_frame_gaps(skewed.clone(), MILLI_TOLERANCE);
        assert_eq!(filled[0].end, 1.9);
        let filled = close_frame_gaps(skewed, CENTI_TOLERANCE);
        assert_eq!(filled[0].end, 2.03);
    }

    #[test]
    fn test_fill_is_idempotent_across_runs() {
        let once = close_frame_gaps(events(), CENTI_TOLERANCE);
        let twice = close_frame_gaps(once.clone(), CENTI_TOLERANCE);
        assert_eq!(once, twice);
    }
}

// ============================================================================
// SRT to ASS Conversion Tests
// ============================================================================

mod conversion_tests {
    use super::*;

    const SOURCE: &str = "1\n00:00:01,500 --> 00:00:04,000\n<i>Hello</i>\nWorld\n\n2\n00:00:04,500 --> 00:00:07,000\nPlain text\n";

    #[test]
    fn test_conversion_produces_parseable_document() {
        let outcome = srt_to_ass(SOURCE, StyleProfile::Latin).unwrap();

        let doc = ass::parse(&outcome.document).unwrap();
        assert_eq!(doc.styles.len(), 1);
        assert_eq!(doc.events.len(), 2);
        assert_eq!(doc.play_res_x(), Some(640.0));
        assert_eq!(doc.play_res_y(), Some(360.0));
    }

    #[test]
    fn test_markup_and_line_breaks_translated() {
        let outcome = srt_to_ass(SOURCE, StyleProfile::Latin).unwrap();

        let doc = ass::parse(&outcome.document).unwrap();
        assert_eq!(
            doc.events[0].get(&doc.events_format, "Text"),
            Some("{\\i1}Hello{\\i0}\\N World")
        );
    }

    #[test]
    fn test_exactly_one_font_reported() {
        let outcome = srt_to_ass(SOURCE, StyleProfile::Latin).unwrap();
        assert_eq!(outcome.fonts, vec!["Trebuchet MS".to_string()]);

        let outcome = srt_to_ass(SOURCE, StyleProfile::Thai).unwrap();
        assert_eq!(outcome.fonts, vec!["Loma".to_string()]);
    }

    #[test]
    fn test_timecodes_rewritten_in_ass_convention() {
        let outcome = srt_to_ass(SOURCE, StyleProfile::Latin).unwrap();

        let doc = ass::parse(&outcome.document).unwrap();
        assert_eq!(
            doc.events[0].get(&doc.events_format, "Start"),
            Some("0:00:01.50")
        );
        assert_eq!(
            doc.events[1].get(&doc.events_format, "End"),
            Some("0:00:07.00")
        );
    }

    #[test]
    fn test_converted_document_survives_rescaling() {
        // Conversion output feeds straight into the rescaler when both
        // transforms are requested
        let converted = srt_to_ass(SOURCE, StyleProfile::Latin).unwrap();
        let rescaled = rescale_ass(&converted.document);

        assert!(rescaled.changed);
        // 24 * 0.8 = 19.2
        assert!(rescaled.document.contains("Style: Default,Trebuchet MS,19.2,"));
        assert_eq!(rescaled.fonts, vec!["Trebuchet MS".to_string()]);
    }
}

// ============================================================================
// Rescaler Integration Tests
// ============================================================================

mod rescale_tests {
    use super::*;

    const DOCUMENT: &str = "\
[Script Info]
ScriptType: v4.00+
PlayResX: 1280
PlayResY: 720

[V4+ Styles]
Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding
Style: Main,Open Sans Semibold,100,&H00FFFFFF,&H000000FF,&H00202020,&H00000000,0,0,0,0,100,100,0,0,1,4.5,1.5,2,30,30,30,1
Style: Main-edge,Open Sans Semibold,80,&H00FFFFFF,&H000000FF,&H00202020,&H00000000,0,-1,0,0,100,100,0,0,1,2,0,8,12,12,12,1
Style: Stale,Arial,44,&H00FFFFFF,&H000000FF,&H00202020,&H00000000,0,0,0,0,100,100,0,0,1,2,0,2,30,30,30,1

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
Dialogue: 0,0:00:01.00,0:00:04.00,Main,,0,0,0,,Regular dialogue
Dialogue: 0,0:00:04.00,0:00:06.00,Main-edge,,0,0,0,,{\\fs60}A sign
";

    #[test]
    fn test_spec_values_rescaled() {
        let outcome = rescale_ass(DOCUMENT);

        // fontsize 100 -> 80, outline 4.5 -> 3.6
        assert!(outcome.document.contains("Style: Main,Open Sans Semibold,80,"));
        assert!(outcome.document.contains(",3.6,1.2,"));
    }

    #[test]
    fn test_margins_follow_resolution() {
        let outcome = rescale_ass(DOCUMENT);
        let doc = ass::parse(&outcome.document).unwrap();

        // floor(1280 * 0.08) = 102, floor(720 * 0.06) = 43
        let main = &doc.styles[0];
        assert_eq!(main.get(&doc.styles_format, "MarginL"), Some("102"));
        assert_eq!(main.get(&doc.styles_format, "MarginV"), Some("43"));

        // Hyphenated names opt out
        let edge = &doc.styles[1];
        assert_eq!(edge.get(&doc.styles_format, "MarginL"), Some("12"));
    }

    #[test]
    fn test_stale_style_pruned_and_fonts_collected() {
        let outcome = rescale_ass(DOCUMENT);

        assert!(!outcome.document.contains("Stale"));
        assert_eq!(
            outcome.fonts,
            vec![
                "Open Sans Semibold".to_string(),
                "Open Sans Semibold::Italic".to_string(),
            ]
        );
    }

    #[test]
    fn test_inline_overrides_follow_style_scale() {
        let outcome = rescale_ass(DOCUMENT);
        assert!(outcome.document.contains("{\\fs48}A sign"));
    }
}

// ============================================================================
// Chapter Synthesis Tests
// ============================================================================

mod chapter_tests {
    use super::*;

    fn mark(start: f64, end: f64, title: &str) -> ChapterMark {
        ChapterMark {
            start,
            end,
            title: title.to_string(),
        }
    }

    #[test]
    fn test_intro_outro_episode_shape() {
        let marks = vec![
            mark(0.0, 88.0, "Intro"),
            mark(88.0, 1330.0, "main"),
            mark(1330.0, 1420.0, "Outro"),
        ];

        let outcome = chapter::synthesize(marks, 1420.0).unwrap().unwrap();
        let titles: Vec<&str> = outcome.chapters.iter().map(|c| c.title.as_str()).collect();

        assert_eq!(titles, vec!["Opening", "Episode", "Ending"]);
    }

    #[test]
    fn test_synthesized_track_is_contiguous_and_rendered_in_order() {
        let marks = vec![
            mark(0.0, 88.0, "Intro"),
            mark(400.0, 1330.0, "main"),
            mark(1330.0, 1400.0, "Outro"),
        ];

        let outcome = chapter::synthesize(marks, 1445.0).unwrap().unwrap();

        // Gap and tail are both covered
        for pair in outcome.chapters.windows(2) {
            assert!((pair[1].start - pair[0].end).abs() <= 0.001);
        }
        assert_eq!(outcome.chapters.last().unwrap().end, 1445.0);

        let rendered = chapter::render_ogm(&outcome.chapters).unwrap();
        let mut expected_index = 1;
        for line in rendered.lines().step_by(2) {
            assert!(line.starts_with(&format!("CHAPTER{:02}=", expected_index)));
            expected_index += 1;
        }
    }

    #[test]
    fn test_render_uses_chapter_timecode_convention() {
        let chapters = vec![Chapter {
            start: 3723.456,
            end: 3800.0,
            title: "Ending".to_string(),
        }];

        let rendered = chapter::render_ogm(&chapters).unwrap();

        assert_eq!(rendered, "CHAPTER01=01:02:03.456\nCHAPTER01NAME=Ending\n");
    }
}

// ============================================================================
// File Pipeline Tests
// ============================================================================

mod pipeline_tests {
    use super::*;
    use episub::pipeline::{convert_subtitle, process_chapters};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_episode_artifacts_end_to_end() {
        let dir = tempdir().unwrap();

        let subtitle = dir.path().join("show.s01e01.en.srt");
        fs::write(
            &subtitle,
            "1\n00:00:01,500 --> 00:00:04,000\n<i>Hello</i>\n\n2\n00:00:04,500 --> 00:00:07,000\nWorld\n",
        )
        .unwrap();

        let marks = dir.path().join("show.s01e01.json");
        fs::write(
            &marks,
            r#"[{"start": 0.0, "end": 88.0, "title": "Intro"}, {"start": 88.0, "end": 1330.0, "title": "main"}, {"start": 1330.0, "end": 1420.0, "title": "Outro"}]"#,
        )
        .unwrap();

        let config = Config::default();
        let subtitle_outcome = convert_subtitle(&subtitle, None, None, &config).unwrap();
        let chapter_outcome = process_chapters(&marks, None, 1420.0).unwrap().unwrap();

        let ass_text = fs::read_to_string(&subtitle_outcome.output_path).unwrap();
        assert!(ass_text.contains("{\\i1}Hello{\\i0}"));

        let chapter_text = fs::read_to_string(&chapter_outcome.output_path).unwrap();
        assert!(chapter_text.starts_with("CHAPTER01=00:00:00.000\nCHAPTER01NAME=Opening\n"));

        let fonts = fs::read_to_string(subtitle_outcome.font_list_path.unwrap()).unwrap();
        assert_eq!(fonts, "Trebuchet MS\n");
    }
}
