//! Timecode conversion between seconds and the three textual forms used by
//! the pipeline: SRT (`HH:MM:SS,mmm`), ASS (`H:MM:SS.cc`) and OGM chapter
//! files (`HH:MM:SS.mmm`).

use crate::error::{EpisubError, Result};

/// Parse an SRT timestamp (`HH:MM:SS,mmm`) into seconds.
pub fn parse_srt_timestamp(raw: &str) -> Result<f64> {
    parse_timestamp(raw, ',')
}

/// Format seconds as an SRT timestamp (`HH:MM:SS,mmm`).
pub fn format_srt_timestamp(seconds: f64) -> Result<String> {
    let total_millis = to_subunits(seconds, 1000.0)?;
    let (hours, minutes, secs, millis) = decompose(total_millis, 1000);
    Ok(format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis))
}

/// Parse an ASS timestamp (`H:MM:SS.cc`) into seconds.
///
/// A missing fractional part is accepted and defaults to zero.
pub fn parse_ass_timestamp(raw: &str) -> Result<f64> {
    parse_timestamp(raw, '.')
}

/// Format seconds as an ASS timestamp (`H:MM:SS.cc`, centisecond precision,
/// no leading zero on the hour field).
pub fn format_ass_timestamp(seconds: f64) -> Result<String> {
    let total_centis = to_subunits(seconds, 100.0)?;
    let (hours, minutes, secs, centis) = decompose(total_centis, 100);
    Ok(format!("{}:{:02}:{:02}.{:02}", hours, minutes, secs, centis))
}

/// Parse an OGM chapter timestamp (`HH:MM:SS.mmm`) into seconds.
pub fn parse_chapter_timestamp(raw: &str) -> Result<f64> {
    parse_timestamp(raw, '.')
}

/// Format seconds as an OGM chapter timestamp (`HH:MM:SS.mmm`).
pub fn format_chapter_timestamp(seconds: f64) -> Result<String> {
    let total_millis = to_subunits(seconds, 1000.0)?;
    let (hours, minutes, secs, millis) = decompose(total_millis, 1000);
    Ok(format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, millis))
}

/// Convert seconds into whole sub-second units, rejecting negative input.
fn to_subunits(seconds: f64, per_second: f64) -> Result<u64> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(EpisubError::InvalidTimecode(format!(
            "cannot format negative or non-finite seconds: {}",
            seconds
        )));
    }
    Ok((seconds * per_second).round() as u64)
}

fn decompose(total: u64, per_second: u64) -> (u64, u64, u64, u64) {
    let frac = total % per_second;
    let total_secs = total / per_second;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;
    (hours, minutes, secs, frac)
}

/// Parse `H:MM:SS<sep>frac` into seconds. The fractional part is optional
/// and interpreted by digit count, so both `.5` and `.500` mean half a
/// second.
fn parse_timestamp(raw: &str, frac_sep: char) -> Result<f64> {
    let raw = raw.trim();
    let invalid = || EpisubError::InvalidTimecode(format!("malformed timestamp: {:?}", raw));

    let (clock, frac) = match raw.split_once(frac_sep) {
        Some((clock, frac)) => (clock, Some(frac)),
        None => (raw, None),
    };

    let mut fields = clock.split(':');
    let hours: u64 = parse_field(fields.next(), raw)?;
    let minutes: u64 = parse_field(fields.next(), raw)?;
    let seconds: u64 = parse_field(fields.next(), raw)?;
    if fields.next().is_some() {
        return Err(invalid());
    }
    if minutes >= 60 || seconds >= 60 {
        return Err(invalid());
    }

    let frac_seconds = match frac {
        None => 0.0,
        Some(digits) if digits.is_empty() => 0.0,
        Some(digits) => {
            let value: u64 = digits.parse().map_err(|_| invalid())?;
            value as f64 / 10_f64.powi(digits.len() as i32)
        }
    };

    Ok((hours * 3600 + minutes * 60 + seconds) as f64 + frac_seconds)
}

fn parse_field(field: Option<&str>, raw: &str) -> Result<u64> {
    field
        .and_then(|f| f.parse().ok())
        .ok_or_else(|| EpisubError::InvalidTimecode(format!("malformed timestamp: {:?}", raw)))
}
