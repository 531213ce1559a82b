//! Frame-boundary gap filling.
//!
//! Cut points produced by the upstream segmenter land on frame boundaries,
//! which leaves short silent holes between consecutive events. When the hole
//! matches a 3-frame interval at one of the two common film rates, the
//! earlier event is extended to meet the next one.

/// A timed event carrying an arbitrary payload.
///
/// Sequences handed to [`close_frame_gaps`] must be ordered by `start` with
/// `start <= end` for every event.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedEvent<T> {
    pub start: f64,
    pub end: f64,
    pub payload: T,
}

/// Tolerance for centisecond-precision callers.
pub const CENTI_TOLERANCE: f64 = 0.01;

/// Tolerance for millisecond-precision callers.
pub const MILLI_TOLERANCE: f64 = 0.001;

/// Three frames at 24fps.
const THREE_FRAMES_24: f64 = 0.125;

/// Three frames at 23.976fps (24000/1001).
const THREE_FRAMES_23_976: f64 = 0.125125;

/// Extend each event's `end` to the next event's `start` when the gap
/// between them matches a 3-frame interval within `tolerance`.
///
/// Only the current event's end moves; the following start never does, and
/// each gap is judged on the original boundary pair, so fills never cascade.
/// Zero or one event is returned unchanged.
pub fn close_frame_gaps<T>(mut events: Vec<TimedEvent<T>>, tolerance: f64) -> Vec<TimedEvent<T>> {
    if events.len() < 2 {
        return events;
    }

    for i in 0..events.len() - 1 {
        let gap = events[i + 1].start - events[i].end;
        if is_three_frame_gap(gap, tolerance) {
            events[i].end = events[i + 1].start;
        }
    }

    events
}

fn is_three_frame_gap(gap: f64, tolerance: f64) -> bool {
    (gap - THREE_FRAMES_24).abs() <= tolerance || (gap - THREE_FRAMES_23_976).abs() <= tolerance
}
