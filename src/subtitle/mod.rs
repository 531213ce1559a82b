pub mod ass;
pub mod convert;
pub mod gapfill;
pub mod rescale;
pub mod srt;

pub use convert::{srt_to_ass, ConvertOutcome};
pub use gapfill::{close_frame_gaps, TimedEvent, CENTI_TOLERANCE, MILLI_TOLERANCE};
pub use rescale::{rescale_ass, RescaleOutcome, STYLE_SCALE};
