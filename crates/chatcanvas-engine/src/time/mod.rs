//! Frame pacing.
//!
//! The host's natural cadence is used unless a fixed frame rate is set, in
//! which case [`FramePacer`] decides when the next redraw is due. Desktop only;
//! the browser always redraws on animation frames.

mod frame_pacer;

pub use frame_pacer::{FramePacer, Pace};
