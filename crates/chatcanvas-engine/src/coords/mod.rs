//! Size types shared by the surface configurator and the runtime.
//!
//! All sizes are in device (physical) pixels.

mod viewport;

pub use viewport::ViewportSize;
