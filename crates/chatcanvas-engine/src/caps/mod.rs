//! Capability negotiation.
//!
//! Pure resolution of (available, required, desired) triples for numeric
//! limits and optional features. No GPU access happens here; callers feed in
//! what the adapter reported and hand the result to device creation.

mod error;
mod features;
mod limits;
pub mod names;
mod negotiated;

pub use error::UnsatisfiableConstraint;
pub use features::{negotiate_features, FeatureId, FeatureOutcome};
pub use limits::{
    apply_resolved, negotiate_limits, resolve_limit, CapabilityRequest, Ceiling, LimitId, LimitSet,
    Resolved,
};
pub use negotiated::{CapabilityWants, NegotiatedCapabilities};
