/// A hard requirement the adapter cannot meet.
///
/// Every variant names the offending limit or feature so the fatal diagnostic
/// is actionable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnsatisfiableConstraint {
    #[error("required feature {feature} is not available on this adapter")]
    MissingFeature { feature: &'static str },

    #[error("required limit {limit} >= {required} cannot be verified: the adapter reports no ceiling")]
    UnknownCeiling { limit: &'static str, required: u64 },

    #[error("required limit {limit} >= {required} exceeds the adapter maximum of {available}")]
    BelowRequirement {
        limit: &'static str,
        required: u64,
        available: u64,
    },
}

impl UnsatisfiableConstraint {
    /// Name of the limit or feature that failed negotiation.
    pub fn subject(&self) -> &'static str {
        match self {
            Self::MissingFeature { feature } => feature,
            Self::UnknownCeiling { limit, .. } | Self::BelowRequirement { limit, .. } => limit,
        }
    }
}
