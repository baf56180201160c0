use std::collections::{BTreeMap, BTreeSet};

use super::{
    apply_resolved, negotiate_features, negotiate_limits, FeatureId, LimitId, LimitSet, Resolved,
    UnsatisfiableConstraint,
};

/// What the application asks of the device.
#[derive(Debug, Clone)]
pub struct CapabilityWants {
    pub required_features: BTreeSet<FeatureId>,
    pub desired_features: BTreeSet<FeatureId>,
    pub required_limits: LimitSet,
    pub desired_limits: LimitSet,

    /// Limits used for every entry that resolves to "unconstrained".
    pub base_limits: wgpu::Limits,
}

impl Default for CapabilityWants {
    /// A widget surface needs nothing optional; it only asks for large textures
    /// when the adapter has them.
    fn default() -> Self {
        Self {
            required_features: BTreeSet::new(),
            desired_features: BTreeSet::new(),
            required_limits: LimitSet::new(),
            desired_limits: LimitSet::from([(LimitId::MaxTextureDimension2D, 8192)]),
            base_limits: wgpu::Limits::default(),
        }
    }
}

/// The accepted capability set, produced once per device negotiation.
#[derive(Debug, Clone)]
pub struct NegotiatedCapabilities {
    features: BTreeSet<FeatureId>,
    dropped_features: BTreeSet<FeatureId>,
    limits: BTreeMap<LimitId, Resolved>,
    device_limits: wgpu::Limits,
}

impl NegotiatedCapabilities {
    /// Runs feature and limit negotiation against what the adapter reported.
    pub fn negotiate(
        available_features: wgpu::Features,
        available_limits: &wgpu::Limits,
        wants: &CapabilityWants,
    ) -> Result<Self, UnsatisfiableConstraint> {
        let available = FeatureId::collect(available_features);
        let features = negotiate_features(
            &available,
            &wants.required_features,
            &wants.desired_features,
        )?;
        let limits = negotiate_limits(
            available_limits,
            &wants.required_limits,
            &wants.desired_limits,
        )?;
        let device_limits = apply_resolved(&wants.base_limits, &limits);

        Ok(Self {
            features: features.accepted,
            dropped_features: features.dropped,
            limits,
            device_limits,
        })
    }

    pub fn features(&self) -> &BTreeSet<FeatureId> {
        &self.features
    }

    pub fn dropped_features(&self) -> &BTreeSet<FeatureId> {
        &self.dropped_features
    }

    pub fn resolved(&self, limit: LimitId) -> Resolved {
        self.limits
            .get(&limit)
            .copied()
            .unwrap_or(Resolved::Unconstrained)
    }

    /// Feature flags for the device descriptor.
    pub fn wgpu_features(&self) -> wgpu::Features {
        FeatureId::to_features(&self.features)
    }

    /// Limits for the device descriptor.
    pub fn wgpu_limits(&self) -> &wgpu::Limits {
        &self.device_limits
    }
}
