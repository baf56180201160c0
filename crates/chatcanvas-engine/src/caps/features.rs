use std::collections::BTreeSet;

use super::UnsatisfiableConstraint;

macro_rules! feature_ids {
    ($($variant:ident => $flag:ident, $name:literal;)*) => {
        /// Canonical identifier for each optional WebGPU feature the engine can negotiate.
        #[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        pub enum FeatureId {
            $($variant,)*
        }

        impl FeatureId {
            pub const ALL: &'static [FeatureId] = &[$(FeatureId::$variant,)*];

            /// WebGPU spelling of the feature.
            pub const fn name(self) -> &'static str {
                match self {
                    $(FeatureId::$variant => $name,)*
                }
            }

            /// The corresponding wgpu flag.
            pub fn flag(self) -> wgpu::Features {
                match self {
                    $(FeatureId::$variant => wgpu::Features::$flag,)*
                }
            }
        }
    };
}

feature_ids! {
    DepthClipControl => DEPTH_CLIP_CONTROL, "depth-clip-control";
    Depth32FloatStencil8 => DEPTH32FLOAT_STENCIL8, "depth32float-stencil8";
    TextureCompressionBc => TEXTURE_COMPRESSION_BC, "texture-compression-bc";
    TextureCompressionBcSliced3d => TEXTURE_COMPRESSION_BC_SLICED_3D, "texture-compression-bc-sliced-3d";
    TextureCompressionEtc2 => TEXTURE_COMPRESSION_ETC2, "texture-compression-etc2";
    TextureCompressionAstc => TEXTURE_COMPRESSION_ASTC, "texture-compression-astc";
    TimestampQuery => TIMESTAMP_QUERY, "timestamp-query";
    IndirectFirstInstance => INDIRECT_FIRST_INSTANCE, "indirect-first-instance";
    ShaderF16 => SHADER_F16, "shader-f16";
    Rg11b10UfloatRenderable => RG11B10UFLOAT_RENDERABLE, "rg11b10ufloat-renderable";
    Bgra8UnormStorage => BGRA8UNORM_STORAGE, "bgra8unorm-storage";
    Float32Filterable => FLOAT32_FILTERABLE, "float32-filterable";
    ClipDistances => CLIP_DISTANCES, "clip-distances";
    DualSourceBlending => DUAL_SOURCE_BLENDING, "dual-source-blending";
}

impl FeatureId {
    /// Every canonical feature contained in `features`.
    pub fn collect(features: wgpu::Features) -> BTreeSet<FeatureId> {
        Self::ALL
            .iter()
            .copied()
            .filter(|id| features.contains(id.flag()))
            .collect()
    }

    /// Folds a feature set back into wgpu flags.
    pub fn to_features<'a>(ids: impl IntoIterator<Item = &'a FeatureId>) -> wgpu::Features {
        ids.into_iter()
            .fold(wgpu::Features::empty(), |acc, id| acc | id.flag())
    }
}

/// Accepted feature set plus the desired features that were dropped.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct FeatureOutcome {
    pub accepted: BTreeSet<FeatureId>,
    pub dropped: BTreeSet<FeatureId>,
}

/// Resolves `required ∪ (desired ∩ available)`.
///
/// A required feature missing from `available` is fatal; a missing desired
/// feature is only noted.
pub fn negotiate_features(
    available: &BTreeSet<FeatureId>,
    required: &BTreeSet<FeatureId>,
    desired: &BTreeSet<FeatureId>,
) -> Result<FeatureOutcome, UnsatisfiableConstraint> {
    let mut outcome = FeatureOutcome::default();

    for &feature in required {
        if !available.contains(&feature) {
            log::error!("required feature {} unavailable, cannot continue", feature.name());
            return Err(UnsatisfiableConstraint::MissingFeature {
                feature: feature.name(),
            });
        }
        log::info!("required feature {} requested", feature.name());
        outcome.accepted.insert(feature);
    }

    for &feature in desired {
        if available.contains(&feature) {
            log::info!("desired feature {} requested", feature.name());
            outcome.accepted.insert(feature);
        } else {
            log::info!("desired feature {} unavailable, continuing without it", feature.name());
            outcome.dropped.insert(feature);
        }
    }

    Ok(outcome)
}
