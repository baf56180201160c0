use std::collections::BTreeMap;

use super::UnsatisfiableConstraint;

/// Upper bound an adapter reports for a limit.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Ceiling {
    /// The backend reports no usable bound (the "undefined" sentinel).
    Unconstrained,
    Limited(u64),
}

/// The three views of a single numeric limit fed into [`resolve_limit`].
///
/// `required` is a hard floor; `desired` is a soft preference. When both are
/// set, `desired` must not be below `required`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct CapabilityRequest {
    pub available: Ceiling,
    pub required: Option<u64>,
    pub desired: Option<u64>,
}

/// Outcome of resolving one limit.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Resolved {
    /// Do not request a specific value; the base limit stays in effect.
    Unconstrained,
    Value(u64),
}

/// Resolves the value to request for one limit, or the reason it cannot be met.
pub fn resolve_limit(
    limit: LimitId,
    request: CapabilityRequest,
) -> Result<Resolved, UnsatisfiableConstraint> {
    let name = limit.name();
    let CapabilityRequest {
        available,
        required,
        desired,
    } = request;

    let Some(required) = required else {
        return Ok(match (desired, available) {
            (None, _) => Resolved::Unconstrained,
            (Some(desired), Ceiling::Unconstrained) => {
                log::info!("limit {name}: desired {desired} but the adapter reports no ceiling, ignoring");
                Resolved::Unconstrained
            }
            (Some(desired), Ceiling::Limited(available)) => {
                let value = desired.min(available);
                log::info!("limit {name}: desired {desired}, requesting {value}");
                Resolved::Value(value)
            }
        });
    };

    let available = match available {
        Ceiling::Unconstrained => {
            log::error!("limit {name}: required {required} but the adapter reports no ceiling");
            return Err(UnsatisfiableConstraint::UnknownCeiling {
                limit: name,
                required,
            });
        }
        Ceiling::Limited(available) if available < required => {
            log::error!("limit {name}: required {required} but the adapter maximum is {available}");
            return Err(UnsatisfiableConstraint::BelowRequirement {
                limit: name,
                required,
                available,
            });
        }
        Ceiling::Limited(available) => available,
    };

    match desired {
        None => {
            log::info!("limit {name}: required {required}, available");
            Ok(Resolved::Value(required))
        }
        Some(desired) => {
            debug_assert!(
                desired >= required,
                "limit {name}: desired {desired} is below required {required}"
            );
            let value = desired.min(available).max(required);
            log::info!("limit {name}: required {required}, desired {desired}, requesting {value}");
            Ok(Resolved::Value(value))
        }
    }
}

/// Per-limit values requested by the application (either the hard floor set or
/// the soft preference set).
pub type LimitSet = BTreeMap<LimitId, u64>;

/// Resolves every negotiable limit against the adapter's reported limits.
///
/// Fails on the first unsatisfiable requirement.
pub fn negotiate_limits(
    available: &wgpu::Limits,
    required: &LimitSet,
    desired: &LimitSet,
) -> Result<BTreeMap<LimitId, Resolved>, UnsatisfiableConstraint> {
    LimitId::ALL
        .iter()
        .map(|&id| {
            let request = CapabilityRequest {
                available: id.ceiling(available),
                required: required.get(&id).copied(),
                desired: desired.get(&id).copied(),
            };
            resolve_limit(id, request).map(|resolved| (id, resolved))
        })
        .collect()
}

/// Writes resolved values over `base`. Unconstrained entries keep the base value.
pub fn apply_resolved(base: &wgpu::Limits, resolved: &BTreeMap<LimitId, Resolved>) -> wgpu::Limits {
    let mut limits = base.clone();
    for (&id, &value) in resolved {
        if let Resolved::Value(value) = value {
            id.store(&mut limits, value);
        }
    }
    limits
}

trait LimitValue: Copy {
    fn ceiling(self) -> Ceiling;
}

impl LimitValue for u32 {
    fn ceiling(self) -> Ceiling {
        if self == u32::MAX {
            Ceiling::Unconstrained
        } else {
            Ceiling::Limited(u64::from(self))
        }
    }
}

impl LimitValue for u64 {
    fn ceiling(self) -> Ceiling {
        if self == u64::MAX {
            Ceiling::Unconstrained
        } else {
            Ceiling::Limited(self)
        }
    }
}

fn store<T: TryFrom<u64>>(slot: &mut T, value: u64) {
    // Resolved values never exceed the adapter's own value for the same field,
    // so the conversion only fails for base limits wider than the field type.
    if let Ok(value) = T::try_from(value) {
        *slot = value;
    }
}

macro_rules! limit_ids {
    ($($variant:ident => $field:ident, $name:literal;)*) => {
        /// Canonical identifier for each negotiable numeric limit.
        ///
        /// Names follow the WebGPU limit names so logs line up with browser
        /// documentation.
        #[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        pub enum LimitId {
            $($variant,)*
        }

        impl LimitId {
            pub const ALL: &'static [LimitId] = &[$(LimitId::$variant,)*];

            pub const fn name(self) -> &'static str {
                match self {
                    $(LimitId::$variant => $name,)*
                }
            }

            /// Reads the adapter's ceiling for this limit.
            pub fn ceiling(self, limits: &wgpu::Limits) -> Ceiling {
                match self {
                    $(LimitId::$variant => LimitValue::ceiling(limits.$field),)*
                }
            }

            fn store(self, limits: &mut wgpu::Limits, value: u64) {
                match self {
                    $(LimitId::$variant => store(&mut limits.$field, value),)*
                }
            }
        }
    };
}

limit_ids! {
    MaxTextureDimension1D => max_texture_dimension_1d, "maxTextureDimension1D";
    MaxTextureDimension2D => max_texture_dimension_2d, "maxTextureDimension2D";
    MaxTextureDimension3D => max_texture_dimension_3d, "maxTextureDimension3D";
    MaxTextureArrayLayers => max_texture_array_layers, "maxTextureArrayLayers";
    MaxBindGroups => max_bind_groups, "maxBindGroups";
    MaxBindingsPerBindGroup => max_bindings_per_bind_group, "maxBindingsPerBindGroup";
    MaxDynamicUniformBuffersPerPipelineLayout => max_dynamic_uniform_buffers_per_pipeline_layout, "maxDynamicUniformBuffersPerPipelineLayout";
    MaxDynamicStorageBuffersPerPipelineLayout => max_dynamic_storage_buffers_per_pipeline_layout, "maxDynamicStorageBuffersPerPipelineLayout";
    MaxSampledTexturesPerShaderStage => max_sampled_textures_per_shader_stage, "maxSampledTexturesPerShaderStage";
    MaxSamplersPerShaderStage => max_samplers_per_shader_stage, "maxSamplersPerShaderStage";
    MaxStorageBuffersPerShaderStage => max_storage_buffers_per_shader_stage, "maxStorageBuffersPerShaderStage";
    MaxStorageTexturesPerShaderStage => max_storage_textures_per_shader_stage, "maxStorageTexturesPerShaderStage";
    MaxUniformBuffersPerShaderStage => max_uniform_buffers_per_shader_stage, "maxUniformBuffersPerShaderStage";
    MaxUniformBufferBindingSize => max_uniform_buffer_binding_size, "maxUniformBufferBindingSize";
    MaxStorageBufferBindingSize => max_storage_buffer_binding_size, "maxStorageBufferBindingSize";
    MaxVertexBuffers => max_vertex_buffers, "maxVertexBuffers";
    MaxBufferSize => max_buffer_size, "maxBufferSize";
    MaxVertexAttributes => max_vertex_attributes, "maxVertexAttributes";
    MaxVertexBufferArrayStride => max_vertex_buffer_array_stride, "maxVertexBufferArrayStride";
    MaxInterStageShaderComponents => max_inter_stage_shader_components, "maxInterStageShaderComponents";
    MaxColorAttachments => max_color_attachments, "maxColorAttachments";
    MaxColorAttachmentBytesPerSample => max_color_attachment_bytes_per_sample, "maxColorAttachmentBytesPerSample";
    MaxComputeWorkgroupStorageSize => max_compute_workgroup_storage_size, "maxComputeWorkgroupStorageSize";
    MaxComputeInvocationsPerWorkgroup => max_compute_invocations_per_workgroup, "maxComputeInvocationsPerWorkgroup";
    MaxComputeWorkgroupSizeX => max_compute_workgroup_size_x, "maxComputeWorkgroupSizeX";
    MaxComputeWorkgroupSizeY => max_compute_workgroup_size_y, "maxComputeWorkgroupSizeY";
    MaxComputeWorkgroupSizeZ => max_compute_workgroup_size_z, "maxComputeWorkgroupSizeZ";
    MaxComputeWorkgroupsPerDimension => max_compute_workgroups_per_dimension, "maxComputeWorkgroupsPerDimension";
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEX2D: LimitId = LimitId::MaxTextureDimension2D;

    fn req(available: Ceiling, required: Option<u64>, desired: Option<u64>) -> CapabilityRequest {
        CapabilityRequest { available, required, desired }
    }

    // ── resolve_limit ─────────────────────────────────────────────────────

    #[test]
    fn nothing_requested_is_unconstrained() {
        for available in [Ceiling::Unconstrained, Ceiling::Limited(0), Ceiling::Limited(16384)] {
            assert_eq!(resolve_limit(TEX2D, req(available, None, None)), Ok(Resolved::Unconstrained));
        }
    }

    #[test]
    fn desire_against_unknown_ceiling_is_dropped() {
        let out = resolve_limit(TEX2D, req(Ceiling::Unconstrained, None, Some(8192)));
        assert_eq!(out, Ok(Resolved::Unconstrained));
    }

    #[test]
    fn desire_is_capped_by_available() {
        assert_eq!(
            resolve_limit(TEX2D, req(Ceiling::Limited(4096), None, Some(8192))),
            Ok(Resolved::Value(4096))
        );
        assert_eq!(
            resolve_limit(TEX2D, req(Ceiling::Limited(16384), None, Some(8192))),
            Ok(Resolved::Value(8192))
        );
    }

    #[test]
    fn requirement_above_available_names_the_limit() {
        let err = resolve_limit(TEX2D, req(Ceiling::Limited(4096), Some(8192), None)).unwrap_err();
        assert_eq!(
            err,
            UnsatisfiableConstraint::BelowRequirement {
                limit: "maxTextureDimension2D",
                required: 8192,
                available: 4096,
            }
        );
        assert!(err.to_string().contains("maxTextureDimension2D"));
    }

    #[test]
    fn requirement_against_unknown_ceiling_is_fatal() {
        let err = resolve_limit(TEX2D, req(Ceiling::Unconstrained, Some(1), None)).unwrap_err();
        assert_eq!(err.subject(), "maxTextureDimension2D");
        assert!(matches!(err, UnsatisfiableConstraint::UnknownCeiling { required: 1, .. }));
    }

    #[test]
    fn requirement_alone_requests_exactly_required() {
        assert_eq!(
            resolve_limit(TEX2D, req(Ceiling::Limited(16384), Some(2048), None)),
            Ok(Resolved::Value(2048))
        );
    }

    #[test]
    fn requirement_with_desire_takes_min_of_desire_and_available() {
        assert_eq!(
            resolve_limit(TEX2D, req(Ceiling::Limited(6000), Some(2048), Some(8192))),
            Ok(Resolved::Value(6000))
        );
        assert_eq!(
            resolve_limit(TEX2D, req(Ceiling::Limited(16384), Some(2048), Some(8192))),
            Ok(Resolved::Value(8192))
        );
    }

    #[test]
    fn resolved_stays_between_required_and_available() {
        let samples = [0u64, 1, 2, 7, 64, 4096, 8192, 65535];
        for &available in &samples {
            for &required in &samples {
                for desired in samples.iter().copied().filter(|&d| d >= required).map(Some).chain([None]) {
                    let out = resolve_limit(TEX2D, req(Ceiling::Limited(available), Some(required), desired));
                    if available < required {
                        assert!(out.is_err(), "a={available} r={required} d={desired:?}");
                        continue;
                    }
                    let Ok(Resolved::Value(v)) = out else {
                        panic!("expected a value for a={available} r={required} d={desired:?}");
                    };
                    assert!(required <= v && v <= available, "a={available} r={required} d={desired:?} -> {v}");
                }
            }
        }
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "below required")]
    fn desire_below_requirement_is_a_programming_error() {
        let _ = resolve_limit(TEX2D, req(Ceiling::Limited(100), Some(50), Some(10)));
    }

    // ── negotiate_limits ──────────────────────────────────────────────────

    #[test]
    fn negotiate_limits_covers_every_id() {
        let out = negotiate_limits(&wgpu::Limits::default(), &LimitSet::new(), &LimitSet::new()).unwrap();
        assert_eq!(out.len(), LimitId::ALL.len());
        assert!(out.values().all(|r| *r == Resolved::Unconstrained));
    }

    #[test]
    fn negotiate_limits_fails_on_first_unmet_requirement() {
        let available = wgpu::Limits {
            max_texture_dimension_2d: 4096,
            ..wgpu::Limits::default()
        };
        let required = LimitSet::from([(TEX2D, 8192)]);
        let err = negotiate_limits(&available, &required, &LimitSet::new()).unwrap_err();
        assert_eq!(err.subject(), "maxTextureDimension2D");
    }

    #[test]
    fn u32_max_reads_as_unconstrained() {
        let available = wgpu::Limits {
            max_bind_groups: u32::MAX,
            ..wgpu::Limits::default()
        };
        assert_eq!(LimitId::MaxBindGroups.ceiling(&available), Ceiling::Unconstrained);
        assert_eq!(
            LimitId::MaxTextureDimension2D.ceiling(&available),
            Ceiling::Limited(u64::from(available.max_texture_dimension_2d))
        );
    }

    #[test]
    fn inter_stage_components_are_negotiated() {
        let id = LimitId::MaxInterStageShaderComponents;
        assert_eq!(id.name(), "maxInterStageShaderComponents");

        let available = wgpu::Limits {
            max_inter_stage_shader_components: 60,
            ..wgpu::Limits::default()
        };
        let required = LimitSet::from([(id, 64)]);
        let err = negotiate_limits(&available, &required, &LimitSet::new()).unwrap_err();
        assert_eq!(err.subject(), "maxInterStageShaderComponents");
    }

    // ── apply_resolved ────────────────────────────────────────────────────

    #[test]
    fn apply_resolved_overrides_only_values() {
        let base = wgpu::Limits::default();
        let resolved = BTreeMap::from([
            (TEX2D, Resolved::Value(4096)),
            (LimitId::MaxBindGroups, Resolved::Unconstrained),
        ]);
        let out = apply_resolved(&base, &resolved);
        assert_eq!(out.max_texture_dimension_2d, 4096);
        assert_eq!(out.max_bind_groups, base.max_bind_groups);
    }

    #[test]
    fn limit_names_are_unique() {
        let mut names: Vec<_> = LimitId::ALL.iter().map(|id| id.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), LimitId::ALL.len());
    }
}
