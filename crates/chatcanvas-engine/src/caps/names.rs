//! Human-readable names for capability values in diagnostics.
//!
//! Every value has one canonical name; anything outside the known tables is
//! printed as its raw code so logs never lose information.

use std::borrow::Cow;

use super::FeatureId;

/// Canonical name if known, otherwise `unknown (0x…)`.
pub fn name_or_code(name: Option<&'static str>, code: u32) -> Cow<'static, str> {
    match name {
        Some(name) => Cow::Borrowed(name),
        None => Cow::Owned(format!("unknown (0x{code:04x})")),
    }
}

/// Name of a PCI vendor id as reported in adapter info.
pub fn vendor_name(vendor: u32) -> Cow<'static, str> {
    let known = match vendor {
        0x10de => Some("NVIDIA"),
        0x1002 | 0x1022 => Some("AMD"),
        0x8086 => Some("Intel"),
        0x106b => Some("Apple"),
        0x5143 => Some("Qualcomm"),
        0x13b5 => Some("ARM"),
        0x1010 => Some("ImgTec"),
        0x14e4 => Some("Broadcom"),
        0x10005 => Some("Mesa"),
        _ => None,
    };
    name_or_code(known, vendor)
}

/// Lists every feature in `features`, canonical ones by WebGPU name and the
/// remainder (native-only extensions) through wgpu's own rendering.
pub fn describe_features(features: wgpu::Features) -> Vec<String> {
    let known = FeatureId::collect(features);
    let mut out: Vec<String> = known.iter().map(|id| id.name().to_string()).collect();

    let known_flags = FeatureId::to_features(&known);
    let mut rest = features;
    rest.remove(known_flags);
    if !rest.is_empty() {
        out.push(format!("{rest:?}"));
    }
    out
}
