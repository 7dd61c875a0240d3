//! Attribute bounds and quantization (coding) parameters
//!
//! Each packed component is stored as an unsigned integer code. The coding
//! params of a component are the affine map between that code and its float
//! value:
//!
//! ```text
//! code  = clamp(round((value - offset) / scale), 0, 2^bits - 1)
//! value = offset + code * scale
//! ```
//!
//! Params are normally derived from the per-component bounds of the mesh so
//! that the full `[min, max]` range spans all available codes. Callers can
//! instead supply explicit params per attribute, which keeps the codes of
//! several meshes comparable.

use serde::{Deserialize, Serialize};

use crate::ComponentVec;
use crate::bits::max_value_for_bits;
use crate::error::{MeshError, MeshResult};
use crate::format::{AttributeDescriptor, VertexFormat};

// ============================================================================
// Types
// ============================================================================

/// Affine map between one component's code and its float value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentCodingParams {
    pub offset: f32,
    pub scale: f32,
}

impl Default for ComponentCodingParams {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ComponentCodingParams {
    /// offset = 0, scale = 1
    pub const IDENTITY: Self = Self {
        offset: 0.0,
        scale: 1.0,
    };

    /// True if offset and scale are finite and scale is positive
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.offset.is_finite() && self.scale.is_finite() && self.scale > 0.0
    }

    /// Quantize `value` into a `bits`-wide code, clamping out-of-range values
    #[inline]
    pub fn encode(&self, value: f32, bits: u8) -> u32 {
        let max = max_value_for_bits(bits);
        let code = ((f64::from(value) - f64::from(self.offset)) / f64::from(self.scale)).round();
        code.clamp(0.0, f64::from(max)) as u32
    }

    /// Reconstruct the float value of `code`
    #[inline]
    pub fn decode(&self, code: u32) -> f32 {
        (f64::from(self.offset) + f64::from(code) * f64::from(self.scale)) as f32
    }
}

/// Coding params for every component of one attribute
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AttributeCodingParams {
    pub components: ComponentVec<ComponentCodingParams>,
}

impl AttributeCodingParams {
    pub fn new(components: impl IntoIterator<Item = ComponentCodingParams>) -> Self {
        Self {
            components: components.into_iter().collect(),
        }
    }

    /// Identity params for `component_count` components
    pub fn identity(component_count: usize) -> Self {
        Self {
            components: std::iter::repeat_n(ComponentCodingParams::IDENTITY, component_count)
                .collect(),
        }
    }
}

/// Per-component minimum and maximum of one attribute
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AttributeBounds {
    pub minimum: ComponentVec<f32>,
    pub maximum: ComponentVec<f32>,
}

/// Where an attribute's coding params come from
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CodingOverride {
    /// Derive from the mesh's own bounds
    #[default]
    Derive,
    /// Use these params verbatim
    Explicit(AttributeCodingParams),
}

// ============================================================================
// Bounds
// ============================================================================

/// Per-attribute, per-component bounds of the vertex data
///
/// `component_arrays` holds one array per component, in format order, all of
/// the same length. Returns `None` when there are no vertices.
pub fn compute_attribute_bounds<F>(
    format: &F,
    component_arrays: &[&[f32]],
) -> Option<Vec<AttributeBounds>>
where
    F: VertexFormat + ?Sized,
{
    if component_arrays.first().is_none_or(|a| a.is_empty()) {
        return None;
    }

    let mut arrays = component_arrays.iter();
    let bounds = format
        .attributes()
        .iter()
        .map(|attribute| {
            let mut bounds = AttributeBounds::default();
            for values in arrays.by_ref().take(attribute.component_count()) {
                let (min, max) = values.iter().fold(
                    (f32::INFINITY, f32::NEG_INFINITY),
                    |(min, max), &v| (min.min(v), max.max(v)),
                );
                bounds.minimum.push(min);
                bounds.maximum.push(max);
            }
            bounds
        })
        .collect();
    Some(bounds)
}

// ============================================================================
// Coding Params
// ============================================================================

/// Coding params that spread `bounds` over every code of `attribute`
///
/// Unpacked attributes always get identity params. A degenerate component
/// (min == max) gets `offset = min, scale = 1` so the single value decodes
/// exactly. Fails if `max - min` overflows f32.
pub fn compute_coding_params(
    attribute_index: usize,
    attribute: &AttributeDescriptor,
    bounds: &AttributeBounds,
) -> MeshResult<AttributeCodingParams> {
    let Some(bits) = attribute.bits_per_component() else {
        return Ok(AttributeCodingParams::identity(attribute.component_count()));
    };
    debug_assert_eq!(bounds.minimum.len(), bits.len());
    debug_assert_eq!(bounds.maximum.len(), bits.len());

    let mut params = AttributeCodingParams::default();
    for (component_index, ((&min, &max), &bits)) in bounds
        .minimum
        .iter()
        .zip(&bounds.maximum)
        .zip(bits)
        .enumerate()
    {
        debug_assert!(min <= max);
        let range = max - min;
        if !range.is_finite() {
            return Err(MeshError::RangeExceedsFloatPrecision {
                attribute_index,
                component_index,
                min,
                max,
            });
        }

        let scale = if range > 0.0 {
            (range / max_value_for_bits(bits) as f32).max(f32::MIN_POSITIVE)
        } else {
            1.0
        };
        params.components.push(ComponentCodingParams { offset: min, scale });
    }
    Ok(params)
}

/// Check an explicit override against its attribute
///
/// The params are not compared with the mesh bounds; values outside the
/// representable range clamp when packed.
pub fn check_coding_override(
    attribute_index: usize,
    attribute: &AttributeDescriptor,
    params: &AttributeCodingParams,
) -> MeshResult<()> {
    if !attribute.attribute_type.is_packed() {
        return Err(MeshError::OverrideForUnpackedAttribute { attribute_index });
    }
    if params.components.len() != attribute.component_count() {
        return Err(MeshError::OverrideComponentCount {
            attribute_index,
            expected: attribute.component_count(),
            found: params.components.len(),
        });
    }
    if let Some((component_index, c)) = params
        .components
        .iter()
        .enumerate()
        .find(|(_, c)| !c.is_valid())
    {
        return Err(MeshError::InvalidOverride {
            attribute_index,
            component_index,
            offset: c.offset,
            scale: c.scale,
        });
    }
    Ok(())
}

/// Coding params for every attribute of `format`
///
/// `overrides` is either empty (derive everything) or has one entry per
/// attribute. With `bounds == None` (empty mesh) every component gets identity
/// params; overrides are still checked for shape.
pub fn compute_coding_params_array<F>(
    format: &F,
    bounds: Option<&[AttributeBounds]>,
    overrides: &[CodingOverride],
) -> MeshResult<Vec<AttributeCodingParams>>
where
    F: VertexFormat + ?Sized,
{
    let attributes = format.attributes();
    if !overrides.is_empty() && overrides.len() != attributes.len() {
        return Err(MeshError::OverrideCount {
            expected: attributes.len(),
            found: overrides.len(),
        });
    }
    for (i, (attribute, coding)) in attributes.iter().zip(overrides).enumerate() {
        if let CodingOverride::Explicit(params) = coding {
            check_coding_override(i, attribute, params)?;
        }
    }

    let Some(bounds) = bounds else {
        return Ok(attributes
            .iter()
            .map(|a| AttributeCodingParams::identity(a.component_count()))
            .collect());
    };
    debug_assert_eq!(bounds.len(), attributes.len());

    attributes
        .iter()
        .zip(bounds)
        .enumerate()
        .map(|(i, (attribute, bounds))| match overrides.get(i) {
            Some(CodingOverride::Explicit(params)) => Ok(params.clone()),
            Some(CodingOverride::Derive) | None => compute_coding_params(i, attribute, bounds),
        })
        .collect()
}
