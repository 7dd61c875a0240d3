//! Vertex format catalog
//!
//! Describes which attributes a packed vertex carries, how many float
//! components each one has, how many bits each component is quantized to, and
//! where the attribute lives inside the fixed-stride vertex record.
//!
//! Attributes are laid out densely in declaration order. Every attribute
//! starts on a byte boundary, so two attributes never share a byte even when
//! their bit budgets are not multiples of 8.
//!
//! # Packed widths
//! ```text
//! Float1Unpacked               1 x f32          4 bytes
//! Float1PackedIn1Byte          8                1 byte
//! Float2Unpacked               2 x f32          8 bytes
//! Float2PackedIn3BytesXY12     12,12            3 bytes
//! Float2PackedIn4BytesX12Y20   12,20            4 bytes
//! Float3Unpacked               3 x f32         12 bytes
//! Float3PackedIn4BytesXYZ10    10,10,10         4 bytes
//! Float3PackedIn6BytesXYZ16    16,16,16         6 bytes
//! Float4Unpacked               4 x f32         16 bytes
//! Float4PackedIn3BytesXYZW6    6,6,6,6          3 bytes
//! Float4PackedIn6BytesXYZW12   12,12,12,12      6 bytes
//! Float4PackedIn9BytesXYZW18   18,18,18,18      9 bytes
//! ```

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::error::{MeshError, MeshResult};

// ============================================================================
// Constants
// ============================================================================

/// Maximum number of attributes in a single format
pub const MAX_VERTEX_ATTRIBUTES: usize = 16;

/// Number of `AttributeId::Custom` slots
pub const MAX_CUSTOM_ATTRIBUTES: u8 = 10;

/// Number of components every position attribute must have
pub const POSITION_COMPONENT_COUNT: usize = 2;

// ============================================================================
// Attribute Types
// ============================================================================

/// How an attribute's float components are stored in the vertex buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeType {
    Float1Unpacked,
    Float1PackedIn1Byte,
    Float2Unpacked,
    Float2PackedIn3BytesXY12,
    Float2PackedIn4BytesX12Y20,
    Float3Unpacked,
    Float3PackedIn4BytesXYZ10,
    Float3PackedIn6BytesXYZ16,
    Float4Unpacked,
    Float4PackedIn3BytesXYZW6,
    Float4PackedIn6BytesXYZW12,
    Float4PackedIn9BytesXYZW18,
}

impl AttributeType {
    /// Number of float components
    #[inline]
    pub const fn component_count(self) -> usize {
        match self {
            Self::Float1Unpacked | Self::Float1PackedIn1Byte => 1,
            Self::Float2Unpacked
            | Self::Float2PackedIn3BytesXY12
            | Self::Float2PackedIn4BytesX12Y20 => 2,
            Self::Float3Unpacked
            | Self::Float3PackedIn4BytesXYZ10
            | Self::Float3PackedIn6BytesXYZ16 => 3,
            Self::Float4Unpacked
            | Self::Float4PackedIn3BytesXYZW6
            | Self::Float4PackedIn6BytesXYZW12
            | Self::Float4PackedIn9BytesXYZW18 => 4,
        }
    }

    /// Bit budget per component, or `None` for raw f32 storage
    #[inline]
    pub const fn bits_per_component(self) -> Option<&'static [u8]> {
        match self {
            Self::Float1Unpacked
            | Self::Float2Unpacked
            | Self::Float3Unpacked
            | Self::Float4Unpacked => None,
            Self::Float1PackedIn1Byte => Some(&[8]),
            Self::Float2PackedIn3BytesXY12 => Some(&[12, 12]),
            Self::Float2PackedIn4BytesX12Y20 => Some(&[12, 20]),
            Self::Float3PackedIn4BytesXYZ10 => Some(&[10, 10, 10]),
            Self::Float3PackedIn6BytesXYZ16 => Some(&[16, 16, 16]),
            Self::Float4PackedIn3BytesXYZW6 => Some(&[6, 6, 6, 6]),
            Self::Float4PackedIn6BytesXYZW12 => Some(&[12, 12, 12, 12]),
            Self::Float4PackedIn9BytesXYZW18 => Some(&[18, 18, 18, 18]),
        }
    }

    /// True if components are quantized to integer codes
    #[inline]
    pub const fn is_packed(self) -> bool {
        self.bits_per_component().is_some()
    }

    /// Size in bytes of one packed attribute value
    #[inline]
    pub const fn packed_width(self) -> usize {
        match self {
            Self::Float1PackedIn1Byte => 1,
            Self::Float2PackedIn3BytesXY12 | Self::Float4PackedIn3BytesXYZW6 => 3,
            Self::Float1Unpacked
            | Self::Float2PackedIn4BytesX12Y20
            | Self::Float3PackedIn4BytesXYZ10 => 4,
            Self::Float3PackedIn6BytesXYZ16 | Self::Float4PackedIn6BytesXYZW12 => 6,
            Self::Float2Unpacked => 8,
            Self::Float4PackedIn9BytesXYZW18 => 9,
            Self::Float3Unpacked => 12,
            Self::Float4Unpacked => 16,
        }
    }
}

/// What an attribute means to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeId {
    Position,
    ColorShiftHsl,
    OpacityShift,
    Texture,
    SideDerivative,
    SideLabel,
    ForwardDerivative,
    ForwardLabel,
    SurfaceUv,
    AnimationOffset,
    /// Client-defined slot, `0..MAX_CUSTOM_ATTRIBUTES`
    Custom(u8),
}

// ============================================================================
// Index Width
// ============================================================================

/// Byte width of one packed triangle index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IndexWidth {
    #[default]
    U16,
    U24,
    U32,
}

impl IndexWidth {
    /// Bytes per packed index (W)
    #[inline]
    pub const fn bytes(self) -> usize {
        match self {
            Self::U16 => 2,
            Self::U24 => 3,
            Self::U32 => 4,
        }
    }

    /// Largest vertex count this width can address: 2^(8W)
    #[inline]
    pub const fn max_vertex_count(self) -> u64 {
        1u64 << (8 * self.bytes())
    }
}

// ============================================================================
// Format Query Contract
// ============================================================================

/// One attribute slot of a vertex format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttributeDescriptor {
    pub attribute_type: AttributeType,
    pub id: AttributeId,
    /// Byte offset of the attribute within a packed vertex
    pub packed_offset: usize,
    /// Byte width of the attribute within a packed vertex
    pub packed_width: usize,
}

impl AttributeDescriptor {
    #[inline]
    pub const fn component_count(&self) -> usize {
        self.attribute_type.component_count()
    }

    #[inline]
    pub const fn bits_per_component(&self) -> Option<&'static [u8]> {
        self.attribute_type.bits_per_component()
    }
}

/// Read-only layout queries the packer and decoder need from a format.
///
/// Implementations must keep attribute regions non-overlapping and byte
/// aligned, and `packed_vertex_stride` must equal the sum of their widths.
pub trait VertexFormat {
    /// Attributes in packing order
    fn attributes(&self) -> &[AttributeDescriptor];

    /// Bytes per packed vertex
    fn packed_vertex_stride(&self) -> usize;

    /// Width of packed triangle indices
    fn index_width(&self) -> IndexWidth;

    /// Index into `attributes()` of the 2-component position
    fn position_attribute_index(&self) -> usize;

    /// Sum of component counts across all attributes
    fn total_component_count(&self) -> usize {
        self.attributes()
            .iter()
            .map(AttributeDescriptor::component_count)
            .sum()
    }
}

// ============================================================================
// MeshFormat
// ============================================================================

/// Stock vertex format built from a list of `(type, id)` pairs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeshFormat {
    attributes: Vec<AttributeDescriptor>,
    position_attribute_index: usize,
    index_width: IndexWidth,
    packed_vertex_stride: usize,
}

impl Default for MeshFormat {
    /// Unpacked 2D position only, 16-bit indices
    fn default() -> Self {
        Self::from_validated(
            &[(AttributeType::Float2Unpacked, AttributeId::Position)],
            0,
            IndexWidth::U16,
        )
    }
}

impl MeshFormat {
    /// Create a format, validating the attribute list
    ///
    /// Fails if the list is empty or longer than `MAX_VERTEX_ATTRIBUTES`,
    /// repeats an id, uses an out-of-range custom slot, lacks a position, or
    /// the position does not have exactly two components.
    pub fn new(
        attributes: &[(AttributeType, AttributeId)],
        index_width: IndexWidth,
    ) -> MeshResult<Self> {
        if attributes.is_empty() {
            return Err(MeshError::EmptyFormat);
        }
        if attributes.len() > MAX_VERTEX_ATTRIBUTES {
            return Err(MeshError::TooManyAttributes {
                count: attributes.len(),
                max: MAX_VERTEX_ATTRIBUTES,
            });
        }

        let mut seen = HashSet::with_capacity(attributes.len());
        let mut position_attribute_index = None;
        for (i, &(attribute_type, id)) in attributes.iter().enumerate() {
            if let AttributeId::Custom(slot) = id
                && slot >= MAX_CUSTOM_ATTRIBUTES
            {
                return Err(MeshError::InvalidCustomSlot {
                    slot,
                    max: MAX_CUSTOM_ATTRIBUTES - 1,
                });
            }
            if !seen.insert(id) {
                return Err(MeshError::DuplicateAttribute(id));
            }
            if id == AttributeId::Position {
                if attribute_type.component_count() != POSITION_COMPONENT_COUNT {
                    return Err(MeshError::PositionComponentCount {
                        found: attribute_type.component_count(),
                    });
                }
                position_attribute_index = Some(i);
            }
        }
        let position_attribute_index =
            position_attribute_index.ok_or(MeshError::MissingPosition)?;

        Ok(Self::from_validated(
            attributes,
            position_attribute_index,
            index_width,
        ))
    }

    fn from_validated(
        attributes: &[(AttributeType, AttributeId)],
        position_attribute_index: usize,
        index_width: IndexWidth,
    ) -> Self {
        let mut offset = 0;
        let attributes = attributes
            .iter()
            .map(|&(attribute_type, id)| {
                let descriptor = AttributeDescriptor {
                    attribute_type,
                    id,
                    packed_offset: offset,
                    packed_width: attribute_type.packed_width(),
                };
                offset += descriptor.packed_width;
                descriptor
            })
            .collect();

        Self {
            attributes,
            position_attribute_index,
            index_width,
            packed_vertex_stride: offset,
        }
    }

    /// Copy of this format without the given attributes
    pub fn without_attributes(&self, ids: &[AttributeId]) -> MeshResult<Self> {
        if ids.contains(&AttributeId::Position) {
            return Err(MeshError::RemovePosition);
        }
        if let Some(&missing) = ids
            .iter()
            .find(|id| !self.attributes.iter().any(|a| a.id == **id))
        {
            return Err(MeshError::RemoveMissingAttribute(missing));
        }

        let kept: Vec<_> = self
            .attributes
            .iter()
            .filter(|a| !ids.contains(&a.id))
            .map(|a| (a.attribute_type, a.id))
            .collect();
        Self::new(&kept, self.index_width)
    }

    /// Find an attribute by id
    pub fn attribute_index(&self, id: AttributeId) -> Option<usize> {
        self.attributes.iter().position(|a| a.id == id)
    }

    /// True if both formats produce byte-compatible vertex records
    pub fn is_packed_equivalent(a: &Self, b: &Self) -> bool {
        a.position_attribute_index == b.position_attribute_index
            && a.attributes.len() == b.attributes.len()
            && a.attributes
                .iter()
                .zip(&b.attributes)
                .all(|(x, y)| x.attribute_type == y.attribute_type && x.id == y.id)
    }
}

impl VertexFormat for MeshFormat {
    #[inline]
    fn attributes(&self) -> &[AttributeDescriptor] {
        &self.attributes
    }

    #[inline]
    fn packed_vertex_stride(&self) -> usize {
        self.packed_vertex_stride
    }

    #[inline]
    fn index_width(&self) -> IndexWidth {
        self.index_width
    }

    #[inline]
    fn position_attribute_index(&self) -> usize {
        self.position_attribute_index
    }
}
