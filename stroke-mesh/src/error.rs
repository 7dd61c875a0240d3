//! Error types for mesh format construction and packing

use crate::format::AttributeId;

/// Result alias used throughout the crate
pub type MeshResult<T> = Result<T, MeshError>;

/// Rejected input to a format or mesh factory.
///
/// Every variant is an invalid-argument condition: it names the structural or
/// numeric invariant that failed together with the offending index or count.
/// Nothing is allocated before validation passes, so an error never leaves a
/// partially built mesh behind.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    /// A format must declare at least one attribute
    #[error("mesh format has no attributes")]
    EmptyFormat,

    /// Too many attributes in one format
    #[error("mesh format has {count} attributes (max {max})")]
    TooManyAttributes { count: usize, max: usize },

    /// The same attribute id appears twice in a format
    #[error("mesh format declares more than one {0:?} attribute")]
    DuplicateAttribute(AttributeId),

    /// Custom attribute slot outside the supported range
    #[error("custom attribute slot {slot} is out of range (max {max})")]
    InvalidCustomSlot { slot: u8, max: u8 },

    /// Every format needs a position attribute
    #[error("mesh format is missing a Position attribute")]
    MissingPosition,

    /// Position must have exactly two components
    #[error("position attribute has {found} components (expected 2)")]
    PositionComponentCount { found: usize },

    /// Position cannot be removed from a format
    #[error("cannot remove the Position attribute from a mesh format")]
    RemovePosition,

    /// Tried to remove an attribute the format does not have
    #[error("cannot remove {0:?}: the mesh format does not include it")]
    RemoveMissingAttribute(AttributeId),

    /// Number of component arrays does not match the format
    #[error("wrong number of vertex attribute arrays: expected {expected} total components, found {found}")]
    ComponentArrayCount { expected: usize, found: usize },

    /// Component arrays must all have the vertex count as length
    #[error("vertex attribute arrays have unequal lengths: array {array_index} has {len} elements, expected {expected}")]
    UnequalArrayLengths {
        array_index: usize,
        len: usize,
        expected: usize,
    },

    /// More vertices than the index width can address
    #[error("more vertices than the index width can represent: vertices = {vertex_count}, max = {max}")]
    TooManyVertices { vertex_count: usize, max: u64 },

    /// NaN or infinity in a component array
    #[error("non-finite value in attribute {attribute_index} component {component_index} (array {array_index}) at vertex {vertex_index}")]
    NonFiniteValue {
        attribute_index: usize,
        component_index: usize,
        array_index: usize,
        vertex_index: usize,
    },

    /// Triangle list length must be a multiple of three
    #[error("number of triangle indices is not divisible by 3 ({count})")]
    IndexCountNotMultipleOfThree { count: usize },

    /// A triangle references a vertex that does not exist
    #[error("triangle index {index} at position {position} references a non-existent vertex; vertices = {vertex_count}")]
    IndexOutOfRange {
        position: usize,
        index: u32,
        vertex_count: usize,
    },

    /// Override list length must match the attribute count (or be empty)
    #[error("wrong number of coding overrides: expected {expected} (one per attribute) or none, found {found}")]
    OverrideCount { expected: usize, found: usize },

    /// Override has the wrong number of components for its attribute
    #[error("coding override for attribute {attribute_index} has {found} components, expected {expected}")]
    OverrideComponentCount {
        attribute_index: usize,
        expected: usize,
        found: usize,
    },

    /// Unpacked attributes are stored as raw floats and take no coding params
    #[error("coding override given for attribute {attribute_index}, which is not quantized")]
    OverrideForUnpackedAttribute { attribute_index: usize },

    /// Override offset/scale must be finite with a positive scale
    #[error("coding override for attribute {attribute_index} component {component_index} is invalid: offset = {offset}, scale = {scale}")]
    InvalidOverride {
        attribute_index: usize,
        component_index: usize,
        offset: f32,
        scale: f32,
    },

    /// `max - min` overflows f32
    #[error("range of attribute {attribute_index} component {component_index} exceeds float precision: min = {min}, max = {max}")]
    RangeExceedsFloatPrecision {
        attribute_index: usize,
        component_index: usize,
        min: f32,
        max: f32,
    },
}

impl MeshError {
    /// Every mesh error is an invalid-argument condition.
    ///
    /// Kept for callers that map errors onto status-code style APIs.
    pub fn is_invalid_argument(&self) -> bool {
        true
    }
}
