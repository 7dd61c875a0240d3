//! Stroke Mesh - quantized packing for triangulated ink-stroke meshes
//!
//! Clients supply one float array per vertex component plus a triangle index
//! list. The crate validates them, derives per-component quantization (coding)
//! params, and packs everything into two flat byte buffers: fixed-stride vertex
//! data and fixed-width triangle indices. The packed mesh decodes back to
//! floats, or to the raw integer codes, for any vertex and attribute.
//!
//! # Architecture
//!
//! - [`bits`] - LSB-first bit cursor shared by the packer and decoder
//! - [`format`] - Attribute type catalog and the [`VertexFormat`] query contract
//! - [`coding`] - Bounds and coding params (offset, scale per component)
//! - [`packing`] - Byte-level attribute and index encoding
//! - [`PackedMesh`] - Validating factory and decoder
//!
//! # Example
//!
//! ```
//! use stroke_mesh::{AttributeId, AttributeType, IndexWidth, MeshFormat, PackedMesh};
//!
//! let format = MeshFormat::new(
//!     &[(AttributeType::Float2PackedIn3BytesXY12, AttributeId::Position)],
//!     IndexWidth::U16,
//! )?;
//! let xs = [0.0, 1.0, 2.0];
//! let ys = [0.0, 1.0, 2.0];
//! let mesh = PackedMesh::create(format, &[&xs, &ys], &[0, 1, 2], &[])?;
//!
//! assert_eq!(mesh.vertex_count(), 3);
//! assert_eq!(mesh.raw_vertex_data().len(), 3 * 3);
//! assert_eq!(mesh.raw_index_data().len(), 3 * 2);
//! # Ok::<(), stroke_mesh::MeshError>(())
//! ```

pub mod bits;
pub mod coding;
mod error;
pub mod format;
pub mod mesh;
pub mod packing;
mod validate;

/// Most components any attribute type has
pub const MAX_COMPONENTS: usize = 4;

/// Inline per-component storage, sized for the largest attribute type
pub type ComponentVec<T> = smallvec::SmallVec<[T; MAX_COMPONENTS]>;

pub use coding::{AttributeBounds, AttributeCodingParams, CodingOverride, ComponentCodingParams};
pub use error::{MeshError, MeshResult};
pub use format::{
    AttributeDescriptor, AttributeId, AttributeType, IndexWidth, MAX_CUSTOM_ATTRIBUTES,
    MAX_VERTEX_ATTRIBUTES, MeshFormat, VertexFormat,
};
pub use mesh::{PackedMesh, Triangle};
pub use validate::validate_mesh_input;
