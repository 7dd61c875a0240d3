//! Packed mesh: validating factory and attribute decoder
//!
//! A [`PackedMesh`] is built in one step by [`PackedMesh::create`] and never
//! changes afterward. The vertex buffer is vertex-major with
//! `format.packed_vertex_stride()` bytes per vertex; the index buffer holds
//! three `IndexWidth::bytes()`-wide little-endian indices per triangle.
//!
//! Decoder methods take vertex, attribute and triangle indices that the caller
//! has already checked against the mesh; out-of-range indices panic.

use glam::Vec2;
use tracing::{debug, trace};

use crate::ComponentVec;
use crate::coding::{
    AttributeBounds, AttributeCodingParams, CodingOverride, compute_attribute_bounds,
    compute_coding_params_array,
};
use crate::error::MeshResult;
use crate::format::{
    AttributeDescriptor, IndexWidth, MeshFormat, POSITION_COMPONENT_COUNT, VertexFormat,
};
use crate::packing::{
    pack_attribute, read_triangle_indices, unpack_attribute, unpack_attribute_codes,
    write_triangle_indices,
};
use crate::validate::validate_mesh_input;

#[cfg(test)]
mod tests;

/// Three decoded triangle corners, in index order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub p0: Vec2,
    pub p1: Vec2,
    pub p2: Vec2,
}

/// Immutable quantized mesh
#[derive(Debug, Clone, PartialEq)]
pub struct PackedMesh<F: VertexFormat = MeshFormat> {
    format: F,
    coding_params: Vec<AttributeCodingParams>,
    bounds: Option<Vec<AttributeBounds>>,
    vertex_data: Vec<u8>,
    index_data: Vec<u8>,
}

impl<F: VertexFormat + Default> Default for PackedMesh<F> {
    /// Empty mesh of the default format
    fn default() -> Self {
        let format = F::default();
        let coding_params = format
            .attributes()
            .iter()
            .map(|a| AttributeCodingParams::identity(a.component_count()))
            .collect();
        Self {
            format,
            coding_params,
            bounds: None,
            vertex_data: Vec::new(),
            index_data: Vec::new(),
        }
    }
}

// ============================================================================
// Construction
// ============================================================================

impl<F: VertexFormat> PackedMesh<F> {
    /// Validate, quantize and pack a mesh
    ///
    /// `component_arrays` holds one array per component in format order (a
    /// `Float2` position contributes its x array then its y array), all with
    /// one entry per vertex. `triangle_indices` is a flat list of vertex index
    /// triples. `overrides` is empty to derive every attribute's coding params
    /// from the data, or has one entry per attribute.
    pub fn create(
        format: F,
        component_arrays: &[&[f32]],
        triangle_indices: &[u32],
        overrides: &[CodingOverride],
    ) -> MeshResult<Self> {
        debug_assert_eq!(
            format.attributes()[format.position_attribute_index()].component_count(),
            POSITION_COMPONENT_COUNT,
            "position attribute must have 2 components"
        );
        let vertex_count = validate_mesh_input(&format, component_arrays, triangle_indices)?;
        let bounds = compute_attribute_bounds(&format, component_arrays);
        let coding_params = compute_coding_params_array(&format, bounds.as_deref(), overrides)?;

        for (attribute_index, params) in coding_params.iter().enumerate() {
            trace!(attribute_index, ?params, "Coding params");
        }

        let vertex_data = pack_vertices(&format, &coding_params, component_arrays, vertex_count);
        let index_data = pack_indices(format.index_width(), triangle_indices);

        debug!(
            vertex_count,
            triangle_count = triangle_indices.len() / 3,
            stride = format.packed_vertex_stride(),
            index_bytes = format.index_width().bytes(),
            "Packed mesh"
        );

        Ok(Self {
            format,
            coding_params,
            bounds,
            vertex_data,
            index_data,
        })
    }
}

fn pack_vertices<F: VertexFormat>(
    format: &F,
    coding_params: &[AttributeCodingParams],
    component_arrays: &[&[f32]],
    vertex_count: usize,
) -> Vec<u8> {
    let stride = format.packed_vertex_stride();
    let mut vertex_data = vec![0u8; vertex_count * stride];
    if stride == 0 {
        return vertex_data;
    }

    let mut values = ComponentVec::<f32>::new();
    for (vertex_index, record) in vertex_data.chunks_exact_mut(stride).enumerate() {
        let mut arrays = component_arrays.iter();
        for (attribute, params) in format.attributes().iter().zip(coding_params) {
            values.clear();
            values.extend(
                arrays
                    .by_ref()
                    .take(attribute.component_count())
                    .map(|array| array[vertex_index]),
            );
            let region = &mut record[attribute.packed_offset..][..attribute.packed_width];
            pack_attribute(attribute, params, &values, region);
        }
    }
    vertex_data
}

fn pack_indices(width: IndexWidth, triangle_indices: &[u32]) -> Vec<u8> {
    let mut index_data = vec![0u8; triangle_indices.len() * width.bytes()];
    for (triangle_index, t) in triangle_indices.chunks_exact(3).enumerate() {
        write_triangle_indices(triangle_index, width, [t[0], t[1], t[2]], &mut index_data);
    }
    index_data
}

// ============================================================================
// Layout Queries
// ============================================================================

impl<F: VertexFormat> PackedMesh<F> {
    pub fn format(&self) -> &F {
        &self.format
    }

    /// Bytes per packed vertex
    #[inline]
    pub fn vertex_stride(&self) -> usize {
        self.format.packed_vertex_stride()
    }

    #[inline]
    pub fn index_width(&self) -> IndexWidth {
        self.format.index_width()
    }

    pub fn vertex_count(&self) -> usize {
        match self.vertex_stride() {
            0 => 0,
            stride => self.vertex_data.len() / stride,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.index_data.len() / (3 * self.index_width().bytes())
    }

    pub fn attribute_count(&self) -> usize {
        self.format.attributes().len()
    }

    /// Coding params of attribute `attribute_index`
    pub fn coding_params(&self, attribute_index: usize) -> &AttributeCodingParams {
        self.check_attribute_index(attribute_index);
        &self.coding_params[attribute_index]
    }

    /// Per-attribute bounds, `None` for a mesh without vertices
    pub fn attribute_bounds(&self) -> Option<&[AttributeBounds]> {
        self.bounds.as_deref()
    }

    /// Axis-aligned (min, max) corners of the vertex positions
    pub fn position_bounds(&self) -> Option<(Vec2, Vec2)> {
        let bounds = self.bounds.as_ref()?;
        let position = &bounds[self.format.position_attribute_index()];
        Some((
            Vec2::new(position.minimum[0], position.minimum[1]),
            Vec2::new(position.maximum[0], position.maximum[1]),
        ))
    }

    /// Packed vertex buffer, `vertex_count * vertex_stride` bytes
    pub fn raw_vertex_data(&self) -> &[u8] {
        &self.vertex_data
    }

    /// Packed index buffer, `triangle_count * 3 * index_width` bytes
    pub fn raw_index_data(&self) -> &[u8] {
        &self.index_data
    }
}

// ============================================================================
// Decoding
// ============================================================================

impl<F: VertexFormat> PackedMesh<F> {
    /// Raw integer codes of one attribute of one vertex
    ///
    /// Codes compare exactly, so equal codes mean equal decoded values under the
    /// same coding params.
    pub fn vertex_attribute_codes(
        &self,
        vertex_index: usize,
        attribute_index: usize,
    ) -> ComponentVec<u32> {
        let (attribute, region) = self.attribute_region(vertex_index, attribute_index);
        unpack_attribute_codes(attribute, region)
    }

    /// Decoded float values of one attribute of one vertex
    pub fn float_vertex_attribute(
        &self,
        vertex_index: usize,
        attribute_index: usize,
    ) -> ComponentVec<f32> {
        let (attribute, region) = self.attribute_region(vertex_index, attribute_index);
        unpack_attribute(attribute, &self.coding_params[attribute_index], region)
    }

    /// Decoded position of one vertex
    pub fn vertex_position(&self, vertex_index: usize) -> Vec2 {
        let position =
            self.float_vertex_attribute(vertex_index, self.format.position_attribute_index());
        Vec2::new(position[0], position[1])
    }

    /// Vertex indices of one triangle
    pub fn triangle_indices(&self, triangle_index: usize) -> [u32; 3] {
        assert!(
            triangle_index < self.triangle_count(),
            "triangle index {} out of range ({} triangles)",
            triangle_index,
            self.triangle_count()
        );
        read_triangle_indices(triangle_index, self.index_width(), &self.index_data)
    }

    /// Decoded corners of one triangle
    pub fn triangle(&self, triangle_index: usize) -> Triangle {
        let [a, b, c] = self.triangle_indices(triangle_index);
        Triangle {
            p0: self.vertex_position(a as usize),
            p1: self.vertex_position(b as usize),
            p2: self.vertex_position(c as usize),
        }
    }

    fn check_attribute_index(&self, attribute_index: usize) {
        assert!(
            attribute_index < self.attribute_count(),
            "attribute index {} out of range ({} attributes)",
            attribute_index,
            self.attribute_count()
        );
    }

    fn attribute_region(
        &self,
        vertex_index: usize,
        attribute_index: usize,
    ) -> (&AttributeDescriptor, &[u8]) {
        assert!(
            vertex_index < self.vertex_count(),
            "vertex index {} out of range ({} vertices)",
            vertex_index,
            self.vertex_count()
        );
        self.check_attribute_index(attribute_index);

        let attribute = &self.format.attributes()[attribute_index];
        let start = vertex_index * self.vertex_stride() + attribute.packed_offset;
        (attribute, &self.vertex_data[start..start + attribute.packed_width])
    }
}
