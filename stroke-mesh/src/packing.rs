//! Attribute and triangle-index packing
//!
//! Packed attribute values live in byte regions of `packed_width` bytes.
//! Quantized types store one code per component, written LSB-first through
//! [`BitWriter`] in component order; unused high bits of the region stay 0.
//! Unpacked types store each component as a little-endian f32.
//!
//! Triangle indices are stored as three little-endian unsigned integers of
//! `IndexWidth::bytes()` bytes each, triangle-major, no padding.

use crate::ComponentVec;
use crate::bits::{BitReader, BitWriter};
use crate::coding::AttributeCodingParams;
use crate::format::{AttributeDescriptor, IndexWidth};

// ============================================================================
// Attributes
// ============================================================================

/// Encode one attribute value into its zeroed packed region
///
/// `values` and `params` must have one entry per component and `packed` must
/// be exactly `attribute.packed_width` bytes. Codes outside the representable
/// range are clamped.
pub fn pack_attribute(
    attribute: &AttributeDescriptor,
    params: &AttributeCodingParams,
    values: &[f32],
    packed: &mut [u8],
) {
    debug_assert_eq!(values.len(), attribute.component_count());
    debug_assert_eq!(packed.len(), attribute.packed_width);

    match attribute.bits_per_component() {
        Some(bits) => {
            debug_assert_eq!(params.components.len(), bits.len());
            let mut writer = BitWriter::new(packed);
            for ((&value, component), &width) in values.iter().zip(&params.components).zip(bits) {
                writer.write(component.encode(value, width), width);
            }
            debug_assert!(writer.position() <= 8 * attribute.packed_width);
        }
        None => {
            for (chunk, value) in packed.chunks_exact_mut(4).zip(values) {
                chunk.copy_from_slice(&value.to_le_bytes());
            }
        }
    }
}

/// Raw per-component codes of a packed attribute
///
/// For unpacked types these are the f32 bit patterns, so equal codes still
/// mean equal values.
pub fn unpack_attribute_codes(attribute: &AttributeDescriptor, packed: &[u8]) -> ComponentVec<u32> {
    debug_assert_eq!(packed.len(), attribute.packed_width);

    match attribute.bits_per_component() {
        Some(bits) => {
            let mut reader = BitReader::new(packed);
            let codes: ComponentVec<u32> = bits.iter().map(|&width| reader.read(width)).collect();
            debug_assert!(reader.position() <= 8 * attribute.packed_width);
            codes
        }
        None => packed
            .chunks_exact(4)
            .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect(),
    }
}

/// Float values of a packed attribute
pub fn unpack_attribute(
    attribute: &AttributeDescriptor,
    params: &AttributeCodingParams,
    packed: &[u8],
) -> ComponentVec<f32> {
    let codes = unpack_attribute_codes(attribute, packed);
    if attribute.attribute_type.is_packed() {
        codes
            .iter()
            .zip(&params.components)
            .map(|(&code, component)| component.decode(code))
            .collect()
    } else {
        codes.iter().map(|&bits| f32::from_bits(bits)).collect()
    }
}

// ============================================================================
// Triangle Indices
// ============================================================================

/// Write the three vertex indices of triangle `triangle_index`
///
/// `index_data` must hold at least `triangle_index + 1` triangles and every
/// index must fit in `width`.
pub fn write_triangle_indices(
    triangle_index: usize,
    width: IndexWidth,
    vertex_indices: [u32; 3],
    index_data: &mut [u8],
) {
    let w = width.bytes();
    let start = triangle_index * 3 * w;
    let triangle = &mut index_data[start..start + 3 * w];
    for (slot, index) in triangle.chunks_exact_mut(w).zip(vertex_indices) {
        debug_assert!(u64::from(index) < width.max_vertex_count());
        slot.copy_from_slice(&index.to_le_bytes()[..w]);
    }
}

/// Read the three vertex indices of triangle `triangle_index`
pub fn read_triangle_indices(
    triangle_index: usize,
    width: IndexWidth,
    index_data: &[u8],
) -> [u32; 3] {
    let w = width.bytes();
    let start = triangle_index * 3 * w;
    let triangle = &index_data[start..start + 3 * w];

    let mut indices = [0u32; 3];
    for (index, slot) in indices.iter_mut().zip(triangle.chunks_exact(w)) {
        let mut le = [0u8; 4];
        le[..w].copy_from_slice(slot);
        *index = u32::from_le_bytes(le);
    }
    indices
}
