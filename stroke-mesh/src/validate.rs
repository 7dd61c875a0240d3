//! Input validation for the packing pipeline

use crate::error::{MeshError, MeshResult};
use crate::format::VertexFormat;

/// Check component arrays and triangle indices against `format`
///
/// Returns the vertex count (the common length of the component arrays) on
/// success. Checks run in this order: array count, array lengths, vertex count
/// limit, finiteness, triangle index count, triangle index range.
pub fn validate_mesh_input<F>(
    format: &F,
    component_arrays: &[&[f32]],
    triangle_indices: &[u32],
) -> MeshResult<usize>
where
    F: VertexFormat + ?Sized,
{
    let expected = format.total_component_count();
    if component_arrays.len() != expected {
        return Err(MeshError::ComponentArrayCount {
            expected,
            found: component_arrays.len(),
        });
    }

    // A format always has a 2-component position, so there is a first array.
    let vertex_count = component_arrays.first().map_or(0, |a| a.len());
    if let Some((array_index, array)) = component_arrays
        .iter()
        .enumerate()
        .find(|(_, a)| a.len() != vertex_count)
    {
        return Err(MeshError::UnequalArrayLengths {
            array_index,
            len: array.len(),
            expected: vertex_count,
        });
    }

    let max = format.index_width().max_vertex_count();
    if vertex_count as u64 > max {
        return Err(MeshError::TooManyVertices { vertex_count, max });
    }

    check_finite(format, component_arrays)?;

    if triangle_indices.len() % 3 != 0 {
        return Err(MeshError::IndexCountNotMultipleOfThree {
            count: triangle_indices.len(),
        });
    }
    if let Some((position, &index)) = triangle_indices
        .iter()
        .enumerate()
        .find(|&(_, &i)| i as usize >= vertex_count)
    {
        return Err(MeshError::IndexOutOfRange {
            position,
            index,
            vertex_count,
        });
    }

    Ok(vertex_count)
}

fn check_finite<F>(format: &F, component_arrays: &[&[f32]]) -> MeshResult<()>
where
    F: VertexFormat + ?Sized,
{
    let mut array_index = 0;
    for (attribute_index, attribute) in format.attributes().iter().enumerate() {
        for component_index in 0..attribute.component_count() {
            let values = component_arrays[array_index];
            if let Some(vertex_index) = values.iter().position(|v| !v.is_finite()) {
                return Err(MeshError::NonFiniteValue {
                    attribute_index,
                    component_index,
                    array_index,
                    vertex_index,
                });
            }
            array_index += 1;
        }
    }
    Ok(())
}
