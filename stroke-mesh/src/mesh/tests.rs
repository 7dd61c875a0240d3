//! Tests for packed mesh construction and decoding

use glam::Vec2;

use super::*;
use crate::coding::ComponentCodingParams;
use crate::error::MeshError;
use crate::format::{AttributeId, AttributeType};

fn xy12_format() -> MeshFormat {
    MeshFormat::new(
        &[(AttributeType::Float2PackedIn3BytesXY12, AttributeId::Position)],
        IndexWidth::U16,
    )
    .unwrap()
}

fn stroke_format() -> MeshFormat {
    MeshFormat::new(
        &[
            (AttributeType::Float2PackedIn4BytesX12Y20, AttributeId::Position),
            (AttributeType::Float1PackedIn1Byte, AttributeId::OpacityShift),
            (AttributeType::Float3Unpacked, AttributeId::ColorShiftHsl),
        ],
        IndexWidth::U24,
    )
    .unwrap()
}

fn assert_close(actual: Vec2, expected: Vec2, tolerance: Vec2) {
    let diff = (actual - expected).abs();
    assert!(
        diff.x <= tolerance.x && diff.y <= tolerance.y,
        "{actual} is not within {tolerance} of {expected}"
    );
}

#[test]
fn test_three_vertex_scenario() {
    let xs = [0.0, 1.0, 2.0];
    let ys = [0.0, 1.0, 2.0];
    let mesh = PackedMesh::create(xy12_format(), &[&xs, &ys], &[0, 1, 2], &[]).unwrap();

    let bounds = mesh.attribute_bounds().unwrap();
    assert_eq!(bounds.len(), 1);
    assert_eq!(bounds[0].minimum.as_slice(), &[0.0, 0.0]);
    assert_eq!(bounds[0].maximum.as_slice(), &[2.0, 2.0]);
    assert_eq!(
        mesh.position_bounds(),
        Some((Vec2::ZERO, Vec2::new(2.0, 2.0)))
    );

    let params = mesh.coding_params(0);
    let tolerance = Vec2::new(
        params.components[0].scale / 2.0 + 1e-6,
        params.components[1].scale / 2.0 + 1e-6,
    );
    for v in 0..3 {
        assert_close(mesh.vertex_position(v), Vec2::new(xs[v], ys[v]), tolerance);
    }

    let triangle = mesh.triangle(0);
    assert_close(triangle.p0, Vec2::new(0.0, 0.0), tolerance);
    assert_close(triangle.p1, Vec2::new(1.0, 1.0), tolerance);
    assert_close(triangle.p2, Vec2::new(2.0, 2.0), tolerance);
    assert_eq!(mesh.triangle_indices(0), [0, 1, 2]);
}

#[test]
fn test_extreme_codes() {
    let mesh = PackedMesh::create(
        xy12_format(),
        &[&[0.0, 1.0, 2.0], &[5.0, 6.0, 7.0]],
        &[],
        &[],
    )
    .unwrap();

    assert_eq!(mesh.vertex_attribute_codes(0, 0).as_slice(), &[0, 0]);
    assert_eq!(mesh.vertex_attribute_codes(2, 0).as_slice(), &[4095, 4095]);
    assert_eq!(&mesh.raw_vertex_data()[6..9], &[0xFF, 0xFF, 0xFF]);
    assert_eq!(mesh.vertex_position(0), Vec2::new(0.0, 5.0));
}

#[test]
fn test_buffer_lengths() {
    let n = 10;
    let xs: Vec<f32> = (0..n).map(|i| i as f32).collect();
    let ys: Vec<f32> = (0..n).map(|i| (i * i) as f32).collect();
    let opacity: Vec<f32> = (0..n).map(|i| i as f32 / n as f32).collect();
    let hsl: Vec<f32> = vec![0.25; n];
    let indices: Vec<u32> = (0..n as u32 - 2).flat_map(|i| [i, i + 1, i + 2]).collect();

    let mesh = PackedMesh::create(
        stroke_format(),
        &[&xs[..], &ys, &opacity, &hsl, &hsl, &hsl],
        &indices,
        &[],
    )
    .unwrap();

    assert_eq!(mesh.vertex_stride(), 4 + 1 + 12);
    assert_eq!(mesh.vertex_count(), n);
    assert_eq!(mesh.triangle_count(), n - 2);
    assert_eq!(mesh.attribute_count(), 3);
    assert_eq!(mesh.raw_vertex_data().len(), n * mesh.vertex_stride());
    assert_eq!(mesh.raw_index_data().len(), (n - 2) * 3 * 3);
    assert_eq!(mesh.triangle_indices(5), [5, 6, 7]);
}

#[test]
fn test_packing_is_idempotent() {
    let xs = [0.5, -3.25, 8.0, 1.0];
    let ys = [1.0, 2.0, -4.0, 0.0];
    let indices = [0, 1, 2, 2, 3, 0];

    let a = PackedMesh::create(xy12_format(), &[&xs, &ys], &indices, &[]).unwrap();
    let b = PackedMesh::create(xy12_format(), &[&xs, &ys], &indices, &[]).unwrap();
    assert_eq!(a.raw_vertex_data(), b.raw_vertex_data());
    assert_eq!(a.raw_index_data(), b.raw_index_data());
    assert_eq!(a, b);
}

#[test]
fn test_unpacked_attributes_are_exact() {
    let hsl = [0.123_456_7, -1e-30, 3.0e20];
    let mesh = PackedMesh::create(
        stroke_format(),
        &[&[0.0; 3], &[0.0; 3], &[1.0; 3], &hsl, &hsl, &hsl],
        &[0, 1, 2],
        &[],
    )
    .unwrap();

    assert_eq!(mesh.coding_params(2), &AttributeCodingParams::identity(3));
    for (v, &value) in hsl.iter().enumerate() {
        assert_eq!(mesh.float_vertex_attribute(v, 2).as_slice(), &[value; 3]);
        assert_eq!(mesh.vertex_attribute_codes(v, 2)[0], value.to_bits());
    }
}

#[test]
fn test_degenerate_attribute_decodes_exactly() {
    let mesh = PackedMesh::create(
        stroke_format(),
        &[&[3.5, 3.5], &[-2.0, 7.0], &[0.3, 0.3], &[0.0; 2], &[0.0; 2], &[0.0; 2]],
        &[],
        &[],
    )
    .unwrap();

    assert_eq!(
        mesh.coding_params(1).components[0],
        ComponentCodingParams {
            offset: 0.3,
            scale: 1.0
        }
    );
    assert_eq!(mesh.float_vertex_attribute(1, 1).as_slice(), &[0.3]);
    assert_eq!(mesh.vertex_position(1).x, 3.5);
}

#[test]
fn test_shared_override_keeps_codes_comparable() {
    let shared = CodingOverride::Explicit(AttributeCodingParams::new([
        ComponentCodingParams {
            offset: -10.0,
            scale: 0.01,
        },
        ComponentCodingParams {
            offset: -10.0,
            scale: 0.01,
        },
    ]));

    let a = PackedMesh::create(
        xy12_format(),
        &[&[0.0, 1.0], &[0.0, 1.0]],
        &[],
        std::slice::from_ref(&shared),
    )
    .unwrap();
    let b = PackedMesh::create(
        xy12_format(),
        &[&[1.0, 5.0], &[1.0, -5.0]],
        &[],
        std::slice::from_ref(&shared),
    )
    .unwrap();

    assert_eq!(a.coding_params(0), b.coding_params(0));
    assert_eq!(a.vertex_attribute_codes(1, 0), b.vertex_attribute_codes(0, 0));
    assert_eq!(a.vertex_attribute_codes(1, 0).as_slice(), &[1100, 1100]);
}

#[test]
fn test_override_values_clamp() {
    let narrow = CodingOverride::Explicit(AttributeCodingParams::new([
        ComponentCodingParams {
            offset: 0.0,
            scale: 1.0,
        },
        ComponentCodingParams {
            offset: 0.0,
            scale: 1.0,
        },
    ]));
    let mesh = PackedMesh::create(
        xy12_format(),
        &[&[-20.0, 9000.0], &[1.0, 2.0]],
        &[],
        &[narrow],
    )
    .unwrap();

    assert_eq!(mesh.vertex_attribute_codes(0, 0).as_slice(), &[0, 1]);
    assert_eq!(mesh.vertex_attribute_codes(1, 0).as_slice(), &[4095, 2]);
}

#[test]
fn test_empty_mesh() {
    let none: &[f32] = &[];
    let mesh = PackedMesh::create(stroke_format(), &[none; 6], &[], &[]).unwrap();

    assert_eq!(mesh.vertex_count(), 0);
    assert_eq!(mesh.triangle_count(), 0);
    assert!(mesh.raw_vertex_data().is_empty());
    assert!(mesh.raw_index_data().is_empty());
    assert_eq!(mesh.attribute_bounds(), None);
    assert_eq!(mesh.position_bounds(), None);
    assert_eq!(mesh.coding_params(0), &AttributeCodingParams::identity(2));
    assert_eq!(mesh.coding_params(1), &AttributeCodingParams::identity(1));
    assert_eq!(mesh.coding_params(2), &AttributeCodingParams::identity(3));
}

#[test]
fn test_default_mesh() {
    let mesh = PackedMesh::<MeshFormat>::default();
    assert_eq!(mesh.format(), &MeshFormat::default());
    assert_eq!(mesh.vertex_count(), 0);
    assert_eq!(mesh.triangle_count(), 0);
    assert_eq!(mesh.attribute_bounds(), None);
    assert_eq!(mesh.coding_params(0), &AttributeCodingParams::identity(2));

    let empty = PackedMesh::create(MeshFormat::default(), &[&[], &[]], &[], &[]).unwrap();
    assert_eq!(mesh, empty);
}

#[test]
fn test_rejected_inputs() {
    let xs = [0.0, 1.0, 2.0];
    let ys = [0.0, 1.0, 2.0];

    assert_eq!(
        PackedMesh::create(xy12_format(), &[&xs, &ys], &[0, 1, 2, 0], &[]),
        Err(MeshError::IndexCountNotMultipleOfThree { count: 4 })
    );
    assert_eq!(
        PackedMesh::create(xy12_format(), &[&xs, &ys], &[0, 1, 5], &[]),
        Err(MeshError::IndexOutOfRange {
            position: 2,
            index: 5,
            vertex_count: 3
        })
    );
    assert_eq!(
        PackedMesh::create(xy12_format(), &[&xs, &[0.0, f32::NAN, 2.0]], &[], &[]),
        Err(MeshError::NonFiniteValue {
            attribute_index: 0,
            component_index: 1,
            array_index: 1,
            vertex_index: 1
        })
    );
    assert_eq!(
        PackedMesh::create(
            xy12_format(),
            &[&xs, &ys],
            &[],
            &[CodingOverride::Explicit(AttributeCodingParams::identity(3))]
        ),
        Err(MeshError::OverrideComponentCount {
            attribute_index: 0,
            expected: 2,
            found: 3
        })
    );
}

#[test]
fn test_custom_vertex_format() {
    struct PositionOnly {
        attributes: [AttributeDescriptor; 1],
    }

    impl VertexFormat for PositionOnly {
        fn attributes(&self) -> &[AttributeDescriptor] {
            &self.attributes
        }
        fn packed_vertex_stride(&self) -> usize {
            4
        }
        fn index_width(&self) -> IndexWidth {
            IndexWidth::U32
        }
        fn position_attribute_index(&self) -> usize {
            0
        }
    }

    let format = PositionOnly {
        attributes: [AttributeDescriptor {
            attribute_type: AttributeType::Float2PackedIn4BytesX12Y20,
            id: AttributeId::Position,
            packed_offset: 0,
            packed_width: 4,
        }],
    };
    let mesh = PackedMesh::create(format, &[&[1.0, 2.0, 4.0], &[3.0, 3.0, 3.0]], &[2, 1, 0], &[])
        .unwrap();

    assert_eq!(mesh.raw_index_data(), &[2, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(mesh.vertex_position(0), Vec2::new(1.0, 3.0));
    assert_eq!(mesh.triangle_indices(0), [2, 1, 0]);
}

#[test]
fn test_packed_mesh_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PackedMesh>();
}

#[test]
#[should_panic(expected = "vertex index 3 out of range")]
fn test_vertex_index_out_of_range_panics() {
    let mesh = PackedMesh::create(xy12_format(), &[&[0.0; 3], &[0.0; 3]], &[], &[]).unwrap();
    mesh.vertex_position(3);
}

#[test]
#[should_panic(expected = "attribute index 1 out of range")]
fn test_attribute_index_out_of_range_panics() {
    let mesh = PackedMesh::create(xy12_format(), &[&[0.0; 3], &[0.0; 3]], &[], &[]).unwrap();
    mesh.float_vertex_attribute(0, 1);
}

#[test]
#[should_panic(expected = "triangle index 1 out of range")]
fn test_triangle_index_out_of_range_panics() {
    let mesh =
        PackedMesh::create(xy12_format(), &[&[0.0; 3], &[0.0; 3]], &[0, 1, 2], &[]).unwrap();
    mesh.triangle(1);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "position attribute must have 2 components")]
fn test_single_component_position_format_panics() {
    struct MislabeledPosition {
        attributes: [AttributeDescriptor; 1],
    }

    impl VertexFormat for MislabeledPosition {
        fn attributes(&self) -> &[AttributeDescriptor] {
            &self.attributes
        }
        fn packed_vertex_stride(&self) -> usize {
            1
        }
        fn index_width(&self) -> IndexWidth {
            IndexWidth::U16
        }
        fn position_attribute_index(&self) -> usize {
            0
        }
    }

    let format = MislabeledPosition {
        attributes: [AttributeDescriptor {
            attribute_type: AttributeType::Float1PackedIn1Byte,
            id: AttributeId::Position,
            packed_offset: 0,
            packed_width: 1,
        }],
    };
    let _ = PackedMesh::create(format, &[&[0.0]], &[], &[]);
}
