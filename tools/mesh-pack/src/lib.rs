//! mesh-pack library
//!
//! Manifest loading, packing and output used by the `mesh-pack` binary.

pub mod export;
pub mod manifest;

use std::path::Path;

use anyhow::{Context, Result};
use stroke_mesh::{PackedMesh, VertexFormat};

pub use export::{CodingSidecar, PackedFiles, write_packed_mesh};
pub use manifest::MeshManifest;

/// Pack the mesh described by `manifest_path`
///
/// Output files are named after the manifest stem and written to
/// `output_dir`, or next to the manifest when it is `None`.
pub fn pack_manifest(manifest_path: &Path, output_dir: Option<&Path>) -> Result<PackedFiles> {
    let mesh = MeshManifest::load(manifest_path)?.build()?;

    let stem = manifest_path
        .file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("Manifest has no file name: {}", manifest_path.display()))?;
    let output_dir = output_dir
        .or_else(|| manifest_path.parent())
        .unwrap_or_else(|| Path::new("."));

    write_packed_mesh(&mesh, output_dir, stem)
}

/// Validate a manifest without writing anything
pub fn check_manifest(manifest_path: &Path) -> Result<PackedMesh> {
    MeshManifest::load(manifest_path)?.build()
}

/// Pack a manifest in memory and log its layout and first `vertices` vertices
pub fn inspect_manifest(manifest_path: &Path, vertices: usize) -> Result<PackedMesh> {
    let mesh = check_manifest(manifest_path)?;

    tracing::info!(
        stride = mesh.vertex_stride(),
        index_bytes = mesh.index_width().bytes(),
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "Packed {}",
        manifest_path.display()
    );
    if let Some((min, max)) = mesh.position_bounds() {
        tracing::info!("Position bounds: {} .. {}", min, max);
    }

    for (a, attribute) in mesh.format().attributes().iter().enumerate() {
        tracing::info!(
            offset = attribute.packed_offset,
            width = attribute.packed_width,
            "Attribute {} {:?} ({:?}): {:?}",
            a,
            attribute.id,
            attribute.attribute_type,
            mesh.coding_params(a).components.as_slice()
        );
    }

    for v in 0..vertices.min(mesh.vertex_count()) {
        for a in 0..mesh.attribute_count() {
            tracing::info!(
                "v{} a{}: {:?} codes {:?}",
                v,
                a,
                mesh.float_vertex_attribute(v, a).as_slice(),
                mesh.vertex_attribute_codes(v, a).as_slice()
            );
        }
    }

    Ok(mesh)
}
