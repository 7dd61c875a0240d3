//! Packed mesh output files
//!
//! `pack` writes three files next to each other:
//! - `<stem>.vtx` - raw packed vertex buffer
//! - `<stem>.idx` - raw packed triangle index buffer
//! - `<stem>.coding.json` - format, counts, coding params and bounds, which
//!   the buffers alone do not carry

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use stroke_mesh::{AttributeBounds, AttributeCodingParams, MeshFormat, PackedMesh};

pub const VERTEX_EXT: &str = "vtx";
pub const INDEX_EXT: &str = "idx";
pub const CODING_EXT: &str = "coding.json";

/// Metadata needed to decode the raw buffers
#[derive(Debug, Serialize)]
pub struct CodingSidecar<'a> {
    pub format: &'a MeshFormat,
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub vertex_stride: usize,
    pub index_bytes: usize,
    pub coding_params: Vec<&'a AttributeCodingParams>,
    pub bounds: Option<&'a [AttributeBounds]>,
}

impl<'a> CodingSidecar<'a> {
    pub fn new(mesh: &'a PackedMesh) -> Self {
        Self {
            format: mesh.format(),
            vertex_count: mesh.vertex_count(),
            triangle_count: mesh.triangle_count(),
            vertex_stride: mesh.vertex_stride(),
            index_bytes: mesh.index_width().bytes(),
            coding_params: (0..mesh.attribute_count())
                .map(|a| mesh.coding_params(a))
                .collect(),
            bounds: mesh.attribute_bounds(),
        }
    }
}

/// Paths written by [`write_packed_mesh`]
#[derive(Debug, Clone)]
pub struct PackedFiles {
    pub vertex_path: PathBuf,
    pub index_path: PathBuf,
    pub coding_path: PathBuf,
}

impl PackedFiles {
    pub fn new(output_dir: &Path, stem: &str) -> Self {
        Self {
            vertex_path: output_dir.join(format!("{stem}.{VERTEX_EXT}")),
            index_path: output_dir.join(format!("{stem}.{INDEX_EXT}")),
            coding_path: output_dir.join(format!("{stem}.{CODING_EXT}")),
        }
    }
}

/// Write the buffers and coding sidecar of `mesh` into `output_dir`
pub fn write_packed_mesh(mesh: &PackedMesh, output_dir: &Path, stem: &str) -> Result<PackedFiles> {
    std::fs::create_dir_all(output_dir).with_context(|| {
        format!("Failed to create output directory: {}", output_dir.display())
    })?;

    let files = PackedFiles::new(output_dir, stem);
    std::fs::write(&files.vertex_path, mesh.raw_vertex_data())
        .with_context(|| format!("Failed to write {}", files.vertex_path.display()))?;
    std::fs::write(&files.index_path, mesh.raw_index_data())
        .with_context(|| format!("Failed to write {}", files.index_path.display()))?;

    let sidecar = serde_json::to_string_pretty(&CodingSidecar::new(mesh))
        .context("Failed to serialize coding params")?;
    std::fs::write(&files.coding_path, sidecar)
        .with_context(|| format!("Failed to write {}", files.coding_path.display()))?;

    tracing::debug!(
        vertex_bytes = mesh.raw_vertex_data().len(),
        index_bytes = mesh.raw_index_data().len(),
        "Wrote {}",
        files.vertex_path.display()
    );
    Ok(files)
}
