//! Mesh manifest parsing
//!
//! A manifest describes one mesh: the index width, one entry per attribute
//! (type, id, per-component value arrays and optional explicit coding params)
//! and the triangle list. TOML and JSON manifests share the same structure:
//!
//! ```toml
//! index_width = "U16"
//! triangles = [[0, 1, 2]]
//!
//! [[attributes]]
//! type = "Float2PackedIn3BytesXY12"
//! id = "Position"
//! components = [[0.0, 1.0, 2.0], [0.0, 1.0, 2.0]]
//!
//! [[attributes]]
//! type = "Float1PackedIn1Byte"
//! id = "OpacityShift"
//! components = [[0.0, 0.5, 1.0]]
//! coding = { offsets = [0.0], scales = [0.004] }
//! ```

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use stroke_mesh::{
    AttributeCodingParams, AttributeId, AttributeType, CodingOverride, ComponentCodingParams,
    IndexWidth, MeshFormat, PackedMesh,
};

/// Mesh manifest structure
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MeshManifest {
    /// Packed triangle index width. Default: U16
    #[serde(default)]
    pub index_width: IndexWidth,
    pub attributes: Vec<AttributeEntry>,
    #[serde(default)]
    pub triangles: Vec<[u32; 3]>,
}

/// Single attribute entry
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeEntry {
    #[serde(rename = "type")]
    pub attribute_type: AttributeType,
    pub id: AttributeId,
    /// One value array per component, each with one entry per vertex
    pub components: Vec<Vec<f32>>,
    /// Explicit coding params; derived from the data when absent
    #[serde(default)]
    pub coding: Option<CodingEntry>,
}

/// Explicit per-component coding params
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodingEntry {
    pub offsets: Vec<f32>,
    pub scales: Vec<f32>,
}

impl MeshManifest {
    /// Load manifest from file, picking the parser by extension
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let manifest = if is_json {
            Self::parse_json(&content)
        } else {
            Self::parse_toml(&content)
        };
        manifest.with_context(|| format!("Invalid manifest: {}", path.display()))
    }

    pub fn parse_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML manifest")
    }

    pub fn parse_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse JSON manifest")
    }

    /// Vertex format declared by the attribute entries
    pub fn format(&self) -> Result<MeshFormat> {
        let attributes: Vec<_> = self
            .attributes
            .iter()
            .map(|a| (a.attribute_type, a.id))
            .collect();
        MeshFormat::new(&attributes, self.index_width).context("Invalid mesh format")
    }

    /// Component arrays in format order
    pub fn component_arrays(&self) -> Result<Vec<&[f32]>> {
        let mut arrays = Vec::new();
        for attribute in &self.attributes {
            let expected = attribute.attribute_type.component_count();
            if attribute.components.len() != expected {
                bail!(
                    "Attribute {:?} ({:?}) has {} component arrays, expected {}",
                    attribute.id,
                    attribute.attribute_type,
                    attribute.components.len(),
                    expected
                );
            }
            arrays.extend(attribute.components.iter().map(Vec::as_slice));
        }
        Ok(arrays)
    }

    /// Flat triangle index list
    pub fn triangle_indices(&self) -> Vec<u32> {
        self.triangles.iter().flatten().copied().collect()
    }

    /// Per-attribute coding overrides, empty when no attribute sets `coding`
    pub fn coding_overrides(&self) -> Result<Vec<CodingOverride>> {
        if self.attributes.iter().all(|a| a.coding.is_none()) {
            return Ok(Vec::new());
        }

        self.attributes
            .iter()
            .map(|attribute| match &attribute.coding {
                None => Ok(CodingOverride::Derive),
                Some(coding) => {
                    if coding.offsets.len() != coding.scales.len() {
                        bail!(
                            "Coding for {:?} has {} offsets but {} scales",
                            attribute.id,
                            coding.offsets.len(),
                            coding.scales.len()
                        );
                    }
                    let params = AttributeCodingParams::new(
                        coding
                            .offsets
                            .iter()
                            .zip(&coding.scales)
                            .map(|(&offset, &scale)| ComponentCodingParams { offset, scale }),
                    );
                    Ok(CodingOverride::Explicit(params))
                }
            })
            .collect()
    }

    /// Validate and pack the mesh
    pub fn build(&self) -> Result<PackedMesh> {
        let format = self.format()?;
        let arrays = self.component_arrays()?;
        let overrides = self.coding_overrides()?;
        PackedMesh::create(format, &arrays, &self.triangle_indices(), &overrides)
            .context("Failed to pack mesh")
    }
}
