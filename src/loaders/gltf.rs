use anyhow::{Context, Result};
use glam::{Mat3, Mat4, Vec3};
use gltf::mesh::Mode;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use super::{resolve_uri, AssetLoader};
use crate::error::AssetLoadFailure;
use crate::types::{Mesh, ModelAsset};

const DEFAULT_BASE_COLOR: [f32; 4] = [0.7, 0.7, 0.7, 1.0];

/// Loads `.gltf` and `.glb` files from disk
#[derive(Debug, Clone, Default)]
pub struct GltfLoader {
    base_dir: Option<PathBuf>,
}

impl GltfLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative asset paths against `dir` instead of the working directory
    pub fn with_base_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(dir.into()),
        }
    }
}

impl AssetLoader for GltfLoader {
    fn load(&self, uri: &str) -> Result<ModelAsset, AssetLoadFailure> {
        let path = resolve_uri(uri, self.base_dir.as_deref())?;
        load_gltf_model(&path).map_err(|e| AssetLoadFailure::import(uri, e))
    }
}

/// Loads a glTF file and flattens its node hierarchy into meshes
pub fn load_gltf_model(path: impl AsRef<Path>) -> Result<ModelAsset> {
    let path = path.as_ref();
    debug!("Loading glTF file: {:?}", path);

    let (document, buffers, _images) = gltf::import(path)
        .with_context(|| format!("Failed to load glTF file: {:?}", path))?;

    debug!(
        "glTF document: {} scenes, {} nodes, {} meshes, {} materials",
        document.scenes().count(),
        document.nodes().count(),
        document.meshes().count(),
        document.materials().count()
    );

    let mut meshes = Vec::new();

    // The default scene wins; files without one contribute every scene
    let scenes: Vec<gltf::Scene> = match document.default_scene() {
        Some(scene) => vec![scene],
        None => document.scenes().collect(),
    };

    for scene in scenes {
        debug!("Processing scene: {:?}", scene.name());
        for node in scene.nodes() {
            process_node(&node, &buffers, &Mat4::IDENTITY, &mut meshes)?;
        }
    }

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string());

    let asset = ModelAsset::new(name, meshes);
    info!(
        "Loaded {:?}: {} meshes, {} triangles",
        path,
        asset.meshes.len(),
        asset.triangle_count()
    );

    Ok(asset)
}

fn process_node(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    parent_transform: &Mat4,
    meshes: &mut Vec<Mesh>,
) -> Result<()> {
    let local_transform = Mat4::from_cols_array_2d(&node.transform().matrix());
    let global_transform = *parent_transform * local_transform;

    if let Some(mesh) = node.mesh() {
        process_mesh(&mesh, buffers, &global_transform, meshes)?;
    }

    for child in node.children() {
        process_node(&child, buffers, &global_transform, meshes)?;
    }

    Ok(())
}

fn process_mesh(
    mesh: &gltf::Mesh,
    buffers: &[gltf::buffer::Data],
    transform: &Mat4,
    meshes: &mut Vec<Mesh>,
) -> Result<()> {
    let normal_matrix = normal_matrix(transform);

    for (index, primitive) in mesh.primitives().enumerate() {
        let mode = primitive.mode();
        if !matches!(mode, Mode::Triangles | Mode::TriangleStrip | Mode::TriangleFan) {
            debug!(
                "Skipping primitive {} of mesh {:?}: mode {:?}",
                index,
                mesh.name(),
                mode
            );
            continue;
        }

        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| &d.0[..]));

        let positions: Vec<Vec3> = reader
            .read_positions()
            .with_context(|| format!("Mesh {:?} primitive {} has no positions", mesh.name(), index))?
            .map(|p| transform.transform_point3(Vec3::from_array(p)))
            .collect();

        if positions.is_empty() {
            continue;
        }

        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..positions.len() as u32).collect(),
        };

        if let Some(bad) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            anyhow::bail!(
                "Mesh {:?} primitive {} references vertex {} of {}",
                mesh.name(),
                index,
                bad,
                positions.len()
            );
        }

        let indices = match mode {
            Mode::TriangleStrip => strip_to_list(&indices),
            Mode::TriangleFan => fan_to_list(&indices),
            _ => trim_to_triangles(indices),
        };

        let normals: Option<Vec<Vec3>> = reader.read_normals().map(|normals| {
            normals
                .map(|n| (normal_matrix * Vec3::from_array(n)).normalize_or(Vec3::Y))
                .collect()
        });
        let normals = vertex_normals(normals, &positions, &indices);

        let base_color = primitive
            .material()
            .pbr_metallic_roughness()
            .base_color_factor();
        let base_color = if primitive.material().index().is_some() {
            base_color
        } else {
            DEFAULT_BASE_COLOR
        };

        meshes.push(Mesh {
            name: mesh.name().map(str::to_string),
            positions,
            normals,
            indices,
            base_color,
        });
    }

    Ok(())
}

fn normal_matrix(transform: &Mat4) -> Mat3 {
    let linear = Mat3::from_mat4(*transform);
    if linear.determinant().abs() < f32::EPSILON {
        linear
    } else {
        linear.inverse().transpose()
    }
}

/// Drop a trailing partial triangle
fn trim_to_triangles(mut indices: Vec<u32>) -> Vec<u32> {
    let whole = indices.len() - indices.len() % 3;
    indices.truncate(whole);
    indices
}

/// Normals read from the file, or computed ones when they are missing or do not
/// line up one-to-one with the positions
fn vertex_normals(read: Option<Vec<Vec3>>, positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    match read {
        Some(normals) if normals.len() == positions.len() => normals,
        Some(normals) => {
            warn!(
                "Got {} normals for {} vertices, recomputing",
                normals.len(),
                positions.len()
            );
            compute_vertex_normals(positions, indices)
        }
        None => compute_vertex_normals(positions, indices),
    }
}

/// Triangle `i` of a strip is `(i, i+1, i+2)`, with odd triangles flipped to keep the winding
fn strip_to_list(strip: &[u32]) -> Vec<u32> {
    strip
        .windows(3)
        .enumerate()
        .flat_map(|(i, w)| if i % 2 == 0 { [w[0], w[1], w[2]] } else { [w[0], w[2], w[1]] })
        .collect()
}

/// Triangle `i` of a fan is `(i+1, i+2, 0)`
fn fan_to_list(fan: &[u32]) -> Vec<u32> {
    match fan.split_first() {
        Some((&hub, rim)) => rim.windows(2).flat_map(|w| [w[0], w[1], hub]).collect(),
        None => Vec::new(),
    }
}

/// Area-weighted smooth normals for meshes that ship without them
pub fn compute_vertex_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];

    for triangle in indices.chunks_exact(3) {
        let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }

    normals
        .into_iter()
        .map(|n| n.normalize_or(Vec3::Y))
        .collect()
}
