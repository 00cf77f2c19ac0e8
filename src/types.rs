use glam::{Mat4, Vec3};

/// Axis-aligned bounds of a model in its local space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub const EMPTY: Bounds = Bounds {
        min: Vec3::ZERO,
        max: Vec3::ZERO,
    };

    pub fn from_points(points: &[Vec3]) -> Self {
        let Some((&first, rest)) = points.split_first() else {
            return Self::EMPTY;
        };

        rest.iter().fold(Bounds { min: first, max: first }, |b, &p| Bounds {
            min: b.min.min(p),
            max: b.max.max(p),
        })
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// One triangle-list primitive with node transforms already applied
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub name: Option<String>,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
    /// Linear RGBA base color factor
    pub base_color: [f32; 4],
}

impl Mesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_points(&self.positions)
    }
}

/// Loader output: everything needed to build a model entity
#[derive(Debug, Clone, PartialEq)]
pub struct ModelAsset {
    pub name: String,
    pub meshes: Vec<Mesh>,
    pub bounds: Bounds,
}

impl ModelAsset {
    pub fn new(name: impl Into<String>, meshes: Vec<Mesh>) -> Self {
        let bounds = meshes
            .iter()
            .map(Mesh::bounds)
            .reduce(|a, b| a.union(&b))
            .unwrap_or(Bounds::EMPTY);

        Self {
            name: name.into(),
            meshes,
            bounds,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.positions.len()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(Mesh::triangle_count).sum()
    }
}

/// Vertex layout uploaded to the GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Per-frame uniform: camera, light and the model transform
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniform {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub sky_color: [f32; 4],
    /// rgb = ground color, w = light intensity
    pub ground_color: [f32; 4],
}

impl SceneUniform {
    pub fn new(view_proj: Mat4, model: Mat4, sky: Vec3, ground: Vec3, intensity: f32) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            sky_color: sky.extend(1.0).to_array(),
            ground_color: ground.extend(intensity).to_array(),
        }
    }
}

/// Flatten a model's meshes into one vertex/index pair
pub fn flatten_model(asset: &ModelAsset) -> (Vec<Vertex>, Vec<u32>) {
    let mut vertices = Vec::with_capacity(asset.vertex_count());
    let mut indices = Vec::with_capacity(asset.triangle_count() * 3);

    for mesh in &asset.meshes {
        let base = vertices.len() as u32;
        // One vertex per position so indices stay in range even if normals run short
        vertices.extend(mesh.positions.iter().enumerate().map(|(i, p)| Vertex {
            position: p.to_array(),
            normal: mesh.normals.get(i).copied().unwrap_or(Vec3::Y).to_array(),
            color: mesh.base_color,
        }));
        indices.extend(mesh.indices.iter().map(|i| base + i));
    }

    (vertices, indices)
}
