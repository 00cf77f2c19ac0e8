use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::config::LightConfig;
use crate::types::ModelAsset;

/// Stable handle to a node in a [`SceneGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in radians, applied in XYZ order
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }
}

/// Light from above in `sky_color`, from below in `ground_color`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HemisphereLight {
    pub sky_color: Vec3,
    pub ground_color: Vec3,
    pub intensity: f32,
}

impl HemisphereLight {
    pub fn new(sky: u32, ground: u32, intensity: f32) -> Self {
        Self {
            sky_color: hex_to_rgb(sky),
            ground_color: hex_to_rgb(ground),
            intensity,
        }
    }

    pub fn from_config(config: &LightConfig) -> Self {
        Self::new(config.sky_color, config.ground_color, config.intensity)
    }
}

/// 0xRRGGBB to linear-ish RGB in 0..=1
pub fn hex_to_rgb(hex: u32) -> Vec3 {
    let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
    Vec3::new(channel(16), channel(8), channel(0))
}

/// A loaded asset placed in the scene
#[derive(Debug, Clone, PartialEq)]
pub struct ModelEntity {
    pub asset: ModelAsset,
    pub transform: Transform,
}

impl ModelEntity {
    pub fn new(asset: ModelAsset) -> Self {
        Self {
            asset,
            transform: Transform::default(),
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.transform.scale = Vec3::splat(scale);
        self
    }

    pub fn with_rotation_y(mut self, angle: f32) -> Self {
        self.transform.rotation.y = angle;
        self
    }

    /// Advance the Y rotation, keeping the angle in [0, 2pi)
    pub fn rotate_y(&mut self, delta: f32) {
        self.transform.rotation.y = (self.transform.rotation.y + delta).rem_euclid(std::f32::consts::TAU);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SceneNode {
    Light(HemisphereLight),
    Model(ModelEntity),
}

/// Renderable nodes owned by the viewer. Nodes are only ever appended.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn add_light(&mut self, light: HemisphereLight) -> NodeId {
        self.push(SceneNode::Light(light))
    }

    pub fn add_model(&mut self, model: ModelEntity) -> NodeId {
        self.push(SceneNode::Model(model))
    }

    fn push(&mut self, node: SceneNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn light(&self) -> Option<&HemisphereLight> {
        self.nodes.iter().find_map(|node| match node {
            SceneNode::Light(light) => Some(light),
            _ => None,
        })
    }

    pub fn models(&self) -> impl Iterator<Item = (NodeId, &ModelEntity)> {
        self.nodes().filter_map(|(id, node)| match node {
            SceneNode::Model(model) => Some((id, model)),
            _ => None,
        })
    }

    pub fn model_count(&self) -> usize {
        self.models().count()
    }

    pub fn model(&self, id: NodeId) -> Option<&ModelEntity> {
        match self.nodes.get(id.0) {
            Some(SceneNode::Model(model)) => Some(model),
            _ => None,
        }
    }

    pub fn model_mut(&mut self, id: NodeId) -> Option<&mut ModelEntity> {
        match self.nodes.get_mut(id.0) {
            Some(SceneNode::Model(model)) => Some(model),
            _ => None,
        }
    }
}
