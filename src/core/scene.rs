// Copyright @yucwang 2026

use crate::core::error::{RenderError, Result};
use crate::core::geometry::{GeometryInstance, GeometryStore, MeshDescriptor, Vertex};
use crate::core::intersection::IntersectionService;
use crate::core::light::QuadLight;
use crate::core::material::{Material, MaterialChannel};
use crate::core::texture::TextureSampler;
use crate::math::constants::{Vector2f, Vector3f};
use crate::math::transform::Transform;
use crate::textures::constant::ConstantSampler;

/// Immutable scene data shared by every worker for the lifetime of a frame.
pub struct Scene {
    geometry: GeometryStore,
    materials: Vec<Material>,
    lights: Vec<QuadLight>,
    textures: Box<dyn TextureSampler>,
    background: Vector3f,
}

impl Scene {
    pub fn geometry(&self) -> &GeometryStore {
        &self.geometry
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn lights(&self) -> &[QuadLight] {
        &self.lights
    }

    pub fn background(&self) -> Vector3f {
        self.background
    }

    /// Material table entry with any texture overrides for `uv` applied.
    pub fn material_at(&self, material_id: u32, uv: Vector2f) -> Result<Material> {
        let mut material = *self.materials.get(material_id as usize).ok_or(RenderError::MaterialOutOfRange {
            id: material_id,
            count: self.materials.len(),
        })?;
        if let Some(c) = self.textures.sample(material_id, uv, MaterialChannel::BaseColor) {
            material.base_color = c;
        }
        if let Some(c) = self.textures.sample(material_id, uv, MaterialChannel::Metallic) {
            material.metallic = c.x.max(0.0).min(1.0);
        }
        if let Some(c) = self.textures.sample(material_id, uv, MaterialChannel::Roughness) {
            material.roughness = c.x.max(0.0).min(1.0);
        }
        Ok(material)
    }

    pub fn describe(&self) -> String {
        format!("Scene: {} meshes, {} instances, {} triangles, {} materials, {} lights, textures: {}",
                self.geometry.descriptors().len(),
                self.geometry.instances().len(),
                self.geometry.indices().len() / 3,
                self.materials.len(),
                self.lights.len(),
                self.textures.describe())
    }
}

/// What a frame needs besides the camera: the scene data and a way to query it.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub scene: &'a Scene,
    pub intersector: &'a dyn IntersectionService,
}

impl<'a> RenderContext<'a> {
    pub fn new(scene: &'a Scene, intersector: &'a dyn IntersectionService) -> Self {
        Self { scene, intersector }
    }
}

/// Populates the global geometry buffers. Mesh indices are given per mesh
/// (starting at zero) and rebased to absolute vertex indices here, once.
pub struct SceneBuilder {
    positions: Vec<Vector3f>,
    normals: Vec<Vector3f>,
    uvs: Vec<Vector2f>,
    indices: Vec<u32>,
    descriptors: Vec<MeshDescriptor>,
    instances: Vec<GeometryInstance>,
    transforms: Vec<Transform>,
    materials: Vec<Material>,
    lights: Vec<QuadLight>,
    textures: Box<dyn TextureSampler>,
    background: Vector3f,
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            uvs: Vec::new(),
            indices: Vec::new(),
            descriptors: Vec::new(),
            instances: Vec::new(),
            transforms: Vec::new(),
            materials: Vec::new(),
            lights: Vec::new(),
            textures: Box::new(ConstantSampler),
            background: Vector3f::zeros(),
        }
    }

    pub fn add_material(&mut self, material: Material) -> u32 {
        self.materials.push(material);
        (self.materials.len() - 1) as u32
    }

    /// Appends a mesh and returns its descriptor index. Normals and UVs, when
    /// given, must have one entry per position.
    pub fn add_mesh(&mut self,
                    positions: &[Vector3f],
                    normals: Option<&[Vector3f]>,
                    uvs: Option<&[Vector2f]>,
                    indices: &[u32],
                    material_id: u32) -> Result<u32> {
        if indices.len() % 3 != 0 {
            return Err(RenderError::Config(format!("mesh index count {} is not a multiple of 3", indices.len())));
        }
        if let Some(n) = normals {
            if n.len() != positions.len() {
                return Err(RenderError::Config(format!("mesh has {} normals for {} positions", n.len(), positions.len())));
            }
        }
        if let Some(t) = uvs {
            if t.len() != positions.len() {
                return Err(RenderError::Config(format!("mesh has {} uvs for {} positions", t.len(), positions.len())));
            }
        }

        let descriptor = MeshDescriptor {
            vertex_offset: self.positions.len() as u32,
            index_offset: self.indices.len() as u32,
            vertex_count: positions.len() as u32,
            index_count: indices.len() as u32,
            normal_offset: self.normals.len() as u32,
            normal_count: normals.map_or(0, |n| n.len() as u32),
            uv_offset: self.uvs.len() as u32,
            uv_count: uvs.map_or(0, |t| t.len() as u32),
            material_id,
        };

        self.positions.extend_from_slice(positions);
        if let Some(n) = normals {
            self.normals.extend_from_slice(n);
        }
        if let Some(t) = uvs {
            self.uvs.extend_from_slice(t);
        }
        self.indices.extend(indices.iter().map(|i| i + descriptor.vertex_offset));
        self.descriptors.push(descriptor);
        Ok((self.descriptors.len() - 1) as u32)
    }

    /// Mesh with per-vertex normals and UVs taken from `vertices`.
    pub fn add_vertex_mesh(&mut self, vertices: &[Vertex], indices: &[u32], material_id: u32) -> Result<u32> {
        let positions: Vec<Vector3f> = vertices.iter().map(|v| v.position).collect();
        let normals: Vec<Vector3f> = vertices.iter().map(|v| v.normal).collect();
        let uvs: Vec<Vector2f> = vertices.iter().map(|v| v.uv).collect();
        self.add_mesh(&positions, Some(&normals), Some(&uvs), indices, material_id)
    }

    /// Places an existing mesh with a transform. A mesh that has instances
    /// is only drawn through them.
    pub fn add_instance(&mut self, mesh_descriptor_index: u32, transform: Transform) -> u32 {
        self.transforms.push(transform);
        self.instances.push(GeometryInstance {
            mesh_descriptor_index,
            transform_index: (self.transforms.len() - 1) as u32,
        });
        (self.instances.len() - 1) as u32
    }

    /// Parallelogram `corner + s·edge_u + t·edge_v` with normal
    /// `edge_u × edge_v`.
    pub fn add_quad(&mut self, corner: Vector3f, edge_u: Vector3f, edge_v: Vector3f, material_id: u32) -> Result<u32> {
        let n = edge_u.cross(&edge_v).normalize();
        let vertices = [
            Vertex::new(corner, n, Vector2f::new(0.0, 0.0)),
            Vertex::new(corner + edge_u, n, Vector2f::new(1.0, 0.0)),
            Vertex::new(corner + edge_u + edge_v, n, Vector2f::new(1.0, 1.0)),
            Vertex::new(corner + edge_v, n, Vector2f::new(0.0, 1.0)),
        ];
        self.add_vertex_mesh(&vertices, &[0, 1, 2, 0, 2, 3], material_id)
    }

    /// Axis-aligned box with outward-facing flat faces, stored as one mesh
    /// without normals or UVs.
    pub fn add_box(&mut self, min: Vector3f, max: Vector3f, material_id: u32) -> Result<u32> {
        let positions = [
            Vector3f::new(min.x, min.y, min.z), Vector3f::new(max.x, min.y, min.z),
            Vector3f::new(max.x, max.y, min.z), Vector3f::new(min.x, max.y, min.z),
            Vector3f::new(min.x, min.y, max.z), Vector3f::new(max.x, min.y, max.z),
            Vector3f::new(max.x, max.y, max.z), Vector3f::new(min.x, max.y, max.z),
        ];
        let indices = [
            0, 3, 2, 0, 2, 1, // -z
            4, 5, 6, 4, 6, 7, // +z
            0, 4, 7, 0, 7, 3, // -x
            1, 2, 6, 1, 6, 5, // +x
            0, 1, 5, 0, 5, 4, // -y
            3, 7, 6, 3, 6, 2, // +y
        ];
        self.add_mesh(&positions, None, None, &indices, material_id)
    }

    pub fn add_light(&mut self, light: QuadLight) -> u32 {
        self.lights.push(light);
        (self.lights.len() - 1) as u32
    }

    pub fn set_background(&mut self, background: Vector3f) {
        self.background = background;
    }

    pub fn set_texture_sampler(&mut self, textures: Box<dyn TextureSampler>) {
        self.textures = textures;
    }

    /// Validates the buffers and material references and freezes the scene.
    pub fn build(self) -> Result<Scene> {
        let geometry = GeometryStore::from_parts(self.positions, self.normals, self.uvs, self.indices,
                                                 self.descriptors, self.instances, self.transforms);
        geometry.validate()?;
        for material in &self.materials {
            material.validate()?;
        }
        for desc in geometry.descriptors() {
            if desc.material_id as usize >= self.materials.len() {
                return Err(RenderError::MaterialOutOfRange { id: desc.material_id, count: self.materials.len() });
            }
        }

        let scene = Scene {
            geometry,
            materials: self.materials,
            lights: self.lights,
            textures: self.textures,
            background: self.background,
        };
        log::info!("{}", scene.describe());
        if scene.lights.is_empty() {
            log::warn!("Scene has no lights; only the background contributes.");
        }
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::Float;

    struct RoughnessOverride;

    impl TextureSampler for RoughnessOverride {
        fn sample(&self, material_id: u32, uv: Vector2f, channel: MaterialChannel) -> Option<Vector3f> {
            match (material_id, channel) {
                (1, MaterialChannel::Roughness) => Some(Vector3f::new(uv.x, uv.x, uv.x)),
                (1, MaterialChannel::BaseColor) => Some(Vector3f::new(0.0, 0.0, 1.0)),
                _ => None,
            }
        }
    }

    #[test]
    fn test_builder_rebases_indices_and_keeps_attributes_local() {
        let mut builder = SceneBuilder::new();
        let m = builder.add_material(Material::default());
        builder.add_box(Vector3f::zeros(), Vector3f::new(1.0, 1.0, 1.0), m).expect("box");
        let quad = builder.add_quad(Vector3f::zeros(), Vector3f::new(1.0, 0.0, 0.0),
                                    Vector3f::new(0.0, 0.0, -1.0), m).expect("quad");
        let scene = builder.build().expect("scene");
        let store = scene.geometry();

        let desc = store.descriptor(quad).expect("descriptor");
        assert_eq!(desc.vertex_offset, 8);
        assert_eq!(desc.index_offset, 36);
        // the box stores no normals, so the quad's normals start at zero
        assert_eq!(desc.normal_offset, 0);
        assert_eq!(desc.normal_count, 4);
        assert_eq!(&store.indices()[36..42], &[8, 9, 10, 8, 10, 11]);
    }

    #[test]
    fn test_quad_normal_follows_edge_order() {
        let mut builder = SceneBuilder::new();
        let m = builder.add_material(Material::default());
        builder.add_quad(Vector3f::zeros(), Vector3f::new(1.0, 0.0, 0.0), Vector3f::new(0.0, 0.0, -1.0), m)
            .expect("quad");
        let scene = builder.build().expect("scene");
        assert!((scene.geometry().normals()[0] - Vector3f::new(0.0, 1.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_mismatched_attribute_lengths_are_rejected() {
        let mut builder = SceneBuilder::new();
        let positions = [Vector3f::zeros(), Vector3f::new(1.0, 0.0, 0.0), Vector3f::new(0.0, 1.0, 0.0)];
        let normals = [Vector3f::new(0.0, 0.0, 1.0)];
        assert!(matches!(builder.add_mesh(&positions, Some(&normals), None, &[0, 1, 2], 0),
                         Err(RenderError::Config(_))));
        assert!(matches!(builder.add_mesh(&positions, None, None, &[0, 1], 0),
                         Err(RenderError::Config(_))));
    }

    #[test]
    fn test_local_index_past_mesh_end_fails_build() {
        let mut builder = SceneBuilder::new();
        let m = builder.add_material(Material::default());
        let positions = [Vector3f::zeros(), Vector3f::new(1.0, 0.0, 0.0), Vector3f::new(0.0, 1.0, 0.0)];
        builder.add_mesh(&positions, None, None, &[0, 1, 3], m).expect("append");
        assert!(matches!(builder.build(), Err(RenderError::VertexIndexOutOfRange { .. })));
    }

    #[test]
    fn test_unknown_material_fails_build() {
        let mut builder = SceneBuilder::new();
        builder.add_material(Material::default());
        builder.add_box(Vector3f::zeros(), Vector3f::new(1.0, 1.0, 1.0), 4).expect("box");
        assert!(matches!(builder.build(), Err(RenderError::MaterialOutOfRange { id: 4, count: 1 })));
    }

    #[test]
    fn test_out_of_range_material_fails_build() {
        let mut builder = SceneBuilder::new();
        let m = builder.add_material(Material { sheen: -4.0, ..Material::default() });
        builder.add_box(Vector3f::zeros(), Vector3f::new(1.0, 1.0, 1.0), m).expect("box");
        assert!(matches!(builder.build(), Err(RenderError::Config(_))));
    }

    #[test]
    fn test_material_fetch_applies_texture_overrides() {
        let mut builder = SceneBuilder::new();
        let plain = builder.add_material(Material::diffuse(Vector3f::new(0.5, 0.5, 0.5)));
        let textured = builder.add_material(Material::default());
        builder.set_texture_sampler(Box::new(RoughnessOverride));
        let scene = builder.build().expect("scene");

        let a = scene.material_at(plain, Vector2f::new(0.25, 0.0)).expect("material");
        assert_eq!(a, Material::diffuse(Vector3f::new(0.5, 0.5, 0.5)));
        let b = scene.material_at(textured, Vector2f::new(0.25, 0.0)).expect("material");
        assert!((b.roughness - 0.25 as Float).abs() < 1e-6);
        assert_eq!(b.base_color, Vector3f::new(0.0, 0.0, 1.0));
        assert!(matches!(scene.material_at(9, Vector2f::zeros()), Err(RenderError::MaterialOutOfRange { .. })));
    }
}
