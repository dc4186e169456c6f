// Copyright @yucwang 2026

//! Global, offset-indexed geometry store and the hit resolver.
//!
//! All meshes share four flat arrays. The index array holds *absolute*
//! vertex indices (already shifted by the owning mesh's `vertex_offset`), so
//! positions are read straight through it. Normals and UVs are stored per mesh
//! starting at `normal_offset` / `uv_offset` and are addressed by the *local*
//! vertex index `global - vertex_offset`.

use crate::core::error::{RenderError, Result};
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::transform::Transform;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vector3f,
    pub normal: Vector3f,
    pub uv: Vector2f,
}

impl Vertex {
    pub fn new(position: Vector3f, normal: Vector3f, uv: Vector2f) -> Self {
        Self { position, normal, uv }
    }
}

/// One contiguous mesh range inside the global arrays. A zero
/// `normal_count`/`uv_count` means the attribute is not stored for this mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeshDescriptor {
    pub vertex_offset: u32,
    pub index_offset: u32,
    pub vertex_count: u32,
    pub index_count: u32,
    pub normal_offset: u32,
    pub normal_count: u32,
    pub uv_offset: u32,
    pub uv_count: u32,
    pub material_id: u32,
}

impl MeshDescriptor {
    pub fn triangle_count(&self) -> u32 {
        self.index_count / 3
    }

    pub fn has_normals(&self) -> bool {
        self.normal_count > 0
    }

    pub fn has_uvs(&self) -> bool {
        self.uv_count > 0
    }

    fn vertex_end(&self) -> u32 {
        self.vertex_offset.saturating_add(self.vertex_count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryInstance {
    pub mesh_descriptor_index: u32,
    pub transform_index: u32,
}

/// What the intersection service reports for a closest hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    pub distance: Float,
    pub barycentric: Vector2f,
    pub primitive_index: u32,
    pub mesh_descriptor_index: u32,
    /// When set, the resolved point is carried to world space with this
    /// instance's transform; when `None` the mesh is already in world space.
    pub instance_index: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadingPoint {
    pub position: Vector3f,
    /// Interpolated shading normal, or the face normal when none are stored.
    pub normal: Vector3f,
    pub geo_normal: Vector3f,
    pub uv: Vector2f,
    pub material_id: u32,
}

#[derive(Debug, Clone, Default)]
pub struct GeometryStore {
    positions: Vec<Vector3f>,
    normals: Vec<Vector3f>,
    uvs: Vec<Vector2f>,
    indices: Vec<u32>,
    descriptors: Vec<MeshDescriptor>,
    instances: Vec<GeometryInstance>,
    transforms: Vec<Transform>,
}

impl GeometryStore {
    pub fn from_parts(positions: Vec<Vector3f>,
                      normals: Vec<Vector3f>,
                      uvs: Vec<Vector2f>,
                      indices: Vec<u32>,
                      descriptors: Vec<MeshDescriptor>,
                      instances: Vec<GeometryInstance>,
                      transforms: Vec<Transform>) -> Self {
        Self { positions, normals, uvs, indices, descriptors, instances, transforms }
    }

    pub fn positions(&self) -> &[Vector3f] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vector3f] {
        &self.normals
    }

    pub fn uvs(&self) -> &[Vector2f] {
        &self.uvs
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn descriptors(&self) -> &[MeshDescriptor] {
        &self.descriptors
    }

    pub fn instances(&self) -> &[GeometryInstance] {
        &self.instances
    }

    pub fn transforms(&self) -> &[Transform] {
        &self.transforms
    }

    pub fn descriptor(&self, index: u32) -> Result<&MeshDescriptor> {
        self.descriptors.get(index as usize).ok_or(RenderError::MeshDescriptorOutOfRange {
            index,
            count: self.descriptors.len(),
        })
    }

    pub fn instance(&self, index: u32) -> Result<(&GeometryInstance, &Transform)> {
        let instance = self.instances.get(index as usize).ok_or(RenderError::InstanceOutOfRange {
            index,
            count: self.instances.len(),
        })?;
        let transform = self.transforms.get(instance.transform_index as usize)
            .ok_or(RenderError::TransformOutOfRange {
                index: instance.transform_index,
                count: self.transforms.len(),
            })?;
        Ok((instance, transform))
    }

    /// The three absolute vertex indices of a triangle, checked against the
    /// owning mesh's vertex range.
    pub fn triangle_indices(&self, mesh: u32, primitive: u32) -> Result<[u32; 3]> {
        let desc = self.descriptor(mesh)?;
        if primitive >= desc.triangle_count() {
            return Err(RenderError::PrimitiveOutOfRange {
                mesh,
                primitive,
                triangles: desc.triangle_count(),
            });
        }

        let first = desc.index_offset as usize + primitive as usize * 3;
        let mut out = [0u32; 3];
        for (k, slot) in out.iter_mut().enumerate() {
            let idx = *self.indices.get(first + k).ok_or(RenderError::IndexSlotOutOfRange {
                mesh,
                slot: first + k,
                len: self.indices.len(),
            })?;
            if idx < desc.vertex_offset || idx >= desc.vertex_end() || idx as usize >= self.positions.len() {
                return Err(RenderError::VertexIndexOutOfRange {
                    mesh,
                    index: idx,
                    start: desc.vertex_offset,
                    end: desc.vertex_end(),
                });
            }
            *slot = idx;
        }
        Ok(out)
    }

    /// Object-space corners of a triangle.
    pub fn triangle_positions(&self, mesh: u32, primitive: u32) -> Result<[Vector3f; 3]> {
        let [i0, i1, i2] = self.triangle_indices(mesh, primitive)?;
        Ok([self.positions[i0 as usize], self.positions[i1 as usize], self.positions[i2 as usize]])
    }

    fn attribute_slot(mesh: u32,
                      attribute: &'static str,
                      offset: u32,
                      count: u32,
                      local: u32,
                      len: usize) -> Result<usize> {
        let slot = offset as usize + local as usize;
        if local >= count || slot >= len {
            return Err(RenderError::AttributeOutOfRange { mesh, attribute, slot, len });
        }
        Ok(slot)
    }

    /// Turns a raw hit into an interpolated shading point.
    pub fn resolve(&self, hit: &HitRecord) -> Result<ShadingPoint> {
        let mesh = hit.mesh_descriptor_index;
        let desc = *self.descriptor(mesh)?;
        let global = self.triangle_indices(mesh, hit.primitive_index)?;
        let p = [self.positions[global[0] as usize],
                 self.positions[global[1] as usize],
                 self.positions[global[2] as usize]];
        // Secondary attributes live in per-mesh local space.
        let local = [global[0] - desc.vertex_offset,
                     global[1] - desc.vertex_offset,
                     global[2] - desc.vertex_offset];

        let b = hit.barycentric;
        let w = [1.0 - b.x - b.y, b.x, b.y];

        let position = p[0] * w[0] + p[1] * w[1] + p[2] * w[2];
        let face = (p[1] - p[0]).cross(&(p[2] - p[0]));
        let geo_normal = face.try_normalize(0.0).unwrap_or(Vector3f::new(0.0, 0.0, 1.0));

        let normal = if desc.has_normals() {
            let mut n = Vector3f::zeros();
            for k in 0..3 {
                let slot = Self::attribute_slot(mesh, "normal", desc.normal_offset, desc.normal_count,
                                                local[k], self.normals.len())?;
                n += self.normals[slot] * w[k];
            }
            n.try_normalize(1e-8).unwrap_or(geo_normal)
        } else {
            geo_normal
        };

        let uv = if desc.has_uvs() {
            let mut uv = Vector2f::zeros();
            for k in 0..3 {
                let slot = Self::attribute_slot(mesh, "uv", desc.uv_offset, desc.uv_count,
                                                local[k], self.uvs.len())?;
                uv += self.uvs[slot] * w[k];
            }
            uv
        } else {
            Vector2f::zeros()
        };

        let mut point = ShadingPoint { position, normal, geo_normal, uv, material_id: desc.material_id };
        if let Some(instance_index) = hit.instance_index {
            let (instance, transform) = self.instance(instance_index)?;
            if instance.mesh_descriptor_index != mesh {
                return Err(RenderError::InstanceMeshMismatch {
                    instance: instance_index,
                    instance_mesh: instance.mesh_descriptor_index,
                    hit_mesh: mesh,
                });
            }
            point.position = transform.apply_point(point.position);
            point.normal = transform.apply_normal(point.normal).try_normalize(0.0).unwrap_or(point.normal);
            point.geo_normal = transform.apply_normal(point.geo_normal).try_normalize(0.0).unwrap_or(point.geo_normal);
        }
        Ok(point)
    }

    /// Checks every mesh, triangle and instance against the indexing
    /// conventions so a malformed buffer is reported before any frame runs.
    pub fn validate(&self) -> Result<()> {
        for (mesh, desc) in self.descriptors.iter().enumerate() {
            let mesh = mesh as u32;
            if desc.index_count % 3 != 0 {
                return Err(RenderError::PartialTriangle { mesh, index_count: desc.index_count });
            }
            for primitive in 0..desc.triangle_count() {
                for global in self.triangle_indices(mesh, primitive)? {
                    let local = global - desc.vertex_offset;
                    if desc.has_normals() {
                        Self::attribute_slot(mesh, "normal", desc.normal_offset, desc.normal_count,
                                             local, self.normals.len())?;
                    }
                    if desc.has_uvs() {
                        Self::attribute_slot(mesh, "uv", desc.uv_offset, desc.uv_count,
                                             local, self.uvs.len())?;
                    }
                }
            }
        }
        for index in 0..self.instances.len() {
            let (instance, _) = self.instance(index as u32)?;
            self.descriptor(instance.mesh_descriptor_index)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Two meshes in one store. The first quad stores no normals, so the
    // second mesh's normal_offset (0) differs from its vertex_offset (4).
    fn two_quads() -> GeometryStore {
        let positions = vec![
            Vector3f::new(0.0, 0.0, 0.0), Vector3f::new(1.0, 0.0, 0.0),
            Vector3f::new(1.0, 1.0, 0.0), Vector3f::new(0.0, 1.0, 0.0),
            Vector3f::new(0.0, 0.0, 5.0), Vector3f::new(0.0, 0.0, 6.0),
            Vector3f::new(1.0, 0.0, 6.0), Vector3f::new(1.0, 0.0, 5.0),
        ];
        let normals = vec![Vector3f::new(0.0, 1.0, 0.0); 4];
        let uvs = vec![
            Vector2f::new(0.0, 0.0), Vector2f::new(1.0, 0.0),
            Vector2f::new(1.0, 1.0), Vector2f::new(0.0, 1.0),
        ];
        let indices = vec![0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7];
        let descriptors = vec![
            MeshDescriptor { vertex_offset: 0, index_offset: 0, vertex_count: 4, index_count: 6,
                             normal_offset: 0, normal_count: 0, uv_offset: 0, uv_count: 4, material_id: 0 },
            MeshDescriptor { vertex_offset: 4, index_offset: 6, vertex_count: 4, index_count: 6,
                             normal_offset: 0, normal_count: 4, uv_offset: 0, uv_count: 0, material_id: 1 },
        ];
        let instances = vec![
            GeometryInstance { mesh_descriptor_index: 0, transform_index: 0 },
            GeometryInstance { mesh_descriptor_index: 1, transform_index: 1 },
        ];
        let transforms = vec![Transform::default(), Transform::translate(Vector3f::new(0.0, 2.0, 0.0))];
        GeometryStore::from_parts(positions, normals, uvs, indices, descriptors, instances, transforms)
    }

    fn hit(mesh: u32, primitive: u32, b: (Float, Float)) -> HitRecord {
        HitRecord {
            distance: 1.0,
            barycentric: Vector2f::new(b.0, b.1),
            primitive_index: primitive,
            mesh_descriptor_index: mesh,
            instance_index: None,
        }
    }

    #[test]
    fn test_indices_stay_inside_mesh_range_and_rebase_locally() {
        let store = two_quads();
        store.validate().expect("well formed store");
        for (mesh, desc) in store.descriptors().iter().enumerate() {
            for primitive in 0..desc.triangle_count() {
                let tri = store.triangle_indices(mesh as u32, primitive).expect("triangle");
                for global in tri {
                    assert!(global >= desc.vertex_offset);
                    assert!(global < desc.vertex_offset + desc.vertex_count);
                    let local = global - desc.vertex_offset;
                    assert!(local < desc.vertex_count);
                }
            }
        }
    }

    #[test]
    fn test_positions_are_read_through_absolute_indices() {
        let store = two_quads();
        let point = store.resolve(&hit(1, 0, (0.0, 0.0))).expect("resolve");
        // vertex 4, not vertex 4 + vertex_offset
        assert!((point.position - Vector3f::new(0.0, 0.0, 5.0)).norm() < 1e-6);
        assert_eq!(point.material_id, 1);
    }

    #[test]
    fn test_normals_use_local_index_and_uvs_default_to_zero() {
        let store = two_quads();
        let point = store.resolve(&hit(1, 1, (0.3, 0.3))).expect("resolve");
        assert!((point.normal - Vector3f::new(0.0, 1.0, 0.0)).norm() < 1e-6);
        assert_eq!(point.uv, Vector2f::zeros());
    }

    #[test]
    fn test_missing_normals_fall_back_to_face_normal() {
        let store = two_quads();
        let point = store.resolve(&hit(0, 0, (0.2, 0.2))).expect("resolve");
        assert!((point.normal - Vector3f::new(0.0, 0.0, 1.0)).norm() < 1e-6);
        assert_eq!(point.normal, point.geo_normal);
    }

    #[test]
    fn test_barycentric_weights_follow_vertex_order() {
        let store = two_quads();
        // triangle (0, 2, 3): b = (1, 0) selects the second corner, vertex 2
        let at_second = store.resolve(&hit(0, 1, (1.0, 0.0))).expect("resolve");
        assert!((at_second.uv - Vector2f::new(1.0, 1.0)).norm() < 1e-6);
        let at_third = store.resolve(&hit(0, 1, (0.0, 1.0))).expect("resolve");
        assert!((at_third.uv - Vector2f::new(0.0, 1.0)).norm() < 1e-6);
        let centroid = store.resolve(&hit(0, 1, (1.0 / 3.0, 1.0 / 3.0))).expect("resolve");
        assert!((centroid.position - Vector3f::new(1.0 / 3.0, 2.0 / 3.0, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn test_instance_transform_is_applied() {
        let store = two_quads();
        let mut record = hit(1, 0, (0.0, 0.0));
        record.instance_index = Some(1);
        let point = store.resolve(&record).expect("resolve");
        assert!((point.position - Vector3f::new(0.0, 2.0, 5.0)).norm() < 1e-6);
        assert!((point.normal - Vector3f::new(0.0, 1.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_instance_of_another_mesh_is_rejected() {
        let store = two_quads();
        // instance 0 places mesh 0, so it cannot carry a hit on mesh 1
        let mut record = hit(1, 0, (0.0, 0.0));
        record.instance_index = Some(0);
        match store.resolve(&record) {
            Err(RenderError::InstanceMeshMismatch { instance: 0, instance_mesh: 0, hit_mesh: 1 }) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_descriptor_is_fatal() {
        let store = two_quads();
        match store.resolve(&hit(7, 0, (0.0, 0.0))) {
            Err(RenderError::MeshDescriptorOutOfRange { index: 7, count: 2 }) => {}
            other => panic!("unexpected {:?}", other),
        }
        match store.resolve(&hit(0, 2, (0.0, 0.0))) {
            Err(RenderError::PrimitiveOutOfRange { mesh: 0, primitive: 2, triangles: 2 }) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_index_added_offset_twice_is_reported() {
        let mut store = two_quads();
        // a builder that rebased mesh 1 twice would write 8.. instead of 4..
        store.indices[6] = 8;
        assert!(matches!(store.validate(), Err(RenderError::VertexIndexOutOfRange { mesh: 1, index: 8, .. })));
        assert!(store.resolve(&hit(1, 0, (0.0, 0.0))).is_err());
    }

    #[test]
    fn test_index_that_escapes_into_neighbour_mesh_is_reported() {
        let mut store = two_quads();
        // still a valid position, but it belongs to mesh 0
        store.indices[7] = 1;
        assert!(matches!(store.validate(), Err(RenderError::VertexIndexOutOfRange { mesh: 1, index: 1, .. })));
    }

    #[test]
    fn test_short_attribute_array_is_reported() {
        let mut store = two_quads();
        store.normals.truncate(2);
        assert!(matches!(store.validate(),
                         Err(RenderError::AttributeOutOfRange { mesh: 1, attribute: "normal", .. })));
    }

    #[test]
    fn test_bad_instance_transform_is_reported() {
        let mut store = two_quads();
        store.instances[1].transform_index = 9;
        assert!(matches!(store.validate(), Err(RenderError::TransformOutOfRange { index: 9, .. })));
    }
}
