// Copyright @yucwang 2026

use crate::core::bvh::Bvh;
use crate::core::error::Result;
use crate::core::geometry::{GeometryStore, HitRecord};
use crate::core::intersection::IntersectionService;
use crate::math::ray::Ray3f;
use crate::shapes::triangle::Triangle;

#[derive(Debug, Clone, Copy)]
struct PrimitiveRef {
    triangle: Triangle,
    mesh_descriptor_index: u32,
    primitive_index: u32,
    instance_index: Option<u32>,
}

/// Intersection service over a flattened, world-space copy of every triangle.
/// Meshes referenced by instances are placed once per instance; meshes with
/// no instance are taken to be in world space already.
pub struct BvhIntersector {
    primitives: Vec<PrimitiveRef>,
    bvh: Bvh,
}

impl BvhIntersector {
    pub fn new(geometry: &GeometryStore) -> Result<Self> {
        let mut primitives = Vec::new();
        let mut instanced = vec![false; geometry.descriptors().len()];

        for instance_index in 0..geometry.instances().len() as u32 {
            let (instance, transform) = geometry.instance(instance_index)?;
            let mesh = instance.mesh_descriptor_index;
            let desc = geometry.descriptor(mesh)?;
            instanced[mesh as usize] = true;
            for primitive in 0..desc.triangle_count() {
                let [p0, p1, p2] = geometry.triangle_positions(mesh, primitive)?;
                primitives.push(PrimitiveRef {
                    triangle: Triangle::new(transform.apply_point(p0),
                                            transform.apply_point(p1),
                                            transform.apply_point(p2)),
                    mesh_descriptor_index: mesh,
                    primitive_index: primitive,
                    instance_index: Some(instance_index),
                });
            }
        }

        for (mesh, desc) in geometry.descriptors().iter().enumerate() {
            if instanced[mesh] {
                continue;
            }
            for primitive in 0..desc.triangle_count() {
                let [p0, p1, p2] = geometry.triangle_positions(mesh as u32, primitive)?;
                primitives.push(PrimitiveRef {
                    triangle: Triangle::new(p0, p1, p2),
                    mesh_descriptor_index: mesh as u32,
                    primitive_index: primitive,
                    instance_index: None,
                });
            }
        }

        let bvh = Bvh::new(primitives.iter().map(|p| p.triangle.bounding_box()).collect());
        log::info!("BvhIntersector: {} triangles, {} nodes.", bvh.primitive_count(), bvh.node_count());
        Ok(Self { primitives, bvh })
    }

    pub fn triangle_count(&self) -> usize {
        self.primitives.len()
    }
}

impl IntersectionService for BvhIntersector {
    fn trace(&self, ray: &Ray3f) -> Result<Option<HitRecord>> {
        let hit = self.bvh.closest_hit(ray, |i, r| {
            self.primitives[i].triangle.ray_intersection(r).map(|h| (h, h.t))
        });
        Ok(hit.map(|(i, h)| {
            let prim = &self.primitives[i];
            HitRecord {
                distance: h.t,
                barycentric: h.barycentric,
                primitive_index: prim.primitive_index,
                mesh_descriptor_index: prim.mesh_descriptor_index,
                instance_index: prim.instance_index,
            }
        }))
    }

    fn occluded(&self, ray: &Ray3f) -> Result<bool> {
        Ok(self.bvh.any_hit(ray, |i, r| self.primitives[i].triangle.ray_intersection(r).is_some()))
    }
}
