// Copyright @yucwang 2026

use crate::math::aabb::AABB;
use crate::math::constants::{Float, Vector3f};
use crate::math::ray::Ray3f;

const SAH_BUCKETS: usize = 12;
const DEFAULT_MAX_LEAF_SIZE: usize = 4;

#[derive(Debug, Clone)]
enum BvhNode {
    Leaf { bounds: AABB, start: usize, count: usize },
    Interior { bounds: AABB, axis: usize, left: usize, right: usize },
}

impl BvhNode {
    fn bounds(&self) -> &AABB {
        match self {
            BvhNode::Leaf { bounds, .. } | BvhNode::Interior { bounds, .. } => bounds,
        }
    }
}

/// SAH bounding volume hierarchy over opaque primitives. It only knows
/// primitive bounds; the actual primitive test is supplied by the caller.
#[derive(Debug, Clone)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
    order: Vec<usize>,
    prim_bounds: Vec<AABB>,
    prim_centroids: Vec<Vector3f>,
    max_leaf_size: usize,
}

impl Bvh {
    pub fn new(prim_bounds: Vec<AABB>) -> Self {
        Self::with_max_leaf_size(prim_bounds, DEFAULT_MAX_LEAF_SIZE)
    }

    pub fn with_max_leaf_size(prim_bounds: Vec<AABB>, max_leaf_size: usize) -> Self {
        let prim_centroids = prim_bounds.iter().map(|b| b.center()).collect();
        let mut bvh = Self {
            nodes: Vec::new(),
            order: (0..prim_bounds.len()).collect(),
            prim_bounds,
            prim_centroids,
            max_leaf_size: max_leaf_size.max(1),
        };

        if !bvh.order.is_empty() {
            bvh.build(0, bvh.order.len());
        }
        log::debug!("BVH: {} primitives, {} nodes.", bvh.order.len(), bvh.nodes.len());
        bvh
    }

    pub fn primitive_count(&self) -> usize {
        self.order.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn bounds(&self) -> AABB {
        self.nodes.first().map(|n| *n.bounds()).unwrap_or_default()
    }

    /// Closest hit. `hit_fn` tests one primitive against the ray and returns
    /// a payload with its distance; the ray it receives is already clipped to
    /// the closest distance found so far.
    pub fn closest_hit<F, T>(&self, ray: &Ray3f, mut hit_fn: F) -> Option<(usize, T)>
    where
        F: FnMut(usize, &Ray3f) -> Option<(T, Float)>,
    {
        if self.nodes.is_empty() {
            return None;
        }

        let mut ray = *ray;
        let mut closest: Option<(usize, T)> = None;
        let mut stack = vec![0usize];

        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx];
            if !node.bounds().ray_intersect(&ray) {
                continue;
            }

            match *node {
                BvhNode::Leaf { start, count, .. } => {
                    for &prim_idx in &self.order[start..start + count] {
                        if let Some((hit, t)) = hit_fn(prim_idx, &ray) {
                            if ray.update(t) {
                                closest = Some((prim_idx, hit));
                            }
                        }
                    }
                }
                BvhNode::Interior { axis, left, right, .. } => {
                    // Visit the child on the ray's near side first.
                    if ray.dir()[axis] < 0.0 {
                        stack.push(left);
                        stack.push(right);
                    } else {
                        stack.push(right);
                        stack.push(left);
                    }
                }
            }
        }

        closest
    }

    /// Any hit; stops at the first primitive `hit_fn` accepts.
    pub fn any_hit<F>(&self, ray: &Ray3f, mut hit_fn: F) -> bool
    where
        F: FnMut(usize, &Ray3f) -> bool,
    {
        if self.nodes.is_empty() {
            return false;
        }

        let mut stack = vec![0usize];
        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx];
            if !node.bounds().ray_intersect(ray) {
                continue;
            }
            match *node {
                BvhNode::Leaf { start, count, .. } => {
                    if self.order[start..start + count].iter().any(|&prim_idx| hit_fn(prim_idx, ray)) {
                        return true;
                    }
                }
                BvhNode::Interior { left, right, .. } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }

        false
    }

    fn bucket_of(&self, prim_idx: usize, axis: usize, axis_min: Float, axis_extent: Float) -> usize {
        let c = self.prim_centroids[prim_idx][axis];
        let b = ((c - axis_min) / axis_extent * SAH_BUCKETS as Float) as usize;
        b.min(SAH_BUCKETS - 1)
    }

    fn push_leaf(&mut self, bounds: AABB, start: usize, count: usize) -> usize {
        self.nodes.push(BvhNode::Leaf { bounds, start, count });
        self.nodes.len() - 1
    }

    fn build(&mut self, start: usize, end: usize) -> usize {
        let (bounds, centroid_bounds) = self.compute_bounds(start, end);
        let count = end - start;
        if count <= self.max_leaf_size {
            return self.push_leaf(bounds, start, count);
        }

        let axis = centroid_bounds.max_extent();
        let axis_min = centroid_bounds.p_min[axis];
        let axis_extent = centroid_bounds.p_max[axis] - axis_min;
        if axis_extent < 1e-6 {
            return self.push_leaf(bounds, start, count);
        }

        let mut buckets = [(0usize, AABB::default()); SAH_BUCKETS];
        for i in start..end {
            let idx = self.order[i];
            let b = self.bucket_of(idx, axis, axis_min, axis_extent);
            buckets[b].0 += 1;
            buckets[b].1.expand_by_aabb(&self.prim_bounds[idx]);
        }

        // Prefix/suffix sweeps give the SAH cost of every bucket boundary.
        let area = bounds.surface_area().max(1e-6);
        let mut below = [(0usize, AABB::default()); SAH_BUCKETS];
        let mut running = (0usize, AABB::default());
        for (i, bucket) in buckets.iter().enumerate() {
            running.0 += bucket.0;
            running.1.expand_by_aabb(&bucket.1);
            below[i] = running;
        }
        let mut best: Option<(usize, Float)> = None;
        let mut above = (0usize, AABB::default());
        for split in (0..SAH_BUCKETS - 1).rev() {
            above.0 += buckets[split + 1].0;
            above.1.expand_by_aabb(&buckets[split + 1].1);
            let (count0, b0) = below[split];
            let cost0 = if count0 > 0 { count0 as Float * b0.surface_area() } else { 0.0 };
            let cost1 = if above.0 > 0 { above.0 as Float * above.1.surface_area() } else { 0.0 };
            let cost = 1.0 + (cost0 + cost1) / area;
            if best.map_or(true, |(_, c)| cost < c) {
                best = Some((split, cost));
            }
        }

        let (split, cost) = match best {
            Some(b) => b,
            None => return self.push_leaf(bounds, start, count),
        };
        if cost >= count as Float {
            return self.push_leaf(bounds, start, count);
        }

        let mut mid = start;
        for i in start..end {
            if self.bucket_of(self.order[i], axis, axis_min, axis_extent) <= split {
                self.order.swap(i, mid);
                mid += 1;
            }
        }
        if mid == start || mid == end {
            return self.push_leaf(bounds, start, count);
        }

        let node_idx = self.push_leaf(bounds, start, 0);
        let left = self.build(start, mid);
        let right = self.build(mid, end);
        self.nodes[node_idx] = BvhNode::Interior { bounds, axis, left, right };
        node_idx
    }

    fn compute_bounds(&self, start: usize, end: usize) -> (AABB, AABB) {
        let mut bounds = AABB::default();
        let mut centroid_bounds = AABB::default();
        for &idx in &self.order[start..end] {
            bounds.expand_by_aabb(&self.prim_bounds[idx]);
            centroid_bounds.expand_by_point(&self.prim_centroids[idx]);
        }
        (bounds, centroid_bounds)
    }
}
