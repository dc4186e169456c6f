// Copyright 2020 @TwoCookingMice

use super::constants::{ Matrix4f, Vector3f };

/// Affine instance transform. The inverse is cached because normals are
/// carried through its transpose.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    matrix: Matrix4f,
    inv_matrix: Matrix4f
}

impl Default for Transform {
    fn default() -> Self {
        Self { matrix: Matrix4f::identity(),
               inv_matrix: Matrix4f::identity() }
    }
}

impl Transform {
    /// Returns `None` for a singular matrix.
    pub fn new(matrix: Matrix4f) -> Option<Self> {
        let inv_matrix = matrix.try_inverse()?;
        Some(Self { matrix, inv_matrix })
    }

    pub fn translate(offset: Vector3f) -> Self {
        Self { matrix: Matrix4f::new_translation(&offset),
               inv_matrix: Matrix4f::new_translation(&(-offset)) }
    }

    pub fn matrix(&self) -> &Matrix4f {
        &self.matrix
    }

    pub fn apply_point(&self, p: Vector3f) -> Vector3f {
        let h = self.matrix * p.push(1.0);
        if h.w != 0.0 && h.w != 1.0 {
            h.xyz() / h.w
        } else {
            h.xyz()
        }
    }

    pub fn apply_vector(&self, v: Vector3f) -> Vector3f {
        (self.matrix * v.push(0.0)).xyz()
    }

    // Normal transformation is different from point transformation.
    // Before transformation, we have n^Tx = 0
    // After transformation, we have (Sn)^T(Mx) = 0
    // Then, we will get: S = (M^{-1})^T
    pub fn apply_normal(&self, n: Vector3f) -> Vector3f {
        (self.inv_matrix.transpose() * n.push(0.0)).xyz()
    }
}
