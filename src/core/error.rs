// Copyright @yucwang 2026

use thiserror::Error;

/// Conditions that make a frame unrenderable. Numerical corner cases inside
/// the integrator never end up here.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("mesh descriptor {index} out of range ({count} descriptors)")]
    MeshDescriptorOutOfRange { index: u32, count: usize },

    #[error("geometry instance {index} out of range ({count} instances)")]
    InstanceOutOfRange { index: u32, count: usize },

    #[error("hit names mesh descriptor {hit_mesh} but instance {instance} places mesh descriptor {instance_mesh}")]
    InstanceMeshMismatch { instance: u32, instance_mesh: u32, hit_mesh: u32 },

    #[error("transform {index} out of range ({count} transforms)")]
    TransformOutOfRange { index: u32, count: usize },

    #[error("primitive {primitive} out of range for mesh descriptor {mesh} ({triangles} triangles)")]
    PrimitiveOutOfRange { mesh: u32, primitive: u32, triangles: u32 },

    #[error("index slot {slot} outside the global index array (length {len}) for mesh descriptor {mesh}")]
    IndexSlotOutOfRange { mesh: u32, slot: usize, len: usize },

    #[error("vertex index {index} outside [{start}, {end}) for mesh descriptor {mesh}")]
    VertexIndexOutOfRange { mesh: u32, index: u32, start: u32, end: u32 },

    #[error("{attribute} slot {slot} outside the global {attribute} array (length {len}) for mesh descriptor {mesh}")]
    AttributeOutOfRange { mesh: u32, attribute: &'static str, slot: usize, len: usize },

    #[error("mesh descriptor {mesh} has index count {index_count}, which is not a whole number of triangles")]
    PartialTriangle { mesh: u32, index_count: u32 },

    #[error("material {id} out of range ({count} materials)")]
    MaterialOutOfRange { id: u32, count: usize },

    #[error("intersection service failed: {0}")]
    IntersectionService(String),

    #[error("accumulation buffer is {actual:?} but the sensor renders {expected:?}")]
    ResolutionMismatch { expected: (usize, usize), actual: (usize, usize) },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Exr(#[from] exr::error::Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;
