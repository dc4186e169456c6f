// Copyright @yucwang 2026

pub mod mesh_intersector;
pub mod triangle;
