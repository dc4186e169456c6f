// Copyright @yucwang 2026

pub mod microfacet;
pub mod principled;
