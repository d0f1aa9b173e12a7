//! Mesh compiler (extracted mesh -> engine-space vertices, materials, tags)

mod compile;
mod material;
mod types;

pub use compile::compile;
pub use types::{Material, MaterialProperty, Mesh, Tag, Triangle, Vertex, Weight};
