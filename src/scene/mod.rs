pub mod model;
pub mod transform;

pub use model::{MeshNode, Model, NodeKey};
pub use transform::Transform;
