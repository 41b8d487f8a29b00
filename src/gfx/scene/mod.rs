pub mod line;
pub mod model;
pub mod object;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use line::ArrowBatch;
pub use model::{DrawModel, Mesh, Model};
pub use object::SceneObject;
pub use scene::Scene;
