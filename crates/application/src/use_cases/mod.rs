pub mod mesh;

// Re-export use cases
pub use mesh::{resolve, MeshAnswer, ResolveMeshQueryUseCase};
