mod resolve_mesh_query;

pub use resolve_mesh_query::{resolve, MeshAnswer, ResolveMeshQueryUseCase};
