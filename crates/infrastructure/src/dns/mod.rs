pub mod chain;
pub mod forwarding;
pub mod server;
pub mod transport;

pub use chain::{
    ForwardStage, MeshStage, QueryStage, ResolutionChain, ResponseLogStage,
};
pub use server::DnsServerHandler;
