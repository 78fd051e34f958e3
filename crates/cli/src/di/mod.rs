mod chain;

pub use chain::build_chain;
