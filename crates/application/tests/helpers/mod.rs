mod mock_stores;

pub use mock_stores::{host, CountingStore, MissingStore};
