//! Test doubles for the external collaborators.

mod fixtures;
mod mock_encoder;
mod mock_fetcher;
mod mock_store;

pub use fixtures::test_state;
pub use mock_encoder::MockEncoder;
pub use mock_fetcher::MockFetcher;
pub use mock_store::MockObjectStore;
