pub mod database;
pub mod memory;
pub mod metrics;
pub mod store;

pub use database::MongoCartStore;
pub use memory::InMemoryCartStore;
pub use metrics::{get_metrics, init_metrics};
pub use store::{CartStore, StoreError};
