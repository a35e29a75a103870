pub mod repositories;

pub use repositories::MockStoreRepo;
