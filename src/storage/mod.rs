pub mod memory;
pub mod postgres;
pub mod traits;

pub use memory::InMemoryEstateStore;
pub use postgres::PgEstateStore;
pub use traits::{EstateStore, UPSERT_COLUMNS};
