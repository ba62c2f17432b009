//! SQLite persistence layer.

pub mod pool;
pub mod turn;

pub use pool::DatabasePool;
pub use turn::SqliteTurnRepository;
