//! Session store contract and chat orchestration.

pub mod repository;
pub mod service;

pub use repository::TurnRepository;
pub use service::ChatService;
