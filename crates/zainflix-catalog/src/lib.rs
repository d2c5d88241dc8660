pub mod client;
pub mod error;
pub mod generation;
pub mod videos;

pub use client::CatalogClient;
pub use error::CatalogError;
pub use generation::{RequestGeneration, Ticket};
pub use videos::select_best_video;
