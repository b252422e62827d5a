pub mod board;
pub mod cli;
pub mod config;
pub mod logging;
pub mod models;
pub mod render;
pub mod store;

pub use board::Board;
pub use store::Store;
