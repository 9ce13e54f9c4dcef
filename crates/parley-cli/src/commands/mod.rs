pub mod config;
pub mod conversations;
pub mod render;
pub mod session;
