pub mod app;
pub mod assets;
pub mod config;
pub mod engine;
pub mod error;
pub mod menubar;
pub mod renderer;
pub mod surface;
pub mod timer;
pub mod types;
