pub mod api;
pub mod charge;
pub mod config;
pub mod error;
pub mod loader;
pub mod presets;
pub mod render;
pub mod solver;
pub mod util;
// cmd and reports belong to the binary (main.rs).
