//! Godot project descriptor maintenance and engine release discovery

pub mod config;
pub mod descriptor;
pub mod feed;
pub mod logging;
pub mod project;
pub mod version;
