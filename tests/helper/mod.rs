//! Shared fixtures for integration tests
#![allow(dead_code)]

mod feed;
mod project;

pub use feed::{MemoryFeed, atom_feed, rss_feed};
pub use project::{GODOT_3_PROJECT, GODOT_4_PROJECT, create_project, dir_entries};
