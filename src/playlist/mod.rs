//! Playlist handling.

pub mod patch;

pub use patch::PlaylistPatcher;
