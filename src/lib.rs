//! Wallpaper widget compositor.
//!
//! Renders calendar, to-do, notes and clock widgets onto a user-supplied
//! background photo and saves the result as a lossless desktop wallpaper.

pub mod analyze;
pub mod compositor;
pub mod config;
pub mod geometry;
pub mod interfaces;
pub mod logging;
pub mod models;
pub mod panel;
pub mod storage;
pub mod text;
pub mod widgets;
