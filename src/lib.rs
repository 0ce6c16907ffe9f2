//! Relay a YouTube video's view count into a Discord channel on a fixed
//! schedule. The destination is chosen at runtime with `/setchannel`.

pub mod actors;
pub mod commands;
pub mod config;
pub mod discord;
pub mod error;
pub mod notification;
pub mod registry;
pub mod util;
pub mod youtube;
