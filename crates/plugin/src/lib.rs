//! The plugin api for Minecraft High Performance Redstone Server.
//!
//! A plugin receives server events through an [`EventHandler`](event::EventHandler)
//! and talks back to the server through a [`ServerContext`](event::ServerContext).
//! Optional services such as economies or permission systems are exposed as
//! capability traits in [`services`].

pub mod event;
pub mod services;

pub use mchprs_text as text;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginDetails {
    pub name: &'static str,
    pub version: &'static str,
}
