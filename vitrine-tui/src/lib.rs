//! VITRINE TUI library exports.

pub mod api_client;
pub mod config;
pub mod error;
pub mod keys;
pub mod notifications;
pub mod state;
pub mod theme;
pub mod views;
pub mod widgets;
