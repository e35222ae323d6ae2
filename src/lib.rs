//! Application menu for a desktop panel, with an incremental type-ahead
//! search over every installed application.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod executor;
pub mod host;
pub mod icons;
pub mod index;
pub mod keys;
pub mod matcher;
pub mod menu;
pub mod model;
pub mod plugin;
pub mod session;
pub mod sources;
pub mod view;
