//! Library exports for the shortener client
//!
//! This module exposes the validator, the response normalizer, the shortening client,
//! the persisted history and the companion service wiring.

pub mod client;
pub mod config;
pub mod database;
pub mod error;
pub mod handler;
pub mod history;
pub mod model;
pub mod normalize;
pub mod route;
pub mod state;
pub mod validate;
