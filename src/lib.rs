//! Library exports for the portfolio API
//!
//! This module exposes internal components for testing and potential library usage.

pub mod config;
pub mod contact;
pub mod database;
pub mod error;
pub mod fallback;
pub mod geo;
pub mod handler;
pub mod model;
pub mod portfolio;
pub mod recorder;
pub mod route;
pub mod state;
