#![warn(clippy::all)]

//! Recipe management backend: create, update, delete and search recipes
//! and the ingredients they use.

pub mod api;
pub mod config;
pub mod database;
pub mod dto;
pub mod logging;
pub mod sample_data;
pub mod service;
