//! Resolves free-text technology names to catalog releases and reports
//! their lifecycle data.

pub mod app;
pub mod cli;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;

#[cfg(test)]
mod testing;
