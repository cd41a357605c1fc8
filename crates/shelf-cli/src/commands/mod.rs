//! Command handlers

pub mod books;
pub mod config;
