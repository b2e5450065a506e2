pub mod app;
pub mod auth;
pub mod config;
pub mod recipes;
pub mod state;
