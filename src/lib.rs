pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod resolver;
pub mod services;
pub mod store;

#[cfg(test)]
pub mod testing;
