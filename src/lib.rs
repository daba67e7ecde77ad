pub mod access;
pub mod app;
pub mod auth;
pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod menu;
pub mod middleware;
pub mod notify;
pub mod session;
pub mod sidebar;
pub mod state;

#[cfg(test)]
pub mod testing;
