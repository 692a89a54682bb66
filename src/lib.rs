pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod flash;
pub mod repo;
pub mod state;
pub mod students;
pub mod views;
