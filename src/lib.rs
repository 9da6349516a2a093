pub mod api;
pub mod auth;
pub mod chatbot;
pub mod config;
pub mod db;
pub mod error;
pub mod messages;
pub mod models;
pub mod moderation;
pub mod state;
