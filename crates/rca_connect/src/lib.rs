mod auth;
pub mod chat;
pub mod commands;
pub mod config;
pub mod llm;
pub mod tracker;
pub mod wiki;
