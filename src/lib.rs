pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod moderation;
pub mod panel;
pub mod sites;
pub mod validate;
pub mod web;
pub mod widget;

pub use error::ClientError;
