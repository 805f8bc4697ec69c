pub mod auth;
pub mod config;
pub mod db;
pub mod deck;
pub mod errors;
pub mod generation;
pub mod graph;
pub mod handlers;
pub mod images;
pub mod keywords;
pub mod models;
pub mod render;
