// src/lib.rs

pub mod app;
pub mod catalog;
pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod wizard;
