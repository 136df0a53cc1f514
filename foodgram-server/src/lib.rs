//! Foodgram: a recipe sharing service.
//!
//! Authors publish recipes built from shared reference data (tags and ingredients). Readers
//! filter and search them, keep favorites, subscribe to authors, and download a shopping list
//! summed up from everything in their cart.

pub mod auth;
pub mod cache;
pub mod config;
pub mod database;
pub mod errors;
pub mod filters;
pub mod models;
pub mod pagination;
pub mod routes;
pub mod search;
pub mod shopping_list;
