//! Content-similarity recommendation service
//!
//! Serves "titles similar to X" by ranking a candidate pool against the
//! target with TF-IDF cosine similarity over TMDB metadata, caching ranked
//! results in Redis with confidence-tiered TTLs, and precomputing results
//! for the popular catalog through a cursor-driven batch endpoint.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
