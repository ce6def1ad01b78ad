//! Content-based movie recommendations.
//!
//! An offline build turns each movie's genre text into a TF-IDF vector and
//! stores the pairwise cosine-similarity matrix. The server loads that model
//! once and ranks similar titles for HTTP and voice-assistant clients.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod model;
pub mod models;
pub mod services;
