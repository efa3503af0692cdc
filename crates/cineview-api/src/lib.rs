//! API client library for cineview.
//!
//! Provides a client for the TMDB API v3 and the image URL resolver.

/// TMDB API client.
pub mod tmdb;
