//! Browsing engine for cineview.
//!
//! Owns everything between the TMDB client and the terminal: the content
//! model, paginated carousels, the detail overlay, routes, and the fetch
//! scopes that tie background requests to whatever is currently mounted.

pub mod browser;
pub mod carousel;
pub mod content;
pub mod fetch;
pub mod loadable;
pub mod overlay;
pub mod pages;
pub mod route;
pub mod selection;

#[cfg(test)]
pub(crate) mod testing;
