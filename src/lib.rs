use std::error::Error;

pub mod api;
pub mod auth;
pub mod config;
pub mod content;
pub mod error;
pub mod github;
pub mod handler;
pub mod index;
pub mod model;
pub mod sync;

/// Flattens an error and its source chain into one diagnostic string.
pub fn unpack_error(err: &(dyn Error)) -> String {
    let mut parts = Vec::new();
    parts.push(err.to_string());
    let mut current = err.source();
    while let Some(source) = current {
        parts.push(source.to_string());
        current = source.source();
    }
    parts.join(": ")
}
