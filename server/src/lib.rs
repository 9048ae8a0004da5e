//! # rookery-server
//!
//! Thin, stateless HTTP wrapper around `rookery-engine`: two POST routes,
//! JSON in, JSON out. All chess knowledge lives in the engine crate; this
//! crate only maps requests onto engine calls and engine errors onto HTTP
//! status codes.

pub mod api;
