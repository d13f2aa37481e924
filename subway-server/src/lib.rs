//! Subway line server.
//!
//! A web application that manages subway lines as chains of directed,
//! distance-weighted segments, keeping every line a single path while
//! stations are inserted and removed.

pub mod config;
pub mod domain;
pub mod lines;
pub mod stations;
pub mod web;
