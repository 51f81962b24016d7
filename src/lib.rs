//! Topic post generator library.
//!
//! Looks up recent headlines for a topic, feeds them to a chat completion
//! model, and serves the resulting post over HTTP.

pub mod config;
pub mod constants;
pub mod news;
pub mod pipeline;
pub mod synth;
pub mod web;
