// Cinder: sentiment intelligence for Reddit.
//
// This is the library root. Each module corresponds to one stage of the
// fetch -> analyze -> aggregate pipeline, plus the web layer that exposes it.

pub mod aggregate;
pub mod config;
pub mod insight;
pub mod reddit;
pub mod web;
