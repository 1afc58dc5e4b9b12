//! HTTP middleware for the desk server.

pub mod timing;

pub use timing::timing_layer;
