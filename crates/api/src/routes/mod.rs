//! HTTP Route Handlers

pub mod predict;
