//! HTTP middleware applied by [`crate::routes::app_router`].

pub mod tracing;
