//! Storefront HTTP service: catalog reads shaped for the listing and product
//! pages.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
