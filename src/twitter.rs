//! X/Twitter API clients and services for fetching posts over HTTP.

pub mod client;
pub mod extract;
pub mod post;
pub mod service;

pub use client::PostClient;
pub use extract::{ExtractMode, extract};
pub use post::{Article, Post, PostResponse, Resolved};
pub use service::{FxTwitterService, Service, ViewerService};
