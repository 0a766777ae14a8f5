pub mod client;

pub use client::{FetchedPage, RetryingClient};
