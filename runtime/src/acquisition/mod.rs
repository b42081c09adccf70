//! Upstream acquisition for both portals.
//!
//! Raw HTTP and browser access, the fixed-delay retry policy, and the two
//! fetchers that combine them with extraction.

pub mod attendance_fetcher;
pub mod browser;
pub mod http_client;
pub mod result_fetcher;
pub mod retry;
pub mod strategy;

pub use attendance_fetcher::AttendanceFetcher;
pub use result_fetcher::{build_strategy, ResultFetcher};
pub use retry::RetryPolicy;
pub use strategy::{FetchStrategy, HttpStrategy};
