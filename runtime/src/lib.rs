// Copyright 2026 UAF Calculator Contributors
// SPDX-License-Identifier: MIT

//! uafcalc runtime: portal acquisition, page extraction, and the service
//! boundary (REST and CLI) over the `uafcalc-grades` engine.

pub mod acquisition;
pub mod cli;
pub mod config;
pub mod error;
pub mod extraction;
pub mod renderer;
pub mod rest;
pub mod service;
pub mod trust;

pub use config::{PortalConfig, ServerConfig, StrategyKind};
pub use error::{ScrapeError, ScrapeResult};
pub use service::{ApiResponse, ResultReport, ResultService, ServiceError};
