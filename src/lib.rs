//! Promotion Planner Library
//!
//! Estimates the likely outcome of a proposed retail promotion: success
//! probability, sales lift, projected revenue, cost and ROI, a go/no-go
//! verdict, and a comparison across alternative discount levels.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod errors;
pub mod ml;
pub mod models;
pub mod queries;
pub mod services;

pub use errors::{Remedy, ServiceError};
pub use models::{PromotionRequest, Verdict};
pub use services::{PromotionEstimate, PromotionPlan, PromotionRoiEstimator};
