//! # Storecast
//!
//! A sales forecasting pipeline for retail data: feature engineering,
//! sampling, chunked batch prediction with progress reporting, and model
//! export, driven by a single CLI binary.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌────────────┐   ┌───────────────────────┐
//! │ CSV data │──▶│ Transform  │──▶│ Train (grid + split)  │──▶ model.json
//! └──────────┘   │ (features) │   └───────────────────────┘
//!                └─────┬──────┘
//!                      │ serving
//!        ┌─────────┐   ▼   ┌───────────────────┐   ┌────────┐
//!        │ Sampler │──────▶│ Batched Predictor │──▶│ Views  │
//!        └─────────┘       │ (progress chunks) │   └────────┘
//!                          └───────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! storecast train                   # fit and save the model
//! storecast describe                # inspect the serving dataset
//! storecast predict --rows 1000    # sample, transform, predict
//! storecast export -o SalesML.json # build the deployment artifact
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`dataset`] | CSV loading and writing |
//! | [`transform`] | Feature engineering |
//! | [`sample`] | Bounded-size row selection |
//! | [`predict`] | Chunked batch prediction |
//! | [`progress`] | Progress reporting |
//! | [`model`] | Model trait, regressors, persistence |
//! | [`train`] | Split, grid search, fit |
//! | [`stats`] | Column summaries |
//! | [`view`] | Presentation view-models |
//! | [`export`] | Deployment artifact export |

pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod forecast;
pub mod model;
pub mod models;
pub mod predict;
pub mod progress;
pub mod sample;
pub mod stats;
pub mod train;
pub mod transform;
pub mod view;
