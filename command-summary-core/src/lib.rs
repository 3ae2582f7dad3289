#![doc = "command-summary-core: core logic library for command-summary."]

//! This crate holds the report aggregation engine: the append-only result
//! store, the artifact path tree, the report sections and the aggregator that
//! combines them into one markdown document.
//!
//! # Usage
//! Commands record their output with the [`recorder`] functions. A final
//! `generate` step builds an [`aggregator::Aggregator`] and calls
//! [`aggregator::Aggregator::finalize`].

pub mod aggregator;
pub mod config;
pub mod contract;
pub mod error;
pub mod links;
pub mod path_tree;
pub mod persist;
pub mod recorder;
pub mod result_store;
pub mod scan;
pub mod sections;

pub use error::{Result, SummaryError};
