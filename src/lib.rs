//! `chroma-bench` is a small command-line test bench for Chroma vector databases.
//!
//! It provides the components for:
//! - Resolving connection settings from env files and the environment (`config`)
//! - Talking to a Chroma server over its REST API, or to a local on-disk store (`client`)
//! - Creating, deleting, listing, peeking into, searching and describing collections (`cli`)
//! - Error handling (`error`)
//!
//! ## Overview
//!
//! Every command goes through [`chroma_client_trait::ChromaClientTrait`]. The binary
//! resolves a [`config::ConnectionProfile`], builds the matching client with
//! [`client::build_client`], runs [`cli::handle_command`] and renders the outcome with
//! [`cli::formatters::report`]. With no `CHROMA_HOST` or `CHROMA_URL` configured the
//! tool falls back to a persistent store under `./chroma_data`.

/// Trait defining the interface for a Chroma client, enabling mocking.
pub mod chroma_client_trait;
/// Command-line interface definition, handlers and output formatting.
pub mod cli;
/// Concrete Chroma clients (remote HTTP and local persistent).
pub mod client;
/// Connection settings resolution.
pub mod config;
/// Shared constants.
pub mod constants;
/// Defines the core error types and Result alias.
pub mod error;
/// Collection creation settings (distance metric and embedding tags).
pub mod settings;
/// Small text helpers.
pub mod utils;

pub use chroma_client_trait::{ChromaClientTrait, CollectionRef, QueryHit, Record};
pub use client::{build_client, HttpChromaClient, LocalChromaClient};
pub use config::{load_config, ConnectionMode, ConnectionProfile};
pub use error::{ChromaBenchError, Result};
pub use settings::{CollectionSettings, DistanceMetric, EmbeddingProvider};
