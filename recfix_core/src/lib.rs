// src/lib.rs
//! RecFix core: turn a handful of seed videos into a ranked list of related
//! videos, and export a selection of them as a private playlist.
//!
//! The pipeline is [`resolver`] → [`fetcher`] (with its [`cache`]) →
//! [`orchestrator`] → [`ranker`] → [`playlist`]. All network access goes
//! through the [`api::VideoPlatform`] trait; [`ops`] wraps the pipeline in a
//! closed set of typed requests and [`transport`] serves those over stdio.
pub mod api;
pub mod auth_store;
pub mod cache;
pub mod config;
pub mod credentials;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod ops;
pub mod orchestrator;
pub mod playlist;
pub mod ranker;
pub mod resolver;
pub mod retry;
pub mod scrape;
pub mod transport;

pub use api::{VideoPlatform, YouTubeClient};
pub use config::RecFixConfig;
pub use credentials::{BearerToken, CredentialProvider};
pub use error::{RecFixError, Result};
pub use fetcher::RelatedFetcher;
pub use models::{AggregateReport, SaveSummary, VideoCandidate, VideoId};
pub use ops::{RecFixService, Request, Response};
pub use orchestrator::BatchOrchestrator;
pub use playlist::PlaylistWriter;
pub use ranker::rank;
pub use resolver::resolve;
pub use retry::RetryPolicy;
