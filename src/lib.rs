//! PiInk Fetch - periodic content update for PiInk e-ink signage.
//!
//! One run checks connectivity, downloads the signage image and its XML
//! playlist into a staging folder, points the playlist at a freshly named
//! image, moves both into the folder the display renderer watches and
//! reports the result to a chat webhook.
//!
//! # Example
//!
//! ```no_run
//! use piink_fetch::{net::build_client, Config, Pipeline, TimestampToken, WebhookNotifier};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(std::path::Path::new("piink.toml"))?;
//!     piink_fetch::config::validate_config(&config)?;
//!
//!     let client = build_client()?;
//!     let notifier = WebhookNotifier::from_config(client.clone(), &config);
//!     let report = Pipeline::new(&config, client, &notifier)
//!         .run(TimestampToken::now())
//!         .await?;
//!     println!("{} stage(s) failed", report.failures());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod net;
pub mod notify;
pub mod output;
pub mod pipeline;
pub mod playlist;
pub mod publish;

// Re-exports for convenience
pub use config::{Config, FailurePolicy, PatchMode};
pub use download::Fetcher;
pub use error::{Error, Result};
pub use fs::TimestampToken;
pub use net::ConnectivityProbe;
pub use notify::{Notifier, WebhookNotifier};
pub use pipeline::{Outcome, Pipeline, RunReport, Stage};
pub use playlist::PlaylistPatcher;
pub use publish::Publisher;
