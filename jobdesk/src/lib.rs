//! # jobdesk: admin data layer for a job-portal dashboard
//!
//! `jobdesk` is the headless data layer behind a job-portal admin dashboard:
//! job listing CRUD, application review, applicant messaging, and user
//! management, all backed by a managed backend-as-a-service. The crate owns no
//! data - it holds transient snapshots of remote collections and coordinates
//! mutations against the remote system of record. A presentation layer embeds
//! it and renders whatever the derivation layer produces.
//!
//! ## Architecture
//!
//! The **gateway** ([`gateway`]) is a [reqwest](https://github.com/seanmonstar/reqwest)-based
//! client for the four backend surfaces: PostgREST-style collection endpoints,
//! the privileged auth-admin API, object storage, and invocable functions.
//! Each surface sits behind a trait so the rest of the crate can be exercised
//! against in-memory fakes.
//!
//! The **store** ([`store`]) holds the last-fetched snapshot of each
//! collection together with UI-only parameters (search strings, status filter,
//! sort configuration, compose state). Snapshots carry fetch sequence tokens
//! so out-of-order responses from concurrent refetches are dropped instead of
//! clobbering newer data.
//!
//! The **derivation layer** ([`view`]) is pure: filtering, sorting, and the
//! aggregate dashboard statistics are all computed from snapshots without
//! touching them.
//!
//! The **coordinator** ([`coordinator`]) wraps every mutation in a fixed
//! discipline - remote call, refetch of the owning collection, notification -
//! with two optimistic message operations as the only exceptions. It also owns
//! the three-tier user listing fallback and the best-effort reply email
//! side-channel.
//!
//! ## Quick start
//!
//! ```no_run
//! use jobdesk::config::Config;
//! use jobdesk::coordinator::{AdminContext, Coordinator};
//! use jobdesk::gateway::Gateway;
//! use jobdesk::notify::TracingNotifier;
//! use std::sync::Arc;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::load("jobdesk.yaml")?;
//! let gateway = Gateway::from_config(&config.gateway);
//! let admin = AdminContext {
//!     id: uuid::Uuid::new_v4(),
//!     email: "admin@example.com".to_string(),
//!     full_name: None,
//! };
//! let mut coordinator = Coordinator::from_gateway(&gateway, &config, admin, Arc::new(TracingNotifier));
//! coordinator.refresh_all().await;
//! let stats = coordinator.stats(chrono::Utc::now());
//! println!("{} open listings", stats.active);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod coordinator;
pub mod email;
pub mod errors;
pub mod gateway;
pub mod models;
pub mod notify;
pub mod store;
pub mod telemetry;
pub mod types;
pub mod view;

pub use config::Config;
pub use coordinator::{AdminContext, Coordinator};
pub use errors::{Error, Result};
pub use gateway::Gateway;
pub use notify::{Notification, Notifier, Severity};
