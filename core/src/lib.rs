//! Async API client core for the job tracker backend.
//!
//! # Overview
//! `ResourceClient` issues authenticated JSON requests against the job
//! tracker REST API: clients, contacts, jobs, invoices, expenses, research
//! leads, notes, the time clock and dashboard summaries. Each call is one
//! self-contained envelope with a fresh bearer token and a fixed timeout;
//! failures surface as `ApiError` and are never retried.
//!
//! # Design
//! - Envelopes are built and responses parsed by plain functions
//!   (`build_request`, `parse_json`, ...), with the network round trip in
//!   between, so the I/O boundary is explicit and the halves test offline.
//! - Credentials come from an injected `CredentialProvider`; there is no
//!   global token state.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.
//! - `Observable` and `Kiosk` carry the screen-side state that callers
//!   subscribe to.

mod api;
pub mod client;
pub mod codec;
pub mod config;
pub mod credentials;
pub mod error;
pub mod http;
pub mod kiosk;
pub mod observable;
pub mod types;

pub use client::ResourceClient;
pub use config::ClientConfig;
pub use credentials::{CredentialProvider, StaticToken, TokenSource};
pub use error::{ApiError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use kiosk::{Kiosk, KioskState};
pub use observable::{Observable, Subscription};
