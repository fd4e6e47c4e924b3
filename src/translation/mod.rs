//! Translation resolution layer
//!
//! Resolves which translation package a project should get for a target
//! software version, and whether a site's installed translation is stale.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ RecordStore │────▶│ ResultCache │◀────│   Catalog   │──▶ catalog
//! │   (query)   │     │ (TTL, empty)│     │  (builder)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            ▲
//!                            │
//!                     ┌─────────────┐     ┌─────────────┐
//!                     │   Finder    │────▶│  Decision   │──▶ update list
//!                     │ (per lang)  │     │  (staleness)│
//!                     └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`availability`]: whether a built package exists
//! - [`cache`]: TTL result cache with an empty sentinel
//! - [`catalog`]: newest compatible translation per language, ISO ordered
//! - [`decision`]: staleness policies for update checks
//! - [`error`]: error types for store and cache collaborators
//! - [`finder`]: best language pack per requested language
//! - [`locale`]: locale metadata lookup
//! - [`store`]: translation record store
//! - [`timestamp`]: lenient date parsing
//! - [`types`]: records, catalog entries and pack candidates
//! - [`url`]: package paths and URLs

pub mod availability;
pub mod cache;
pub mod catalog;
pub mod decision;
pub mod error;
pub mod finder;
pub mod locale;
pub mod store;
pub mod timestamp;
pub mod types;
pub mod url;
