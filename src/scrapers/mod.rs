//! Marketplace scrapers.
//!
//! One submodule per target site. Each scraper follows the same
//! two-operation contract:
//!
//! 1. **Login** (best-effort): establish a session through a
//!    [`SessionProvider`](crate::session::SessionProvider); the pipeline
//!    proceeds unauthenticated when it fails
//! 2. **Search**: issue a keyword query, parse the result page into
//!    [`Product`](crate::models::Product) records
//!
//! # Supported sites
//!
//! | Site | Module | Notes |
//! |------|--------|-------|
//! | Mercado Livre | [`mercadolivre`] | Search endpoint with optional discount-range filter |
//!
//! # Common patterns
//!
//! Scrapers degrade instead of failing: a dead search request surfaces as
//! an error the orchestrator maps to an empty result, and a result
//! container missing a required field is logged and skipped on its own.

pub mod mercadolivre;
