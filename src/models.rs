//! Data models for scraped marketplace listings.
//!
//! This module defines the two records that flow through the pipeline:
//! - [`Product`]: one listed item as it looked at scrape time
//! - [`SearchResult`]: the envelope for one keyword query
//!
//! Both are created fresh each cycle and discarded after dispatch; there
//! is no storage layer and no cross-cycle identity. Within a cycle the
//! product `title` is the deduplication key: two products sharing a title
//! are the same listing and only the first is kept.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One listed item at scrape time.
///
/// Prices are decimal currency units with `current_price <= original_price`
/// by construction: the original price falls back to the current price when
/// the page shows no markdown, and `discount_percentage` is zero in that
/// case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// The listing title. Deduplication key within a cycle.
    pub title: String,
    /// The pre-markdown price, equal to `current_price` when not marked down.
    pub original_price: f64,
    /// The price the listing currently sells at.
    pub current_price: f64,
    /// `(original - current) / original * 100`, or zero without a markdown.
    pub discount_percentage: f64,
    /// Installment text from the listing, defaulted when absent.
    pub payment_options: String,
    /// Shipping text from the listing, defaulted when absent.
    pub shipping_info: String,
    /// Rating text from the listing, defaulted when absent.
    pub feedback_score: String,
    /// The listing URL as found on the result page.
    pub product_url: String,
    /// `product_url` with the affiliate id appended, or equal to it when
    /// no affiliate id is configured.
    pub affiliate_url: String,
    /// Category resolved from the query keyword, not from listing text.
    pub category: String,
    /// Whether this product came from the promotion-filtered query path.
    pub is_promotion: bool,
    /// Listing thumbnail, when the page exposed one.
    pub image_url: Option<String>,
    /// Seller display name, when the page exposed one.
    pub seller_name: Option<String>,
    /// Capture timestamp.
    pub created_at: DateTime<Local>,
}

impl Product {
    /// Absolute markdown in currency units.
    pub fn savings(&self) -> f64 {
        self.original_price - self.current_price
    }
}

/// The product list from one keyword query.
///
/// Ephemeral envelope: consumed by the orchestrator immediately after the
/// search returns, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub products: Vec<Product>,
    pub total_found: usize,
    pub search_term: String,
    pub category: String,
    pub timestamp: DateTime<Local>,
}

impl SearchResult {
    pub fn new(products: Vec<Product>, search_term: &str, category: &str) -> Self {
        Self {
            total_found: products.len(),
            products,
            search_term: search_term.to_string(),
            category: category.to_string(),
            timestamp: Local::now(),
        }
    }

    /// The result a failed search degrades to: zero products, same envelope.
    pub fn empty(search_term: &str, category: &str) -> Self {
        Self::new(Vec::new(), search_term, category)
    }
}
