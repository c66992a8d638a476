//! One complete fetch → aggregate → notify pass.
//!
//! The cycle walks a fixed set of phases and always comes back to idle:
//!
//! ```text
//! IDLE → FETCHING → AGGREGATING → NOTIFYING → IDLE
//! ```
//!
//! No stage failure aborts a cycle. Authentication failures degrade to an
//! unauthenticated session, failed searches to an empty result for that
//! keyword, failed sends to one fewer channel. The only persistent
//! failure mode is finding zero products, which skips dispatch entirely.

use itertools::Itertools;
use std::fmt;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

use crate::classifier;
use crate::config::Config;
use crate::models::{Product, SearchResult};
use crate::notify::Notifier;
use crate::scrapers::mercadolivre::{self, MercadoLivreScraper};
use crate::session::{FormLogin, SessionProvider};

/// Keywords fetched per category on the promotion path.
const KEYWORDS_PER_CATEGORY: usize = 2;
/// Products kept per unfiltered popular-search term.
const POPULAR_KEEP: usize = 5;
/// Per-item channel cap when the bulk channel also ran.
const PER_ITEM_CAP: usize = 5;
/// Per-item channel cap when it is the only channel running.
const PER_ITEM_CAP_SOLO: usize = 10;

/// Where a cycle currently is; used for structured logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Idle,
    Fetching,
    Aggregating,
    Notifying,
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CyclePhase::Idle => "idle",
            CyclePhase::Fetching => "fetching",
            CyclePhase::Aggregating => "aggregating",
            CyclePhase::Notifying => "notifying",
        };
        f.write_str(name)
    }
}

/// Owns the scraper, the login provider, and the notifier, and runs the
/// whole pass.
pub struct Orchestrator {
    scraper: MercadoLivreScraper,
    login: FormLogin,
    notifier: Notifier,
    config: Config,
}

impl Orchestrator {
    pub fn new(config: Config) -> Self {
        let scraper = MercadoLivreScraper::new(
            &config.affiliate_id,
            config.search.max_products_per_search,
        );
        // The login provider shares the scraper's client, so its cookies
        // carry into subsequent searches.
        let login = FormLogin::new(scraper.client().clone(), mercadolivre::BASE_URL);
        let notifier = Notifier::new(&config);
        Self {
            scraper,
            login,
            notifier,
            config,
        }
    }

    /// Run one full cycle.
    #[instrument(level = "info", skip_all)]
    pub async fn run_cycle(&self) {
        info!(phase = %CyclePhase::Fetching, "Cycle starting");
        let products = self.fetch_all().await;

        info!(phase = %CyclePhase::Aggregating, fetched = products.len(), "Ranking products");
        let ranked = rank(products, self.config.search.max_total);
        if ranked.is_empty() {
            warn!("No products found this cycle; skipping dispatch");
            info!(phase = %CyclePhase::Idle, "Cycle finished");
            return;
        }

        let total_savings: f64 = ranked.iter().map(Product::savings).sum();
        info!(
            phase = %CyclePhase::Notifying,
            count = ranked.len(),
            total_savings,
            email_channel = self.notifier.email_ready(),
            message_channel = self.notifier.messenger_ready(),
            "Dispatching notifications"
        );
        let email_ran = self.notifier.email_ready();
        let email_ok = self.notifier.send_email(&ranked).await;

        let cap = per_item_cap(email_ran);
        let prefix = &ranked[..ranked.len().min(cap)];
        let messenger_ok = self.notifier.send_messages(prefix).await;

        info!(
            phase = %CyclePhase::Idle,
            products = ranked.len(),
            email = email_ok,
            messenger = messenger_ok,
            "Cycle finished"
        );
    }

    /// Best-effort login, then every configured query with a politeness
    /// pause between requests.
    async fn fetch_all(&self) -> Vec<Product> {
        match self.config.marketplace.credentials() {
            Some(credentials) => match self.login.authenticate(&credentials).await {
                Ok(session) => {
                    info!(established_at = %session.established_at, "Logged in to marketplace")
                }
                Err(e) => warn!(error = %e, "Login failed; continuing without a session"),
            },
            None => info!("Marketplace credentials not configured; searching anonymously"),
        }

        let mut all_products = Vec::new();

        info!("Fetching promotion-filtered results");
        for &(category, keywords) in classifier::CATEGORIES {
            for keyword in keywords.iter().take(KEYWORDS_PER_CATEGORY) {
                // A failed search degrades to an empty result for this
                // keyword; the cycle keeps going.
                let result = match self.scraper.search(keyword, true).await {
                    Ok(result) => result,
                    Err(e) => {
                        error!(error = %e, %keyword, "Promotion search failed");
                        SearchResult::empty(keyword, category)
                    }
                };
                info!(
                    count = result.products.len(),
                    %keyword,
                    category,
                    "Promotion search done"
                );
                all_products.extend(result.products);
                sleep(self.config.search.request_delay).await;
            }
        }

        info!("Fetching popular searches");
        for term in &self.config.search.popular_searches {
            let mut result = match self.scraper.search(term, false).await {
                Ok(result) => result,
                Err(e) => {
                    error!(error = %e, %term, "Popular search failed");
                    SearchResult::empty(term, classifier::classify(term))
                }
            };
            result.products.truncate(POPULAR_KEEP);
            info!(count = result.products.len(), %term, "Popular search done");
            all_products.extend(result.products);
            sleep(self.config.search.request_delay).await;
        }

        info!(total = all_products.len(), "Fetch phase complete");
        all_products
    }
}

/// Dedupe by title (first seen wins), rank by discount, cap the total.
///
/// The sort is stable, so equally discounted products keep their
/// first-seen relative order all the way into the notification output.
fn rank(products: Vec<Product>, max_total: usize) -> Vec<Product> {
    let mut unique: Vec<Product> = products
        .into_iter()
        .unique_by(|product| product.title.clone())
        .collect();
    unique.sort_by(|a, b| b.discount_percentage.total_cmp(&a.discount_percentage));
    unique.truncate(max_total);
    unique
}

/// How many products the per-item channel receives.
fn per_item_cap(bulk_channel_ran: bool) -> usize {
    if bulk_channel_ran {
        PER_ITEM_CAP
    } else {
        PER_ITEM_CAP_SOLO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn product(title: &str, discount: f64) -> Product {
        Product {
            title: title.to_string(),
            original_price: 100.0,
            current_price: 100.0 - discount,
            discount_percentage: discount,
            payment_options: String::new(),
            shipping_info: String::new(),
            feedback_score: String::new(),
            product_url: String::new(),
            affiliate_url: String::new(),
            category: "outros".to_string(),
            is_promotion: false,
            image_url: None,
            seller_name: None,
            created_at: Local::now(),
        }
    }

    fn titles(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.title.as_str()).collect()
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let ranked = rank(
            vec![product("A", 10.0), product("A", 50.0), product("B", 30.0)],
            20,
        );
        assert_eq!(titles(&ranked), vec!["B", "A"]);
        // First "A" won, so its discount survived.
        assert_eq!(ranked[1].discount_percentage, 10.0);
    }

    #[test]
    fn test_dedupe_never_increases_count() {
        let products: Vec<Product> = (0..10).map(|i| product(&format!("P{}", i % 3), 5.0)).collect();
        let ranked = rank(products, 20);
        assert_eq!(ranked.len(), 3);
    }

    #[test]
    fn test_sort_is_stable_for_equal_discounts() {
        let ranked = rank(
            vec![
                product("first", 20.0),
                product("second", 20.0),
                product("third", 20.0),
                product("best", 40.0),
            ],
            20,
        );
        assert_eq!(titles(&ranked), vec!["best", "first", "second", "third"]);
    }

    #[test]
    fn test_truncation_keeps_prefix_order() {
        let ranked = rank(
            vec![
                product("a", 50.0),
                product("b", 40.0),
                product("c", 30.0),
                product("d", 20.0),
            ],
            2,
        );
        assert_eq!(titles(&ranked), vec!["a", "b"]);
    }

    #[test]
    fn test_rank_of_nothing_is_nothing() {
        assert!(rank(Vec::new(), 20).is_empty());
    }

    #[test]
    fn test_per_item_cap_depends_on_bulk_channel() {
        assert_eq!(per_item_cap(true), 5);
        assert_eq!(per_item_cap(false), 10);
    }

    #[test]
    fn test_per_item_prefix_when_bulk_disabled() {
        // Twelve ranked products and no bulk channel: the per-item
        // channel gets the top ten.
        let ranked = rank((0..12).map(|i| product(&format!("P{i}"), i as f64)).collect(), 20);
        let cap = per_item_cap(false);
        let prefix = &ranked[..ranked.len().min(cap)];
        assert_eq!(prefix.len(), 10);
        assert_eq!(prefix[0].title, "P11");
    }
}
