//! Mercado Livre search scraper.
//!
//! Issues keyword queries against the site's search endpoint and parses
//! the result page into [`Product`] records. Promotion-filtered queries
//! add a discount-range parameter so only marked-down listings come back.
//!
//! # Markup
//!
//! Result pages list items in `div.ui-search-result__wrapper` containers.
//! A container missing its title or current price is skipped on its own;
//! everything else falls back to display defaults. Prices arrive in
//! Brazilian locale format (`1.234,56`) and are normalized before any
//! arithmetic.

use once_cell::sync::Lazy;
use reqwest::Client;
use reqwest::header::{self, HeaderMap, HeaderValue};
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{info, instrument, warn};
use url::Url;

use crate::affiliate::build_affiliate_url;
use crate::classifier;
use crate::error::{ItemError, SearchError};
use crate::models::{Product, SearchResult};

pub const BASE_URL: &str = "https://www.mercadolivre.com.br";

/// Discount-range filter applied on the promotion query path.
const PROMOTION_DISCOUNT_RANGE: &str = "5-100";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

static RESULT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.ui-search-result__wrapper").unwrap());
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h2.ui-search-item__title").unwrap());
static PRICE_FRACTION_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.andes-money-amount__fraction").unwrap());
static PREVIOUS_PRICE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("s.andes-money-amount--previous").unwrap());
static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a.ui-search-link").unwrap());
static SHIPPING_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p.ui-search-item__shipping").unwrap());
static INSTALLMENTS_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.ui-search-installments").unwrap());
static RATING_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.ui-search-reviews__rating-number").unwrap());
static IMAGE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img.ui-search-result-image__element").unwrap());

/// Scrapes the marketplace's search endpoint.
///
/// The HTTP client keeps a cookie store so a login performed through
/// [`FormLogin`](crate::session::FormLogin) over a clone of this client
/// carries into subsequent searches.
pub struct MercadoLivreScraper {
    client: Client,
    affiliate_id: String,
    max_products_per_search: usize,
}

impl MercadoLivreScraper {
    pub fn new(affiliate_id: &str, max_products_per_search: usize) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("pt-BR,pt;q=0.9,en;q=0.8"),
        );
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(
            header::UPGRADE_INSECURE_REQUESTS,
            HeaderValue::from_static("1"),
        );

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .cookie_store(true)
            .gzip(true)
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            affiliate_id: affiliate_id.to_string(),
            max_products_per_search,
        }
    }

    /// The underlying client, for sharing the cookie store with a login
    /// provider. Clones share one store.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Run one keyword query against the search endpoint.
    ///
    /// The error only covers the request itself; containers that fail to
    /// parse are skipped inside a successful search. The caller decides
    /// what a failed search degrades to (the orchestrator substitutes
    /// [`SearchResult::empty`]).
    #[instrument(level = "info", skip(self))]
    pub async fn search(
        &self,
        keyword: &str,
        promotion_only: bool,
    ) -> Result<SearchResult, SearchError> {
        let mut params = vec![("q", keyword)];
        if promotion_only {
            params.push(("discount", PROMOTION_DISCOUNT_RANGE));
        }

        let response = self
            .client
            .get(format!("{BASE_URL}/jm/search"))
            .query(&params)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SearchError::Status(response.status()));
        }
        let body = response.text().await?;

        let category = classifier::classify(keyword);
        let products = self.parse_results(&body, category, promotion_only);
        info!(
            count = products.len(),
            keyword, category, promotion_only, "Search complete"
        );

        Ok(SearchResult::new(products, keyword, category))
    }

    /// Extract up to `max_products_per_search` products from a result page.
    fn parse_results(&self, html: &str, category: &str, is_promotion: bool) -> Vec<Product> {
        let document = Html::parse_document(html);
        let mut products = Vec::new();

        for container in document
            .select(&RESULT_SELECTOR)
            .take(self.max_products_per_search)
        {
            match extract_product(container, category, is_promotion, &self.affiliate_id) {
                Ok(product) => products.push(product),
                Err(e) => warn!(error = %e, category, "Skipping result container"),
            }
        }

        products
    }
}

/// Turn one result container into a [`Product`].
///
/// Title and current price are required; the previous price falls back to
/// the current price (no markdown), and the remaining fields fall back to
/// display defaults.
fn extract_product(
    container: ElementRef,
    category: &str,
    is_promotion: bool,
    affiliate_id: &str,
) -> Result<Product, ItemError> {
    let title = select_text(container, &TITLE_SELECTOR).ok_or(ItemError::MissingField("title"))?;

    let current_raw =
        select_text(container, &PRICE_FRACTION_SELECTOR).ok_or(ItemError::MissingField("price"))?;
    let current_price = parse_price(&current_raw)?;

    let original_price = match container
        .select(&PREVIOUS_PRICE_SELECTOR)
        .next()
        .and_then(|previous| select_text(previous, &PRICE_FRACTION_SELECTOR))
    {
        Some(raw) => parse_price(&raw)?,
        None => current_price,
    };

    let discount_percentage = if original_price > current_price {
        (original_price - current_price) / original_price * 100.0
    } else {
        0.0
    };

    let product_url = container
        .select(&LINK_SELECTOR)
        .next()
        .and_then(|link| link.value().attr("href"))
        .map(resolve_href)
        .unwrap_or_default();
    let affiliate_url = build_affiliate_url(&product_url, affiliate_id);

    let shipping_info = select_text(container, &SHIPPING_SELECTOR)
        .unwrap_or_else(|| "Frete a calcular".to_string());
    let payment_options = select_text(container, &INSTALLMENTS_SELECTOR)
        .unwrap_or_else(|| "À vista ou parcelado".to_string());
    let feedback_score = select_text(container, &RATING_SELECTOR)
        .map(|rating| format!("⭐ {rating}"))
        .unwrap_or_else(|| "Sem avaliações".to_string());
    let image_url = container
        .select(&IMAGE_SELECTOR)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(String::from);

    Ok(Product {
        title,
        original_price,
        current_price,
        discount_percentage,
        payment_options,
        shipping_info,
        feedback_score,
        product_url,
        affiliate_url,
        category: category.to_string(),
        is_promotion,
        image_url,
        seller_name: None,
        created_at: chrono::Local::now(),
    })
}

/// Trimmed text of the first element matching `selector`, if any.
fn select_text(scope: ElementRef, selector: &Selector) -> Option<String> {
    scope.select(selector).next().map(|element| {
        element
            .text()
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string()
    })
}

/// Normalize a Brazilian locale price (`1.234,56`) to a number.
fn parse_price(raw: &str) -> Result<f64, ItemError> {
    let normalized = raw.trim().replace('.', "").replace(',', ".");
    normalized
        .parse::<f64>()
        .map_err(|_| ItemError::Price(raw.to_string()))
}

/// Resolve a result-page href against the site base. Absolute links pass
/// through untouched.
fn resolve_href(href: &str) -> String {
    match Url::parse(href) {
        Ok(absolute) => absolute.to_string(),
        Err(_) => Url::parse(BASE_URL)
            .and_then(|base| base.join(href))
            .map(|resolved| resolved.to_string())
            .unwrap_or_else(|_| href.to_string()),
    }
}
