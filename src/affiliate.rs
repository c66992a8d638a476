//! Affiliate link tagging.
//!
//! Outbound product links carry a tracking token for commission
//! attribution. The token is appended string-level: a URL parser would
//! re-encode whatever the marketplace put in the link.

/// Append `affiliateId=<id>` to a product URL.
///
/// Uses `&` when the URL already has a query string, `?` otherwise.
/// Identity transform when either the URL or the affiliate id is empty.
pub fn build_affiliate_url(product_url: &str, affiliate_id: &str) -> String {
    if product_url.is_empty() || affiliate_id.is_empty() {
        return product_url.to_string();
    }
    let separator = if product_url.contains('?') { '&' } else { '?' };
    format!("{product_url}{separator}affiliateId={affiliate_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_with_question_mark() {
        assert_eq!(
            build_affiliate_url("http://x/y", "X123"),
            "http://x/y?affiliateId=X123"
        );
    }

    #[test]
    fn test_appends_with_ampersand_when_query_present() {
        assert_eq!(
            build_affiliate_url("http://x/y?z=1", "X123"),
            "http://x/y?z=1&affiliateId=X123"
        );
    }

    #[test]
    fn test_empty_affiliate_id_is_identity() {
        assert_eq!(build_affiliate_url("http://x/y", ""), "http://x/y");
    }

    #[test]
    fn test_empty_url_is_identity() {
        assert_eq!(build_affiliate_url("", "X123"), "");
    }
}
