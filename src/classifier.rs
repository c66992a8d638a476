//! Keyword-to-category classification.
//!
//! Categories are resolved from the *query keyword*, never from parsed
//! listing text: every product a keyword search yields carries the
//! keyword's category. The lookup is a case-insensitive substring match
//! against each category's keyword list, so "smartphone capa" still lands
//! in eletrônicos.

/// Category a keyword falls back to when no list matches it.
pub const DEFAULT_CATEGORY: &str = "outros";

/// The category table, iterated in order.
///
/// Order is significant: the first category whose keyword list matches
/// wins, so "tênis" resolves to roupas even though esportes lists it too.
pub static CATEGORIES: &[(&str, &[&str])] = &[
    (
        "eletrônicos",
        &["smartphone", "notebook", "tablet", "fone", "tv"],
    ),
    ("roupas", &["camiseta", "calça", "vestido", "sapato", "tênis"]),
    ("casa", &["sofá", "mesa", "cadeira", "cama", "geladeira"]),
    ("esportes", &["bicicleta", "tênis", "bola", "academia", "fitness"]),
];

/// Map a search keyword to its category.
///
/// Total and deterministic: every keyword maps to exactly one category,
/// falling back to [`DEFAULT_CATEGORY`] when nothing matches.
pub fn classify(keyword: &str) -> &'static str {
    let keyword = keyword.to_lowercase();
    for &(category, keywords) in CATEGORIES {
        if keywords.iter().any(|k| keyword.contains(k)) {
            return category;
        }
    }
    DEFAULT_CATEGORY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_keyword() {
        assert_eq!(classify("notebook"), "eletrônicos");
        assert_eq!(classify("camiseta"), "roupas");
        assert_eq!(classify("geladeira"), "casa");
        assert_eq!(classify("bicicleta"), "esportes");
    }

    #[test]
    fn test_substring_match() {
        assert_eq!(classify("smartphone capa"), "eletrônicos");
        assert_eq!(classify("mesa de jantar 6 lugares"), "casa");
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("Smartphone Samsung"), "eletrônicos");
        assert_eq!(classify("NOTEBOOK gamer"), "eletrônicos");
    }

    #[test]
    fn test_fallback_category() {
        assert_eq!(classify("livro de receitas"), DEFAULT_CATEGORY);
        assert_eq!(classify(""), DEFAULT_CATEGORY);
    }

    #[test]
    fn test_tie_resolves_to_earlier_category() {
        // "tênis" appears under both roupas and esportes; table order wins.
        assert_eq!(classify("tênis"), "roupas");
    }

    #[test]
    fn test_every_table_keyword_maps_to_its_first_category() {
        for &(category, keywords) in CATEGORIES {
            for keyword in keywords {
                let resolved = classify(keyword);
                // Either this category or an earlier one that also lists it.
                let position = |c: &str| {
                    CATEGORIES
                        .iter()
                        .position(|(name, _)| *name == c)
                        .unwrap()
                };
                assert!(position(resolved) <= position(category));
            }
        }
    }
}
