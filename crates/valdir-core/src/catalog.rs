//! Catalog browsing: the fixed category list and product search.

use serde::Serialize;

use crate::products::Product;
use crate::text::fold_key;

/// A browsable furniture category. Selecting one searches for its `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
    /// Only listed in compact (mobile) layouts.
    pub mobile_only: bool,
}

const fn category(id: &'static str, name: &'static str, mobile_only: bool) -> Category {
    Category {
        id,
        name,
        mobile_only,
    }
}

pub const CATEGORIES: [Category; 25] = [
    category("estofado", "Estofado", false),
    category("roupeiro", "Roupeiro", false),
    category("cozinha modulada", "Cozinha Modulada", false),
    category("cozinha compacta", "Cozinha Compacta", false),
    category("rack", "Rack", false),
    category("mesa", "Mesa", false),
    category("sala de jantar", "Sala de Jantar", false),
    category("cama casal", "Cama Casal", false),
    category("cama solteiro", "Cama Solteiro", false),
    category("comoda", "Cômoda", true),
    category("cadeira", "Cadeira", true),
    category("mesa de cabeceira", "Mesa Cabeceira", true),
    category("cabeceira casal", "Cabeceira Casal", true),
    category("multiuso", "Multiuso", true),
    category("sapateira", "Sapateira", true),
    category("balcão pia", "Balcão Pia", true),
    category("penteadeira", "Penteadeira", true),
    category("cristaleira", "Cristaleira", true),
    category("poltrona", "Poltrona", true),
    category("conjunto box", "Conjunto Box", true),
    category("mesa lateral", "Mesa Lateral", true),
    category("aparador", "Aparador", true),
    category("buffet", "Buffet", true),
    category("painel", "Painel", true),
    category("home", "Home", true),
];

/// Categories shown in a given layout.
pub fn visible_categories(compact: bool) -> impl Iterator<Item = &'static Category> {
    CATEGORIES.iter().filter(move |c| compact || !c.mobile_only)
}

#[must_use]
pub fn find_category(id: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.id.eq_ignore_ascii_case(id))
}

/// New search term after clicking a category: the category id, or an empty
/// term when that category is already the active search.
#[must_use]
pub fn toggle_category(current_term: &str, category_id: &str) -> String {
    if current_term.to_lowercase() == category_id.to_lowercase() {
        String::new()
    } else {
        category_id.to_string()
    }
}

/// Which surface is searching; the two use different matching rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchScope {
    /// Accent-insensitive match over name, description, and category.
    #[default]
    Storefront,
    /// Case-insensitive match over name and description only.
    Admin,
}

impl SearchScope {
    /// Placeholder shown instead of a price when a product has none.
    #[must_use]
    pub fn on_request_label(self) -> &'static str {
        match self {
            SearchScope::Storefront => "Consulte",
            SearchScope::Admin => "N/A",
        }
    }

    #[must_use]
    pub fn matches(self, product: &Product, term: &str) -> bool {
        if term.trim().is_empty() {
            return true;
        }
        match self {
            SearchScope::Storefront => {
                let term = fold_key(term);
                [
                    Some(product.name.as_str()),
                    product.description.as_deref(),
                    product.category.as_deref(),
                ]
                .into_iter()
                .flatten()
                .any(|field| fold_key(field).contains(&term))
            }
            SearchScope::Admin => {
                let term = term.to_lowercase();
                [Some(product.name.as_str()), product.description.as_deref()]
                    .into_iter()
                    .flatten()
                    .any(|field| field.to_lowercase().contains(&term))
            }
        }
    }

    /// Products matching `term`, in their original order.
    #[must_use]
    pub fn filter<'a>(self, products: &'a [Product], term: &str) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p, term)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, name: &str, description: Option<&str>, category: Option<&str>) -> Product {
        Product {
            id,
            name: name.to_string(),
            description: description.map(ToOwned::to_owned),
            price: None,
            sale_price: None,
            item_code: None,
            category: category.map(ToOwned::to_owned),
            images: Vec::new(),
            created_at: None,
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "Sofá Retrátil", Some("Tecido suede"), Some("estofado")),
            product(2, "Cômoda 6 gavetas", None, Some("comoda")),
            product(3, "Mesa Lateral", Some("Madeira maciça"), Some("mesa lateral")),
        ]
    }

    #[test]
    fn twenty_five_categories_nine_always_visible() {
        assert_eq!(CATEGORIES.len(), 25);
        assert_eq!(visible_categories(false).count(), 9);
        assert_eq!(visible_categories(true).count(), 25);
    }

    #[test]
    fn find_category_ignores_case() {
        assert_eq!(find_category("RACK").map(|c| c.name), Some("Rack"));
        assert!(find_category("garagem").is_none());
    }

    #[test]
    fn toggle_selects_then_clears() {
        assert_eq!(toggle_category("", "mesa"), "mesa");
        assert_eq!(toggle_category("Mesa", "mesa"), "");
        assert_eq!(toggle_category("rack", "mesa"), "mesa");
    }

    #[test]
    fn blank_term_matches_everything() {
        let products = catalog();
        assert_eq!(SearchScope::Storefront.filter(&products, "  ").len(), 3);
        assert_eq!(SearchScope::Admin.filter(&products, "").len(), 3);
    }

    #[test]
    fn storefront_search_ignores_accents_and_checks_category() {
        let products = catalog();
        let ids: Vec<i64> = SearchScope::Storefront
            .filter(&products, "comoda")
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![2]);

        let ids: Vec<i64> = SearchScope::Storefront
            .filter(&products, "ESTOFADO")
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn admin_search_is_accent_sensitive_and_skips_category() {
        let products = catalog();
        assert!(SearchScope::Admin.filter(&products, "comoda").is_empty());
        assert_eq!(SearchScope::Admin.filter(&products, "CÔMODA").len(), 1);
        assert!(SearchScope::Admin.filter(&products, "estofado").is_empty());
        assert_eq!(SearchScope::Admin.filter(&products, "maciça").len(), 1);
    }

    #[test]
    fn on_request_label_depends_on_scope() {
        assert_eq!(SearchScope::Storefront.on_request_label(), "Consulte");
        assert_eq!(SearchScope::Admin.on_request_label(), "N/A");
    }
}
