//! Derived view
//!
//! Pure functions from the fetched product list and the current
//! filter/sort parameters to what the operator sees. Nothing here is
//! cached; the list is re-derived on every snapshot.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use icu_collator::{Collator, CollatorOptions};
use serde::Serialize;
use shared::Product;
use shared::util::format_money;
use thiserror::Error;

/// Category filter value that matches every product
pub const ALL_CATEGORIES: &str = "all";

/// Characters of description shown on a card before truncation
pub const DESCRIPTION_PREVIEW_CHARS: usize = 100;

pub const NO_DESCRIPTION: &str = "No description available";

/// Shown when a product has no usable image
pub const FALLBACK_IMAGE: &str = "data:image/svg+xml;base64,PHN2ZyB3aWR0aD0iMjAwIiBoZWlnaHQ9IjIwMCIgdmlld0JveD0iMCAwIDIwMCAyMDAiIGZpbGw9Im5vbmUiIHhtbG5zPSJodHRwOi8vd3d3LnczLm9yZy8yMDAwL3N2ZyI+CjxyZWN0IHdpZHRoPSIyMDAiIGhlaWdodD0iMjAwIiBmaWxsPSIjRjNGNEY2Ii8+CjxwYXRoIGQ9Ik02MCAxMDBDNjAgNzcuOTA5MSA3Ny45MDkxIDYwIDEwMCA2MEMxMjIuMDkxIDYwIDE0MCA3Ny45MDkxIDE0MCAxMDBDMTQwIDEyMi4wOTEgMTIyLjA5MSAxNDAgMTAwIDE0MEM3Ny45MDkxIDE0MCA2MCAxMjIuMDkxIDYwIDEwMFoiIGZpbGw9IiM5Q0EzQUYiLz4KPHBhdGggZD0iTTEwMCAxMjBDMTEwLjQ1NyAxMjAgMTE5IDEwOS40NTcgMTE5IDk4QzExOSA4Ni41NDMgMTEwLjQ1NyA3NiAxMDAgNzZDODkuNTQzIDc2IDgxIDg2LjU0MyA4MSA5OEM4MSAxMDkuNDU3IDg5LjU0MyAxMjAgMTAwIDEyMFoiIGZpbGw9IiNENDFENjMiLz4KPC9zdmc+";

/// Sort order of the product list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Name,
    Price,
    Category,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Price => "price",
            SortKey::Category => "category",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort key '{0}' (expected name, price or category)")]
pub struct ParseSortKeyError(String);

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "price" => Ok(SortKey::Price),
            "category" => Ok(SortKey::Category),
            other => Err(ParseSortKeyError(other.to_string())),
        }
    }
}

/// Category selection of the filter control
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Named(name) => name,
        }
    }

    fn matches(&self, product: &Product) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Named(name) => product.category_name() == Some(name.as_str()),
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        if value == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Named(value.to_string())
        }
    }
}

/// Search, category and sort inputs
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub search: String,
    pub category: CategoryFilter,
    pub sort: SortKey,
}

impl FilterState {
    /// Whether any input narrows the list
    pub fn is_active(&self) -> bool {
        !self.search.is_empty() || self.category != CategoryFilter::All
    }
}

/// Locale-aware string ordering over the root collation
///
/// Accents and case only break ties between otherwise equal names, and
/// lowercase sorts before uppercase. Names the collator considers equal
/// fall back to code point order, so the order is total and repeatable.
pub struct NameCollator {
    collator: Option<Collator>,
}

impl NameCollator {
    pub fn new() -> Self {
        let collator = match Collator::try_new(&Default::default(), CollatorOptions::new()) {
            Ok(collator) => Some(collator),
            Err(e) => {
                tracing::warn!(error = %e, "Root collation unavailable, sorting by folded case");
                None
            }
        };
        Self { collator }
    }

    pub fn cmp(&self, a: &str, b: &str) -> Ordering {
        let ordering = match &self.collator {
            Some(collator) => collator.compare(a, b),
            None => folded_cmp(a, b),
        };
        ordering.then_with(|| a.cmp(b))
    }
}

impl Default for NameCollator {
    fn default() -> Self {
        Self::new()
    }
}

/// One-off comparison; build a [`NameCollator`] when sorting many names.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    NameCollator::new().cmp(a, b)
}

fn folded_cmp(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| {
            for (x, y) in a.chars().zip(b.chars()) {
                if x != y {
                    return match (x.is_lowercase(), y.is_lowercase()) {
                        (true, false) => Ordering::Less,
                        (false, true) => Ordering::Greater,
                        _ => x.cmp(&y),
                    };
                }
            }
            a.len().cmp(&b.len())
        })
}

fn matches_search(product: &Product, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    product.name.to_lowercase().contains(needle)
        || product
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(needle))
}

fn compare(collator: &NameCollator, a: &Product, b: &Product, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => collator.cmp(&a.name, &b.name),
        SortKey::Price => a.price_or_zero().cmp(&b.price_or_zero()),
        SortKey::Category => collator.cmp(
            a.category_name().unwrap_or_default(),
            b.category_name().unwrap_or_default(),
        ),
    }
}

/// Filter then sort. The sort is stable, so ties keep list order.
pub fn derive_visible<'a>(products: &'a [Product], filter: &FilterState) -> Vec<&'a Product> {
    let needle = filter.search.to_lowercase();
    let mut visible: Vec<&Product> = products
        .iter()
        .filter(|p| matches_search(p, &needle) && filter.category.matches(p))
        .collect();
    if visible.len() > 1 {
        let collator = NameCollator::new();
        visible.sort_by(|a, b| compare(&collator, a, b, filter.sort));
    }
    visible
}

/// `"all"` followed by each distinct category name, in first-seen order
pub fn category_options(products: &[Product]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::from([ALL_CATEGORIES]);
    let mut options = vec![ALL_CATEGORIES.to_string()];
    for name in products.iter().filter_map(Product::category_name) {
        if seen.insert(name) {
            options.push(name.to_string());
        }
    }
    options
}

/// Where a card's image comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "url", rename_all = "lowercase")]
pub enum ImageSource {
    Remote(String),
    Fallback,
}

impl ImageSource {
    pub fn url(&self) -> &str {
        match self {
            ImageSource::Remote(url) => url,
            ImageSource::Fallback => FALLBACK_IMAGE,
        }
    }
}

/// Display model of one product
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductCard {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub price: String,
    pub shipping: String,
    image: ImageSource,
}

impl ProductCard {
    pub fn from_product(product: &Product) -> Self {
        let image = match product.image.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => ImageSource::Remote(url.to_string()),
            _ => ImageSource::Fallback,
        };
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            description: preview_description(product.description.as_deref()),
            category: product.category_name().map(str::to_string),
            subcategory: product.subcategory_name().map(str::to_string),
            price: format_money(product.price_or_zero()),
            shipping: format_money(product.shipping_or_default()),
            image,
        }
    }

    pub fn image(&self) -> &ImageSource {
        &self.image
    }

    /// Report that the current image failed to load.
    ///
    /// Swaps to the fallback graphic once; returns `false` when already on
    /// the fallback so the caller never retries.
    pub fn image_failed(&mut self) -> bool {
        match self.image {
            ImageSource::Remote(_) => {
                self.image = ImageSource::Fallback;
                true
            }
            ImageSource::Fallback => false,
        }
    }
}

fn preview_description(description: Option<&str>) -> String {
    match description {
        Some(text) if !text.is_empty() => {
            if text.chars().count() > DESCRIPTION_PREVIEW_CHARS {
                let head: String = text.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
                format!("{head}...")
            } else {
                text.to_string()
            }
        }
        _ => NO_DESCRIPTION.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Decimal, EntityRef};

    fn product(name: &str, price: Option<i64>, category: Option<&str>) -> Product {
        Product {
            id: name.to_lowercase(),
            name: name.to_string(),
            description: None,
            price: price.map(Decimal::from),
            shipping_charge: None,
            category: category.map(|c| EntityRef::Populated {
                id: format!("id-{c}"),
                name: c.to_string(),
            }),
            subcategory: None,
            image: None,
        }
    }

    fn names(list: &[&Product]) -> Vec<String> {
        list.iter().map(|p| p.name.clone()).collect()
    }

    fn sample() -> Vec<Product> {
        vec![
            product("Rice", Some(100), Some("Grain")),
            product("Oil", Some(200), Some("Pantry")),
        ]
    }

    #[test]
    fn test_price_then_name_scenario() {
        let list = sample();
        let mut filter = FilterState {
            sort: SortKey::Price,
            ..Default::default()
        };
        assert_eq!(names(&derive_visible(&list, &filter)), ["Rice", "Oil"]);

        filter.sort = SortKey::Name;
        assert_eq!(names(&derive_visible(&list, &filter)), ["Oil", "Rice"]);
    }

    #[test]
    fn test_search_matches_name_or_description() {
        let mut list = sample();
        list[1].description = Some("Cold PRESSED sunflower".into());
        list.push(product("Salt", Some(5), None));

        let filter = FilterState {
            search: "pressed".into(),
            ..Default::default()
        };
        assert_eq!(names(&derive_visible(&list, &filter)), ["Oil"]);

        let filter = FilterState {
            search: "RI".into(),
            ..Default::default()
        };
        assert_eq!(names(&derive_visible(&list, &filter)), ["Rice"]);
    }

    #[test]
    fn test_filtered_is_subset_and_matches() {
        let mut list = sample();
        list.push(product("Brown rice", Some(150), Some("Grain")));
        list.push(product("Rice bran oil", None, None));
        let filter = FilterState {
            search: "rice".into(),
            ..Default::default()
        };
        let visible = derive_visible(&list, &filter);
        assert_eq!(visible.len(), 3);
        for p in visible {
            assert!(list.iter().any(|q| q == p));
            assert!(p.name.to_lowercase().contains("rice"));
        }
    }

    #[test]
    fn test_category_filter() {
        let mut list = sample();
        list.push(product("Wheat", Some(80), Some("Grain")));
        let filter = FilterState {
            category: CategoryFilter::from("Grain"),
            ..Default::default()
        };
        assert_eq!(names(&derive_visible(&list, &filter)), ["Rice", "Wheat"]);
    }

    #[test]
    fn test_price_sort_is_numeric_and_stable() {
        let list = vec![
            product("A", Some(1000), None),
            product("B", Some(99), None),
            product("C", None, None),
            product("D", Some(99), None),
        ];
        let filter = FilterState {
            sort: SortKey::Price,
            ..Default::default()
        };
        assert_eq!(names(&derive_visible(&list, &filter)), ["C", "B", "D", "A"]);
    }

    #[test]
    fn test_category_sort_missing_first_and_idempotent() {
        let list = vec![
            product("A", None, Some("pantry")),
            product("B", None, None),
            product("C", None, Some("Grain")),
            product("D", None, Some("Pantry")),
        ];
        let filter = FilterState {
            sort: SortKey::Category,
            ..Default::default()
        };
        let once: Vec<Product> = derive_visible(&list, &filter).into_iter().cloned().collect();
        assert_eq!(
            once.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
            ["B", "C", "A", "D"]
        );
        let twice = derive_visible(&once, &filter);
        assert_eq!(names(&twice), ["B", "C", "A", "D"]);
    }

    #[test]
    fn test_locale_cmp() {
        assert_eq!(locale_cmp("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_cmp("rice", "Rice"), Ordering::Less);
        assert_eq!(locale_cmp("Rice", "Rice"), Ordering::Equal);
        assert_eq!(locale_cmp("Oil", "oil bottle"), Ordering::Less);
    }

    #[test]
    fn test_accented_names_sort_with_their_base_letter() {
        assert_eq!(locale_cmp("éclair", "zebra"), Ordering::Less);
        assert_eq!(locale_cmp("eclair", "éclair"), Ordering::Less);
        assert_eq!(locale_cmp("Ñandu", "Nut"), Ordering::Less);

        let list = vec![
            product("Zebra cake", Some(1), Some("Bakery")),
            product("Éclair", Some(2), Some("Bakery")),
            product("eclair", Some(3), Some("Bakery")),
            product("Apple pie", Some(4), Some("Bakery")),
        ];
        let filter = FilterState::default();
        let once = derive_visible(&list, &filter);
        assert_eq!(names(&once), ["Apple pie", "eclair", "Éclair", "Zebra cake"]);

        let owned: Vec<Product> = once.into_iter().cloned().collect();
        assert_eq!(
            names(&derive_visible(&owned, &filter)),
            ["Apple pie", "eclair", "Éclair", "Zebra cake"]
        );
    }

    #[test]
    fn test_category_options() {
        let list = vec![
            product("A", None, Some("Pantry")),
            product("B", None, None),
            product("C", None, Some("Grain")),
            product("D", None, Some("Pantry")),
        ];
        assert_eq!(category_options(&list), ["all", "Pantry", "Grain"]);
        assert_eq!(category_options(&[]), ["all"]);
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!("Price".parse::<SortKey>().unwrap(), SortKey::Price);
        assert!("weight".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_card_defaults() {
        let card = ProductCard::from_product(&product("Salt", None, None));
        assert_eq!(card.description, NO_DESCRIPTION);
        assert_eq!(card.price, "₹0.00");
        assert_eq!(card.shipping, "₹550.00");
        assert_eq!(card.image(), &ImageSource::Fallback);
    }

    #[test]
    fn test_card_truncates_description() {
        let mut p = product("Salt", Some(5), None);
        p.description = Some("x".repeat(120));
        let card = ProductCard::from_product(&p);
        assert_eq!(card.description.len(), DESCRIPTION_PREVIEW_CHARS + 3);
        assert!(card.description.ends_with("..."));
    }

    #[test]
    fn test_image_falls_back_once() {
        let mut p = product("Salt", Some(5), None);
        p.image = Some("http://img/salt.png".into());
        let mut card = ProductCard::from_product(&p);
        assert_eq!(card.image().url(), "http://img/salt.png");

        assert!(card.image_failed());
        assert_eq!(card.image().url(), FALLBACK_IMAGE);
        assert!(!card.image_failed());
        assert_eq!(card.image(), &ImageSource::Fallback);
    }
}
