//! Catalog filtering, sorting and paging.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Items shown per page, and added by each `load_more`.
pub const PAGE_SIZE: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Clothing,
    Accessories,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subcategory {
    Hoodie,
    Sweatshirt,
    Cap,
    Pin,
    Shopper,
    Poster,
    Case,
}

impl Subcategory {
    pub fn parent(self) -> Category {
        match self {
            Subcategory::Hoodie | Subcategory::Sweatshirt => Category::Clothing,
            Subcategory::Cap | Subcategory::Pin | Subcategory::Shopper => Category::Accessories,
            Subcategory::Poster | Subcategory::Case => Category::Other,
        }
    }
}

/// Title and image keywords, checked in this order.
const KEYWORDS: &[(&str, &str, Subcategory)] = &[
    ("Кепка", "cap_", Subcategory::Cap),
    ("Значок", "pin_", Subcategory::Pin),
    ("Свитшот", "sweatshirt", Subcategory::Sweatshirt),
    ("Худи", "hoodie", Subcategory::Hoodie),
    ("Шоппер", "bag_", Subcategory::Shopper),
    ("Постер", "poster_", Subcategory::Poster),
    ("Чехол", "case", Subcategory::Case),
];

/// Guesses the subcategory of an untagged item from its title or image.
pub fn infer_subcategory(title: &str, image: &str) -> Option<Subcategory> {
    KEYWORDS
        .iter()
        .find(|(word, fragment, _)| title.contains(word) || image.contains(fragment))
        .map(|(_, _, sub)| *sub)
}

/// Reads a price from display text by keeping only its digits.
pub fn parse_price(text: &str) -> u64 {
    text.chars()
        .filter_map(|c| c.to_digit(10))
        .fold(0u64, |acc, d| acc.saturating_mul(10).saturating_add(u64::from(d)))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub title: String,
    pub image: String,
    pub price: u64,
    pub category: Option<Category>,
    pub subcategory: Option<Subcategory>,
}

impl CatalogItem {
    pub fn new(title: impl Into<String>, image: impl Into<String>, price: u64) -> Self {
        Self {
            title: title.into(),
            image: image.into(),
            price,
            category: None,
            subcategory: None,
        }
    }

    /// Tags the item explicitly, bypassing keyword inference.
    pub fn with_subcategory(mut self, sub: Subcategory) -> Self {
        self.category = Some(sub.parent());
        self.subcategory = Some(sub);
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Catalog order.
    #[default]
    Default,
    PriceAscending,
    PriceDescending,
}

impl SortMode {
    /// Maps a sort control value; anything unrecognised is the default order.
    pub fn from_label(label: &str) -> Self {
        match label {
            "price-asc" => SortMode::PriceAscending,
            "price-desc" => SortMode::PriceDescending,
            _ => SortMode::Default,
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SortMode::Default => "default",
            SortMode::PriceAscending => "price-asc",
            SortMode::PriceDescending => "price-desc",
        };
        f.write_str(label)
    }
}

/// Current filter, sort and page over a fixed list of catalog items.
#[derive(Debug, Clone)]
pub struct CatalogFilter {
    items: Vec<CatalogItem>,
    main: Option<Category>,
    sub: Option<Subcategory>,
    sort: SortMode,
    visible: usize,
}

impl CatalogFilter {
    /// Takes the items in catalog order, inferring categories for untagged ones.
    pub fn new(items: Vec<CatalogItem>) -> Self {
        let items = items
            .into_iter()
            .map(|mut item| {
                if item.category.is_none()
                    && let Some(sub) = infer_subcategory(&item.title, &item.image)
                {
                    item.category = Some(sub.parent());
                    item.subcategory = Some(sub);
                }
                item
            })
            .collect();

        Self {
            items,
            main: None,
            sub: None,
            sort: SortMode::Default,
            visible: PAGE_SIZE,
        }
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn category(&self) -> Option<Category> {
        self.main
    }

    pub fn subcategory(&self) -> Option<Subcategory> {
        self.sub
    }

    pub fn sort(&self) -> SortMode {
        self.sort
    }

    pub fn select_category(&mut self, category: Category) {
        self.main = Some(category);
        self.sub = None;
        self.visible = PAGE_SIZE;
    }

    /// Selects a subcategory together with its parent category.
    pub fn select_subcategory(&mut self, sub: Subcategory) {
        self.main = Some(sub.parent());
        self.sub = Some(sub);
        self.visible = PAGE_SIZE;
    }

    pub fn show_all(&mut self) {
        self.main = None;
        self.sub = None;
        self.visible = PAGE_SIZE;
    }

    pub fn set_sort(&mut self, sort: SortMode) {
        self.sort = sort;
    }

    pub fn load_more(&mut self) {
        self.visible += PAGE_SIZE;
    }

    /// Every item matching the filter, in sort order.
    pub fn filtered(&self) -> Vec<&CatalogItem> {
        let mut matching: Vec<&CatalogItem> = self
            .items
            .iter()
            .filter(|item| self.main.is_none_or(|main| item.category == Some(main)))
            .filter(|item| self.sub.is_none_or(|sub| item.subcategory == Some(sub)))
            .collect();

        match self.sort {
            SortMode::Default => {}
            SortMode::PriceAscending => matching.sort_by_key(|item| item.price),
            SortMode::PriceDescending => {
                matching.sort_by_key(|item| std::cmp::Reverse(item.price))
            }
        }
        matching
    }

    /// The current page of `filtered()`.
    pub fn visible(&self) -> Vec<&CatalogItem> {
        let mut items = self.filtered();
        items.truncate(self.visible);
        items
    }

    /// Whether the load-more control should stay visible.
    pub fn has_more(&self) -> bool {
        self.visible < self.filtered().len()
    }

    pub fn count_label(&self) -> String {
        format!("({} items)", self.filtered().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> CatalogFilter {
        CatalogFilter::new(vec![
            CatalogItem::new("Худи Годжо", "img/hoodie_gojo.png", 4500),
            CatalogItem::new("Кепка", "img/cap_black.png", 1200),
            CatalogItem::new("Значок Сукуна", "img/pin_sukuna.png", 300),
            CatalogItem::new("Свитшот", "img/sweatshirt_red.png", 3900),
            CatalogItem::new("Постер A3", "img/poster_a3.png", 800),
            CatalogItem::new("Шоппер", "img/bag_white.png", 1200),
            CatalogItem::new("Mystery box", "img/box.png", 999),
        ])
    }

    #[test]
    fn test_inference_by_title_and_image() {
        assert_eq!(infer_subcategory("Худи", ""), Some(Subcategory::Hoodie));
        assert_eq!(infer_subcategory("Thing", "img/phone_case.png"), Some(Subcategory::Case));
        assert_eq!(infer_subcategory("Thing", "img/thing.png"), None);
    }

    #[test]
    fn test_explicit_category_is_kept() {
        let filter = CatalogFilter::new(vec![
            CatalogItem::new("Кепка", "", 100).with_subcategory(Subcategory::Poster),
        ]);
        assert_eq!(filter.items()[0].subcategory, Some(Subcategory::Poster));
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("4 500 ₽"), 4500);
        assert_eq!(parse_price("free"), 0);
    }

    #[test]
    fn test_filter_by_category() {
        let mut filter = catalog();
        assert_eq!(filter.count_label(), "(7 items)");

        filter.select_category(Category::Accessories);
        let titles: Vec<&str> = filter.filtered().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Кепка", "Значок Сукуна", "Шоппер"]);
    }

    #[test]
    fn test_subcategory_selects_parent() {
        let mut filter = catalog();
        filter.select_subcategory(Subcategory::Sweatshirt);
        assert_eq!(filter.category(), Some(Category::Clothing));
        assert_eq!(filter.filtered().len(), 1);

        filter.select_category(Category::Other);
        assert_eq!(filter.subcategory(), None);

        filter.show_all();
        assert_eq!(filter.filtered().len(), 7);
    }

    #[test]
    fn test_sorting_is_stable() {
        let mut filter = catalog();
        filter.set_sort(SortMode::PriceAscending);
        let prices: Vec<u64> = filter.filtered().iter().map(|i| i.price).collect();
        assert_eq!(prices, vec![300, 800, 999, 1200, 1200, 3900, 4500]);
        assert_eq!(filter.filtered()[3].title, "Кепка");

        filter.set_sort(SortMode::PriceDescending);
        assert_eq!(filter.filtered()[0].price, 4500);
        assert_eq!(filter.filtered()[2].title, "Кепка");

        filter.set_sort(SortMode::from_label("whatever"));
        assert_eq!(filter.filtered()[0].title, "Худи Годжо");
    }

    #[test]
    fn test_paging() {
        let items = (0..30)
            .map(|i| CatalogItem::new(format!("Постер {i}"), "", 100))
            .collect();
        let mut filter = CatalogFilter::new(items);

        assert_eq!(filter.visible().len(), 12);
        assert!(filter.has_more());

        filter.load_more();
        filter.load_more();
        assert_eq!(filter.visible().len(), 30);
        assert!(!filter.has_more());

        filter.select_category(Category::Other);
        assert_eq!(filter.visible().len(), 12);
    }
}
