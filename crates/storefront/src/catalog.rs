//! Built-in product catalog.
//!
//! The catalog is loaded once at startup and shared read-only through
//! [`AppState`](crate::state::AppState). Products and categories never change
//! while the server runs.

use greengrocer_core::{Price, ProductId};

use crate::models::{Category, Product};

/// (id, name, description, cents, image hint, category, subcategory, stock)
type ProductRow = (
    &'static str,
    &'static str,
    &'static str,
    u32,
    &'static str,
    &'static str,
    Option<&'static str>,
    u32,
);

const CATEGORIES: &[(&str, &str, &[&str])] = &[
    ("fruits", "Fruits", &["Citrus", "Berries", "Tropical"]),
    ("vegetables", "Vegetables", &["Leafy Greens", "Root Vegetables"]),
];

#[rustfmt::skip]
const PRODUCTS: &[ProductRow] = &[
    ("1", "Apple", "Crisp and sweet red apples.", 250, "red apple", "fruits", None, 100),
    ("2", "Banana", "Ripe and creamy bananas.", 180, "yellow banana", "fruits", Some("Tropical"), 150),
    ("3", "Orange", "Juicy and vitamin C-rich oranges.", 310, "orange fruit", "fruits", Some("Citrus"), 80),
    ("4", "Strawberry", "Sweet and fresh strawberries.", 400, "strawberry fruit", "fruits", Some("Berries"), 120),
    ("5", "Broccoli", "Fresh green broccoli florets.", 275, "broccoli vegetable", "vegetables", None, 90),
    ("6", "Carrot", "Crunchy and sweet carrots.", 150, "carrot vegetable", "vegetables", Some("Root Vegetables"), 200),
    ("7", "Tomato", "Ripe and juicy red tomatoes.", 220, "tomato vegetable", "vegetables", None, 130),
    ("8", "Lettuce", "Crisp iceberg lettuce.", 190, "lettuce vegetable", "vegetables", Some("Leafy Greens"), 70),
    ("9", "Grapes", "Sweet and juicy green grapes.", 550, "grapes fruit", "fruits", None, 60),
    ("10", "Avocado", "Creamy and ripe avocados.", 350, "avocado fruit", "fruits", Some("Tropical"), 50),
    ("11", "Potato", "Versatile and starchy potatoes.", 120, "potato vegetable", "vegetables", Some("Root Vegetables"), 250),
    ("12", "Cucumber", "Cool and refreshing cucumbers.", 100, "cucumber vegetable", "vegetables", None, 110),
];

/// In-memory product catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    categories: Vec<Category>,
}

impl Catalog {
    /// The storefront's built-in catalog.
    #[must_use]
    pub fn builtin() -> Self {
        let products = PRODUCTS
            .iter()
            .map(
                |&(id, name, description, cents, hint, category, subcategory, stock)| Product {
                    id: ProductId::new(id),
                    name: name.to_owned(),
                    description: description.to_owned(),
                    price: Price::from_cents(cents),
                    image_url: format!(
                        "https://picsum.photos/seed/{}/400/400",
                        name.to_lowercase()
                    ),
                    image_hint: hint.to_owned(),
                    category: category.to_owned(),
                    subcategory: subcategory.map(str::to_owned),
                    stock,
                },
            )
            .collect();

        let categories = CATEGORIES
            .iter()
            .map(|&(id, name, subcategories)| Category {
                id: id.to_owned(),
                name: name.to_owned(),
                subcategories: subcategories.iter().map(|&s| s.to_owned()).collect(),
            })
            .collect();

        Self::new(products, categories)
    }

    #[must_use]
    pub const fn new(products: Vec<Product>, categories: Vec<Category>) -> Self {
        Self {
            products,
            categories,
        }
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Products in a category, optionally narrowed to one subcategory.
    ///
    /// Subcategory matching ignores ASCII case.
    pub fn products_in<'a>(
        &'a self,
        category: &'a str,
        subcategory: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Product> + 'a {
        self.products.iter().filter(move |product| {
            product.category == category
                && subcategory.is_none_or(|wanted| {
                    product
                        .subcategory
                        .as_deref()
                        .is_some_and(|sub| sub.eq_ignore_ascii_case(wanted))
                })
        })
    }

    #[must_use]
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.products().len(), 12);
        assert_eq!(catalog.categories().len(), 2);

        let apple = catalog.product(&ProductId::new("1")).unwrap();
        assert_eq!(apple.name, "Apple");
        assert_eq!(apple.price, Price::from_cents(250));
        assert!(catalog.product(&ProductId::new("99")).is_none());
    }

    #[test]
    fn test_every_product_has_a_known_category() {
        let catalog = Catalog::builtin();
        for product in catalog.products() {
            let category = catalog.category(&product.category).unwrap();
            if let Some(sub) = &product.subcategory {
                assert!(category.subcategories.contains(sub), "{sub} not in {}", category.id);
            }
        }
    }

    #[test]
    fn test_products_in_category() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.products_in("fruits", None).count(), 6);

        let roots: Vec<_> = catalog
            .products_in("vegetables", Some("root vegetables"))
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(roots, ["Carrot", "Potato"]);

        assert_eq!(catalog.products_in("dairy", None).count(), 0);
    }
}
