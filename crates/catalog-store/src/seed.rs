//! Sample catalog loaded at startup when seeding is enabled.

use catalog_core::ProductDraft;

fn draft(name: &str, description: &str, price: f64, category: &str, in_stock: bool) -> ProductDraft {
    ProductDraft {
        name: name.to_string(),
        description: description.to_string(),
        price,
        category: category.to_string(),
        in_stock,
    }
}

/// Five products across three categories.
#[must_use]
pub fn sample_catalog() -> Vec<ProductDraft> {
    vec![
        draft(
            "Wireless Mouse",
            "Ergonomic 2.4GHz mouse with silent clicks",
            24.99,
            "Electronics",
            true,
        ),
        draft(
            "Mechanical Keyboard",
            "Tenkeyless keyboard with hot-swappable switches",
            89.0,
            "Electronics",
            true,
        ),
        draft(
            "Espresso Machine",
            "15-bar pump espresso maker with milk frother",
            149.5,
            "Kitchen",
            false,
        ),
        draft(
            "Chef Knife",
            "8-inch stainless steel chef knife",
            59.95,
            "Kitchen",
            true,
        ),
        draft(
            "Running Shoes",
            "Lightweight trail running shoes",
            120.0,
            "Sports",
            true,
        ),
    ]
}
