//! Text views and routing for the cart.
//!
//! Views are plain [`Display`](fmt::Display) adapters over borrowed data; the
//! CLI prints them after every intention.

use crate::types::{CartState, Product};
use std::fmt;

/// Notice shown for an empty cart
pub const EMPTY_CART_NOTICE: &str = "There are no products in the shopping cart!";

/// Notice shown while the catalog has nothing to list
pub const EMPTY_CATALOG_NOTICE: &str = "Loading ...";

/// Navigable screens
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// Product listing
    Catalog,
    /// Cart contents
    Cart,
}

impl Route {
    /// Resolves a path; the root redirects to the catalog
    ///
    /// Leading and trailing slashes are ignored. Unknown paths give `None`.
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        match path.trim().trim_matches('/') {
            "" | "catalog" => Some(Self::Catalog),
            "cart" => Some(Self::Cart),
            _ => None,
        }
    }

    /// Canonical path of the route
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Catalog => "/catalog",
            Self::Cart => "/cart",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// One card per product
#[derive(Debug)]
pub struct CatalogView<'a> {
    products: &'a [Product],
}

impl<'a> CatalogView<'a> {
    /// Creates a view over `products`
    #[must_use]
    pub const fn new(products: &'a [Product]) -> Self {
        Self { products }
    }
}

impl fmt::Display for CatalogView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.products.is_empty() {
            return writeln!(f, "{EMPTY_CATALOG_NOTICE}");
        }

        for (index, product) in self.products.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            writeln!(f, "[{}] {}", product.id, product.name)?;
            if !product.description.is_empty() {
                writeln!(f, "    {}", product.description)?;
            }
            writeln!(f, "    $ {}", product.price)?;
        }
        Ok(())
    }
}

/// Cart table with a grand total footer
#[derive(Debug)]
pub struct CartView<'a> {
    cart: &'a CartState,
}

impl<'a> CartView<'a> {
    /// Creates a view over `cart`
    #[must_use]
    pub const fn new(cart: &'a CartState) -> Self {
        Self { cart }
    }
}

impl fmt::Display for CartView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cart.is_empty() {
            return writeln!(f, "{EMPTY_CART_NOTICE}");
        }

        let name_width = self
            .cart
            .lines()
            .iter()
            .map(|line| line.product.name.chars().count())
            .max()
            .unwrap_or(0)
            .max("Name".len());

        writeln!(
            f,
            "{:>4}  {:<name_width$}  {:>10}  {:>8}  {:>10}",
            "Id", "Name", "Price", "Quantity", "Total"
        )?;
        for line in self.cart.lines() {
            writeln!(
                f,
                "{:>4}  {:<name_width$}  {:>10}  {:>8}  {:>10}",
                line.product.id,
                line.product.name,
                line.product.price,
                line.quantity,
                line.subtotal()
            )?;
        }
        writeln!(
            f,
            "{:>4}  {:<name_width$}  {:>10}  {:>8}  {:>10}",
            "", "Total", "", "", self.cart.total()
        )
    }
}

/// Renders the product listing
#[must_use]
pub fn render_catalog(products: &[Product]) -> String {
    CatalogView::new(products).to_string()
}

/// Renders the cart table
#[must_use]
pub fn render_cart(cart: &CartState) -> String {
    CartView::new(cart).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CartLine, ProductId};

    fn keyboard() -> Product {
        Product::new(ProductId::new(1), "Keyboard", "Mechanical keyboard", 50)
    }

    fn mouse() -> Product {
        Product::new(ProductId::new(2), "Mouse", "", 20)
    }

    #[test]
    fn routes_resolve() {
        assert_eq!(Route::parse("catalog"), Some(Route::Catalog));
        assert_eq!(Route::parse("/cart"), Some(Route::Cart));
        assert_eq!(Route::parse("/"), Some(Route::Catalog));
        assert_eq!(Route::parse(""), Some(Route::Catalog));
        assert_eq!(Route::parse("/checkout"), None);
        assert_eq!(Route::Cart.to_string(), "/cart");
    }

    #[test]
    fn empty_cart_shows_notice() {
        assert_eq!(render_cart(&CartState::new()).trim(), EMPTY_CART_NOTICE);
    }

    #[test]
    fn cart_table_lists_lines_and_total() {
        let mut keyboard_line = CartLine::new(keyboard());
        keyboard_line.quantity = 2;
        let cart = CartState::from_lines(vec![keyboard_line, CartLine::new(mouse())]).unwrap();

        let rendered = render_cart(&cart);
        let rows: Vec<&str> = rendered.lines().collect();

        assert_eq!(rows.len(), 4);
        assert!(rows[1].contains("Keyboard"));
        assert!(rows[1].trim_end().ends_with("100"));
        assert!(rows[2].contains("Mouse"));
        assert!(rows[3].contains("Total"));
        assert!(rows[3].trim_end().ends_with("120"));
    }

    #[test]
    fn catalog_lists_cards() {
        let rendered = render_catalog(&[keyboard(), mouse()]);

        assert!(rendered.contains("[1] Keyboard"));
        assert!(rendered.contains("Mechanical keyboard"));
        assert!(rendered.contains("$ 50"));
        assert!(rendered.contains("[2] Mouse"));
        assert!(rendered.contains("$ 20"));
    }

    #[test]
    fn empty_catalog_shows_notice() {
        assert_eq!(render_catalog(&[]).trim(), EMPTY_CATALOG_NOTICE);
    }
}
