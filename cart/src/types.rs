//! Domain types for the shopping cart.
//!
//! A cart is an insertion-ordered list of lines, one per distinct product,
//! each with a quantity of at least one. [`CartState`] keeps its lines private
//! so those two invariants hold for every value of the type, including values
//! decoded from a persisted snapshot.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Unique identifier of a catalog product
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i64);

impl ProductId {
    /// Creates a `ProductId` from its numeric value
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the numeric value
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A catalog product
///
/// Products come from the catalog and are never modified by the cart.
/// Prices are whole currency units.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier
    pub id: ProductId,
    /// Display name
    pub name: String,
    /// Longer description shown in the catalog; absent or `null` is empty
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Unit price
    pub price: i64,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Product {
    /// Creates a new product
    #[must_use]
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        description: impl Into<String>,
        price: i64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            price,
        }
    }
}

/// One product in the cart together with its quantity
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// The product
    pub product: Product,
    /// How many units; never zero inside a [`CartState`]
    pub quantity: u32,
}

impl CartLine {
    /// Creates a line holding a single unit of `product`
    #[must_use]
    pub const fn new(product: Product) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }

    /// Price times quantity
    #[must_use]
    pub fn subtotal(&self) -> i64 {
        self.product.price.saturating_mul(i64::from(self.quantity))
    }
}

/// A list of lines that cannot be a [`CartState`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Two lines refer to the same product
    #[error("product {0} appears on more than one cart line")]
    DuplicateProduct(ProductId),

    /// A line has a quantity of zero
    #[error("cart line for product {0} has zero quantity")]
    ZeroQuantity(ProductId),
}

/// State of the shopping cart
///
/// Serializes as a bare JSON array of lines:
/// `[{"product":{"id":1,"name":"Keyboard","description":"","price":50},"quantity":1}]`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct CartState {
    lines: Vec<CartLine>,
}

impl CartState {
    /// Creates an empty cart
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Builds a cart from lines, checking uniqueness and quantities
    ///
    /// # Errors
    ///
    /// Returns [`InvariantViolation`] for the first duplicate product or zero
    /// quantity found.
    pub fn from_lines(lines: Vec<CartLine>) -> Result<Self, InvariantViolation> {
        for (index, line) in lines.iter().enumerate() {
            if line.quantity == 0 {
                return Err(InvariantViolation::ZeroQuantity(line.product.id));
            }
            if lines
                .iter()
                .skip(index + 1)
                .any(|other| other.product.id == line.product.id)
            {
                return Err(InvariantViolation::DuplicateProduct(line.product.id));
            }
        }
        Ok(Self { lines })
    }

    /// The lines in insertion order
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of lines (distinct products)
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The line for `id`, if any
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product.id == id)
    }

    /// Whether a line exists for `id`
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Total number of units across all lines
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of all line subtotals
    #[must_use]
    pub fn total(&self) -> i64 {
        self.lines
            .iter()
            .fold(0, |total: i64, line| total.saturating_add(line.subtotal()))
    }

    /// Appends a new single-unit line at the end
    ///
    /// Callers check [`contains`](Self::contains) first.
    pub(crate) fn append(&mut self, product: Product) {
        self.lines.push(CartLine::new(product));
    }

    /// Adds one unit to the line for `id` in place; `false` if there is none
    pub(crate) fn increment(&mut self, id: ProductId) -> bool {
        match self.lines.iter_mut().find(|line| line.product.id == id) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(1);
                true
            },
            None => false,
        }
    }

    /// Removes the line for `id`, keeping the order of the others; `false` if there is none
    pub(crate) fn remove(&mut self, id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.product.id != id);
        self.lines.len() != before
    }
}

impl TryFrom<Vec<CartLine>> for CartState {
    type Error = InvariantViolation;

    fn try_from(lines: Vec<CartLine>) -> Result<Self, Self::Error> {
        Self::from_lines(lines)
    }
}

impl From<CartState> for Vec<CartLine> {
    fn from(state: CartState) -> Self {
        state.lines
    }
}

/// Action kinds understood by the cart reducer, as they appear on the wire
const KNOWN_KINDS: [&str; 3] = ["ADD", "UPDATE_QUANTITY", "DELETE"];

/// Actions accepted by the cart reducer
///
/// On the wire an action is a tagged object,
/// `{"kind": "UPDATE_QUANTITY", "payload": {...product...}}` or
/// `{"kind": "DELETE", "payload": 3}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CartAction {
    /// Append a new line for a product that is not in the cart yet
    Add(Product),

    /// Add one unit to the line of a product already in the cart
    UpdateQuantity(Product),

    /// Remove the line of a product
    Delete(ProductId),
}

impl CartAction {
    /// Wire name of this action's kind
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Add(_) => "ADD",
            Self::UpdateQuantity(_) => "UPDATE_QUANTITY",
            Self::Delete(_) => "DELETE",
        }
    }

    /// Product the action refers to
    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        match self {
            Self::Add(product) | Self::UpdateQuantity(product) => product.id,
            Self::Delete(id) => *id,
        }
    }

    /// Decodes a wire action
    ///
    /// An object whose `kind` is missing or unknown decodes to `Ok(None)`:
    /// there is nothing to reduce, so dispatching it leaves the cart as it is.
    ///
    /// # Errors
    ///
    /// Returns an error if `raw` is not JSON, or if a known kind carries a
    /// payload of the wrong shape.
    pub fn decode(raw: &str) -> Result<Option<Self>, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let known = value
            .get("kind")
            .and_then(serde_json::Value::as_str)
            .is_some_and(|kind| KNOWN_KINDS.contains(&kind));
        if !known {
            tracing::debug!("Ignoring action with unrecognized kind");
            return Ok(None);
        }
        serde_json::from_value(value).map(Some)
    }
}
