use std::{cell::Cell, rc::Rc};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::client::storage::{LocalStorage, StorageError};

pub const CART_STORAGE_KEY: &str = "shoppingCart";

#[derive(Debug, Error)]
pub enum CartError {
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("serialize cart: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Merchandise as shown on a product card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image: String,
    pub category: String,
    pub quantity: u32,
}

impl CartLineItem {
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CartChange {
    ItemAdded { id: String, notification: String },
    ItemRemoved { id: String },
    QuantityChanged { id: String, quantity: u32 },
    Cleared,
    /// Another tab rewrote the stored cart.
    Reloaded,
}

/// Sent to observers after each mutation, once storage and memory agree.
#[derive(Debug, Clone, PartialEq)]
pub struct CartEvent {
    pub change: CartChange,
    pub item_count: u32,
    pub total: Decimal,
}

type Observer = Box<dyn Fn(&CartEvent)>;

/// Cart for one page load, backed by a [`LocalStorage`].
pub struct CartStore<S> {
    storage: S,
    items: Vec<CartLineItem>,
    observers: Vec<Observer>,
}

impl<S: LocalStorage> CartStore<S> {
    /// Load the persisted cart. Unreadable data counts as an empty cart.
    pub fn load(storage: S) -> Self {
        let items = read_items(&storage);
        Self {
            storage,
            items,
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: impl Fn(&CartEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn add_item(&mut self, product: &Product, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        let previous = self.items.clone();

        match self.items.iter().position(|item| item.id == product.id) {
            Some(idx) => {
                let item = &mut self.items[idx];
                item.quantity = item
                    .quantity
                    .checked_add(quantity)
                    .ok_or(CartError::InvalidQuantity)?;
            }
            None => self.items.push(CartLineItem {
                id: product.id.clone(),
                name: product.name.clone(),
                price: product.price,
                image: product.image.clone(),
                category: product.category.clone(),
                quantity,
            }),
        }

        self.commit(
            previous,
            CartChange::ItemAdded {
                id: product.id.clone(),
                notification: format!("{} added to cart!", product.name),
            },
        )
    }

    pub fn remove_item(&mut self, id: &str) -> Result<(), CartError> {
        if !self.items.iter().any(|item| item.id == id) {
            return Ok(());
        }
        let previous = self.items.clone();
        self.items.retain(|item| item.id != id);
        self.commit(previous, CartChange::ItemRemoved { id: id.to_string() })
    }

    /// Set the quantity exactly; zero or less removes the line.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) -> Result<(), CartError> {
        if quantity <= 0 {
            return self.remove_item(id);
        }
        let quantity = u32::try_from(quantity).map_err(|_| CartError::InvalidQuantity)?;
        let previous = self.items.clone();
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            return Ok(());
        };
        item.quantity = quantity;
        self.commit(
            previous,
            CartChange::QuantityChanged {
                id: id.to_string(),
                quantity,
            },
        )
    }

    pub fn clear(&mut self) -> Result<(), CartError> {
        let previous = std::mem::take(&mut self.items);
        self.commit(previous, CartChange::Cleared)
    }

    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartLineItem::subtotal).sum()
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Storage-change notification from another tab. Returns whether the cart
    /// was reloaded. There is no locking: the last writer wins.
    pub fn handle_storage_change(&mut self, key: &str) -> bool {
        if key != CART_STORAGE_KEY {
            return false;
        }
        self.items = read_items(&self.storage);
        self.notify(CartChange::Reloaded);
        true
    }

    fn commit(&mut self, previous: Vec<CartLineItem>, change: CartChange) -> Result<(), CartError> {
        if let Err(err) = self.persist() {
            self.items = previous;
            return Err(err);
        }
        self.notify(change);
        Ok(())
    }

    fn persist(&self) -> Result<(), CartError> {
        let json = serde_json::to_string(&self.items)?;
        self.storage.set_item(CART_STORAGE_KEY, &json)?;
        Ok(())
    }

    fn notify(&self, change: CartChange) {
        let event = CartEvent {
            change,
            item_count: self.item_count(),
            total: self.total(),
        };
        for observer in &self.observers {
            observer(&event);
        }
    }
}

fn read_items<S: LocalStorage>(storage: &S) -> Vec<CartLineItem> {
    let raw = match storage.get_item(CART_STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            tracing::warn!(error = %err, "cart storage unreadable, starting empty");
            return Vec::new();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(items) => items,
        Err(err) => {
            tracing::warn!(error = %err, "stored cart is corrupt, starting empty");
            Vec::new()
        }
    }
}

/// Header cart badge: shows the item count, hidden while the cart is empty.
#[derive(Debug, Default)]
pub struct CartBadge {
    count: Cell<u32>,
}

impl CartBadge {
    pub fn attach<S: LocalStorage>(cart: &mut CartStore<S>) -> Rc<Self> {
        let badge = Rc::new(Self {
            count: Cell::new(cart.item_count()),
        });
        let observer = Rc::clone(&badge);
        cart.subscribe(move |event| observer.count.set(event.item_count));
        badge
    }

    pub fn count(&self) -> u32 {
        self.count.get()
    }

    pub fn is_visible(&self) -> bool {
        self.count.get() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::storage::MemoryStorage;

    fn mug() -> Product {
        Product {
            id: "mug".into(),
            name: "Festival Mug".into(),
            price: Decimal::new(125, 1),
            image: "/images/mug.png".into(),
            category: "accessories".into(),
        }
    }

    #[test]
    fn repeated_adds_merge_into_one_line() {
        let mut cart = CartStore::load(MemoryStorage::new());
        cart.add_item(&mug(), 2).unwrap();
        cart.add_item(&mug(), 3).unwrap();
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 5);
        assert_eq!(cart.total(), Decimal::new(625, 1));
    }

    #[test]
    fn zero_quantity_add_is_rejected() {
        let mut cart = CartStore::load(MemoryStorage::new());
        assert!(matches!(cart.add_item(&mug(), 0), Err(CartError::InvalidQuantity)));
        assert!(cart.items().is_empty());
    }

    #[test]
    fn corrupt_storage_loads_as_empty_cart() {
        let storage = MemoryStorage::new();
        storage.set_item(CART_STORAGE_KEY, "{not json").unwrap();
        let cart = CartStore::load(storage);
        assert_eq!(cart.item_count(), 0);
    }
}
