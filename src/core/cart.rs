//! # Cart Lifecycle
//!
//! Local view of the member's cart. The server owns the truth; this type
//! only tracks what the member currently sees and which transitions are in
//! flight.
//!
//! ```text
//!   Empty ──fetch──► Populated ──begin_checkout──► CheckingOut
//!                       ▲                             │
//!                       └──── checkout_failed ────────┤
//!   Empty ◄──────────── checkout_succeeded ───────────┘
//!
//!   item: Present ──begin_remove──► Removing ──confirm──► Absent
//!                                       └──reject──► (cart stale, refetch)
//! ```
//!
//! Removal is optimistic: the item leaves the visible list immediately and
//! the server request follows. A rejected removal does not put the item back
//! locally; the cart is marked stale and must be re-fetched.

use std::fmt;

use crate::api::CartItem;
use crate::core::listing::{Listing, RefreshTicket};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartPhase {
    Empty,
    Populated,
    CheckingOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    Present,
    Removing,
    Absent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    UnknownItem(i64),
    CheckoutInProgress,
    EmptyCart,
}

impl fmt::Display for CartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartError::UnknownItem(id) => write!(f, "cart item {id} is not in the cart"),
            CartError::CheckoutInProgress => write!(f, "checkout is already in progress"),
            CartError::EmptyCart => write!(f, "your cart is empty"),
        }
    }
}

impl std::error::Error for CartError {}

/// A tentative removal awaiting the server's answer.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Removal {
    pub item: CartItem,
}

impl Removal {
    pub fn cart_item_id(&self) -> i64 {
        self.item.cart_item_id
    }
}

/// Snapshot taken when checkout starts, restored if it fails.
#[derive(Debug)]
#[must_use]
pub struct CheckoutTicket {
    snapshot: Vec<CartItem>,
}

#[derive(Debug, Default)]
pub struct Cart {
    listing: Listing<CartItem>,
    removing: Vec<i64>,
    checking_out: bool,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        self.listing.items()
    }

    pub fn len(&self) -> usize {
        self.listing.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listing.items().is_empty()
    }

    pub fn is_stale(&self) -> bool {
        self.listing.is_stale()
    }

    pub fn phase(&self) -> CartPhase {
        if self.checking_out {
            CartPhase::CheckingOut
        } else if self.is_empty() {
            CartPhase::Empty
        } else {
            CartPhase::Populated
        }
    }

    pub fn item_state(&self, cart_item_id: i64) -> ItemState {
        if self.removing.contains(&cart_item_id) {
            ItemState::Removing
        } else if self.items().iter().any(|i| i.cart_item_id == cart_item_id) {
            ItemState::Present
        } else {
            ItemState::Absent
        }
    }

    pub fn mark_stale(&mut self) {
        self.listing.mark_stale();
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.listing.begin_refresh()
    }

    /// Installs a server snapshot. Returns `false` if the ticket was superseded.
    pub fn apply(&mut self, ticket: RefreshTicket, items: Vec<CartItem>) -> bool {
        let applied = self.listing.apply(ticket, items);
        if applied {
            // The server's list is authoritative; anything it still holds is
            // no longer "removing" from our point of view.
            let listing = &self.listing;
            self.removing
                .retain(|id| !listing.items().iter().any(|i| i.cart_item_id == *id));
        }
        applied
    }

    pub fn fail_refresh(&mut self, ticket: RefreshTicket) {
        self.listing.fail(ticket);
    }

    /// The cart view went away; a refresh still in flight is dropped.
    pub fn detach(&mut self) {
        self.listing.detach();
    }

    /// Removes the item from the visible list right away.
    pub fn begin_remove(&mut self, cart_item_id: i64) -> Result<Removal, CartError> {
        if self.checking_out {
            return Err(CartError::CheckoutInProgress);
        }
        let items = self.listing.items_mut();
        let index = items
            .iter()
            .position(|i| i.cart_item_id == cart_item_id)
            .ok_or(CartError::UnknownItem(cart_item_id))?;
        let item = items.remove(index);
        self.removing.push(cart_item_id);
        Ok(Removal { item })
    }

    pub fn confirm_remove(&mut self, removal: Removal) {
        self.removing.retain(|id| *id != removal.cart_item_id());
    }

    /// The server refused the removal. The local list can no longer be
    /// trusted and must be re-fetched.
    pub fn reject_remove(&mut self, removal: Removal) {
        log::warn!(
            "Removal of cart item {} rejected; cart needs a refetch",
            removal.cart_item_id()
        );
        self.removing.retain(|id| *id != removal.cart_item_id());
        self.listing.mark_stale();
    }

    pub fn begin_checkout(&mut self) -> Result<CheckoutTicket, CartError> {
        if self.checking_out {
            return Err(CartError::CheckoutInProgress);
        }
        if self.is_empty() {
            return Err(CartError::EmptyCart);
        }
        self.checking_out = true;
        Ok(CheckoutTicket {
            snapshot: self.items().to_vec(),
        })
    }

    /// Every item became a borrow record; the server cart is now empty.
    pub fn checkout_succeeded(&mut self, _ticket: CheckoutTicket) {
        self.checking_out = false;
        self.removing.clear();
        let ticket = self.listing.begin_refresh();
        self.listing.apply(ticket, Vec::new());
    }

    /// Nothing was borrowed. The cart is exactly what it was before.
    pub fn checkout_failed(&mut self, ticket: CheckoutTicket) {
        self.checking_out = false;
        *self.listing.items_mut() = ticket.snapshot;
    }

    /// Forgets everything, e.g. on logout.
    pub fn clear(&mut self) {
        self.listing.clear();
        self.removing.clear();
        self.checking_out = false;
    }
}
