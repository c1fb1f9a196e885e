//! # Server-Backed Lists
//!
//! Every list the member sees (cart, borrowed books, history, payments) is a
//! snapshot of server state. A `Listing` makes refreshing explicit:
//!
//! ```text
//! begin_refresh() ──► RefreshTicket ──(request in flight)──► apply(ticket, items)
//!        ▲                                                        │
//!   mark_stale()                                 dropped if the ticket is no
//!   (after a mutation)                           longer current (newer refresh,
//!                                                or the view was detached)
//! ```
//!
//! Callers decide when to refresh; a stale flag tells them a refresh is due.

/// Proof that a refresh was started. Only the most recent ticket is honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct RefreshTicket {
    generation: u64,
}

#[derive(Debug, Clone)]
pub struct Listing<T> {
    items: Vec<T>,
    stale: bool,
    loading: bool,
    generation: u64,
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Listing<T> {
    /// An empty listing that has never been fetched (and so is stale).
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            stale: true,
            loading: false,
            generation: 0,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.generation += 1;
        self.loading = true;
        RefreshTicket {
            generation: self.generation,
        }
    }

    pub fn is_current(&self, ticket: RefreshTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Installs fetched items. Returns `false` (and changes nothing) when the
    /// ticket has been superseded.
    pub fn apply(&mut self, ticket: RefreshTicket, items: Vec<T>) -> bool {
        if !self.is_current(ticket) {
            log::debug!("Dropping superseded refresh (generation {})", ticket.generation);
            return false;
        }
        self.items = items;
        self.stale = false;
        self.loading = false;
        true
    }

    /// Ends a failed refresh. The old items stay and the list stays stale.
    pub fn fail(&mut self, ticket: RefreshTicket) {
        if self.is_current(ticket) {
            self.loading = false;
            self.stale = true;
        }
    }

    /// The view went away: outstanding refreshes are ignored when they land.
    pub fn detach(&mut self) {
        self.generation += 1;
        self.loading = false;
    }

    /// Drops all items, e.g. on logout.
    pub fn clear(&mut self) {
        self.detach();
        self.items.clear();
        self.stale = true;
    }

    pub(crate) fn items_mut(&mut self) -> &mut Vec<T> {
        &mut self.items
    }
}
