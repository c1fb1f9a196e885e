//! # Core Client Logic
//!
//! Everything ShelfSync computes locally. It knows nothing about HTTP or
//! about how results are displayed.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • session gate         │
//!                    │  • standing / fines     │
//!                    │  • cart lifecycle       │
//!                    │  • list staleness       │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │   member   │      │    api     │      │    cli     │
//!     │  (facade)  │      │  (reqwest) │      │ (rendering)│
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`session`]: the single token, restore/login/logout, published via `watch`
//! - [`nav`]: the two screen graphs derived from the session
//! - [`standing`]: good / warning / danger classification of due dates
//! - [`fines`]: overdue fine accrual
//! - [`cart`]: optimistic removal and checkout transitions
//! - [`listing`]: explicit refresh and staleness for server-backed lists

pub mod cart;
pub mod config;
pub mod fines;
pub mod listing;
pub mod nav;
pub mod session;
pub mod standing;
pub mod store;
pub mod validate;
