//! User-facing alerts for failed actions.
//!
//! The same error reads differently depending on what the member was doing:
//! a 401 on login is "wrong password", a 401 on checkout is just a failed
//! checkout. [`MemberError::alert`] takes the action into account.

use std::fmt;

use crate::core::cart::CartError;

use super::MemberError;

/// What the member was trying to do when an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Login,
    Register,
    Logout,
    LoadDashboard,
    LoadCatalog,
    Search,
    LoadCopies,
    LoadCart,
    AddCopy,
    AddBook,
    RemoveFromCart,
    Checkout,
    LoadBorrowed,
    LoadHistory,
    LoadPayments,
    LoadProfile,
    ChangePassword,
}

impl Action {
    /// Title used when the server rejects this action.
    fn failure_title(self) -> &'static str {
        match self {
            Action::Login => "Login Failed",
            Action::Register => "Registration Failed",
            Action::Checkout => "Checkout Failed",
            _ => "Error",
        }
    }

    /// Message used when the server gives no usable explanation.
    fn fallback_message(self) -> &'static str {
        match self {
            Action::Login => "Invalid email or password. Please try again.",
            Action::Register => "An error occurred. Please try again.",
            Action::Logout => "Could not clear the saved session.",
            Action::LoadDashboard => "Could not load dashboard data.",
            Action::LoadCatalog => "Could not load the library's books.",
            Action::Search => "Could not perform search.",
            Action::LoadCopies => "Could not fetch available copies for this book.",
            Action::LoadCart => "Could not load your cart.",
            Action::AddCopy => "Could not add this copy to the cart.",
            Action::AddBook => "Could not add this book to your cart. Please try again.",
            Action::RemoveFromCart => "Could not sync removal with server.",
            Action::Checkout => "An error occurred during checkout.",
            Action::LoadBorrowed => "Could not load your borrowed books.",
            Action::LoadHistory => "Could not load borrowing history.",
            Action::LoadPayments => "Could not load payment history.",
            Action::LoadProfile => "Could not load your profile.",
            Action::ChangePassword => "An error occurred. Please check your current password.",
        }
    }

    /// Whether the server's own error text is shown for this action.
    fn shows_server_message(self) -> bool {
        matches!(
            self,
            Action::Register | Action::AddCopy | Action::Checkout | Action::ChangePassword
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    fn new(title: &str, message: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

impl MemberError {
    pub fn alert(&self, action: Action) -> Alert {
        match self {
            MemberError::Validation(e) => Alert::new("Error", e.to_string()),
            MemberError::NotSignedIn => Alert::new("Error", "Please log in first."),
            MemberError::InvalidLoginResponse => Alert::new(
                "Login Failed",
                "Received an invalid response from the server.",
            ),
            MemberError::OutOfStock => Alert::new(
                "Out of Stock",
                "There are no available copies of this book to borrow.",
            ),
            MemberError::NoCopiesAvailable => Alert::new(
                "Sorry!",
                "No copies were available at this moment. Someone might have just borrowed the last one.",
            ),
            MemberError::Cart(CartError::EmptyCart) => Alert::new("Error", "Your cart is empty."),
            MemberError::Cart(e) => Alert::new("Error", e.to_string()),
            MemberError::RemovalNotSynced { .. } => {
                Alert::new("Error", Action::RemoveFromCart.fallback_message())
            }
            MemberError::Session(_) => match action {
                Action::Logout => Alert::new("Error", action.fallback_message()),
                _ => Alert::new(
                    action.failure_title(),
                    "Could not save your session. Please try again.",
                ),
            },
            MemberError::Api(e) => {
                let message = e
                    .server_message()
                    .filter(|_| action.shows_server_message())
                    .unwrap_or(action.fallback_message());
                Alert::new(action.failure_title(), message)
            }
        }
    }
}
