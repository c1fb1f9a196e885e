//! # Navigation Graphs
//!
//! The client shows one of two mutually exclusive screen graphs. Which one
//! is a pure function of whether a session token exists.

/// The two screen graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavGraph {
    /// Login and registration.
    Auth,
    /// Everything a signed-in member can reach.
    Main,
}

impl NavGraph {
    pub fn for_token(token: Option<&str>) -> Self {
        match token {
            Some(_) => NavGraph::Main,
            None => NavGraph::Auth,
        }
    }

    /// The screen a graph opens on.
    pub fn initial_screen(self) -> Screen {
        match self {
            NavGraph::Auth => Screen::Login,
            NavGraph::Main => Screen::Dashboard,
        }
    }

    pub fn screens(self) -> impl Iterator<Item = Screen> {
        Screen::ALL.into_iter().filter(move |s| s.is_reachable(self))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Register,
    Dashboard,
    Profile,
    Cart,
    SearchBook,
    BookDetails,
    AvailableCopies,
    ChangePassword,
    BorrowedBooks,
    BorrowingHistory,
    Fines,
    PaymentHistory,
}

impl Screen {
    pub const ALL: [Screen; 13] = [
        Screen::Login,
        Screen::Register,
        Screen::Dashboard,
        Screen::Profile,
        Screen::Cart,
        Screen::SearchBook,
        Screen::BookDetails,
        Screen::AvailableCopies,
        Screen::ChangePassword,
        Screen::BorrowedBooks,
        Screen::BorrowingHistory,
        Screen::Fines,
        Screen::PaymentHistory,
    ];

    pub fn graph(self) -> NavGraph {
        match self {
            Screen::Login | Screen::Register => NavGraph::Auth,
            _ => NavGraph::Main,
        }
    }

    pub fn is_reachable(self, graph: NavGraph) -> bool {
        self.graph() == graph
    }

    pub fn title(self) -> &'static str {
        match self {
            Screen::Login => "Login",
            Screen::Register => "Register",
            Screen::Dashboard => "ShelfSync",
            Screen::Profile => "Profile",
            Screen::Cart => "My Cart",
            Screen::SearchBook => "Search Books",
            Screen::BookDetails => "Book Details",
            Screen::AvailableCopies => "Available Copies",
            Screen::ChangePassword => "Change Password",
            Screen::BorrowedBooks => "My Borrowed Books",
            Screen::BorrowingHistory => "Borrowing History",
            Screen::Fines => "My Fines",
            Screen::PaymentHistory => "Payment History",
        }
    }
}
