//! # Command Line Surface
//!
//! One invocation runs one member action against the backend and prints the
//! result. The saved session carries over between invocations.

pub mod render;

use chrono::Local;
use clap::{Parser, Subcommand};

use crate::core::validate::{ChangePasswordForm, RegisterForm};
use crate::member::{Action, Member, MemberError};

#[derive(Parser, Debug)]
#[command(name = "shelfsync", about = "Library member client", version)]
pub struct Cli {
    /// Backend base URL (overrides config and SHELFSYNC_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and remember the session
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// Forget the saved session
    Logout,
    /// Show whether a session is active
    Status,
    /// Membership summary
    Dashboard,
    /// List the catalog, or search it
    Books {
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Available copies of a book
    Copies { book_id: i64 },
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: Option<CartCommand>,
    },
    /// Borrow everything in the cart
    Checkout,
    /// Currently borrowed books and their due standing
    Borrowed,
    /// Outstanding fines on borrowed books
    Fines,
    /// Full borrowing history
    History,
    /// Fee and fine payments
    Payments,
    Profile,
    ChangePassword {
        #[arg(long)]
        old_password: String,
        #[arg(long)]
        new_password: String,
        #[arg(long)]
        confirm_password: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum CartCommand {
    List,
    /// Reserve a specific copy
    Add { copy_id: i64 },
    /// Reserve the first available copy of a book
    AddBook { book_id: i64 },
    /// Release a reservation by cart item id
    Remove { cart_item_id: i64 },
}

/// A failed command, with what the member was doing when it failed.
#[derive(Debug)]
pub struct Failure {
    pub action: Action,
    pub error: MemberError,
}

trait Context<T> {
    fn during(self, action: Action) -> Result<T, Failure>;
}

impl<T> Context<T> for Result<T, MemberError> {
    fn during(self, action: Action) -> Result<T, Failure> {
        self.map_err(|error| Failure { action, error })
    }
}

/// Runs one command and returns the text to print.
pub async fn run(member: &mut Member, command: Command) -> Result<String, Failure> {
    let today = Local::now().date_naive();

    let output = match command {
        Command::Login { email, password } => {
            member.login(&email, &password).await.during(Action::Login)?;
            format!("Signed in as {}.\n", email.trim())
        }
        Command::Register {
            name,
            email,
            phone,
            password,
            confirm_password,
        } => {
            let form = RegisterForm {
                name,
                email,
                phone,
                password,
                confirm_password,
            };
            member.register(&form).await.during(Action::Register)?;
            "Registration successful! You are now signed in.\n".to_string()
        }
        Command::Logout => {
            member.logout().during(Action::Logout)?;
            "Signed out.\n".to_string()
        }
        Command::Status => render::status(member.graph()),
        Command::Dashboard => {
            let dashboard = member.dashboard().await.during(Action::LoadDashboard)?;
            render::dashboard(&dashboard)
        }
        Command::Books { query } => {
            let action = if query.is_some() {
                Action::Search
            } else {
                Action::LoadCatalog
            };
            let books = member.catalog(query.as_deref()).await.during(action)?;
            render::books(&books)
        }
        Command::Copies { book_id } => {
            let copies = member.copies(book_id).await.during(Action::LoadCopies)?;
            render::copies(&copies)
        }
        Command::Cart { action } => run_cart(member, action.unwrap_or(CartCommand::List)).await?,
        Command::Checkout => {
            member.refresh_cart().await.during(Action::LoadCart)?;
            let response = member.checkout().await.during(Action::Checkout)?;
            render::checkout(&response)
        }
        Command::Borrowed => {
            member.refresh_borrowed().await.during(Action::LoadBorrowed)?;
            render::standings(&member.standings(today))
        }
        Command::Fines => {
            member.refresh_borrowed().await.during(Action::LoadBorrowed)?;
            render::fines(&member.fines(today))
        }
        Command::History => {
            let records = member.refresh_history().await.during(Action::LoadHistory)?;
            render::history(records)
        }
        Command::Payments => {
            let payments = member.refresh_payments().await.during(Action::LoadPayments)?;
            render::payments(payments)
        }
        Command::Profile => {
            let profile = member.profile().await.during(Action::LoadProfile)?;
            render::profile(&profile)
        }
        Command::ChangePassword {
            old_password,
            new_password,
            confirm_password,
        } => {
            let form = ChangePasswordForm {
                old_password,
                new_password,
                confirm_password,
            };
            member
                .change_password(&form)
                .await
                .during(Action::ChangePassword)?;
            "Your password has been updated successfully!\n".to_string()
        }
    };

    Ok(output)
}

async fn run_cart(member: &mut Member, command: CartCommand) -> Result<String, Failure> {
    let notice = match command {
        CartCommand::List => {
            member.refresh_cart().await.during(Action::LoadCart)?;
            None
        }
        CartCommand::Add { copy_id } => {
            member.add_to_cart(copy_id).await.during(Action::AddCopy)?;
            Some(format!("Copy #{copy_id} has been added to your cart!"))
        }
        CartCommand::AddBook { book_id } => {
            let books = member.catalog(None).await.during(Action::LoadCatalog)?;
            let Some(book) = books.into_iter().find(|b| b.id == book_id) else {
                return Ok(format!("No book with id {book_id}.\n"));
            };
            let copy = member
                .add_first_available(&book)
                .await
                .during(Action::AddBook)?;
            Some(format!(
                "Copy #{} of \"{}\" has been added to your cart.",
                copy.id, book.name
            ))
        }
        CartCommand::Remove { cart_item_id } => {
            member.refresh_cart().await.during(Action::LoadCart)?;
            member
                .remove_from_cart(cart_item_id)
                .await
                .during(Action::RemoveFromCart)?;
            None
        }
    };
    Ok(with_notice(notice, render::cart(member.cart())))
}

fn with_notice(notice: Option<String>, body: String) -> String {
    match notice {
        Some(line) => format!("{line}\n{body}"),
        None => body,
    }
}
