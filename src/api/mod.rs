pub mod backend;
pub mod http;
pub mod types;

pub use backend::{ApiError, LibraryBackend};
pub use http::HttpBackend;
pub use types::{
    AuthResponse, Book, BookCopy, CartItem, ChangePasswordRequest, CheckoutResponse, CopyStatus,
    IssueRecord, LoginRequest, MemberDashboard, MemberProfile, Payment, PaymentKind,
    RegisterRequest, Role,
};
