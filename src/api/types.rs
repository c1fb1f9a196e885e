use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ============================================================================
// Requests
// ============================================================================

#[derive(Serialize, Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

// ============================================================================
// Server enums
// ============================================================================

/// Role attached to an account. Members are the only role this client serves.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "ROLE_MEMBER")]
    Member,
    #[serde(rename = "ROLE_LIBRARIAN")]
    Librarian,
    #[serde(rename = "ROLE_OWNER")]
    Owner,
    #[serde(other)]
    Unknown,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStatus {
    #[serde(rename = "AVAILABLE")]
    Available,
    #[serde(rename = "ISSUED")]
    Issued,
    #[serde(other)]
    Unknown,
}

impl CopyStatus {
    pub fn label(self) -> &'static str {
        match self {
            CopyStatus::Available => "AVAILABLE",
            CopyStatus::Issued => "ISSUED",
            CopyStatus::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentKind {
    #[serde(rename = "MEMBERSHIP")]
    Membership,
    #[serde(rename = "FINE")]
    Fine,
    #[serde(other)]
    Unknown,
}

impl PaymentKind {
    pub fn label(self) -> &'static str {
        match self {
            PaymentKind::Membership => "Membership Fee",
            PaymentKind::Fine => "Fine Payment",
            PaymentKind::Unknown => "Payment",
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Deserialize, Debug, Clone)]
pub struct AuthResponse {
    /// Missing or empty tokens are treated as an invalid server response.
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

/// A borrowing record: one copy issued to the member.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IssueRecord {
    pub id: i64,
    pub book_name: String,
    #[serde(default)]
    pub book_author: Option<String>,
    pub copy_id: i64,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub return_date: Option<NaiveDate>,
    /// Fine settled when the copy came back.
    #[serde(default)]
    pub fine: Option<f64>,
}

impl IssueRecord {
    pub fn is_returned(&self) -> bool {
        self.return_date.is_some()
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub cart_item_id: i64,
    pub copy_id: i64,
    pub book_name: String,
    #[serde(default)]
    pub book_author: Option<String>,
    #[serde(default)]
    pub rack: Option<String>,
    #[serde(default)]
    pub added_at: Option<NaiveDateTime>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub name: String,
    pub author: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub total_copies: i64,
    #[serde(default)]
    pub available_copies: i64,
}

impl Book {
    pub fn has_copies(&self) -> bool {
        self.available_copies > 0
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookCopy {
    pub id: i64,
    #[serde(default)]
    pub book_id: Option<i64>,
    #[serde(default)]
    pub book_name: Option<String>,
    #[serde(default)]
    pub rack: Option<String>,
    pub status: CopyStatus,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub status: String,
    #[serde(default)]
    pub borrowed_books: Vec<IssueRecord>,
    #[serde(default)]
    pub amount_paid: Option<f64>,
    #[serde(default)]
    pub payment_details: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MemberDashboard {
    pub member_name: String,
    // The server's boolean getter drops the `is` prefix on the wire.
    #[serde(default, alias = "isMembershipActive")]
    pub membership_active: bool,
    #[serde(default)]
    pub membership_due_date: Option<NaiveDate>,
    #[serde(default)]
    pub currently_borrowed_count: u32,
    #[serde(default)]
    pub total_books_read_count: u32,
    #[serde(default)]
    pub outstanding_fines: f64,
    #[serde(default)]
    pub recent_activity: Vec<IssueRecord>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemberProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub membership_active: bool,
    #[serde(default)]
    pub membership_due_date: Option<NaiveDate>,
}

impl MemberProfile {
    /// Up to two initials taken from the first and last name.
    pub fn initials(&self) -> String {
        let names: Vec<&str> = self.name.split_whitespace().collect();
        let first = names.first().and_then(|n| n.chars().next());
        let last = if names.len() > 1 {
            names.last().and_then(|n| n.chars().next())
        } else {
            None
        };
        first
            .into_iter()
            .chain(last)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: i64,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: PaymentKind,
    pub transaction_time: NaiveDateTime,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

/// Error body returned by the server for rejected requests.
#[derive(Deserialize, Debug, Default)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_record_deserializes_server_json() {
        let json = r#"{
            "id": 7,
            "bookName": "Dune",
            "bookAuthor": "Frank Herbert",
            "copyId": 42,
            "issueDate": "2024-05-01",
            "dueDate": "2024-05-15",
            "returnDate": null,
            "fine": null
        }"#;
        let record: IssueRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 7);
        assert_eq!(record.due_date, NaiveDate::from_ymd_opt(2024, 5, 15).unwrap());
        assert!(!record.is_returned());
        assert_eq!(record.fine, None);
    }

    #[test]
    fn test_cart_item_accepts_fractional_timestamps() {
        let json = r#"{"cartItemId":3,"copyId":9,"bookName":"Emma","rack":"A-2","addedAt":"2024-05-01T10:20:30.123456"}"#;
        let item: CartItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.cart_item_id, 3);
        assert_eq!(item.rack.as_deref(), Some("A-2"));
        assert!(item.added_at.is_some());
    }

    #[test]
    fn test_unknown_enum_values_fall_back() {
        let copy: BookCopy = serde_json::from_str(r#"{"id":1,"status":"LOST"}"#).unwrap();
        assert_eq!(copy.status, CopyStatus::Unknown);

        let auth: AuthResponse =
            serde_json::from_str(r#"{"token":"t","email":"a@b.c","role":"ROLE_GUEST"}"#).unwrap();
        assert_eq!(auth.role, Some(Role::Unknown));
    }

    #[test]
    fn test_dashboard_accepts_either_membership_flag() {
        let plain = r#"{"memberName":"Ann","membershipActive":true}"#;
        let prefixed = r#"{"memberName":"Ann","isMembershipActive":true}"#;
        let a: MemberDashboard = serde_json::from_str(plain).unwrap();
        let b: MemberDashboard = serde_json::from_str(prefixed).unwrap();
        assert!(a.membership_active);
        assert!(b.membership_active);
        assert!(a.recent_activity.is_empty());
    }

    #[test]
    fn test_payment_type_field() {
        let json = r#"{"id":1,"amount":150.0,"type":"MEMBERSHIP","transactionTime":"2024-01-02T03:04:05"}"#;
        let payment: Payment = serde_json::from_str(json).unwrap();
        assert_eq!(payment.kind, PaymentKind::Membership);
        assert_eq!(payment.kind.label(), "Membership Fee");
    }

    #[test]
    fn test_change_password_request_serialization() {
        let req = ChangePasswordRequest {
            old_password: "old".to_string(),
            new_password: "newer1".to_string(),
        };
        let serialized = serde_json::to_string(&req).unwrap();
        assert_eq!(serialized, r#"{"oldPassword":"old","newPassword":"newer1"}"#);
    }

    #[test]
    fn test_profile_initials() {
        let mut profile = MemberProfile {
            id: 1,
            name: "ada lovelace byron".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            membership_active: true,
            membership_due_date: None,
        };
        assert_eq!(profile.initials(), "AB");
        profile.name = "Plato".to_string();
        assert_eq!(profile.initials(), "P");
    }
}
