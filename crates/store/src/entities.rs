//! Library records and their partial-update payloads.
//!
//! Records serialize with the API's field names (`nombre`, `titulo`,
//! `existencia`, ...). Foreign keys are plain ids and are never checked
//! against the referenced collection.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};

/// The four record families held by the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    User,
    Book,
    Loan,
    Review,
}

impl RecordKind {
    /// Client-facing message for a lookup miss.
    pub fn not_found_message(self) -> &'static str {
        match self {
            RecordKind::User => "Usuario no encontrado",
            RecordKind::Book => "Libro no encontrado",
            RecordKind::Loan => "Préstamo no encontrado",
            RecordKind::Review => "Reseña no encontrada",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RecordKind::User => "user",
            RecordKind::Book => "book",
            RecordKind::Loan => "loan",
            RecordKind::Review => "review",
        })
    }
}

/// A record addressable by an integer id within its collection.
pub trait Record {
    const KIND: RecordKind;

    fn id(&self) -> i64;
}

/// A partial update that overlays the fields it carries onto a record.
pub trait Changes<R> {
    fn apply_to(self, record: &mut R);
}

/// Validated input for a record that has not been assigned an id yet.
pub trait Draft {
    type Record: Record;

    fn into_record(self, id: i64) -> Self::Record;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
}

impl Record for User {
    const KIND: RecordKind = RecordKind::User;

    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

impl Draft for NewUser {
    type Record = User;

    fn into_record(self, id: i64) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "autor")]
    pub author: String,
    /// Copies on the shelf. Expected to stay non-negative but not enforced.
    #[serde(rename = "existencia")]
    pub stock: i64,
}

impl Book {
    pub fn is_available(&self) -> bool {
        self.stock > 0
    }
}

impl Record for Book {
    const KIND: RecordKind = RecordKind::Book;

    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub stock: i64,
}

impl Draft for NewBook {
    type Record = Book;

    fn into_record(self, id: i64) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            stock: self.stock,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub id: i64,
    #[serde(rename = "id_usuario")]
    pub user_id: i64,
    #[serde(rename = "id_libro")]
    pub book_id: i64,
    /// ISO date, day precision.
    #[serde(rename = "fecha_prestamo")]
    pub loan_date: String,
    #[serde(rename = "fecha_devolucion")]
    pub return_date: Option<String>,
}

impl Loan {
    /// A loan stays open until it carries a non-empty return date.
    pub fn is_open(&self) -> bool {
        self.return_date.as_deref().map_or(true, str::is_empty)
    }
}

impl Record for Loan {
    const KIND: RecordKind = RecordKind::Loan;

    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    #[serde(rename = "id_libro")]
    pub book_id: i64,
    #[serde(rename = "id_usuario")]
    pub user_id: i64,
    #[serde(rename = "puntuacion")]
    pub rating: Option<i64>,
    #[serde(rename = "comentario")]
    pub comment: String,
}

impl Record for Review {
    const KIND: RecordKind = RecordKind::Review;

    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub book_id: i64,
    pub user_id: i64,
    pub rating: Option<i64>,
    pub comment: String,
}

impl Draft for NewReview {
    type Record = Review;

    fn into_record(self, id: i64) -> Review {
        Review {
            id,
            book_id: self.book_id,
            user_id: self.user_id,
            rating: self.rating,
            comment: self.comment,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserChanges {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    pub email: Option<String>,
}

impl Changes<User> for UserChanges {
    fn apply_to(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookChanges {
    #[serde(rename = "titulo")]
    pub title: Option<String>,
    #[serde(rename = "autor")]
    pub author: Option<String>,
    /// Accepts `3` as well as `"3"`. `null` leaves the stock as it was,
    /// like every other field of a partial update.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(rename = "existencia")]
    pub stock: Option<i64>,
}

impl Changes<Book> for BookChanges {
    fn apply_to(self, book: &mut Book) {
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(author) = self.author {
            book.author = author;
        }
        if let Some(stock) = self.stock {
            book.stock = stock;
        }
    }
}

/// Editable loan fields. Borrower and book stay fixed once the loan exists,
/// otherwise stock bookkeeping would drift.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoanChanges {
    #[serde(rename = "fecha_prestamo")]
    pub loan_date: Option<String>,
    /// `None` leaves the date alone, `Some(None)` clears it.
    #[serde(
        rename = "fecha_devolucion",
        default,
        deserialize_with = "serde_with::rust::double_option::deserialize"
    )]
    pub return_date: Option<Option<String>>,
}

impl LoanChanges {
    /// True when the payload records a return (a non-empty return date).
    pub fn marks_returned(&self) -> bool {
        matches!(&self.return_date, Some(Some(date)) if !date.is_empty())
    }
}

impl Changes<Loan> for LoanChanges {
    fn apply_to(self, loan: &mut Loan) {
        if let Some(loan_date) = self.loan_date {
            loan.loan_date = loan_date;
        }
        if let Some(return_date) = self.return_date {
            loan.return_date = return_date;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewChanges {
    #[serde(
        rename = "puntuacion",
        default,
        deserialize_with = "serde_with::rust::double_option::deserialize"
    )]
    pub rating: Option<Option<i64>>,
    #[serde(rename = "comentario")]
    pub comment: Option<String>,
}

impl Changes<Review> for ReviewChanges {
    fn apply_to(self, review: &mut Review) {
        if let Some(rating) = self.rating {
            review.rating = rating;
        }
        if let Some(comment) = self.comment {
            review.comment = comment;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn loan(return_date: Option<&str>) -> Loan {
        Loan {
            id: 1,
            user_id: 1,
            book_id: 2,
            loan_date: "2025-08-01".to_string(),
            return_date: return_date.map(str::to_string),
        }
    }

    #[test]
    fn records_use_api_field_names() {
        let book = Book {
            id: 1,
            title: "1984".to_string(),
            author: "George Orwell".to_string(),
            stock: 3,
        };
        assert_eq!(
            serde_json::to_value(&book).unwrap(),
            json!({"id": 1, "titulo": "1984", "autor": "George Orwell", "existencia": 3})
        );

        assert_eq!(
            serde_json::to_value(loan(None)).unwrap(),
            json!({
                "id": 1,
                "id_usuario": 1,
                "id_libro": 2,
                "fecha_prestamo": "2025-08-01",
                "fecha_devolucion": null
            })
        );
    }

    #[test]
    fn empty_return_date_keeps_loan_open() {
        assert!(loan(None).is_open());
        assert!(loan(Some("")).is_open());
        assert!(!loan(Some("2025-08-15")).is_open());
    }

    #[test]
    fn book_changes_coerce_numeric_strings() {
        let changes: BookChanges = serde_json::from_value(json!({"existencia": "7"})).unwrap();
        assert_eq!(changes.stock, Some(7));

        let changes: BookChanges = serde_json::from_value(json!({"existencia": 4})).unwrap();
        assert_eq!(changes.stock, Some(4));

        let changes: BookChanges = serde_json::from_value(json!({"titulo": "Dune"})).unwrap();
        assert_eq!(changes.stock, None);

        assert!(serde_json::from_value::<BookChanges>(json!({"existencia": "many"})).is_err());
    }

    #[test]
    fn null_stock_keeps_the_current_value() {
        let mut book = Book {
            id: 1,
            title: "1984".to_string(),
            author: "George Orwell".to_string(),
            stock: 3,
        };
        let changes: BookChanges = serde_json::from_value(json!({"existencia": null})).unwrap();
        changes.apply_to(&mut book);
        assert_eq!(book.stock, 3);
    }

    #[test]
    fn shallow_merge_preserves_absent_fields() {
        let mut user = User {
            id: 4,
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
        };
        let changes: UserChanges =
            serde_json::from_value(json!({"email": "alice@library.org", "id": 99})).unwrap();
        changes.apply_to(&mut user);

        assert_eq!(user.id, 4);
        assert_eq!(user.name, "Alice");
        assert_eq!(user.email, "alice@library.org");
    }

    #[test]
    fn loan_changes_distinguish_null_from_absent() {
        let absent: LoanChanges = serde_json::from_value(json!({})).unwrap();
        assert_eq!(absent.return_date, None);
        assert!(!absent.marks_returned());

        let cleared: LoanChanges =
            serde_json::from_value(json!({"fecha_devolucion": null})).unwrap();
        assert_eq!(cleared.return_date, Some(None));
        assert!(!cleared.marks_returned());

        let returned: LoanChanges =
            serde_json::from_value(json!({"fecha_devolucion": "2025-08-20"})).unwrap();
        assert!(returned.marks_returned());

        let mut record = loan(Some("2025-08-20"));
        cleared.apply_to(&mut record);
        assert!(record.is_open());
    }

    #[test]
    fn review_rating_can_be_cleared() {
        let mut review = Review {
            id: 1,
            book_id: 1,
            user_id: 2,
            rating: Some(5),
            comment: "Excelente libro".to_string(),
        };
        let changes: ReviewChanges =
            serde_json::from_value(json!({"puntuacion": null})).unwrap();
        changes.apply_to(&mut review);

        assert_eq!(review.rating, None);
        assert_eq!(review.comment, "Excelente libro");
    }
}
