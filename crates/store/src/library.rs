//! The library aggregate: four collections plus the loan/stock bookkeeping
//! that ties loans to book stock.

use time::OffsetDateTime;

use crate::collection::Collection;
use crate::entities::{Book, Loan, LoanChanges, Review, User};
use crate::error::StoreError;

/// Every collection the API serves.
#[derive(Debug, Clone, Default)]
pub struct Library {
    pub users: Collection<User>,
    pub books: Collection<Book>,
    pub loans: Collection<Loan>,
    pub reviews: Collection<Review>,
}

/// Validated input for opening a loan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLoan {
    pub user_id: i64,
    pub book_id: i64,
    /// Defaults to today (UTC) when absent.
    pub loan_date: Option<String>,
    pub return_date: Option<String>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Library pre-filled with a small demo catalogue.
    pub fn sample() -> Self {
        Self {
            users: Collection::seeded(vec![
                User {
                    id: 1,
                    name: "Alice".to_string(),
                    email: "alice@example.com".to_string(),
                },
                User {
                    id: 2,
                    name: "Bob".to_string(),
                    email: "bob@example.com".to_string(),
                },
            ]),
            books: Collection::seeded(vec![
                Book {
                    id: 1,
                    title: "1984".to_string(),
                    author: "George Orwell".to_string(),
                    stock: 3,
                },
                Book {
                    id: 2,
                    title: "Clean Code".to_string(),
                    author: "Robert C. Martin".to_string(),
                    stock: 1,
                },
                Book {
                    id: 3,
                    title: "Libro vacío".to_string(),
                    author: "Nadie".to_string(),
                    stock: 0,
                },
            ]),
            loans: Collection::seeded(vec![Loan {
                id: 1,
                user_id: 1,
                book_id: 2,
                loan_date: "2025-08-01".to_string(),
                return_date: None,
            }]),
            reviews: Collection::seeded(vec![Review {
                id: 1,
                book_id: 1,
                user_id: 2,
                rating: Some(5),
                comment: "Excelente libro".to_string(),
            }]),
        }
    }

    pub fn available_books(&self) -> impl Iterator<Item = &Book> {
        self.books.filter(Book::is_available)
    }

    pub fn loans_by_user(&self, user_id: i64) -> impl Iterator<Item = &Loan> {
        self.loans.filter(move |loan| loan.user_id == user_id)
    }

    pub fn loans_by_book(&self, book_id: i64) -> impl Iterator<Item = &Loan> {
        self.loans.filter(move |loan| loan.book_id == book_id)
    }

    pub fn reviews_by_book(&self, book_id: i64) -> impl Iterator<Item = &Review> {
        self.reviews.filter(move |review| review.book_id == book_id)
    }

    /// Overwrite a book's stock.
    pub fn set_stock(&mut self, book_id: i64, stock: i64) -> Result<&Book, StoreError> {
        let book = self.books.get_mut(book_id)?;
        let previous = book.stock;
        book.stock = stock;
        tracing::info!(book_id, previous, stock, "book stock set");
        Ok(&*book)
    }

    /// Lend a copy of a book, taking it off the shelf.
    ///
    /// Fails with [`StoreError::NotFound`] when the book does not exist and
    /// with [`StoreError::BookUnavailable`] when its stock is exhausted; in
    /// both cases nothing changes.
    pub fn open_loan(&mut self, new: NewLoan) -> Result<&Loan, StoreError> {
        let book = self.books.get_mut(new.book_id)?;
        if !book.is_available() {
            tracing::warn!(book_id = book.id, stock = book.stock, "loan refused");
            return Err(StoreError::BookUnavailable { book_id: book.id });
        }
        book.stock -= 1;
        tracing::info!(book_id = book.id, stock = book.stock, "copy lent");

        let loan_date = new.loan_date.unwrap_or_else(today);
        Ok(self.loans.insert_with(|id| Loan {
            id,
            user_id: new.user_id,
            book_id: new.book_id,
            loan_date,
            return_date: new.return_date,
        }))
    }

    /// Apply `changes` to a loan. Recording a return on an open loan puts the
    /// copy back on the shelf; clearing or repeating a return does not touch
    /// stock.
    pub fn update_loan(&mut self, id: i64, changes: LoanChanges) -> Result<&Loan, StoreError> {
        let loan = self.loans.get(id)?;
        if changes.marks_returned() && loan.is_open() {
            let book_id = loan.book_id;
            self.restock(book_id);
        }
        self.loans.update(id, changes)
    }

    /// Remove a loan; an open loan returns its copy to the shelf.
    pub fn delete_loan(&mut self, id: i64) -> Result<Loan, StoreError> {
        let loan = self.loans.remove(id)?;
        if loan.is_open() {
            self.restock(loan.book_id);
        }
        Ok(loan)
    }

    // The book may have been deleted since the loan was opened.
    fn restock(&mut self, book_id: i64) {
        match self.books.find_mut(book_id) {
            Some(book) => {
                book.stock = book.stock.saturating_add(1);
                tracing::info!(book_id, stock = book.stock, "copy returned");
            }
            None => tracing::debug!(book_id, "returned copy of unknown book ignored"),
        }
    }
}

/// Current UTC date as `YYYY-MM-DD`.
fn today() -> String {
    OffsetDateTime::now_utc().date().to_string()
}
