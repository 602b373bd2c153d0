//! CSV export of the roster and the catalog

use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    models::{book::Book, student::Student},
    repository::Repository,
};

use super::students::StudentsService;

#[derive(Serialize)]
struct StudentCsvRow<'a> {
    id: String,
    first_name: &'a str,
    last_name: &'a str,
    class_name: &'a str,
    borrowed_count: usize,
    borrowed_titles: String,
    next_due_date: String,
}

#[derive(Serialize)]
struct BookCsvRow<'a> {
    id: String,
    title: &'a str,
    author: &'a str,
    quantity: i64,
    borrowed_count: i64,
    available_copies: i64,
}

#[derive(Clone)]
pub struct ExportService {
    repository: Repository,
    students: StudentsService,
}

impl ExportService {
    pub fn new(repository: Repository, students: StudentsService) -> Self {
        Self { repository, students }
    }

    /// Students as CSV, optionally for one class only
    pub async fn students_csv(&self, class_name: Option<&str>) -> AppResult<String> {
        let students = match class_name {
            Some(class_name) => self.students.list_by_class(class_name).await?,
            None => self.students.list().await?,
        };
        students_to_csv(&students)
    }

    /// Books as CSV
    pub async fn books_csv(&self) -> AppResult<String> {
        let books: Vec<Book> = self
            .repository
            .books
            .list()
            .await?
            .into_iter()
            .map(Book::from)
            .collect();
        books_to_csv(&books)
    }
}

pub fn students_to_csv(students: &[Student]) -> AppResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for student in students {
        writer.serialize(StudentCsvRow {
            id: student.id.to_string(),
            first_name: &student.first_name,
            last_name: &student.last_name,
            class_name: &student.class_name,
            borrowed_count: student.borrowed_books.len(),
            borrowed_titles: student
                .borrowed_books
                .iter()
                .map(|b| b.book_title.as_str())
                .collect::<Vec<_>>()
                .join("; "),
            next_due_date: student
                .borrowed_books
                .iter()
                .map(|b| b.due_date)
                .min()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        })?;
    }
    finish(writer, "id,first_name,last_name,class_name,borrowed_count,borrowed_titles,next_due_date\n")
}

pub fn books_to_csv(books: &[Book]) -> AppResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for book in books {
        writer.serialize(BookCsvRow {
            id: book.id.to_string(),
            title: &book.title,
            author: &book.author,
            quantity: book.quantity,
            borrowed_count: book.borrowed_count,
            available_copies: book.available_copies,
        })?;
    }
    finish(writer, "id,title,author,quantity,borrowed_count,available_copies\n")
}

/// Serde only writes the header alongside the first record, so an empty
/// export gets the header spelled out.
fn finish(writer: csv::Writer<Vec<u8>>, empty_header: &str) -> AppResult<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV flush failed: {}", e)))?;
    if bytes.is_empty() {
        return Ok(empty_header.to_string());
    }
    String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("CSV is not UTF-8: {}", e)))
}
