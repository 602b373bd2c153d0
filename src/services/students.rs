//! Student roster service

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        loan::LoanEntry,
        student::{BorrowedBook, CreateStudent, Student, StudentRow, UpdateStudent},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct StudentsService {
    repository: Repository,
}

impl StudentsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get a student with their active loans
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Student> {
        let row = self.repository.students.get_by_id(id).await?;
        let loans = self.repository.loans.get_student_loans(id).await?;
        let now = Utc::now();
        let borrowed = loans.into_iter().map(|l| l.into_borrowed_book(now)).collect();
        Ok(Student::from_row(row, borrowed))
    }

    /// List every student
    pub async fn list(&self) -> AppResult<Vec<Student>> {
        let rows = self.repository.students.list(None).await?;
        let loans = self.repository.loans.list_active(None).await?;
        Ok(attach_loans(rows, loans))
    }

    /// List the students of one class
    pub async fn list_by_class(&self, class_name: &str) -> AppResult<Vec<Student>> {
        if !self.repository.classes.exists(class_name).await? {
            return Err(AppError::NotFound(format!("Class '{}' not found", class_name)));
        }
        let rows = self.repository.students.list(Some(class_name)).await?;
        let loans = self.repository.loans.list_active(Some(class_name)).await?;
        Ok(attach_loans(rows, loans))
    }

    /// Enroll a student in an existing class
    pub async fn create(&self, data: CreateStudent) -> AppResult<Student> {
        let data = CreateStudent {
            first_name: data.first_name.trim().to_string(),
            last_name: data.last_name.trim().to_string(),
            class_name: data.class_name.trim().to_string(),
        };
        data.validate()?;
        self.ensure_class(&data.class_name).await?;

        let row = self.repository.students.create(&data).await?;
        let student = Student::from_row(row, Vec::new());
        tracing::info!(
            student_id = %student.id,
            name = %student.full_name(),
            class = %student.class_name,
            "Student created"
        );
        Ok(student)
    }

    /// Update the provided fields of a student
    pub async fn update(&self, id: Uuid, data: UpdateStudent) -> AppResult<Student> {
        let data = UpdateStudent {
            first_name: data.first_name.map(|s| s.trim().to_string()),
            last_name: data.last_name.map(|s| s.trim().to_string()),
            class_name: data.class_name.map(|s| s.trim().to_string()),
        };
        if data.is_empty() {
            return Err(AppError::BadRequest("No valid fields provided for update".to_string()));
        }
        data.validate()?;
        if let Some(ref class_name) = data.class_name {
            self.ensure_class(class_name).await?;
        }

        self.repository.students.update(id, &data).await?;
        let student = self.get_by_id(id).await?;
        tracing::info!(student_id = %id, name = %student.full_name(), "Student updated");
        Ok(student)
    }

    /// Remove a student who has returned everything
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.students.delete(id).await?;
        tracing::info!(student_id = %id, "Student deleted");
        Ok(())
    }

    async fn ensure_class(&self, class_name: &str) -> AppResult<()> {
        if self.repository.classes.exists(class_name).await? {
            Ok(())
        } else {
            Err(AppError::Validation(format!("Class '{}' does not exist", class_name)))
        }
    }
}

/// Distribute active loans onto their students, keeping row order
fn attach_loans(rows: Vec<StudentRow>, loans: Vec<LoanEntry>) -> Vec<Student> {
    let now = Utc::now();
    let mut by_student: HashMap<Uuid, Vec<BorrowedBook>> = HashMap::new();
    for loan in loans {
        by_student
            .entry(loan.student_id)
            .or_default()
            .push(loan.into_borrowed_book(now));
    }

    rows.into_iter()
        .map(|row| {
            let borrowed = by_student.remove(&row.id).unwrap_or_default();
            Student::from_row(row, borrowed)
        })
        .collect()
}
