//! Data models for the Librarian server

pub mod book;
pub mod class;
pub mod loan;
pub mod student;

