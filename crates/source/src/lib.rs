//! HTTP client for the spreadsheet-backed vitals data source.

pub mod client;

pub use client::{SheetSourceClient, SourceError};
