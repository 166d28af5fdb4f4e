//! Logic Module - Business Logic & Engines
//!
//! Chứa các engines xử lý: Ingest, Tabular Parser, Pipeline, Classifier, History.

// Core modules
pub mod error;
pub mod ingest;
pub mod tabular;
pub mod features;

// Analysis architecture
pub mod classify;
pub mod pipeline;

// Persistence & export
pub mod export;
pub mod history;
