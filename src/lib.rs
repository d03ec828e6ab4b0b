//! Intake - Conversational Schema-Driven Data Collection
//!
//! This crate implements a conversational interview engine: a hierarchical
//! field schema is filled in turn by turn through structured form
//! submissions or free-text messages, with conditional field activation,
//! per-field validation, and completeness tracking.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
