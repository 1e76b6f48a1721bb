//! # SEMS Rust Backend
//!
//! Governance engine for school events.
//!
//! This crate is the backend of the School Event Management System (SEMS).
//! It owns the event lifecycle (draft through approval, publication and
//! archival), audience targeting, per-date session schedules and venue
//! availability, and exposes them as a REST API via Axum.
//!
//! ## Features
//!
//! - **Lifecycle control**: role-gated state machine with a full audit trail
//! - **Audience targeting**: include/exclude rules over levels, sections and
//!   individual students, with expected-attendee resolution
//! - **Session schedules**: per-date session validation and overlap detection
//! - **Venue availability**: cross-event conflict checks per facility
//! - **HTTP API**: RESTful endpoints behind the `http-server` feature
//!
//! ## Architecture
//!
//! - [`api`]: identifier newtypes and shared DTOs
//! - [`models`]: domain types (events, audiences, sessions)
//! - [`db`]: repository pattern and persistence backends
//! - [`services`]: validation, lifecycle and query logic
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod api;

pub mod db;
pub mod models;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
