//! CRM backend - departments, users, boards and pipeline stages
//!
//! This library provides the core functionality, including:
//! - Database connection and migrations (embedded SQLite)
//! - Data models for boards, stages, departments and users
//! - Repository layer for data access
//! - The stage-ordering engine that keeps each board's pipeline dense
//! - Record services and the admin-only access gate
//! - CLI command parsing and execution
//!
//! # Example
//!
//! ```no_run
//! use crm::db::DbConnection;
//! use crm::pipeline::{SqliteStore, StageEngine};
//! use crm::repo::BoardRepo;
//!
//! let conn = DbConnection::connect_in_memory().unwrap();
//! let board = BoardRepo::create(&conn, "Sales", true).unwrap();
//! let engine = StageEngine::new(SqliteStore::new(&conn));
//! engine.create_stage("Lead", 1, board.id).unwrap();
//! engine.create_stage("Won", 2, board.id).unwrap();
//! let outcome = engine.reorder_stage(2, 1).unwrap();
//! println!("{}", outcome.message);
//! ```

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod repo;
pub mod service;
pub mod validate;
