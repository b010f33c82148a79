//! # Repository Module
//!
//! Repository implementations for database entities.
//!
//! ## Pattern
//! Each repository owns a clone of the connection pool and exposes
//! async methods for one aggregate:
//!
//! - [`book`] - Catalog CRUD
//! - [`cart`] - Cart rows (atomic upsert, idempotent removal)
//! - [`order`] - Order placement transaction and status lifecycle
//! - [`user`] - Accounts and admin user management

pub mod book;
pub mod cart;
pub mod order;
pub mod user;
