//! Database layer - connection factory, migrations and repositories
//!
//! # Design Principles
//!
//! - One shared pool; repositories borrow it per request, never own it
//! - Every filter is a bound parameter - nothing is interpolated
//! - Rely on DB constraints, handle conflicts - no check-then-insert
//! - Transactions only where a write spans several statements

pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::ConnectionFactory;
pub use repos::*;
