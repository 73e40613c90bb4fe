//! Database models split into separate files.
//! This module re-exports individual model modules so imports like
//! `use crate::db::models::*;` keep working.

pub mod availability;
pub mod booking;
pub mod client;
pub mod series;

pub use self::availability::*;
pub use self::booking::*;
pub use self::client::*;
pub use self::series::*;
