//! Pantry API: recommends recipes from a fixed catalog based on the
//! ingredients a user has on hand and their dietary, time and difficulty
//! preferences.
//!
//! The core is [`services::Matcher`], a pure function over an immutable
//! [`services::RecipeCatalog`]. The HTTP layer in [`routes`] and the
//! photo-based ingredient detection in [`services::detection`] are thin
//! collaborators around it.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
