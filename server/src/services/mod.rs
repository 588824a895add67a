//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own business rules so route handlers can stay focused on
//! protocol translation. Persistence sits behind [`ads::AdRepository`].

pub mod ads;
pub mod visibility;
