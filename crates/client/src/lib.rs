//! Dashboard-side state layer.
//!
//! Holds the session's working set of projects and the admin role queue as
//! explicitly owned state objects, talks to the REST backend through a
//! trait-based API seam, and keeps local state strictly behind backend
//! confirmation: a mutation is merged only after the corresponding request
//! succeeds, and any failure leaves the last-known-good snapshot in place.

pub mod admin;
pub mod api;
pub mod controller;
pub mod store;

pub use admin::RoleAdminQueue;
pub use api::{AdminApi, ApiError, HttpAdminApi, HttpPortfolioApi, PortfolioApi};
pub use controller::{View, ViewController};
pub use store::ProjectStore;
