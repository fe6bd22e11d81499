//! Core library for ghrepos
//!
//! This crate implements the **Functional Core** of the ghrepos application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! ghrepos uses a two-crate architecture to enforce separation of concerns:
//!
//! - **`ghrepos_core`** (this crate): Pure transformation functions with zero I/O
//! - **`ghrepos`**: HTTP, filesystem, environment and terminal output (the Imperative Shell)
//!
//! Everything that decides *what* a GitHub response means lives here: which
//! URL to request, how a status code is classified, how the `Link` header
//! turns into `has_more_items`. The shell only moves bytes.
//!
//! # Module Organization
//!
//! - [`github`]: Request/response models for `GET /users/{username}/repos`
//! - [`link`]: `Link` header parsing for pagination
//! - [`config`]: Config file parsing and value layering
//!
//! # Example Usage
//!
//! ```rust
//! use ghrepos_core::github::{build_list_repos_url, build_page, ListReposRequest};
//!
//! let request = ListReposRequest::new("octocat", 1, 2).unwrap();
//! assert_eq!(
//!     build_list_repos_url("https://api.github.com", &request),
//!     "https://api.github.com/users/octocat/repos?page=1&per_page=2"
//! );
//!
//! let page = build_page(Vec::<()>::new(), Some(r#"<https://x?page=2>; rel="next""#));
//! assert!(page.has_more_items);
//! ```

pub mod config;
pub mod github;
pub mod link;
