//! notemap: concept-map rendering for document analyses
//!
//! Lays out a concept hierarchy as a horizontal tidy tree, keeps a pan/zoom
//! view over it and draws it onto a retained surface (SVG).

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
