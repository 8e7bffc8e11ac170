//! The library code for the `pagewright` static site generator. The
//! architecture can be generally broken down into two distinct steps:
//!
//! 1. Loading content from source files on disk ([`crate::content`])
//! 2. Composing and writing the output pages ([`crate::build`])
//!
//! The second step is the more involved one. It runs a fixed sequence of
//! pipeline steps: install plugins, clean the output directory, copy static
//! resources, load content, construct the standalone pages, compose every
//! page with the theme ([`crate::theme`]) and write it to disk
//! ([`crate::write`]), generate the RSS feed ([`crate::feed`]) and sitemap
//! ([`crate::sitemap`]), and finally publish the output directory
//! ([`crate::deploy`]).
//!
//! The theme is a set of pure functions from content values to [`maud`]
//! markup trees; all of the conditional logic (navigation highlighting,
//! tag lists, per-page-kind dispatch) lives there and none of it performs
//! I/O.

pub mod about;
pub mod build;
pub mod config;
pub mod content;
pub mod deploy;
pub mod feed;
pub mod markdown;
pub mod plugin;
pub mod projects;
pub mod sitemap;
pub mod theme;
pub mod write;
