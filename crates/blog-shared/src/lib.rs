//! # Blog Shared
//!
//! Form payloads exchanged between the HTML pages and the server.

pub mod dto;

pub use dto::{PostEditForm, PostForm};
