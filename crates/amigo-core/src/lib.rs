//! Core types and trait definitions for the Amigo secret-friend draw.
//!
//! This crate is free of HTTP and database dependencies. It owns the entity
//! model, the failure kinds every backend reports, and the derangement used
//! by the draw. Storage backends implement [`store::GroupStore`].

// Native `async fn` in traits; the `Send` bounds are spelled out on the
// trait's return types instead.
#![allow(async_fn_in_trait)]

pub mod draw;
pub mod error;
pub mod group;
pub mod store;

pub use error::{Error, ErrorKind, Result};
