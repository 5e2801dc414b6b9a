//! Shared leaf types for the Lunatico front-end.
//!
//! Everything downstream of the scanner speaks in terms of these types:
//! byte-offset [`span::Span`]s, the coarse [`token::Token`] vocabulary,
//! and collected [`error::LexError`]s.

pub mod error;
pub mod span;
pub mod token;
