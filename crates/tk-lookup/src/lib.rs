//! External content source for Tablekeeper.
//!
//! A [`ContentSource`] turns a free-text subject ("Beholder", "Fireball")
//! into a structured [`ReferenceRecord`] and produces tactical suggestions
//! for a running encounter. [`ChatClient`] implements it over any
//! OpenAI-compatible `/chat/completions` endpoint.
//!
//! Nothing here writes to the database. Callers stage a looked-up record
//! as a draft and persist it only after the user confirms.
//!
//! [`ReferenceRecord`]: tk_core::ReferenceRecord

pub mod client;
pub mod error;
pub mod extract;
pub mod prompt;
pub mod source;

pub use client::{ChatClient, ChatMessage, LookupConfig};
pub use error::{LookupError, LookupResult};
pub use extract::extract_json;
pub use source::ContentSource;
