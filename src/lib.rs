//! Feedback section of a personal portfolio: visitor comments and star
//! ratings kept in sync with an append-only document store, plus a relay to
//! an external chat responder.

pub mod chat;
pub mod common;
pub mod config;
pub mod feedback;
pub mod storage;
