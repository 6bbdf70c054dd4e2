//! Wire contract shared by the cmdfiles client and server.
//!
//! The HTTP surface is deliberately small: four route prefixes, three
//! multipart text fields plus one file part, and a handful of plain-text
//! response tokens. Both sides import these definitions so the two halves
//! cannot drift apart.

pub mod constants;
pub mod token;

pub use token::{ResponseToken, UnknownToken};
