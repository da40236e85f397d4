//! # Scorecap Common Library
//!
//! Shared code for the scorecap services:
//! - Magic-byte content sniffing and the media type allow-list
//! - Relay wire types exchanged with the scoring service
//! - Configuration loading (data directory, TOML files)
//! - Common error type

pub mod config;
pub mod error;
pub mod sniff;
pub mod wire;

pub use error::{Error, Result};
pub use sniff::{AllowList, SniffError, TypeSniffer};
pub use wire::{ScoreEntry, ScoringResponse};
