//! # Seed Vault
//!
//! Data-side logic for the Seed Vault site: the artifact table, the name
//! lookup over languages, artifacts, and locations, and the word tools used
//! by contributors.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────┐   ┌────────────┐
//! │  seed.html   │──▶│ extract  │──▶│  listing   │
//! └──────────────┘   │ (rows)   │   │ display +  │
//!                    │          │   │ duplicates │
//! ┌──────────────┐   │          │   └────────────┘
//! │seed_search.  │──▶│          │──▶┌────────────┐
//! │    html      │   └──────────┘   │   lookup   │
//! └──────────────┘                  └────────────┘
//!
//! ┌──────────┐  ┌──────────────┐  ┌──────────┐
//! │ storage  │  │ tag_registry │  │ tagging  │
//! └──────────┘  └──────────────┘  └──────────┘
//!
//! ┌──────────┐  ┌──────────┐
//! │  roles   │─▶│  upload  │
//! └──────────┘  └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! vault artifacts                      # list displayable artifacts
//! vault check                          # flag duplicate rows
//! vault find language Navajo           # look up a description
//! vault tag "plant the seed" --tag seed=noun
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`error`] | Library error type |
//! | [`extract`] | HTML table row scanning and artifact parsing |
//! | [`listing`] | Display validation and duplicate detection |
//! | [`lookup`] | Name lookup tables |
//! | [`storage`] | Unicode-preserving word storage |
//! | [`tag_registry`] | Tagged word create/read/update |
//! | [`tagging`] | Inline tagging of free text |
//! | [`roles`] | Role permissions and credential checks |
//! | [`upload`] | Upload validation and file access rules |
//! | [`logging`] | `tracing` subscriber setup |

pub mod config;
pub mod error;
pub mod extract;
pub mod listing;
pub mod logging;
pub mod lookup;
pub mod models;
pub mod roles;
pub mod storage;
pub mod tag_registry;
pub mod tagging;
pub mod upload;

pub use error::{InputProblem, VaultError};
