//! # carddesk core
//!
//! Everything the dispatch desk does between "a barcode was read" and "the
//! backend recorded the dispatch".
//!
//! ## Overview
//!
//! - [`scan`]: turning raw input into card codes. Keyboard-wedge keystrokes
//!   are reassembled by [`scan::KeystrokeDecoder`], camera decoders are
//!   consumed through [`scan::CodeDecoder`], and raw codes are split into
//!   card/client pairs by [`scan::ScannedCode`].
//! - [`batch`]: the in-progress, deduplicated list of cards for one dispatch.
//! - [`dispatch`]: precondition checks and submission of a batch.
//! - [`desk`]: the application state object, its `update` function and the
//!   single-consumer event loop that drives it.
//! - [`infra`]: the REST client and the [`infra::BackendApi`] seam.
//! - [`directory`] / [`reports`]: courier CRUD and per-day reporting.
//! - [`config`]: layered `.env` / TOML / environment configuration.
//!
//! ## Example
//!
//! ```no_run
//! use carddesk_core::batch::ScanBatch;
//!
//! let mut batch = ScanBatch::new();
//! batch.submit_code("1234-5678", "Ana").unwrap();
//! assert!(batch.submit_code("1234-5678", "Ana").is_err());
//! assert_eq!(batch.len(), 1);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

pub mod api;
pub mod batch;
pub mod config;
pub mod desk;
pub mod directory;
pub mod dispatch;
pub mod error;
pub mod infra;
pub mod reports;
pub mod scan;

pub use carddesk_model as model;

pub use batch::ScanBatch;
pub use dispatch::{DispatchConfirmation, DispatchSubmitter};
pub use error::{
    ApiError, BatchError, DecoderError, DirectoryError, DispatchError,
    ReportError,
};
