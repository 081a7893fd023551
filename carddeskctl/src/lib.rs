//! Operator CLI for the carddesk dispatch desk.
#![allow(missing_docs)]

pub mod cli;
