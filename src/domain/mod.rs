//! Core domain types and logic.

pub mod bar;
pub mod indicator;
pub mod ledger;
pub mod policy;
pub mod simulation;
pub mod report;
pub mod config_validation;
pub mod error;
