//! requp - pip requirements file updater library
//!
//! This library provides the core functionality for updating the versions
//! pinned in pip requirements files:
//! - Logical line reconstruction and in-place token rewriting
//! - Requirement parsing and PEP 440 versions
//! - Package index queries over the Simple JSON API
//! - Update policies, candidate selection and interactive confirmation

pub mod cli;
pub mod domain;
pub mod error;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod parser;
pub mod progress;
pub mod registry;
pub mod update;
