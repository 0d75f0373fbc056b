//! Test Module
//!
//! Cross-module scenarios for the sentiment pipeline.
//!
//! ## Test Categories
//! - `engine_tests`: scoring properties, concrete scenarios, batch behavior
//! - `config_tests`: loading rule files from disk and the environment

mod engine_tests;
