//! coursetree: an ordered course index
//!
//! Layers:
//! - `domain`: binary search tree engine, traversals, the `Course` record
//! - `application`: line codec and the course index service
//! - `infrastructure`: filesystem boundary and service wiring
//! - `cli`: argument parsing, command dispatch, terminal output

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
