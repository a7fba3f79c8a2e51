//! Command-line front end for `csql-syntax`.

pub mod config;
pub mod output;
