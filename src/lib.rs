pub mod analyser;
pub mod cli;
pub mod config;
