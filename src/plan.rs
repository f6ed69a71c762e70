//! What gets submitted where
//!
//! A submission plan is a base directory, one submission command, and an ordered list of model
//! family directories with the job-description files to submit in each. Plans are built from a
//! sweep variant or read from a JSON file.

/// The seven model families and their directory names
pub mod family;

/// Plan structure and flattening into individual submissions
pub mod batch;

/// Read and validate JSON plan files
pub mod read;
