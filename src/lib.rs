//! MatrixSync library
//!
//! Keeps a keyboard firmware sketch in sync with the output of a matrix
//! generator: the generator's named matrix blocks and Teensy pin lists are
//! extracted, checked for consistency, and written into the sketch's
//! declarations in place.

// Module declarations
pub mod cli;
pub mod collaborators;
pub mod config;
pub mod constants;
pub mod doctor;
pub mod error;
pub mod firmware;
pub mod models;
pub mod parser;
pub mod pipeline;
