#![allow(non_snake_case)]
//! Anaerobic digestion (ADM1) co-digestion simulator: library part.
//!
//! - [`ADM1`]: the model, its solvers and the simulation driver
//! - [`Utils`]: loading of JSON task files and parameter overrides
//! - [`cli`]: interactive console menu
pub mod ADM1;
pub mod Utils;
pub mod cli;
