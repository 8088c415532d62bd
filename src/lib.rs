#![doc = "circular-watch: detect, archive and announce newly issued regulatory circulars."]

//! This crate watches a regulator's published-circular index, detects entries
//! issued since the last run, acquires each circular's content, derives a
//! compliance checklist through an external generation service, and publishes
//! both with a stakeholder notification. State between runs is a single
//! watermark advanced only after an entry's full unit of work succeeds.
//!
//! # Usage
//! The `run_cycle` pipeline in [`pipeline`] is the entrypoint; [`contract`]
//! holds the ports it is wired through.

pub mod acquire;
pub mod cli;
pub mod config;
pub mod contract;
pub mod extract;
pub mod generate;
pub mod listing;
pub mod load_config;
pub mod notify;
pub mod pipeline;
pub mod publish;
pub mod render;
pub mod resolve;
pub mod state;
pub mod typeset;
