//! rarerank-agent — Command-line front end for the prioritization engine.

pub mod cli;
pub mod plan;
pub mod report;
pub mod run;
