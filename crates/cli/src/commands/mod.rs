//! CLI Commands

pub mod build;
pub mod qa;
pub mod serve;
pub mod tier;
pub mod validate;
