//! Special-token rules: promotion decisions and activation footprints.

pub mod rules;

pub use rules::{activation_targets, classify, Promotion};
