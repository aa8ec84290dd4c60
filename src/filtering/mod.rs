//! Layered ignore-rule evaluation.
//!
//! Rules come from four sources, concatenated in precedence order: explicit
//! exclusion patterns, each directory's `.gitignore`, its `.ignore`, and a
//! conditional `.git/` rule. Evaluation is pure: the last matching pattern
//! wins, negations reverse the most recent match, and an unmatched path is
//! not ignored.

mod pattern;
mod ruleset;

pub use pattern::{compile_pattern, CompiledRule};
pub use ruleset::IgnoreSet;
