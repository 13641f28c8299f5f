//! Bundled evaluators
//!
//! - [`calc`] - infix arithmetic with strings, lists and lazy ranges
//! - [`rpn`] - postfix stack calculator
//!
//! Both read and write the same [`crate::engine::Bindings`], so values
//! defined in one are visible after switching to the other.

pub mod calc;
pub mod rpn;
