//! A parsing expression grammar combinator engine: composable recognizers
//! over any sequence of comparable elements, with memoized evaluation and
//! a grow-the-seed algorithm for direct and indirect left recursion.
//!
//! The engine is the recognizer only — matched/not-matched plus the
//! farthest position reached, with an optional semantic-action callback
//! on each successful rule match. Building a grammar's textual surface
//! syntax, an AST, or a CLI around this engine is left to callers; see
//! `src/main.rs` for a minimal example wiring one up.
//!
//! ```
//! use peg_recognize::expr::*;
//! use peg_recognize::rule::rule;
//! use peg_recognize::input::slice::SliceSource;
//! use peg_recognize::driver;
//!
//! // digit = [0-9]
//! let digit = rule();
//! digit.set_body(terminal_in_range('0', '9'));
//!
//! let result = driver::run(&digit, Box::new(SliceSource::from_str("7")));
//! assert!(result.matched);
//! assert!(result.at_end);
//! ```

pub mod context;
pub mod driver;
pub mod error;
pub mod expr;
pub mod input;
pub mod rule;

pub use context::Context;
pub use driver::{run, DriverResult};
pub use error::{Error, Result};
pub use input::{Element, InputSource, Position};
pub use rule::{named_rule, rule, set_action, Rule};
