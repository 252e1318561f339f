//! Reference node kinds.
//!
//! The engine itself knows no concrete kinds; these are the plugins the tests,
//! benches and headless host build documents from. Each kind exposes a
//! `create` factory that allocates the node (and its child groups) in a
//! document.

mod bracket;
mod fraction;
mod matrix;
mod power;
mod separator;
mod symbol;
mod unknown;

pub use bracket::Bracket;
pub use fraction::Fraction;
pub use matrix::Matrix;
pub use power::Power;
pub use separator::Separator;
pub use symbol::Symbol;
pub use unknown::Unknown;
