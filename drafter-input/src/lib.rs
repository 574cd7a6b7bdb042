//! # drafter-input
//!
//! Typed input negotiation between commands and the user.
//!
//! A command declares what it needs next with [`PromptOptions`] (message,
//! accepted [`InputCategory`]s, aliases).  The [`Negotiator`] holds that one
//! outstanding request, classifies candidate [`InputValue`]s from the
//! pointer or command line, and resolves the request exactly once.
//!
//! - **`value`** — categories, values and the selection set.
//! - **`prompt`** — request descriptors and the negotiator.
//! - **`parse`** — command-line text into values (absolute, relative, polar).

pub mod parse;
pub mod prompt;
pub mod value;

pub use parse::parse_input;
pub use prompt::{InputError, Negotiator, PromptOptions, RequestTicket, Resolution, Resolved};
pub use value::{InputCategory, InputValue, SelectionSet};
