//! The FarmWise advisory turn flow.
//!
//! Three concerns: deterministic prompt construction ([`prompt`]), tolerant
//! parsing of the model's semi-structured replies ([`parse`]), and the
//! session-lifecycle state machine that ties them to the session store
//! ([`flow`]).

pub mod flow;
pub mod parse;
pub mod prompt;
pub mod types;

pub use flow::{ChatFlow, FlowError, FlowState, TurnOutcome};
pub use parse::{fallback_explanation, parse_reply, TRANSLATION_EXPLANATION};
pub use prompt::{build_prompt, initial_greeting, SYSTEM_PROMPT};
pub use types::{ChatContext, ChatTurn, ParsedReply};
