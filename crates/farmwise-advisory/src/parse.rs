//! Reply parsing for an advisory turn.
//!
//! [`parse_reply`] is a total function: every input, including the empty
//! string, yields a non-empty explanation and some advice text. The parsing
//! strategies run in a fixed order and the first success wins:
//!
//! 1. both `ADVICE:` and `EXPLANATION:` labels present;
//! 2. `ADVICE:` only, with a synthesized fallback explanation;
//! 3. no labels but South Asian script detected, treated as a translation;
//! 4. split on the first blank line, or take the whole text as advice.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{ChatContext, ParsedReply};

static ADVICE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)ADVICE:\s*(.+?)(?:\n\nEXPLANATION:|EXPLANATION:|$)").unwrap());

static EXPLANATION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)EXPLANATION:\s*(.+)").unwrap());

static LEADING_ADVICE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^ADVICE:\s*").unwrap());

static LEADING_EXPLANATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^EXPLANATION:\s*").unwrap());

static HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#{1,6}\s").unwrap());

/// Bilingual sentinel used when a reply is detected as a translation
pub const TRANSLATION_EXPLANATION: &str =
    "இது உங்கள் கேள்விக்கான மொழிபெயர்ப்பு. / This is the translation of your query.";

const GENERIC_EXPLANATION: &str =
    "This advice is based on general agricultural best practices and your field observations.";

/// Extract the advice/explanation pair from a raw model reply.
///
/// Never fails; a malformed reply degrades to the fallback paths.
pub fn parse_reply(raw: &str, context: &ChatContext) -> ParsedReply {
    let clean = strip_markdown(raw);

    labeled(&clean)
        .or_else(|| advice_only(&clean, context))
        .or_else(|| translation(&clean))
        .unwrap_or_else(|| blank_line_split(&clean, context))
}

/// Remove the markdown tokens the model was told not to use but sometimes
/// emits anyway: bold/italic markers, line-start headings, inline code.
fn strip_markdown(text: &str) -> String {
    let text = text.replace("**", "");
    let text = text.replace('*', "");
    let text = HEADING_RE.replace_all(&text, "");
    text.replace('`', "").trim().to_string()
}

/// Strategy 1: both labels present (case-sensitive)
fn labeled(clean: &str) -> Option<ParsedReply> {
    let advice = ADVICE_RE.captures(clean)?.get(1)?.as_str().trim().to_string();
    let explanation = EXPLANATION_RE
        .captures(clean)?
        .get(1)?
        .as_str()
        .trim()
        .to_string();
    Some(ParsedReply {
        advice,
        explanation,
    })
}

/// Strategy 2: `ADVICE:` present without an `EXPLANATION:` label
fn advice_only(clean: &str, context: &ChatContext) -> Option<ParsedReply> {
    let advice = ADVICE_RE.captures(clean)?.get(1)?.as_str().trim().to_string();
    Some(ParsedReply {
        advice,
        explanation: fallback_explanation(context),
    })
}

/// Strategy 3: no labels, but the text carries a South Asian script, so it
/// is most likely a requested translation. The range set is deliberately
/// narrow (Tamil, Devanagari, Telugu, Malayalam, Kannada); other advertised
/// scripts fall through to the split fallback.
fn translation(clean: &str) -> Option<ParsedReply> {
    if !contains_south_asian_script(clean) {
        return None;
    }

    let advice = LEADING_ADVICE_RE.replace(clean, "").trim().to_string();
    Some(ParsedReply {
        advice,
        explanation: TRANSLATION_EXPLANATION.to_string(),
    })
}

/// Last resort, always succeeds: split on the first blank line, or take the
/// whole text as advice with a synthesized explanation.
fn blank_line_split(clean: &str, context: &ChatContext) -> ParsedReply {
    match clean.split_once("\n\n") {
        Some((first, rest)) => ParsedReply {
            advice: LEADING_ADVICE_RE.replace(first, "").trim().to_string(),
            explanation: LEADING_EXPLANATION_RE.replace(rest, "").trim().to_string(),
        },
        None => ParsedReply {
            advice: clean.to_string(),
            explanation: fallback_explanation(context),
        },
    }
}

fn contains_south_asian_script(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(c,
            '\u{0B80}'..='\u{0BFF}'   // Tamil
            | '\u{0900}'..='\u{097F}' // Devanagari
            | '\u{0C00}'..='\u{0C7F}' // Telugu
            | '\u{0D00}'..='\u{0D7F}' // Malayalam
            | '\u{0C80}'..='\u{0CFF}' // Kannada
        )
    })
}

/// Build an explanation from whichever context fields are present, or a
/// fixed generic sentence when none are.
pub fn fallback_explanation(context: &ChatContext) -> String {
    let mut factors = Vec::new();

    if !context.crop.is_empty() {
        factors.push(format!("your {} crop", context.crop));
    }
    if !context.stage.is_empty() {
        factors.push(format!("the {} growth stage", context.stage));
    }
    if !context.location.is_empty() {
        factors.push(format!("conditions in {}", context.location));
    }
    if !context.season.is_empty() {
        factors.push(format!("{} season", context.season));
    }

    if factors.is_empty() {
        return GENERIC_EXPLANATION.to_string();
    }

    format!(
        "This recommendation considers {} to provide context-specific advice tailored to your field conditions.",
        factors.join(", ")
    )
}
