//! Prompt construction for an advisory turn.
//!
//! [`build_prompt`] is a pure function of its inputs: system instructions,
//! context record, optional product context, conversation history, and the
//! new user message, concatenated in that order.

use farmwise_persist::ProductContext;

use crate::types::{ChatContext, ChatTurn};

/// Persona and instruction block sent verbatim at the top of every prompt.
///
/// The language-support and no-markdown rules are a behavioral contract for
/// the downstream model, not logic this module enforces.
pub const SYSTEM_PROMPT: &str = "\
You are FarmWise AI Assistant, an expert agricultural advisor for farmers in India. You help with ALL farming-related questions and decision-making.

CAPABILITIES - You can help with:
- Crop selection, planting, and harvesting advice
- Pest and disease identification and treatment
- Fertilizer and soil management recommendations
- Weather-based farming decisions
- Market timing and selling strategies
- Equipment and tool recommendations
- Irrigation and water management
- Organic and sustainable farming practices
- Government schemes and subsidies for farmers
- Translation of advice to regional languages (Tamil, Hindi, Telugu, Kannada, Malayalam, etc.)
- Follow-up questions and clarifications
- Cost-benefit analysis for farming decisions

RESPONSE RULES:
1. ALWAYS respond to what the user ACTUALLY asked - do not repeat previous answers
2. If user asks for translation, translate your PREVIOUS response to the requested language
3. If user asks a follow-up question, answer that specific question
4. Keep responses concise (max 100 words for advice, 50 words for explanation)
5. DO NOT use markdown symbols (**, *, #, backticks) - write plain text only
6. Use numbered points for multiple tips
7. Be practical and actionable

LANGUAGE SUPPORT:
- You can respond in English, Tamil (தமிழ்), Hindi (हिंदी), Telugu (తెలుగు), Kannada (ಕನ್ನಡ), Malayalam (മലയാളം)
- When user asks \"in Tamil\" or \"translate to Hindi\" etc., provide the FULL response in that language
- Understand crop names in all these languages

RESPONSE FORMAT:
ADVICE: [Your recommendation - concise and actionable]

EXPLANATION: [Brief reason - 2-3 sentences max]

SPECIAL CASES:
- For translation requests: Provide the translated content directly without repeating English
- For yes/no questions: Give a direct answer first, then brief explanation
- For \"what is\" questions: Give a clear definition/answer
- For comparisons: Use a simple format to compare options
";

const FORMAT_REMINDER: &str = "\
Format your response EXACTLY as:
ADVICE: [Your main recommendation here]

EXPLANATION: [Why this advice is appropriate given their crop, location, stage, and season. Mention specific contextual factors that influenced your recommendation.]";

/// Render the full prompt for one advisory turn.
///
/// History is re-serialized as alternating `User:` / `Assistant:` turns,
/// skipping `history[0]` (the initial greeting, not real conversation).
pub fn build_prompt(
    context: &ChatContext,
    product: Option<&ProductContext>,
    history: &[ChatTurn],
    message: &str,
) -> String {
    let mut prompt = String::from(SYSTEM_PROMPT);

    if !context.is_empty() {
        prompt.push_str("\nCurrent farmer context:\n");
        if !context.crop.is_empty() {
            prompt.push_str(&format!("- Crop: {}\n", context.crop));
        }
        if !context.stage.is_empty() {
            prompt.push_str(&format!("- Growth stage: {}\n", context.stage));
        }
        if !context.location.is_empty() {
            prompt.push_str(&format!("- Location: {}\n", context.location));
        }
        if !context.season.is_empty() {
            prompt.push_str(&format!("- Season/Conditions: {}\n", context.season));
        }

        prompt.push_str(&format!(
            "\nIMPORTANT: Tailor your advice specifically to {} at {} in {} during {}. \
             Reference these contextual factors in your EXPLANATION to show how they \
             influenced your recommendation.\n",
            or_default(&context.crop, "the crop"),
            or_default(&context.stage, "this stage"),
            or_default(&context.location, "this location"),
            or_default(&context.season, "current conditions"),
        ));
    }

    if let Some(product) = product {
        prompt.push_str(&product_block(product));
    }

    prompt.push('\n');

    for turn in history.iter().skip(1) {
        match turn {
            ChatTurn::User { text } => {
                prompt.push_str(&format!("User: {}\n\n", text));
            }
            ChatTurn::Assistant { text, explanation } => {
                let body = match explanation {
                    Some(explanation) => {
                        format!("ADVICE: {}\n\nEXPLANATION: {}", text, explanation)
                    }
                    None => text.clone(),
                };
                prompt.push_str(&format!("Assistant: {}\n\n", body));
            }
        }
    }

    prompt.push_str(&format!("User: {}\n\n", message));
    prompt.push_str(FORMAT_REMINDER);
    prompt.push_str("\n\nAssistant:");

    prompt
}

/// The canned first assistant message persisted as message 0 of a session
pub fn initial_greeting(product: Option<&ProductContext>) -> String {
    match product {
        Some(product) => format!(
            "Hi! I see you're asking about **{}**. Please fill in the context fields below \
             (crop type, growth stage, location) so I can give you personalized advice about \
             this product for your specific situation.",
            product_name(product)
        ),
        None => "Hi, I am the FarmWise AI assistant. Tell me about your crop, what you see \
                 in the field, and where you are located."
            .to_string(),
    }
}

fn product_name(product: &ProductContext) -> &str {
    match product {
        ProductContext::Name(name) => name.as_str(),
        ProductContext::Details { name, .. } => name.as_deref().unwrap_or("this product"),
    }
}

fn product_block(product: &ProductContext) -> String {
    let mut block = String::from("\n--- PRODUCT INQUIRY ---\n");
    block.push_str("The farmer is asking about a specific product from the marketplace:\n");

    match product {
        ProductContext::Name(name) => {
            block.push_str(&format!("- Product: {}\n", name));
        }
        ProductContext::Details {
            name,
            price,
            category,
            description,
            seller,
        } => {
            if let Some(name) = name {
                block.push_str(&format!("- Product Name: {}\n", name));
            }
            if let Some(price) = price {
                block.push_str(&format!("- Price: ₹{}\n", price));
            }
            if let Some(category) = category {
                block.push_str(&format!("- Category: {}\n", category));
            }
            if let Some(description) = description {
                block.push_str(&format!("- Description: {}\n", description));
            }
            if let Some(seller) = seller {
                block.push_str(&format!("- Seller: {}\n", seller));
            }
        }
    }

    block.push_str("\nProvide advice on:\n");
    block.push_str("1. Whether this product is suitable for their crop/situation\n");
    block.push_str("2. How to use this product effectively\n");
    block.push_str("3. Best timing and application methods\n");
    block.push_str("4. Any precautions or alternatives to consider\n");
    block.push_str("--- END PRODUCT INQUIRY ---\n");

    block
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}
