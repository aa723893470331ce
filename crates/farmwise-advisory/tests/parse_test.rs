use farmwise_advisory::{fallback_explanation, parse_reply, ChatContext, TRANSLATION_EXPLANATION};

fn context(crop: &str, stage: &str, location: &str, season: &str) -> ChatContext {
    ChatContext {
        crop: crop.to_string(),
        stage: stage.to_string(),
        location: location.to_string(),
        season: season.to_string(),
    }
}

#[test]
fn test_labeled_round_trip() {
    let reply = parse_reply(
        "ADVICE: Do X\n\nEXPLANATION: Because Y",
        &ChatContext::default(),
    );
    assert_eq!(reply.advice, "Do X");
    assert_eq!(reply.explanation, "Because Y");
}

#[test]
fn test_labels_without_blank_line_between() {
    let reply = parse_reply(
        "ADVICE: Water early in the morning.\nEXPLANATION: Evaporation is lower.",
        &ChatContext::default(),
    );
    assert_eq!(reply.advice, "Water early in the morning.");
    assert_eq!(reply.explanation, "Evaporation is lower.");
}

#[test]
fn test_totality_on_degenerate_inputs() {
    let ctx = ChatContext::default();
    for input in ["", "   \n\t  ", "\u{0}\u{1}garbage\u{7f}", "just one line"] {
        let reply = parse_reply(input, &ctx);
        assert!(
            !reply.explanation.is_empty(),
            "explanation must never be empty for input {:?}",
            input
        );
    }
}

#[test]
fn test_empty_input_gets_generic_fallback_explanation() {
    let reply = parse_reply("", &ChatContext::default());
    assert_eq!(reply.advice, "");
    assert_eq!(
        reply.explanation,
        "This advice is based on general agricultural best practices and your field observations."
    );
}

#[test]
fn test_markdown_stripping() {
    let reply = parse_reply(
        "ADVICE: Use **neem oil** on the *affected* leaves\n\nEXPLANATION:\n# Heading\n`code` says so",
        &ChatContext::default(),
    );
    assert_eq!(reply.advice, "Use neem oil on the affected leaves");
    assert!(!reply.explanation.contains('#'));
    assert!(!reply.explanation.contains('`'));
    assert!(reply.explanation.contains("Heading"));
    assert!(reply.explanation.contains("code"));
}

#[test]
fn test_advice_without_explanation_synthesizes_fallback() {
    let ctx = context("rice", "", "Salem", "");
    let reply = parse_reply("ADVICE: Apply potassium-rich fertilizer.", &ctx);
    assert_eq!(reply.advice, "Apply potassium-rich fertilizer.");
    assert!(reply.explanation.contains("your rice crop"));
    assert!(reply.explanation.contains("conditions in Salem"));
    assert!(!reply.explanation.contains("growth stage"));
    assert!(!reply.explanation.contains("season"));
}

#[test]
fn test_tamil_text_detected_as_translation() {
    let tamil = "நெல் பயிருக்கு பொட்டாசியம் உரம் இடவும்.";
    let reply = parse_reply(tamil, &ChatContext::default());
    assert_eq!(reply.advice, tamil);
    assert_eq!(reply.explanation, TRANSLATION_EXPLANATION);
}

#[test]
fn test_translation_strips_leading_advice_label_case_insensitively() {
    let reply = parse_reply("advice: நெல் பயிர்", &ChatContext::default());
    assert_eq!(reply.advice, "நெல் பயிர்");
    assert_eq!(reply.explanation, TRANSLATION_EXPLANATION);
}

#[test]
fn test_devanagari_text_detected_as_translation() {
    let hindi = "धान की फसल के लिए पोटाश डालें।";
    let reply = parse_reply(hindi, &ChatContext::default());
    assert_eq!(reply.advice, hindi);
    assert_eq!(reply.explanation, TRANSLATION_EXPLANATION);
}

#[test]
fn test_arabic_script_falls_through_to_split() {
    // Only the South Asian ranges route to the translation path; other
    // scripts take the blank-line split like any unlabeled reply.
    let reply = parse_reply("مرحبا\n\nتفسير", &ChatContext::default());
    assert_eq!(reply.advice, "مرحبا");
    assert_eq!(reply.explanation, "تفسير");
}

#[test]
fn test_unlabeled_reply_splits_on_first_blank_line() {
    let reply = parse_reply(
        "Rotate your crops this season.\n\nContinuous rice exhausts the soil.\n\nRest the field.",
        &ChatContext::default(),
    );
    assert_eq!(reply.advice, "Rotate your crops this season.");
    assert_eq!(
        reply.explanation,
        "Continuous rice exhausts the soil.\n\nRest the field."
    );
}

#[test]
fn test_split_strips_leading_labels_case_insensitively() {
    let reply = parse_reply(
        "Advice: Mulch around the base\n\nexplanation: It retains moisture",
        &ChatContext::default(),
    );
    // Case-sensitive label matching failed, so the split fallback handles it
    assert_eq!(reply.advice, "Mulch around the base");
    assert_eq!(reply.explanation, "It retains moisture");
}

#[test]
fn test_single_paragraph_becomes_advice_with_fallback() {
    let ctx = context("tomato", "flowering", "", "");
    let reply = parse_reply("Pinch off the suckers weekly.", &ctx);
    assert_eq!(reply.advice, "Pinch off the suckers weekly.");
    assert!(reply.explanation.contains("your tomato crop"));
    assert!(reply.explanation.contains("the flowering growth stage"));
}

#[test]
fn test_fallback_explanation_with_all_fields() {
    let ctx = context("rice", "tillering", "Salem", "monsoon");
    let explanation = fallback_explanation(&ctx);
    assert_eq!(
        explanation,
        "This recommendation considers your rice crop, the tillering growth stage, \
         conditions in Salem, monsoon season to provide context-specific advice \
         tailored to your field conditions."
    );
}

#[test]
fn test_fallback_explanation_with_no_fields() {
    let explanation = fallback_explanation(&ChatContext::default());
    assert_eq!(
        explanation,
        "This advice is based on general agricultural best practices and your field observations."
    );
}
