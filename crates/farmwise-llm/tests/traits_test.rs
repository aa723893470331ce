use farmwise_llm::{GenerateOptions, GenerateRequest, DEFAULT_MODEL};

#[test]
fn test_generate_request_creation() {
    let request = GenerateRequest::new(DEFAULT_MODEL, "What fertilizer for rice?");

    assert_eq!(request.model, DEFAULT_MODEL);
    assert_eq!(request.prompt, "What fertilizer for rice?");
    assert_eq!(request.options.temperature, None);
}

#[test]
fn test_generate_request_with_options() {
    let options = GenerateOptions::new()
        .temperature(0.7)
        .max_output_tokens(1024);

    let request = GenerateRequest::new("gemini-2.5-flash", "Hello")
        .with_options(options);

    assert_eq!(request.options.temperature, Some(0.7));
    assert_eq!(request.options.max_output_tokens, Some(1024));
}

#[test]
fn test_generate_options_default() {
    let options = GenerateOptions::default();

    assert_eq!(options.temperature, None);
    assert_eq!(options.max_output_tokens, None);
}
