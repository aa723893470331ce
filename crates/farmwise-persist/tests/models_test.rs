use chrono::Utc;
use farmwise_persist::{
    derive_title, ChatSession, MessageRole, MongoChatSession, ProductContext, SessionContext,
    StoredMessage, DEFAULT_SESSION_TITLE,
};
use mongodb::bson::{self, oid::ObjectId};

fn session_with_messages(messages: Vec<StoredMessage>) -> ChatSession {
    let now = Utc::now();
    ChatSession {
        id: "65f0c0ffee0000000000abcd".to_string(),
        user_id: "farmer-1".to_string(),
        title: DEFAULT_SESSION_TITLE.to_string(),
        context: SessionContext {
            crop: "rice".to_string(),
            ..Default::default()
        },
        messages,
        product_context: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn test_derive_title_short_message_unmodified() {
    let title = derive_title("My tomato plants have spots");
    assert_eq!(title, "My tomato plants have spots");
}

#[test]
fn test_derive_title_long_message_truncated_with_ellipsis() {
    let text = "a".repeat(60);
    let title = derive_title(&text);
    assert_eq!(title, format!("{}...", "a".repeat(50)));
}

#[test]
fn test_derive_title_is_char_boundary_safe() {
    let text = "த".repeat(60);
    let title = derive_title(&text);
    assert_eq!(title.chars().count(), 53);
    assert!(title.ends_with("..."));
}

#[test]
fn test_summary_projection() {
    let long_text = "x".repeat(100);
    let session = session_with_messages(vec![
        StoredMessage::assistant("Hi, I am the FarmWise AI assistant.".to_string(), None),
        StoredMessage::user("What fertilizer for rice?"),
        StoredMessage::assistant(long_text.clone(), Some("Because.".to_string())),
    ]);

    let summary = session.summary();
    assert_eq!(summary.title, DEFAULT_SESSION_TITLE);
    assert_eq!(summary.crop, "rice");
    assert_eq!(summary.message_count, 3);
    assert_eq!(summary.last_message, "x".repeat(80));
}

#[test]
fn test_summary_with_no_messages_has_empty_last_message() {
    let summary = session_with_messages(vec![]).summary();
    assert_eq!(summary.message_count, 0);
    assert_eq!(summary.last_message, "");
}

#[test]
fn test_message_role_serializes_lowercase() {
    let msg = StoredMessage::user("hello");
    let json = serde_json::to_value(&msg).unwrap();
    assert_eq!(json["role"], "user");

    let msg = StoredMessage::assistant("hi".to_string(), None);
    let json = serde_json::to_value(&msg).unwrap();
    assert_eq!(json["role"], "assistant");
    // explanation is omitted when absent
    assert!(json.get("explanation").is_none());
}

#[test]
fn test_stored_message_deserializes_without_timestamp() {
    let msg: StoredMessage =
        serde_json::from_str(r#"{"role": "user", "text": "hello"}"#).unwrap();
    assert_eq!(msg.role, MessageRole::User);
    assert_eq!(msg.text, "hello");
    assert_eq!(msg.explanation, None);
}

#[test]
fn test_product_context_accepts_plain_string() {
    let product: ProductContext = serde_json::from_str(r#""Neem Oil""#).unwrap();
    assert!(matches!(product, ProductContext::Name(ref n) if n == "Neem Oil"));
}

#[test]
fn test_product_context_accepts_descriptor_object() {
    let product: ProductContext = serde_json::from_str(
        r#"{"name": "Neem Oil", "price": 300, "category": "Pesticide"}"#,
    )
    .unwrap();
    match product {
        ProductContext::Details {
            name,
            price,
            category,
            seller,
            ..
        } => {
            assert_eq!(name.as_deref(), Some("Neem Oil"));
            assert_eq!(price, Some(300.0));
            assert_eq!(category.as_deref(), Some("Pesticide"));
            assert_eq!(seller, None);
        }
        ProductContext::Name(_) => panic!("expected descriptor variant"),
    }
}

#[test]
fn test_mongo_session_document_uses_native_dates() {
    let session = MongoChatSession {
        id: ObjectId::new(),
        user_id: "farmer-1".to_string(),
        title: DEFAULT_SESSION_TITLE.to_string(),
        context: SessionContext::default(),
        messages: vec![StoredMessage::user("What fertilizer for rice?")],
        product_context: None,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    // Session timestamps must be BSON dates so `updated_at` sorts
    // chronologically, not lexicographically
    let doc = bson::to_document(&session).unwrap();
    assert!(matches!(doc.get("created_at"), Some(bson::Bson::DateTime(_))));
    assert!(matches!(doc.get("updated_at"), Some(bson::Bson::DateTime(_))));

    let roundtrip: MongoChatSession = bson::from_document(doc).unwrap();
    assert_eq!(
        roundtrip.updated_at.timestamp_millis(),
        session.updated_at.timestamp_millis()
    );
}

#[test]
fn test_session_context_is_empty() {
    assert!(SessionContext::default().is_empty());
    assert!(!SessionContext {
        location: "Salem".to_string(),
        ..Default::default()
    }
    .is_empty());
}
