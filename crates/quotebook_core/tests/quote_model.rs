use quotebook_core::{Quote, QuoteDraft, QuoteTable};

#[test]
fn quote_serializes_with_stable_field_names() {
    let quote = QuoteDraft::new("Less is more")
        .with_speaker("Mies")
        .with_tag("design")
        .into_new_quote(4);

    let json = serde_json::to_value(&quote).unwrap();
    assert_eq!(json["id"], 4);
    assert_eq!(json["content"], "\"Less is more\"");
    assert_eq!(json["speaker"], "Mies");
    assert_eq!(json["tag"], "design");
    assert!(json.get("link").is_none());

    let decoded: Quote = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, quote);
}

#[test]
fn table_serializes_as_plain_row_list() {
    let table = QuoteTable::from_rows(vec![
        QuoteDraft::new("a").into_new_quote(1),
        QuoteDraft::new("b").with_link("https://example.com").into_new_quote(2),
    ]);

    let json = serde_json::to_value(&table).unwrap();
    let rows = json.as_array().expect("table should be a json array");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1]["link"], "https://example.com");
}

#[test]
fn draft_accepts_partial_form_payload() {
    let value = serde_json::json!({
        "content": "Keep going",
        "tag": "work"
    });

    let draft: QuoteDraft = serde_json::from_value(value).unwrap();
    assert_eq!(draft, QuoteDraft::new("Keep going").with_tag("work"));
    assert!(draft.validate().is_ok());
}
