use super::*;
use serde_json::json;

fn gateway_trigger(method: &str, path: &str, body: Option<&str>) -> Trigger {
    Trigger {
        body: body.map(|b| b.to_string()),
        http_method: Some(method.to_string()),
        path: Some(path.to_string()),
        ..Default::default()
    }
}

fn function_url_trigger(method: &str, raw_path: &str, body: Option<&str>) -> Trigger {
    Trigger {
        body: body.map(|b| b.to_string()),
        raw_path: Some(raw_path.to_string()),
        request_context: Some(RequestContext {
            http: Some(HttpContext {
                method: Some(method.to_string()),
            }),
        }),
        ..Default::default()
    }
}

#[test]
fn test_empty_body_yields_empty_payload() {
    let request = normalize(&gateway_trigger("POST", "/scrape_post", None));
    assert!(request.payload.is_empty());
}

#[test]
fn test_blank_body_yields_empty_payload() {
    let request = normalize(&gateway_trigger("POST", "/scrape_post", Some("   \n\t ")));
    assert!(request.payload.is_empty());
}

#[test]
fn test_malformed_body_yields_empty_payload() {
    let request = normalize(&gateway_trigger("POST", "/scrape_post", Some("{not json")));
    assert!(request.payload.is_empty());
}

#[test]
fn test_non_object_body_yields_empty_payload() {
    let request = normalize(&gateway_trigger("POST", "/scrape_post", Some("[1, 2, 3]")));
    assert!(request.payload.is_empty());

    let request = normalize(&gateway_trigger("POST", "/scrape_post", Some("\"hello\"")));
    assert!(request.payload.is_empty());
}

#[test]
fn test_valid_body_is_parsed() {
    let request = normalize(&gateway_trigger(
        "POST",
        "/scrape_post",
        Some(r#"{"url": "https://example.com"}"#),
    ));
    assert_eq!(request.payload.get("url"), Some(&json!("https://example.com")));
}

#[test]
fn test_gateway_shape() {
    let request = normalize(&gateway_trigger("POST", "/scrape_post", None));
    assert_eq!(request.method, "post");
    assert_eq!(request.path_segment, "/scrape_post");
}

#[test]
fn test_function_url_shape() {
    let request = normalize(&function_url_trigger("POST", "/scrape_post/extra", None));
    assert_eq!(request.method, "post");
    assert_eq!(request.path_segment, "/scrape_post");
}

#[test]
fn test_nested_method_wins_over_top_level_fields() {
    // A trigger carrying both shapes must use the nested one exclusively.
    let mut trigger = function_url_trigger("POST", "/scrape_post", None);
    trigger.http_method = Some("GET".to_string());
    trigger.path = Some("/other_route".to_string());

    let request = normalize(&trigger);
    assert_eq!(request.method, "post");
    assert_eq!(request.path_segment, "/scrape_post");
}

#[test]
fn test_absent_method_yields_empty_string() {
    let trigger = Trigger {
        path: Some("/scrape_post".to_string()),
        ..Default::default()
    };
    let request = normalize(&trigger);
    assert_eq!(request.method, "");
}

#[test]
fn test_absent_path_yields_root_segment() {
    let request = normalize(&Trigger::default());
    assert_eq!(request.path_segment, "/");
}

#[test]
fn test_root_path_yields_root_segment() {
    let request = normalize(&gateway_trigger("GET", "/", None));
    assert_eq!(request.path_segment, "/");
}

#[test]
fn test_method_is_lowercased() {
    let request = normalize(&gateway_trigger("OPTIONS", "/", None));
    assert_eq!(request.method, "options");
}

#[test]
fn test_deserialize_function_url_event() {
    let raw = json!({
        "rawPath": "/scrape_post",
        "requestContext": {"http": {"method": "POST"}},
        "body": "{\"url\": \"https://example.com\"}"
    });
    let trigger: Trigger = serde_json::from_value(raw).unwrap();
    assert_eq!(trigger.nested_method(), Some("POST"));

    let request = normalize(&trigger);
    assert_eq!(request.method, "post");
    assert_eq!(request.path_segment, "/scrape_post");
    assert_eq!(request.payload.get("url"), Some(&json!("https://example.com")));
}

#[test]
fn test_deserialize_gateway_event_ignores_unknown_fields() {
    let raw = json!({
        "httpMethod": "POST",
        "path": "/scrape_post",
        "headers": {"content-type": "application/json"},
        "isBase64Encoded": false
    });
    let trigger: Trigger = serde_json::from_value(raw).unwrap();
    assert!(trigger.nested_method().is_none());
    assert_eq!(normalize(&trigger).path_segment, "/scrape_post");
}
