use axum::http::StatusCode;

use crate::tests::helper;

#[tokio::test]
async fn test_invalid_json() {
    let mut app = helper::setup_test_app().await;

    let access_token = helper::access_token("u1");

    // wrong type of data
    let body = r#"{"links":"https://a.com"}"#;
    let (status_code, _, error) = helper::maybe_create_collection_with_raw_body(
        &mut app,
        Some(&access_token),
        body,
        true,
    )
    .await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    let error = error.unwrap();
    assert_eq!("Data error".to_string(), error.error);
    assert_eq!(
        Some(
            "Failed to deserialize the JSON body into the target type: links: invalid type: \
             string \"https://a.com\", expected a sequence at line 1 column 24"
                .to_string()
        ),
        error.description
    );

    // syntax error
    let body = r#"{"}"#;
    let (status_code, _, error) = helper::maybe_create_collection_with_raw_body(
        &mut app,
        Some(&access_token),
        body,
        true,
    )
    .await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    let error = error.unwrap();
    assert_eq!("JSON syntax error".to_string(), error.error);
    assert_eq!(
        Some("EOF while parsing a string at line 1 column 3".to_string()),
        error.description
    );

    // syntax error
    let body = r#"{"foo":{"bar":}}"#;
    let (status_code, _, error) = helper::maybe_create_collection_with_raw_body(
        &mut app,
        Some(&access_token),
        body,
        true,
    )
    .await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    let error = error.unwrap();
    assert_eq!("JSON syntax error".to_string(), error.error);
    assert_eq!(
        Some("foo: expected value at line 1 column 15".to_string()),
        error.description
    );

    // missing content type
    let body = r"{}";
    let (status_code, _, error) = helper::maybe_create_collection_with_raw_body(
        &mut app,
        Some(&access_token),
        body,
        false,
    )
    .await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(
        "Missing `application/json` content type".to_string(),
        error.unwrap().error
    );

    // nothing was created
    let (_, collections) = helper::list_collections(&mut app, Some(&access_token)).await;
    assert!(collections.unwrap().is_empty());
}
