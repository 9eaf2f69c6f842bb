use axum::http::StatusCode;
use serde_json::json;

use crate::tests::helper;
use crate::tests::helper::Link;

#[tokio::test]
async fn test_other_owner_is_forbidden() {
    let mut app = helper::setup_test_app().await;

    let owner = helper::access_token("u1");
    let intruder = helper::access_token("u2");

    let collection =
        helper::create_collection(&mut app, Some(&owner), &[("Site", "https://a.com")]).await;

    // read
    let (status_code, _, error) =
        helper::single_collection(&mut app, Some(&intruder), &collection.id.to_string()).await;
    assert_eq!(StatusCode::FORBIDDEN, status_code);
    assert_eq!("Not allowed to modify this collection", error.unwrap().error);

    // update
    let payload = json!({
        "title": "Mine now",
        "links": helper::links_payload(&[("Phishing", "https://evil.example.com")]),
    });
    let (status_code, _, _) =
        helper::maybe_update_collection(&mut app, Some(&intruder), &collection.id, &payload)
            .await;
    assert_eq!(StatusCode::FORBIDDEN, status_code);

    // delete
    let (status_code, _) =
        helper::maybe_delete_collection(&mut app, Some(&intruder), &collection.id).await;
    assert_eq!(StatusCode::FORBIDDEN, status_code);

    // anonymous
    let (status_code, _, _) =
        helper::maybe_update_collection(&mut app, None, &collection.id, &payload).await;
    assert_eq!(StatusCode::FORBIDDEN, status_code);

    let (status_code, _) = helper::maybe_delete_collection(&mut app, None, &collection.id).await;
    assert_eq!(StatusCode::FORBIDDEN, status_code);

    // nothing changed
    let (status_code, unchanged, _) =
        helper::single_collection(&mut app, Some(&owner), &collection.id.to_string()).await;
    assert_eq!(StatusCode::OK, status_code);
    let unchanged = unchanged.unwrap();
    assert_eq!(Some("My Links".to_string()), unchanged.title);
    assert_eq!(vec![Link::new("Site", "https://a.com")], unchanged.links);

    let (status_code, view, _) = helper::scan(&mut app, &collection.short_code).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(collection.links, view.unwrap().links);
}

#[tokio::test]
async fn test_anonymous_collection_is_immutable() {
    let mut app = helper::setup_test_app().await;

    let collection = helper::create_collection(&mut app, None, &[("Site", "https://a.com")]).await;

    // scannable like any other
    let (status_code, view, _) = helper::scan(&mut app, &collection.short_code).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(1, view.unwrap().scan_count);

    // but nobody can change it
    let payload = json!({ "title": "Claimed" });

    let (status_code, _, _) =
        helper::maybe_update_collection(&mut app, None, &collection.id, &payload).await;
    assert_eq!(StatusCode::FORBIDDEN, status_code);

    let owner = helper::access_token("u1");
    let (status_code, _, _) =
        helper::maybe_update_collection(&mut app, Some(&owner), &collection.id, &payload).await;
    assert_eq!(StatusCode::FORBIDDEN, status_code);

    let (status_code, _) =
        helper::maybe_delete_collection(&mut app, Some(&owner), &collection.id).await;
    assert_eq!(StatusCode::FORBIDDEN, status_code);

    let (status_code, _, _) = helper::scan(&mut app, &collection.short_code).await;
    assert_eq!(StatusCode::OK, status_code);
}

#[tokio::test]
async fn test_invalid_token() {
    let mut app = helper::setup_test_app().await;

    let forged = helper::forged_access_token("u1");
    let (status_code, _, error) = helper::maybe_create_collection(
        &mut app,
        Some(&forged),
        None,
        &[("Site", "https://a.com")],
    )
    .await;
    assert_eq!(StatusCode::FORBIDDEN, status_code);
    assert!(error.unwrap().error.starts_with("Invalid token"));

    let expired = helper::expired_access_token("u1");
    let (status_code, _) = helper::list_collections(&mut app, Some(&expired)).await;
    assert_eq!(StatusCode::FORBIDDEN, status_code);

    let (status_code, _) = helper::list_collections(&mut app, Some("Basic dTE6c2VjcmV0")).await;
    assert_eq!(StatusCode::FORBIDDEN, status_code);

    let empty_subject = helper::access_token("");
    let (status_code, _) = helper::list_collections(&mut app, Some(&empty_subject)).await;
    assert_eq!(StatusCode::FORBIDDEN, status_code);

    // an invalid token never falls back to an anonymous collection
    let (status_code, collections) = helper::list_collections(&mut app, None).await;
    assert_eq!(StatusCode::OK, status_code);
    assert!(collections.unwrap().is_empty());
}

#[tokio::test]
async fn test_deleted_collection_can_not_be_changed() {
    let mut app = helper::setup_test_app().await;

    let owner = helper::access_token("u1");

    let collection = helper::create_collection(&mut app, Some(&owner), &[]).await;

    let (status_code, _) =
        helper::maybe_delete_collection(&mut app, Some(&owner), &collection.id).await;
    assert_eq!(StatusCode::NO_CONTENT, status_code);

    let (status_code, _) =
        helper::maybe_delete_collection(&mut app, Some(&owner), &collection.id).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);

    let (status_code, _, _) = helper::maybe_update_collection(
        &mut app,
        Some(&owner),
        &collection.id,
        &json!({ "title": "Back again" }),
    )
    .await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);

    let (status_code, _, _) = helper::scan(&mut app, &collection.short_code).await;
    assert_eq!(StatusCode::GONE, status_code);
}
