use axum::http::StatusCode;
use serde_json::json;

use crate::tests::helper;
use crate::tests::helper::Link;
use crate::tests::helper::Logo;

#[tokio::test]
async fn test_collection_lifecycle() {
    let mut app = helper::setup_test_app().await;

    let access_token = helper::access_token("u1");

    // create
    let (status_code, collection, _) = helper::maybe_create_collection(
        &mut app,
        Some(&access_token),
        Some("My Links"),
        &[("Site", "https://a.com")],
    )
    .await;
    assert_eq!(StatusCode::CREATED, status_code);
    let collection = collection.unwrap();
    assert_eq!(0, collection.scan_count);
    assert_eq!(7, collection.short_code.len());
    assert_eq!(Some("My Links".to_string()), collection.title);
    assert_eq!(vec![Link::new("Site", "https://a.com")], collection.links);
    assert!(!collection.exposes_owner);

    // first scan
    let (status_code, view, _) = helper::scan(&mut app, &collection.short_code).await;
    assert_eq!(StatusCode::OK, status_code);
    let view = view.unwrap();
    assert_eq!(1, view.scan_count);
    assert_eq!(collection.links, view.links);

    // update the links, the short code stays
    let payload = json!({
        "links": helper::links_payload(&[("Site", "https://a.com"), ("Shop", "https://b.com")]),
    });
    let (status_code, updated, _) =
        helper::maybe_update_collection(&mut app, Some(&access_token), &collection.id, &payload)
            .await;
    assert_eq!(StatusCode::OK, status_code);
    let updated = updated.unwrap();
    assert_eq!(collection.id, updated.id);
    assert_eq!(collection.short_code, updated.short_code);
    assert_eq!(collection.public_url, updated.public_url);
    assert_eq!(1, updated.scan_count);
    assert_eq!(2, updated.links.len());

    // scanning shows the new links
    let (status_code, view, _) = helper::scan(&mut app, &collection.short_code).await;
    assert_eq!(StatusCode::OK, status_code);
    let view = view.unwrap();
    assert_eq!(collection.short_code, view.short_code);
    assert_eq!(2, view.scan_count);
    assert_eq!(
        vec![
            Link::new("Site", "https://a.com"),
            Link::new("Shop", "https://b.com")
        ],
        view.links
    );

    // delete
    let (status_code, _) =
        helper::maybe_delete_collection(&mut app, Some(&access_token), &collection.id).await;
    assert_eq!(StatusCode::NO_CONTENT, status_code);

    let (status_code, _, error) = helper::scan(&mut app, &collection.short_code).await;
    assert_eq!(StatusCode::GONE, status_code);
    assert_eq!(
        "This link collection has been withdrawn",
        error.unwrap().error
    );

    // the management side no longer knows it
    let (status_code, _, _) =
        helper::single_collection(&mut app, Some(&access_token), &collection.id.to_string())
            .await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
}

#[tokio::test]
async fn test_list_collections() {
    let mut app = helper::setup_test_app().await;

    let owner = helper::access_token("u1");
    let other_owner = helper::access_token("u2");

    let first = helper::create_collection(&mut app, Some(&owner), &[]).await;
    let second = helper::create_collection(&mut app, Some(&owner), &[]).await;
    let deleted = helper::create_collection(&mut app, Some(&owner), &[]).await;
    let other = helper::create_collection(&mut app, Some(&other_owner), &[]).await;
    helper::create_collection(&mut app, None, &[]).await;

    let (status_code, _) =
        helper::maybe_delete_collection(&mut app, Some(&owner), &deleted.id).await;
    assert_eq!(StatusCode::NO_CONTENT, status_code);

    // touch the first one, it moves to the front
    let payload = json!({ "title": "Touched" });
    let (status_code, _, _) =
        helper::maybe_update_collection(&mut app, Some(&owner), &first.id, &payload).await;
    assert_eq!(StatusCode::OK, status_code);

    let (status_code, collections) = helper::list_collections(&mut app, Some(&owner)).await;
    assert_eq!(StatusCode::OK, status_code);
    let ids = collections
        .unwrap()
        .iter()
        .map(|collection| collection.id)
        .collect::<Vec<_>>();
    assert_eq!(vec![first.id, second.id], ids);

    let (status_code, collections) = helper::list_collections(&mut app, Some(&other_owner)).await;
    assert_eq!(StatusCode::OK, status_code);
    let ids = collections
        .unwrap()
        .iter()
        .map(|collection| collection.id)
        .collect::<Vec<_>>();
    assert_eq!(vec![other.id], ids);

    // anonymous callers own nothing
    let (status_code, collections) = helper::list_collections(&mut app, None).await;
    assert_eq!(StatusCode::OK, status_code);
    assert!(collections.unwrap().is_empty());
}

#[tokio::test]
async fn test_single_collection() {
    let mut app = helper::setup_test_app().await;

    let owner = helper::access_token("u1");

    let collection =
        helper::create_collection(&mut app, Some(&owner), &[("Site", "https://a.com")]).await;

    let (status_code, single, _) =
        helper::single_collection(&mut app, Some(&owner), &collection.id.to_string()).await;
    assert_eq!(StatusCode::OK, status_code);
    let single = single.unwrap();
    assert_eq!(collection.short_code, single.short_code);
    assert_eq!(collection.links, single.links);

    // unknown
    let (status_code, _, error) = helper::single_collection(
        &mut app,
        Some(&owner),
        "00000000-0000-0000-0000-000000000000",
    )
    .await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!("Link collection not found", error.unwrap().error);

    // not an ID at all
    let (status_code, _, error) =
        helper::single_collection(&mut app, Some(&owner), "not-an-id").await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!("Invalid path parameter", error.unwrap().error);
}

#[tokio::test]
async fn test_update_only_touches_provided_fields() {
    let mut app = helper::setup_test_app().await;

    let owner = helper::access_token("u1");

    let payload = json!({
        "title": "Menu",
        "logo": { "reference": "logos/bakery.png", "shape": "circle" },
        "links": helper::links_payload(&[("Site", "https://a.com")]),
    });
    let (status_code, collection, _) =
        helper::maybe_create_collection_with_payload(&mut app, Some(&owner), &payload).await;
    assert_eq!(StatusCode::CREATED, status_code);
    let collection = collection.unwrap();
    assert_eq!(
        Some(Logo {
            reference: "logos/bakery.png".to_string(),
            shape: "circle".to_string(),
        }),
        collection.logo
    );

    // scanners see the logo too
    let (status_code, view, _) = helper::scan(&mut app, &collection.short_code).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(collection.logo, view.unwrap().logo);

    // nothing provided, nothing changes
    let (status_code, updated, _) =
        helper::maybe_update_collection(&mut app, Some(&owner), &collection.id, &json!({})).await;
    assert_eq!(StatusCode::OK, status_code);
    let updated = updated.unwrap();
    assert_eq!(collection.title, updated.title);
    assert_eq!(collection.logo, updated.logo);
    assert_eq!(collection.links, updated.links);

    // an empty title removes the title
    let (status_code, updated, _) = helper::maybe_update_collection(
        &mut app,
        Some(&owner),
        &collection.id,
        &json!({ "title": "  " }),
    )
    .await;
    assert_eq!(StatusCode::OK, status_code);
    let updated = updated.unwrap();
    assert_eq!(None, updated.title);
    assert_eq!(collection.logo, updated.logo);

    // a new logo, square by default
    let (status_code, updated, _) = helper::maybe_update_collection(
        &mut app,
        Some(&owner),
        &collection.id,
        &json!({ "logo": { "reference": "logos/new.png" } }),
    )
    .await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(
        Some(Logo {
            reference: "logos/new.png".to_string(),
            shape: "square".to_string(),
        }),
        updated.unwrap().logo
    );

    // `null` removes the logo
    let (status_code, updated, _) = helper::maybe_update_collection(
        &mut app,
        Some(&owner),
        &collection.id,
        &json!({ "logo": null }),
    )
    .await;
    assert_eq!(StatusCode::OK, status_code);
    let updated = updated.unwrap();
    assert_eq!(None, updated.logo);
    assert_eq!(collection.links, updated.links);
    assert_eq!(collection.short_code, updated.short_code);

    let (_, view, _) = helper::scan(&mut app, &collection.short_code).await;
    assert_eq!(None, view.unwrap().logo);
}
