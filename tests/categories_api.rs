// This file is part of the product Stockyard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{Value, json};

async fn create_category(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    body: Value,
) -> (StatusCode, Value) {
    let req = test::TestRequest::post()
        .uri("/categories")
        .set_json(body)
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let json: Value = serde_json::from_slice(&body).expect("response json");
    (status, json)
}

#[actix_web::test]
async fn empty_catalog_lists_no_categories() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::get().uri("/categories").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = serde_json::from_slice(&test::read_body(resp).await).expect("json");
    assert_eq!(json.get("success").and_then(Value::as_bool), Some(true));
    assert_eq!(
        json.get("categories").and_then(Value::as_array).map(Vec::len),
        Some(0)
    );
}

#[actix_web::test]
async fn create_root_category_returns_derived_fields() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(&harness)).await;

    let (status, json) = create_category(
        &app,
        json!({"name": "  Home Appliances ", "description": " big machines "}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json.get("success").and_then(Value::as_bool), Some(true));
    assert_eq!(
        json.get("message").and_then(Value::as_str),
        Some("Category created successfully")
    );
    let category = json.get("category").expect("category");
    assert_eq!(
        category.get("name").and_then(Value::as_str),
        Some("Home Appliances")
    );
    assert_eq!(
        category.get("slug").and_then(Value::as_str),
        Some("home-appliances")
    );
    assert_eq!(
        category.get("description").and_then(Value::as_str),
        Some("big machines")
    );
    assert_eq!(category.get("level").and_then(Value::as_u64), Some(0));
    assert_eq!(
        category.get("path").and_then(Value::as_array).map(Vec::len),
        Some(0)
    );
    assert!(category.get("parent").expect("parent field").is_null());
}

#[actix_web::test]
async fn empty_name_is_rejected() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(&harness)).await;

    let (status, json) = create_category(&app, json!({"name": "   "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json.get("success").and_then(Value::as_bool), Some(false));
    assert_eq!(
        json.get("message").and_then(Value::as_str),
        Some("Name is required and cannot be empty.")
    );
}

#[actix_web::test]
async fn derived_fields_are_not_accepted_as_input() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(&harness)).await;

    // The body schema is strict; the payload error comes from the JSON
    // extractor rather than the catalog, so only the status is stable.
    let req = test::TestRequest::post()
        .uri("/categories")
        .set_json(json!({"name": "Electronics", "level": 5}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn unknown_parent_is_rejected() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(&harness)).await;

    let (status, json) = create_category(
        &app,
        json!({"name": "Phones", "parent": "00000000-0000-0000-0000-000000000001"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json.get("message").and_then(Value::as_str),
        Some("Parent category not found.")
    );
}

#[actix_web::test]
async fn duplicate_sibling_name_conflicts() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(&harness)).await;

    let (status, _) = create_category(&app, json!({"name": "Electronics"})).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, json) = create_category(&app, json!({"name": "Electronics"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = json.get("message").and_then(Value::as_str).expect("message");
    assert!(message.contains("already exists"), "got: {}", message);
}

#[actix_web::test]
async fn slug_collision_between_distinct_names_conflicts() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(&harness)).await;

    let (status, _) = create_category(&app, json!({"name": "Nuts & Bolts"})).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, json) = create_category(&app, json!({"name": "Nuts   Bolts"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = json.get("message").and_then(Value::as_str).expect("message");
    assert!(message.contains("slug"), "got: {}", message);
}

#[actix_web::test]
async fn get_category_populates_children_one_level() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(&harness)).await;

    let (_, root) = create_category(&app, json!({"name": "Electronics"})).await;
    let root_id = root["category"]["id"].as_str().expect("root id").to_string();
    let (_, phones) = create_category(&app, json!({"name": "Phones", "parent": root_id})).await;
    let phones_id = phones["category"]["id"].as_str().expect("phones id").to_string();
    create_category(&app, json!({"name": "Accessories", "parent": phones_id})).await;

    let req = test::TestRequest::get()
        .uri(&format!("/categories/{}", root_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = serde_json::from_slice(&test::read_body(resp).await).expect("json");
    let children = json["category"]["children"].as_array().expect("children");
    assert_eq!(children.len(), 1);
    assert_eq!(children[0]["name"].as_str(), Some("Phones"));
    // One level deep only: the grandchild is not expanded here.
    assert!(children[0].get("children").is_none());
}

#[actix_web::test]
async fn fetching_unknown_category_is_404() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::get()
        .uri("/categories/00000000-0000-0000-0000-000000000001")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn rename_regenerates_slug() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(&harness)).await;

    let (_, created) = create_category(&app, json!({"name": "Electronics"})).await;
    let id = created["category"]["id"].as_str().expect("id").to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/categories/{}", id))
        .set_json(json!({"name": "Consumer Electronics"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = serde_json::from_slice(&test::read_body(resp).await).expect("json");
    assert_eq!(
        json["category"]["slug"].as_str(),
        Some("consumer-electronics")
    );
    assert_eq!(
        json["message"].as_str(),
        Some("Category updated successfully")
    );
}

#[actix_web::test]
async fn reparenting_moves_subtree_and_explicit_null_moves_to_root() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(&harness)).await;

    let (_, a) = create_category(&app, json!({"name": "Warehouse A"})).await;
    let a_id = a["category"]["id"].as_str().expect("a id").to_string();
    let (_, b) = create_category(&app, json!({"name": "Warehouse B"})).await;
    let b_id = b["category"]["id"].as_str().expect("b id").to_string();
    let (_, bins) = create_category(&app, json!({"name": "Bins", "parent": a_id})).await;
    let bins_id = bins["category"]["id"].as_str().expect("bins id").to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/categories/{}", bins_id))
        .set_json(json!({"parent": b_id}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = serde_json::from_slice(&test::read_body(resp).await).expect("json");
    assert_eq!(json["category"]["parent"].as_str(), Some(b_id.as_str()));
    assert_eq!(json["category"]["level"].as_u64(), Some(1));

    let req = test::TestRequest::put()
        .uri(&format!("/categories/{}", bins_id))
        .set_json(json!({"parent": null}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = serde_json::from_slice(&test::read_body(resp).await).expect("json");
    assert!(json["category"]["parent"].is_null());
    assert_eq!(json["category"]["level"].as_u64(), Some(0));

    // Three roots now: both warehouses and the moved node.
    let req = test::TestRequest::get().uri("/categories").to_request();
    let resp = test::call_service(&app, req).await;
    let json: Value = serde_json::from_slice(&test::read_body(resp).await).expect("json");
    assert_eq!(json["categories"].as_array().map(Vec::len), Some(3));
}

#[actix_web::test]
async fn reparenting_into_own_subtree_is_rejected() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(&harness)).await;

    let (_, root) = create_category(&app, json!({"name": "Electronics"})).await;
    let root_id = root["category"]["id"].as_str().expect("root id").to_string();
    let (_, child) = create_category(&app, json!({"name": "Phones", "parent": root_id})).await;
    let child_id = child["category"]["id"].as_str().expect("child id").to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/categories/{}", root_id))
        .set_json(json!({"parent": child_id}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json: Value = serde_json::from_slice(&test::read_body(resp).await).expect("json");
    let message = json["message"].as_str().expect("message");
    assert!(message.contains("own subtree"), "got: {}", message);
}

#[actix_web::test]
async fn delete_cascades_through_the_subtree() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(&harness)).await;

    let (_, root) = create_category(&app, json!({"name": "Electronics"})).await;
    let root_id = root["category"]["id"].as_str().expect("root id").to_string();
    let (_, phones) = create_category(&app, json!({"name": "Phones", "parent": root_id})).await;
    let phones_id = phones["category"]["id"].as_str().expect("phones id").to_string();
    let (_, accessories) =
        create_category(&app, json!({"name": "Accessories", "parent": phones_id})).await;
    let accessories_id = accessories["category"]["id"]
        .as_str()
        .expect("accessories id")
        .to_string();

    let req = test::TestRequest::delete()
        .uri(&format!("/categories/{}", phones_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // The whole subtree is gone, the parent no longer lists the child.
    for gone in [&phones_id, &accessories_id] {
        let req = test::TestRequest::get()
            .uri(&format!("/categories/{}", gone))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
    let req = test::TestRequest::get()
        .uri(&format!("/categories/{}", root_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let json: Value = serde_json::from_slice(&test::read_body(resp).await).expect("json");
    assert_eq!(
        json["category"]["subcategories"].as_array().map(Vec::len),
        Some(0)
    );
    assert_eq!(
        json["category"]["children"].as_array().map(Vec::len),
        Some(0)
    );
}

#[actix_web::test]
async fn deleting_twice_reports_not_found() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(&harness)).await;

    let (_, created) = create_category(&app, json!({"name": "Electronics"})).await;
    let id = created["category"]["id"].as_str().expect("id").to_string();

    let req = test::TestRequest::delete()
        .uri(&format!("/categories/{}", id))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::OK
    );
    let req = test::TestRequest::delete()
        .uri(&format!("/categories/{}", id))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn roots_are_listed_in_name_order() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(&harness)).await;

    for name in ["Tools", "Audio", "Garden"] {
        let (status, _) = create_category(&app, json!({"name": name})).await;
        assert_eq!(status, StatusCode::CREATED);
    }
    let req = test::TestRequest::get().uri("/categories").to_request();
    let resp = test::call_service(&app, req).await;
    let json: Value = serde_json::from_slice(&test::read_body(resp).await).expect("json");
    let names: Vec<_> = json["categories"]
        .as_array()
        .expect("categories")
        .iter()
        .map(|category| category["name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, vec!["Audio", "Garden", "Tools"]);
}
