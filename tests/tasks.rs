mod common;

use actix_web::http::StatusCode;
use actix_web::{test, App};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use taskboard::models::Task;
use taskboard::routes;

use common::{bearer, Part};

fn rent() -> Value {
    json!({
        "name": "Pay rent",
        "date": "2024-01-01",
        "description": "",
        "taskStatus": "TO-DO",
        "taskCategory": "bills"
    })
}

#[actix_rt::test]
async fn test_task_crud_flow() {
    let state = common::test_state();
    let app = test::init_service(App::new().app_data(state.clone()).configure(routes::config)).await;
    let token = common::register_and_login(&app, "alice", "s3cret!").await;

    // 1. Create without a file: the placeholder image is attached.
    let req = test::TestRequest::post()
        .uri("/saveUserData")
        .insert_header(bearer(&token))
        .set_json(&rent())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Data saved successfully");

    let created: Task = serde_json::from_value(body["newTask"].clone()).unwrap();
    assert_eq!(created.user_id, "alice");
    assert_eq!(created.name, "Pay rent");
    assert_eq!(created.task_status, "TO-DO");
    assert_eq!(created.id.len(), 24);
    assert_eq!(body["fileUrl"], created.file_url.as_str());
    assert_eq!(
        created.file_url,
        format!("http://localhost:5000/files/{}", created.file_id)
    );

    // 2. List returns exactly that task.
    let req = test::TestRequest::get()
        .uri("/getTask")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let tasks: Vec<Task> = serde_json::from_value(body["data"].clone()).unwrap();
    assert_eq!(tasks, vec![created.clone()]);

    // 3. Complete it and filter by status.
    let req = test::TestRequest::put()
        .uri(&format!("/updateTaskStatus/{}", created.id))
        .insert_header(bearer(&token))
        .set_json(&json!({ "taskStatus": "COMPLETED" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        body,
        json!({ "success": true, "message": "Task status updated successfully" })
    );

    for (status, expected) in [("COMPLETED", 1), ("TO-DO", 0), ("", 1)] {
        let req = test::TestRequest::get()
            .uri(&format!("/getTask?status={}", status))
            .insert_header(bearer(&token))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().unwrap().len(), expected, "status {:?}", status);
    }

    // 4. Full update replaces every field but keeps the file.
    let req = test::TestRequest::put()
        .uri(&format!("/updateTask/{}", created.id))
        .insert_header(bearer(&token))
        .set_json(&json!({ "name": "Pay rent (paid)", "taskStatus": "COMPLETED" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        body,
        json!({ "success": true, "message": "Task updated successfully" })
    );

    let req = test::TestRequest::get()
        .uri("/getTask")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let updated: Task = serde_json::from_value(body["data"][0].clone()).unwrap();
    assert_eq!(updated.name, "Pay rent (paid)");
    assert_eq!(updated.date, "");
    assert_eq!(updated.task_category, "");
    assert_eq!(updated.file_id, created.file_id);

    // 5. Delete, then the list is empty and a second delete is not found.
    let req = test::TestRequest::delete()
        .uri(&format!("/deleteTask/{}", created.id))
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        body,
        json!({ "success": true, "message": "Task deleted successfully" })
    );

    let req = test::TestRequest::delete()
        .uri(&format!("/deleteTask/{}", created.id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/getTask")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "success": true, "data": [] }));
}

#[actix_rt::test]
async fn test_tasks_are_isolated_between_users() {
    let state = common::test_state();
    let app = test::init_service(App::new().app_data(state.clone()).configure(routes::config)).await;
    let alice = common::register_and_login(&app, "alice", "s3cret!").await;
    let bob = common::register_and_login(&app, "bob", "hunter22").await;

    let req = test::TestRequest::post()
        .uri("/saveUserData")
        .insert_header(bearer(&bob))
        .set_json(&json!({ "name": "bob's task", "taskStatus": "TO-DO" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let bobs_id = body["newTask"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/getTask")
        .insert_header(bearer(&alice))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"], json!([]));

    let attempts = [
        test::TestRequest::delete().uri(&format!("/deleteTask/{}", bobs_id)),
        test::TestRequest::put()
            .uri(&format!("/updateTaskStatus/{}", bobs_id))
            .set_json(&json!({ "taskStatus": "COMPLETED" })),
        test::TestRequest::put()
            .uri(&format!("/updateTask/{}", bobs_id))
            .set_json(&json!({ "name": "stolen" })),
    ];
    for attempt in attempts {
        let resp = test::call_service(&app, attempt.insert_header(bearer(&alice)).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
    }

    let req = test::TestRequest::get()
        .uri("/getTask")
        .insert_header(bearer(&bob))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"][0]["name"], "bob's task");
    assert_eq!(body["data"][0]["taskStatus"], "TO-DO");
}

#[actix_rt::test]
async fn test_invalid_status_and_id_are_bad_requests() {
    let state = common::test_state();
    let app = test::init_service(App::new().app_data(state.clone()).configure(routes::config)).await;
    let token = common::register_and_login(&app, "alice", "s3cret!").await;

    let req = test::TestRequest::post()
        .uri("/saveUserData")
        .insert_header(bearer(&token))
        .set_json(&rent())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let id = body["newTask"]["id"].as_str().unwrap().to_string();

    for status in ["DONE", "completed", ""] {
        let req = test::TestRequest::put()
            .uri(&format!("/updateTaskStatus/{}", id))
            .insert_header(bearer(&token))
            .set_json(&json!({ "taskStatus": status }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "status {:?}", status);
    }

    let req = test::TestRequest::get()
        .uri("/getTask")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"][0]["taskStatus"], "TO-DO");

    let requests = [
        test::TestRequest::delete().uri("/deleteTask/not-an-id"),
        test::TestRequest::put()
            .uri("/updateTaskStatus/not-an-id")
            .set_json(&json!({ "taskStatus": "COMPLETED" })),
        test::TestRequest::put()
            .uri("/updateTask/not-an-id")
            .set_json(&rent()),
    ];
    for req in requests {
        let resp = test::call_service(&app, req.insert_header(bearer(&token)).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}

#[actix_rt::test]
async fn test_unauthenticated_requests_rejected_before_parsing() {
    let state = common::test_state();
    let app = test::init_service(App::new().app_data(state.clone()).configure(routes::config)).await;

    let requests = [
        test::TestRequest::post().uri("/saveUserData").set_json(&rent()),
        test::TestRequest::delete().uri("/deleteTask/not-an-id"),
        test::TestRequest::put()
            .uri("/updateTaskStatus/not-an-id")
            .set_json(&json!({ "taskStatus": "DONE" })),
    ];
    for req in requests {
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}

#[actix_rt::test]
async fn test_multipart_create_with_file() {
    let state = common::test_state();
    let app = test::init_service(App::new().app_data(state.clone()).configure(routes::config)).await;
    let token = common::register_and_login(&app, "alice", "s3cret!").await;
    let photo: &[u8] = b"\xFF\xD8\xFF\xE0receipt-bytes";

    let body = common::multipart_body(&[
        Part::Text("name", "Receipt"),
        Part::Text("date", "2024-02-01"),
        Part::Text("taskStatus", "IN-PROGRESS"),
        Part::Text("taskCategory", "bills"),
        Part::File {
            field: "file",
            filename: "receipt.jpg",
            content_type: "image/jpeg",
            content: photo,
        },
    ]);
    let req = test::TestRequest::post()
        .uri("/saveUserData")
        .insert_header(bearer(&token))
        .insert_header(common::multipart_content_type())
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let task: Task = serde_json::from_value(body["newTask"].clone()).unwrap();

    assert_eq!(task.name, "Receipt");
    assert_eq!(task.date, "2024-02-01");
    assert_eq!(task.description, "");
    assert_eq!(task.task_status, "IN-PROGRESS");
    assert!(!state.files.is_default(&task.file_id));

    let req = test::TestRequest::get()
        .uri(&format!("/files/{}", task.file_id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("content-type").unwrap().to_str().unwrap(),
        "image/jpeg"
    );
    assert_eq!(test::read_body(resp).await.as_ref(), photo);
}

#[actix_rt::test]
async fn test_multipart_empty_file_part_uses_placeholder() {
    let state = common::test_state();
    let app = test::init_service(App::new().app_data(state.clone()).configure(routes::config)).await;
    let token = common::register_and_login(&app, "alice", "s3cret!").await;

    let body = common::multipart_body(&[
        Part::Text("name", "No attachment"),
        Part::File {
            field: "file",
            filename: "",
            content_type: "application/octet-stream",
            content: b"",
        },
    ]);
    let req = test::TestRequest::post()
        .uri("/saveUserData")
        .insert_header(bearer(&token))
        .insert_header(common::multipart_content_type())
        .set_payload(body)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let file_id = body["newTask"]["fileId"].as_str().unwrap();
    assert!(state.files.is_default(file_id));
}

#[actix_rt::test]
async fn test_multipart_update_replaces_file() {
    let state = common::test_state();
    let app = test::init_service(App::new().app_data(state.clone()).configure(routes::config)).await;
    let token = common::register_and_login(&app, "alice", "s3cret!").await;

    let req = test::TestRequest::post()
        .uri("/saveUserData")
        .insert_header(bearer(&token))
        .set_json(&rent())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let id = body["newTask"]["id"].as_str().unwrap().to_string();
    let original_file = body["newTask"]["fileId"].as_str().unwrap().to_string();

    let body = common::multipart_body(&[
        Part::Text("name", "Pay rent"),
        Part::Text("taskStatus", "COMPLETED"),
        Part::File {
            field: "file",
            filename: "proof.gif",
            content_type: "image/gif",
            content: b"GIF89a-proof",
        },
    ]);
    let req = test::TestRequest::put()
        .uri(&format!("/updateTask/{}", id))
        .insert_header(bearer(&token))
        .insert_header(common::multipart_content_type())
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/getTask")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let task: Task = serde_json::from_value(body["data"][0].clone()).unwrap();
    assert_eq!(task.task_status, "COMPLETED");
    assert!(task.file_id != original_file);
    assert!(task.file_url.ends_with(&task.file_id));
}

#[actix_rt::test]
async fn test_garbled_form_is_bad_request() {
    let state = common::test_state();
    let app = test::init_service(App::new().app_data(state.clone()).configure(routes::config)).await;
    let token = common::register_and_login(&app, "alice", "s3cret!").await;

    let req = test::TestRequest::post()
        .uri("/saveUserData")
        .insert_header(bearer(&token))
        .insert_header(("Content-Type", "text/plain"))
        .set_payload("name=Pay rent")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({ "success": false, "error": "Failed to parse form data" })
    );
}

#[actix_rt::test]
async fn test_oversized_upload_rejected() {
    let state = common::test_state_with(|config| config.max_upload_bytes = 16);
    let app = test::init_service(App::new().app_data(state.clone()).configure(routes::config)).await;
    let token = common::register_and_login(&app, "alice", "s3cret!").await;

    let body = common::multipart_body(&[
        Part::Text("name", "Too big"),
        Part::File {
            field: "file",
            filename: "big.bin",
            content_type: "application/octet-stream",
            content: &[0u8; 64],
        },
    ]);
    let req = test::TestRequest::post()
        .uri("/saveUserData")
        .insert_header(bearer(&token))
        .insert_header(common::multipart_content_type())
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/getTask")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"], json!([]));
}

#[actix_rt::test]
async fn test_null_fields_saved_as_empty() {
    let state = common::test_state();
    let app = test::init_service(App::new().app_data(state.clone()).configure(routes::config)).await;
    let token = common::register_and_login(&app, "alice", "s3cret!").await;

    let req = test::TestRequest::post()
        .uri("/saveUserData")
        .insert_header(bearer(&token))
        .set_json(&json!({ "name": "Pay rent", "description": null, "taskStatus": "TO-DO" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["newTask"]["description"], "");
    assert_eq!(body["newTask"]["taskStatus"], "TO-DO");
}
