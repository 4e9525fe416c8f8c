//! 端到端接口测试（内存后端）/ End-to-end API tests (memory backend)

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};

use kefu_support::api;
use kefu_support::service::SupportService;
use kefu_support::storage::MemStore;

const CUSTOMER: (&str, &str) = ("x-user-id", "42");
const APP: (&str, &str) = ("x-app-id", "1");
const AGENT: (&str, &str) = ("x-user-id", "9001");

fn service_data() -> web::Data<SupportService> {
    web::Data::new(SupportService::new(Arc::new(MemStore::new())))
}

macro_rules! app {
    ($data:expr) => {
        test::init_service(
            App::new()
                .app_data($data.clone())
                .configure(api::configure),
        )
        .await
    };
}

#[actix_rt::test]
async fn test_full_support_scenario() {
    let data = service_data();
    let app = app!(data);

    // 创建会话组 / create group
    let req = test::TestRequest::post()
        .uri("/group/createSupportGroup")
        .insert_header(CUSTOMER)
        .insert_header(APP)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let group: serde_json::Value = test::read_body_json(resp).await;
    let group_id = group["id"].as_i64().unwrap();
    assert_eq!(group["status"], "open");

    // 管理端列表可见，状态 open / listed with status open
    let req = test::TestRequest::get()
        .uri("/group/support/list")
        .insert_header(AGENT)
        .to_request();
    let listed: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed["total"], 1);
    assert_eq!(listed["items"][0]["status"], "open");

    // 客户发送 hello（无显式 groupId）/ customer sends hello without groupId
    let req = test::TestRequest::post()
        .uri("/chatgpt/sendSupportMessage")
        .insert_header(CUSTOMER)
        .set_json(serde_json::json!({ "content": "hello" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // 查询到一条消息 / one message visible
    let req = test::TestRequest::get()
        .uri("/chatLog/querySupportMessages")
        .insert_header(CUSTOMER)
        .to_request();
    let msgs: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(msgs["total"], 1);
    assert_eq!(msgs["items"][0]["content"], "hello");
    assert_eq!(msgs["items"][0]["role"], "customer");

    // 客服回复并关闭 / agent replies and closes
    let req = test::TestRequest::post()
        .uri("/chatLog/support/reply")
        .insert_header(AGENT)
        .set_json(serde_json::json!({
            "groupId": group_id,
            "content": "we're on it",
            "status": "closed"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // 状态变 closed，消息数 2 / status closed, message count 2
    let req = test::TestRequest::get()
        .uri("/group/support/list")
        .insert_header(AGENT)
        .to_request();
    let listed: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed["items"][0]["status"], "closed");

    let req = test::TestRequest::get()
        .uri(&format!("/chatLog/support/messages?groupId={}", group_id))
        .insert_header(AGENT)
        .to_request();
    let msgs: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(msgs["total"], 2);
    assert_eq!(msgs["items"][1]["role"], "agent");

    // 不存在的组 404 / missing group is 404
    let req = test::TestRequest::get()
        .uri("/chatLog/support/messages?groupId=9999")
        .insert_header(AGENT)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_status_update_is_idempotent() {
    let data = service_data();
    let app = app!(data);

    let req = test::TestRequest::post()
        .uri("/group/createSupportGroup")
        .insert_header(CUSTOMER)
        .insert_header(APP)
        .to_request();
    let group: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let group_id = group["id"].as_i64().unwrap();

    let mut updated_at = None;
    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/group/support/status")
            .insert_header(CUSTOMER)
            .set_json(serde_json::json!({ "status": "closed", "groupId": group_id }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "closed");
        match &updated_at {
            None => updated_at = Some(body["updated_at"].clone()),
            // 第二次设置无可观察变化 / second call changes nothing observable
            Some(prev) => assert_eq!(prev, &body["updated_at"]),
        }
    }
}

#[actix_rt::test]
async fn test_reopen_then_send() {
    let data = service_data();
    let app = app!(data);

    let req = test::TestRequest::post()
        .uri("/group/createSupportGroup")
        .insert_header(CUSTOMER)
        .insert_header(APP)
        .to_request();
    let group: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let group_id = group["id"].as_i64().unwrap();

    for status in ["closed", "open"] {
        let req = test::TestRequest::post()
            .uri("/group/support/status")
            .insert_header(CUSTOMER)
            .set_json(serde_json::json!({ "status": status, "groupId": group_id }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::post()
        .uri("/chatgpt/sendSupportMessage")
        .insert_header(CUSTOMER)
        .set_json(serde_json::json!({ "content": "back again" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[actix_rt::test]
async fn test_error_mappings() {
    let data = service_data();
    let app = app!(data);

    // 无身份头 401 / missing identity headers
    let req = test::TestRequest::post()
        .uri("/group/createSupportGroup")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // 非法状态值 400 / unknown status tag
    let req = test::TestRequest::post()
        .uri("/group/support/status")
        .insert_header(CUSTOMER)
        .set_json(serde_json::json!({ "status": "resolved", "groupId": 1 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // 空内容 400，且组中无任何写入 / empty content 400, nothing written
    let req = test::TestRequest::post()
        .uri("/group/createSupportGroup")
        .insert_header(CUSTOMER)
        .insert_header(APP)
        .to_request();
    let group: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let group_id = group["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri("/chatLog/support/reply")
        .insert_header(AGENT)
        .set_json(serde_json::json!({ "groupId": group_id, "content": "", "status": "closed" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "validation_failed");

    let req = test::TestRequest::get()
        .uri(&format!("/chatLog/support/messages?groupId={}", group_id))
        .insert_header(AGENT)
        .to_request();
    let msgs: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(msgs["total"], 0);

    // 客户无会话组时发送 404 / send with no group resolves to 404
    let req = test::TestRequest::post()
        .uri("/chatgpt/sendSupportMessage")
        .insert_header(("x-user-id", "777"))
        .set_json(serde_json::json!({ "content": "anyone there?" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // 他人会话组按未找到处理 / foreign group treated as not found
    let req = test::TestRequest::post()
        .uri("/chatgpt/sendSupportMessage")
        .insert_header(("x-user-id", "777"))
        .set_json(serde_json::json!({ "content": "peek", "groupId": group_id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_health_and_openapi() {
    let data = service_data();
    let app = app!(data);

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["healthy"], true);

    let req = test::TestRequest::get().uri("/openapi.json").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["components"]["schemas"]["SupportGroup"].is_object());
}
