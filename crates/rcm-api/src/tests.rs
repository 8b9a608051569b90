//! Router tests against an in-memory repository.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use rcm_core::{FailureModeRepository, store::MemoryStore};
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{Repo, api_router};

const MOTOR_PATH: &str = "Motor%20El%C3%A9ctrico";

async fn make_repo() -> Repo<MemoryStore> {
  Arc::new(FailureModeRepository::open(MemoryStore::new()).await)
}

async fn send(
  repo: Repo<MemoryStore>,
  method: &str,
  uri: &str,
  body: Option<Value>,
) -> Response {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  api_router(repo).oneshot(builder.body(body).unwrap()).await.unwrap()
}

async fn json_body(resp: Response) -> Value {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

fn new_mode_body() -> Value {
  json!({
    "description": "Sobrecarga térmica",
    "causes": ["Tensión desbalanceada"],
    "frequency": "Low",
    "severity": "Critical",
    "detectability": "Medium"
  })
}

// ── Reads ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_returns_merged_map() {
  let resp = send(make_repo().await, "GET", "/failure-modes", None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = json_body(resp).await;
  assert_eq!(body["Motor Eléctrico"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn list_with_query_searches() {
  let resp = send(make_repo().await, "GET", "/failure-modes?q=cavitaci%C3%B3n", None).await;
  let body = json_body(resp).await;
  let hits = body.as_array().unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0]["equipmentType"], "Bomba Centrífuga");
}

#[tokio::test]
async fn equipment_types_lists_defaults() {
  let resp = send(make_repo().await, "GET", "/equipment-types", None).await;
  let body = json_body(resp).await;
  let types: Vec<&str> = body
    .as_array()
    .unwrap()
    .iter()
    .map(|v| v.as_str().unwrap())
    .collect();
  assert!(types.contains(&"Motor Eléctrico"));
}

#[tokio::test]
async fn get_one_missing_is_404() {
  let uri = format!("/equipment-types/{MOTOR_PATH}/failure-modes/FM-nope");
  let resp = send(make_repo().await, "GET", &uri, None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ── Mutations ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_generates_id_and_tags_origin() {
  let repo = make_repo().await;
  let uri = format!("/equipment-types/{MOTOR_PATH}/failure-modes");
  let resp = send(repo.clone(), "POST", &uri, Some(new_mode_body())).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let created = json_body(resp).await;
  let id = created["id"].as_str().unwrap().to_string();
  assert!(id.starts_with("FM-"));
  assert_eq!(created["equipmentType"], "Motor Eléctrico");

  let resp = send(repo, "GET", &format!("{uri}/{id}"), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let fetched = json_body(resp).await;
  assert_eq!(fetched["origin"], "custom");
  assert_eq!(fetched["mode"]["severity"], "Critical");
}

#[tokio::test]
async fn create_rejects_unknown_label() {
  let mut body = new_mode_body();
  body["severity"] = json!("Catastrophic");
  let uri = format!("/equipment-types/{MOTOR_PATH}/failure-modes");
  let resp = send(make_repo().await, "POST", &uri, Some(body)).await;
  assert!(resp.status().is_client_error());
}

#[tokio::test]
async fn update_and_delete_report_outcomes() {
  let repo = make_repo().await;
  let mut body = new_mode_body();
  body["id"] = json!("FM-T1");
  send(repo.clone(), "POST", "/equipment-types/Turbina/failure-modes", Some(body.clone()))
    .await;

  body["description"] = json!("Sobrecarga severa");
  let resp = send(
    repo.clone(),
    "PUT",
    "/equipment-types/Turbina/failure-modes/FM-T1",
    Some(body.clone()),
  )
  .await;
  assert_eq!(json_body(resp).await["outcome"], "applied");

  let resp = send(
    repo.clone(),
    "PUT",
    &format!("/equipment-types/{MOTOR_PATH}/failure-modes/FM-ME-001"),
    Some(body),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await["outcome"], "not_custom");

  let resp = send(
    repo.clone(),
    "DELETE",
    "/equipment-types/Turbina/failure-modes/FM-T1",
    None,
  )
  .await;
  assert_eq!(json_body(resp).await["outcome"], "applied");

  let resp = send(repo, "GET", "/equipment-types/Turbina/failure-modes", None).await;
  assert!(json_body(resp).await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn statistics_reset_and_import() {
  let repo = make_repo().await;
  send(
    repo.clone(),
    "POST",
    "/equipment-types/Turbina/failure-modes",
    Some(new_mode_body()),
  )
  .await;

  let stats = json_body(send(repo.clone(), "GET", "/failure-modes/statistics", None).await).await;
  assert_eq!(stats["customFailureModes"], 1);

  let export = send(repo.clone(), "GET", "/failure-modes/export", None).await;
  assert_eq!(export.status(), StatusCode::OK);
  let exported = axum::body::to_bytes(export.into_body(), usize::MAX).await.unwrap();

  let resp = send(repo.clone(), "POST", "/failure-modes/reset", None).await;
  assert_eq!(resp.status(), StatusCode::NO_CONTENT);
  let stats = json_body(send(repo.clone(), "GET", "/failure-modes/statistics", None).await).await;
  assert_eq!(stats["customFailureModes"], 0);

  let req = Request::builder()
    .method("POST")
    .uri("/failure-modes/import")
    .body(Body::from(exported))
    .unwrap();
  let resp = api_router(repo.clone()).oneshot(req).await.unwrap();
  assert_eq!(json_body(resp).await["imported"], true);
  let stats = json_body(send(repo.clone(), "GET", "/failure-modes/statistics", None).await).await;
  assert_eq!(stats["customFailureModes"], 1);

  let req = Request::builder()
    .method("POST")
    .uri("/failure-modes/import")
    .body(Body::from("not json"))
    .unwrap();
  let resp = api_router(repo).oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert_eq!(json_body(resp).await["imported"], false);
}

// ── Risk ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn risk_ranks_descending() {
  let uri = format!("/equipment-types/{MOTOR_PATH}/risk");
  let body = json_body(send(make_repo().await, "GET", &uri, None).await).await;
  let rpns: Vec<u64> = body["assessments"]
    .as_array()
    .unwrap()
    .iter()
    .map(|a| a["rpn"].as_u64().unwrap())
    .collect();
  assert_eq!(rpns.len(), 3);
  assert!(rpns.windows(2).all(|w| w[0] >= w[1]));
  let summary = &body["summary"];
  let total: u64 = ["critical", "high", "medium", "low"]
    .iter()
    .map(|k| summary[*k].as_u64().unwrap())
    .sum();
  assert_eq!(total, 3);
}

#[tokio::test]
async fn rpn_calculator() {
  let uri = "/risk/rpn?frequency=Low&severity=Critical&detectability=Medium";
  let body = json_body(send(make_repo().await, "GET", uri, None).await).await;
  assert_eq!(body["rpn"], 24);
  assert_eq!(body["band"], "Medium");

  let uri = "/risk/rpn?frequency=Never&severity=Critical&detectability=Medium";
  let resp = send(make_repo().await, "GET", uri, None).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ── Reliability ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn reliability_report_and_costs() {
  let work_orders = json!([
    {
      "equipmentId": "EQ-1", "type": "Corrective", "status": "Completed",
      "createdDate": "2024-01-01T00:00:00Z", "completedDate": "2024-01-01T10:00:00Z",
      "cost": 250.0
    },
    {
      "equipmentId": "EQ-1", "type": "Corrective", "status": "Completed",
      "createdDate": "2024-01-05T04:00:00Z", "completedDate": "2024-01-05T14:00:00Z",
      "cost": 150.0
    },
    {
      "equipmentId": "EQ-1", "type": "Preventive", "status": "In Progress",
      "createdDate": "2024-01-03T00:00:00Z", "cost": 80.0
    }
  ]);

  let body = json_body(
    send(
      make_repo().await,
      "POST",
      "/reliability",
      Some(json!({ "equipmentId": "EQ-1", "workOrders": work_orders })),
    )
    .await,
  )
  .await;
  assert_eq!(body["mtbfHours"], 100.0);
  assert_eq!(body["mttrHours"], 10.0);

  let costs = json_body(
    send(
      make_repo().await,
      "POST",
      "/reliability/costs",
      Some(json!({ "workOrders": work_orders })),
    )
    .await,
  )
  .await;
  assert_eq!(costs["Corrective"], 400.0);
  assert_eq!(costs["Preventive"], 80.0);

  let fleet = json_body(
    send(
      make_repo().await,
      "POST",
      "/reliability/fleet",
      Some(json!({ "equipment": [{ "id": "EQ-1" }, { "id": "EQ-2" }], "workOrders": work_orders })),
    )
    .await,
  )
  .await;
  assert_eq!(fleet.as_array().unwrap().len(), 2);
  assert_eq!(fleet[1]["availability"], 100.0);
}
