//! Handlers for `/reliability` endpoints.
//!
//! The work-order history is supplied in the request body; nothing is read
//! from or written to the store.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/reliability` | Body: `{ equipmentId, workOrders }` |
//! | `POST` | `/reliability/fleet` | Body: `{ equipment, workOrders }` |
//! | `POST` | `/reliability/costs` | Body: `{ workOrders }` |

use std::collections::BTreeMap;

use axum::Json;
use rcm_core::{
  reliability::{
    ReliabilityReport, fleet_reliability, get_maintenance_cost_by_type,
    reliability_report,
  },
  work_order::{Equipment, WorkOrder, WorkOrderType},
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportBody {
  pub equipment_id: String,
  #[serde(default)]
  pub work_orders:  Vec<WorkOrder>,
}

/// `POST /reliability`
pub async fn report(Json(body): Json<ReportBody>) -> Json<ReliabilityReport> {
  Json(reliability_report(&body.work_orders, &body.equipment_id))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetBody {
  pub equipment:   Vec<Equipment>,
  #[serde(default)]
  pub work_orders: Vec<WorkOrder>,
}

/// `POST /reliability/fleet`: one report per equipment entry, in order.
pub async fn fleet(Json(body): Json<FleetBody>) -> Json<Vec<ReliabilityReport>> {
  Json(fleet_reliability(&body.equipment, &body.work_orders))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostsBody {
  #[serde(default)]
  pub work_orders: Vec<WorkOrder>,
}

/// `POST /reliability/costs`: `{ "<type>": total }`.
pub async fn costs(Json(body): Json<CostsBody>) -> Json<BTreeMap<WorkOrderType, f64>> {
  Json(get_maintenance_cost_by_type(&body.work_orders))
}
