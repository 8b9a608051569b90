//! Equipment and work orders: the inputs to the reliability metrics.
//!
//! These records are owned by the CRUD layer; this crate only reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};

/// A maintained asset. Only the id participates in the metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
  pub id:             String,
  #[serde(default)]
  pub name:           Option<String>,
  #[serde(default)]
  pub equipment_type: Option<String>,
}

impl Equipment {
  pub fn new(id: impl Into<String>) -> Self {
    Self { id: id.into(), name: None, equipment_type: None }
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
  IntoStaticStr,
)]
pub enum WorkOrderType {
  Preventive,
  Corrective,
  Predictive,
  Emergency,
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
  IntoStaticStr,
)]
pub enum WorkOrderStatus {
  Draft,
  Open,
  #[serde(rename = "In Progress")]
  #[strum(serialize = "In Progress")]
  InProgress,
  Completed,
  Cancelled,
}

/// A unit of maintenance work against one piece of equipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrder {
  #[serde(default)]
  pub id:             String,
  pub equipment_id:   String,
  #[serde(rename = "type")]
  pub kind:           WorkOrderType,
  pub status:         WorkOrderStatus,
  pub created_date:   DateTime<Utc>,
  #[serde(default)]
  pub completed_date: Option<DateTime<Utc>>,
  #[serde(default)]
  pub cost:           f64,
}

impl WorkOrder {
  pub fn is_completed(&self) -> bool {
    self.status == WorkOrderStatus::Completed
  }
}
