//! Reliability metrics over a work-order history.
//!
//! All functions are pure: they read caller-supplied slices and keep no
//! state, so they are safe to run in parallel across equipment ids. Durations
//! are reported in hours.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::work_order::{Equipment, WorkOrder, WorkOrderType};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

fn hours_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
  (to - from).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

/// Mean time between failures for `equipment_id`, in hours.
///
/// Only completed corrective orders count as failures. Orders are sorted by
/// `created_date` before the consecutive intervals are taken, so the input
/// order does not matter. Fewer than two failures yields `0.0`.
pub fn calculate_mtbf(work_orders: &[WorkOrder], equipment_id: &str) -> f64 {
  let mut failures: Vec<DateTime<Utc>> = work_orders
    .iter()
    .filter(|wo| {
      wo.equipment_id == equipment_id
        && wo.kind == WorkOrderType::Corrective
        && wo.is_completed()
    })
    .map(|wo| wo.created_date)
    .collect();

  if failures.len() < 2 {
    return 0.0;
  }

  failures.sort();
  let total: f64 = failures.windows(2).map(|w| hours_between(w[0], w[1])).sum();
  total / (failures.len() - 1) as f64
}

/// Mean time to repair for `equipment_id`, in hours.
///
/// Averages `completed_date - created_date` over completed orders of any type
/// that carry a completion date. No such orders yields `0.0`.
pub fn calculate_mttr(work_orders: &[WorkOrder], equipment_id: &str) -> f64 {
  let repairs: Vec<f64> = work_orders
    .iter()
    .filter(|wo| wo.equipment_id == equipment_id && wo.is_completed())
    .filter_map(|wo| wo.completed_date.map(|done| hours_between(wo.created_date, done)))
    .collect();

  if repairs.is_empty() {
    return 0.0;
  }
  repairs.iter().sum::<f64>() / repairs.len() as f64
}

/// Availability as a percentage: `mtbf / (mtbf + mttr) × 100`.
///
/// When both inputs are zero there is no downtime on record and the result
/// is `100.0`.
pub fn calculate_availability(mtbf: f64, mttr: f64) -> f64 {
  let total = mtbf + mttr;
  if total == 0.0 {
    return 100.0;
  }
  mtbf / total * 100.0
}

/// Total cost per work-order type. Types with no orders are absent.
pub fn get_maintenance_cost_by_type(
  work_orders: &[WorkOrder],
) -> BTreeMap<WorkOrderType, f64> {
  let mut costs = BTreeMap::new();
  for wo in work_orders {
    *costs.entry(wo.kind).or_insert(0.0) += wo.cost;
  }
  costs
}

// ─── Reports ─────────────────────────────────────────────────────────────────

/// MTBF, MTTR and availability for one piece of equipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReliabilityReport {
  pub equipment_id: String,
  pub mtbf_hours:   f64,
  pub mttr_hours:   f64,
  /// Percentage in `[0, 100]`.
  pub availability: f64,
}

pub fn reliability_report(
  work_orders: &[WorkOrder],
  equipment_id: &str,
) -> ReliabilityReport {
  let mtbf_hours = calculate_mtbf(work_orders, equipment_id);
  let mttr_hours = calculate_mttr(work_orders, equipment_id);
  ReliabilityReport {
    equipment_id: equipment_id.to_owned(),
    mtbf_hours,
    mttr_hours,
    availability: calculate_availability(mtbf_hours, mttr_hours),
  }
}

/// One report per equipment entry, in input order.
pub fn fleet_reliability(
  equipment: &[Equipment],
  work_orders: &[WorkOrder],
) -> Vec<ReliabilityReport> {
  equipment
    .iter()
    .map(|eq| reliability_report(work_orders, &eq.id))
    .collect()
}
