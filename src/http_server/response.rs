//! Response shaping
//!
//! Success bodies are the row sequence serialized as a bare JSON array —
//! unconditionally, including the empty sequence. The monthly endpoint's
//! wide per-cluster pivot happens here, at the formatting boundary; the
//! warehouse side of the gateway only ever sees the narrow share relation.

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use crate::queries::MONTHLY_ROW_CAP;
use crate::warehouse::{Row, WarehouseError, WarehouseResult};

/// Row sequence serialized as the response body with a success status.
#[derive(Debug)]
pub struct RowsBody(pub Vec<Row>);

impl IntoResponse for RowsBody {
    fn into_response(self) -> Response {
        Json(self.0).into_response()
    }
}

/// Column name for a cluster's share in the wide monthly shape.
fn share_column(centroid_id: i64) -> String {
    format!("CID_{centroid_id}")
}

/// Pivot narrow `{year, month, CENTROID_ID, share}` rows into one wide row
/// per month with a share column for every known cluster.
///
/// Input order is preserved (the query orders by year, then month). Months
/// missing a cluster's share get `0.0`; an id observed in the data but
/// absent from the known set still gets its column. Output is capped at
/// `MONTHLY_ROW_CAP` rows.
pub fn pivot_monthly(rows: Vec<Row>, known_clusters: &[i64]) -> WarehouseResult<Vec<Row>> {
    let mut wide: Vec<Row> = Vec::new();
    let mut current: Option<(i64, i64)> = None;

    for row in rows {
        let year = int_field(&row, "year")?;
        let month = int_field(&row, "month")?;
        let centroid_id = int_field(&row, "CENTROID_ID")?;
        let share = float_field(&row, "share")?;

        if current != Some((year, month)) {
            if wide.len() >= MONTHLY_ROW_CAP as usize {
                break;
            }
            let mut fresh = Row::new();
            fresh.insert("year".to_string(), Value::from(year));
            fresh.insert("month".to_string(), Value::from(month));
            for id in known_clusters {
                fresh.insert(share_column(*id), Value::from(0.0));
            }
            wide.push(fresh);
            current = Some((year, month));
        }
        if let Some(last) = wide.last_mut() {
            last.insert(share_column(centroid_id), Value::from(share));
        }
    }

    Ok(wide)
}

fn int_field(row: &Row, name: &str) -> WarehouseResult<i64> {
    row.get(name).and_then(Value::as_i64).ok_or_else(|| {
        WarehouseError::Decode(format!("monthly share row missing integer `{name}`"))
    })
}

fn float_field(row: &Row, name: &str) -> WarehouseResult<f64> {
    row.get(name).and_then(Value::as_f64).ok_or_else(|| {
        WarehouseError::Decode(format!("monthly share row missing number `{name}`"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn narrow(year: i64, month: i64, centroid_id: i64, share: f64) -> Row {
        let mut row = Row::new();
        row.insert("year".into(), json!(year));
        row.insert("month".into(), json!(month));
        row.insert("CENTROID_ID".into(), json!(centroid_id));
        row.insert("share".into(), json!(share));
        row
    }

    #[test]
    fn test_pivot_groups_by_month_and_zero_fills() {
        let rows = vec![
            narrow(2022, 1, 1, 0.6),
            narrow(2022, 1, 2, 0.4),
            narrow(2022, 2, 1, 1.0),
        ];

        let wide = pivot_monthly(rows, &[1, 2, 3]).unwrap();
        assert_eq!(wide.len(), 2);

        assert_eq!(wide[0]["year"], json!(2022));
        assert_eq!(wide[0]["month"], json!(1));
        assert_eq!(wide[0]["CID_1"], json!(0.6));
        assert_eq!(wide[0]["CID_2"], json!(0.4));
        assert_eq!(wide[0]["CID_3"], json!(0.0));

        assert_eq!(wide[1]["month"], json!(2));
        assert_eq!(wide[1]["CID_1"], json!(1.0));
        assert_eq!(wide[1]["CID_2"], json!(0.0));
    }

    #[test]
    fn test_pivot_preserves_chronological_input_order() {
        let rows = vec![
            narrow(2021, 11, 1, 0.5),
            narrow(2021, 12, 1, 0.5),
            narrow(2022, 1, 1, 0.5),
        ];

        let wide = pivot_monthly(rows, &[1]).unwrap();
        let months: Vec<(i64, i64)> = wide
            .iter()
            .map(|r| (r["year"].as_i64().unwrap(), r["month"].as_i64().unwrap()))
            .collect();
        assert_eq!(months, vec![(2021, 11), (2021, 12), (2022, 1)]);
    }

    #[test]
    fn test_pivot_keeps_columns_for_unknown_ids() {
        let rows = vec![narrow(2022, 1, 99, 0.2)];

        let wide = pivot_monthly(rows, &[1]).unwrap();
        assert_eq!(wide[0]["CID_1"], json!(0.0));
        assert_eq!(wide[0]["CID_99"], json!(0.2));
    }

    #[test]
    fn test_pivot_caps_wide_rows() {
        let mut rows = Vec::new();
        for i in 0..(MONTHLY_ROW_CAP + 5) {
            rows.push(narrow(2000 + i / 12, 1 + i % 12, 1, 0.5));
        }

        let wide = pivot_monthly(rows, &[1]).unwrap();
        assert_eq!(wide.len(), MONTHLY_ROW_CAP as usize);
    }

    #[test]
    fn test_pivot_rejects_malformed_rows() {
        let mut row = Row::new();
        row.insert("year".into(), json!(2022));
        // month missing

        assert!(matches!(
            pivot_monthly(vec![row], &[1]),
            Err(WarehouseError::Decode(_))
        ));
    }

    #[test]
    fn test_empty_input_pivots_to_empty_output() {
        assert!(pivot_monthly(Vec::new(), &[1, 2]).unwrap().is_empty());
    }

    #[test]
    fn test_rows_body_serializes_bare_array() {
        let mut row = Row::new();
        row.insert("max_year".into(), json!(2025));
        row.insert("min_year".into(), json!(2005));

        let encoded = serde_json::to_value(vec![row]).unwrap();
        assert_eq!(encoded, json!([{"max_year": 2025, "min_year": 2005}]));
    }
}
