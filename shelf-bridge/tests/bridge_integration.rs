use chrono::NaiveDate;
use serde_json::Value;

use shelf_bridge::{Bridge, BridgeRequest, DashboardOperation, OperationResult};
use shelf_pipeline::{
    BatchQuery, DashboardConfig, Dataset, LookupOutcome, Selection, StockOnHandRule,
};

const CATALOG: &str = "\
Product Name,Category,Quantity,MRP,Retailer Name,Current Stock,Batch Status,Batch Number,Manufacture Date,Expiry Date,Arrival Date at Retailer,Shelf Life (Months),Manufacturer,Organic Certifications,Manufacturing Address
Tulsi Green Tea,Tea,25,180.00,FreshMart,12,In Stock,OI-TEA-001,05-01-2024,05-01-2026,20-01-2024,24,Organic India,USDA Organic,
Tulsi Ginger,Tea,30,165.00,Wellness Hub,2,Low Stock,OI-TEA-002,10-02-2024,15-07-2025,01-03-2024,18,Organic India,USDA Organic,
Ashwagandha,Supplements,40,320.00,Wellness Hub,0,Out of Stock,OI-SUP-001,15-03-2023,22-05-2025,01-04-2023,24,Organic India,India Organic,\"Plot 7, Haridwar\"
Turmeric Powder,Spices,60,95.00,FreshMart,60,In Stock,OI-SPC-001,01-04-2024,01-04-2026,15-04-2024,24,Organic India,USDA Organic,
";

fn dataset() -> Dataset {
    Dataset::load(
        CATALOG.as_bytes(),
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        &DashboardConfig::default(),
        &StockOnHandRule,
    )
    .unwrap()
}

fn request(operation: DashboardOperation) -> BridgeRequest {
    BridgeRequest {
        operation,
        request_id: "it-001".into(),
        context: None,
    }
}

#[test]
fn summary_reports_full_dataset_metrics() {
    let dataset = dataset();
    let response = Bridge::new()
        .execute(&dataset, &request(DashboardOperation::Summary))
        .unwrap();
    assert_eq!(response.request_id, "it-001");
    match response.result {
        Some(OperationResult::Summary { summary, expiry }) => {
            assert_eq!(summary.total_products, 4);
            assert_eq!(summary.categories, 3);
            assert_eq!(summary.retailers, 2);
            assert!((summary.avg_shelf_life_months - 22.5).abs() < 1e-9);
            assert_eq!(expiry.expired, 1);
            assert_eq!(expiry.near_expiry, 1);
            assert_eq!(expiry.good, 2);
        }
        other => panic!("expected Summary, got {:?}", other),
    }
}

#[test]
fn filter_returns_matching_batches_only() {
    let dataset = dataset();
    let op = DashboardOperation::Filter {
        query: BatchQuery {
            category: Selection::from("Tea"),
            retailer: Selection::from("All"),
            ..BatchQuery::default()
        },
    };
    let response = Bridge::new().execute(&dataset, &request(op)).unwrap();
    match response.result {
        Some(OperationResult::Filtered {
            matched,
            total,
            batches,
        }) => {
            assert_eq!(matched, 2);
            assert_eq!(total, 4);
            assert!(batches.iter().all(|b| b.category == "Tea"));
        }
        other => panic!("expected Filtered, got {:?}", other),
    }
}

#[test]
fn table_respects_limit() {
    let dataset = dataset();
    let op = DashboardOperation::Table {
        query: BatchQuery::default(),
        limit: Some(3),
    };
    let response = Bridge::new().execute(&dataset, &request(op)).unwrap();
    match response.result {
        Some(OperationResult::Table {
            matched,
            truncated,
            rows,
        }) => {
            assert_eq!(matched, 4);
            assert!(truncated);
            assert_eq!(rows.len(), 3);
            assert_eq!(rows[0].product_name, "Tulsi Green Tea");
        }
        other => panic!("expected Table, got {:?}", other),
    }
}

#[test]
fn verify_distinguishes_all_three_outcomes() {
    let dataset = dataset();
    let bridge = Bridge::new();
    let verify = |batch: &str| {
        match bridge
            .execute(
                &dataset,
                &request(DashboardOperation::Verify {
                    batch_number: batch.into(),
                }),
            )
            .unwrap()
            .result
        {
            Some(OperationResult::Verification { outcome }) => outcome,
            other => panic!("expected Verification, got {:?}", other),
        }
    };

    assert!(verify("OI-TEA-001").is_verified());
    match verify("OI-SUP-001") {
        LookupOutcome::VerificationFailed(failed) => {
            assert_eq!(failed.manufacturing_address, "Plot 7, Haridwar");
        }
        other => panic!("expected VerificationFailed, got {:?}", other),
    }
    assert!(matches!(verify("NOPE"), LookupOutcome::NotFound { .. }));
}

#[test]
fn handle_line_round_trip() {
    let dataset = dataset();
    let bridge = Bridge::new();
    let line = r#"{"operation": {"op": "Charts", "params": {"query": {"search_text": "tulsi"}}}, "request_id": "c-1"}"#;
    let out: Value = serde_json::from_str(&bridge.handle_line(&dataset, line).unwrap()).unwrap();

    assert_eq!(out["request_id"], "c-1");
    assert_eq!(out["as_of"], "2025-06-01");
    assert!(out.get("error").is_none());
    assert_eq!(out["result"]["kind"], "charts");
    assert_eq!(out["result"]["matched"], 2);
    assert_eq!(out["result"]["category_distribution"][0]["category"], "Tea");
    assert_eq!(out["result"]["category_distribution"][0]["count"], 2);
}

#[test]
fn handle_line_turns_failures_into_error_responses() {
    let dataset = dataset();
    let bridge = Bridge::new();

    let out: Value = serde_json::from_str(
        &bridge
            .handle_line(
                &dataset,
                r#"{"operation": {"op": "Verify", "params": {"batch_number": ""}}, "request_id": "v-2"}"#,
            )
            .unwrap(),
    )
    .unwrap();
    assert_eq!(out["request_id"], "v-2");
    assert!(out.get("result").is_none());
    assert!(out["error"].as_str().unwrap().contains("Please enter a Batch ID"));

    let out: Value =
        serde_json::from_str(&bridge.handle_line(&dataset, "{{{").unwrap()).unwrap();
    assert_eq!(out["request_id"], "");
    assert!(out["error"].as_str().unwrap().starts_with("Unknown operation"));
}

#[test]
fn verification_outcome_serializes_with_tag() {
    let dataset = dataset();
    let line = r#"{"operation": {"op": "Verify", "params": {"batch_number": "OI-TEA-001"}}, "request_id": "v-1"}"#;
    let out: Value =
        serde_json::from_str(&Bridge::new().handle_line(&dataset, line).unwrap()).unwrap();
    let outcome = &out["result"]["outcome"];
    assert_eq!(outcome["outcome"], "verified");
    assert_eq!(outcome["batch_number"], "OI-TEA-001");
    assert_eq!(outcome["manufacturing_address"], "Organic India Facility, Lucknow");
    assert_eq!(outcome["manufacture_date"], "2024-01-05");
    assert!(outcome["manufacture_time"].is_null());
}
