//! Integration tests for the payroll engine.
//!
//! This test suite covers:
//! - Breakdowns for each shipped salary structure
//! - Loss-of-pay proration
//! - Payroll runs with skipped employees
//! - Component catalog listing
//! - Error cases (malformed requests, missing structures, cyclic catalogs)

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::calculation::{
    CalculatedAmounts, calculate_employee_breakdown, evaluate_formula, validate_catalog,
};
use payroll_engine::config::{ConfigLoader, PayrollConfig, PayrollMetadata};
use payroll_engine::error::EngineError;
use payroll_engine::models::{
    Component, ComponentRef, ComponentType, Employee, FormulaOperator, FormulaTerm,
    SalaryStructure,
};

// =============================================================================
// Test Helpers
// =============================================================================

fn load_config() -> ConfigLoader {
    ConfigLoader::load("./config/standard").expect("Failed to load config")
}

fn create_router_for_test() -> Router {
    create_router(AppState::new(load_config()))
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Reads a decimal serialized as a JSON string.
fn amount(value: &Value) -> Decimal {
    decimal(value.as_str().expect("amount should be a string"))
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

async fn post_json(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(
        router,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

fn employee_json(id: &str, ctc: &str, lop_count: u32, structure: Option<&str>) -> Value {
    json!({
        "id": id,
        "name": format!("Employee {}", id),
        "ctc": ctc,
        "lop_count": lop_count,
        "salary_structure_id": structure,
    })
}

fn line_items(items: &Value) -> Vec<(String, Decimal)> {
    items
        .as_array()
        .unwrap()
        .iter()
        .map(|item| (item["name"].as_str().unwrap().to_string(), amount(&item["amount"])))
        .collect()
}

fn item(name: &str, value: &str) -> (String, Decimal) {
    (name.to_string(), decimal(value))
}

fn employee(ctc: &str, lop_count: u32) -> Employee {
    Employee {
        id: "emp_001".to_string(),
        name: "Asha Rao".to_string(),
        ctc: decimal(ctc),
        lop_count,
        salary_structure_id: Some("struct_standard".to_string()),
    }
}

// =============================================================================
// Standard structure
// =============================================================================

#[tokio::test]
async fn test_standard_structure_full_month() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/breakdown",
        json!({ "employee": employee_json("emp_001", "1200000", 0, Some("struct_standard")) }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["structure_name"], "Standard");
    assert_eq!(
        line_items(&body["earnings"]),
        vec![
            item("Basic Salary", "40000"),
            item("House Rent Allowance", "20000"),
            item("Conveyance Allowance", "1600"),
            item("Special Allowance", "38400"),
        ]
    );
    assert_eq!(
        line_items(&body["deductions"]),
        vec![item("Provident Fund", "4800"), item("Professional Tax", "200")]
    );
    assert_eq!(amount(&body["total_earnings"]), decimal("100000"));
    assert_eq!(amount(&body["gross_pay"]), decimal("100000"));
    assert_eq!(amount(&body["total_deductions"]), decimal("5000"));
    assert_eq!(amount(&body["net_pay"]), decimal("95000"));
    assert_eq!(body["lop_days"], 0);
    assert_eq!(body["payable_days"], 30);
}

#[tokio::test]
async fn test_standard_structure_with_three_lop_days() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/breakdown",
        json!({ "employee": employee_json("emp_001", "1200000", 3, Some("struct_standard")) }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        line_items(&body["earnings"]),
        vec![
            item("Basic Salary", "36000"),
            item("House Rent Allowance", "18000"),
            item("Conveyance Allowance", "1440"),
            item("Special Allowance", "34560"),
        ]
    );
    // PF stays on the full basic
    assert_eq!(
        line_items(&body["deductions"]),
        vec![item("Provident Fund", "4800"), item("Professional Tax", "200")]
    );
    assert_eq!(amount(&body["net_pay"]), decimal("85000"));
    assert_eq!(body["lop_days"], 3);
    assert_eq!(body["payable_days"], 27);
}

// =============================================================================
// Other structures
// =============================================================================

#[tokio::test]
async fn test_trainee_structure_rounds_prorated_amounts() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/breakdown",
        json!({ "employee": employee_json("emp_002", "600000", 2, Some("struct_trainee")) }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // 20000 * 28/30 and 10000 * 28/30
    assert_eq!(
        line_items(&body["earnings"]),
        vec![
            item("Basic Salary", "18666.67"),
            item("House Rent Allowance", "9333.33"),
        ]
    );
    assert_eq!(amount(&body["total_earnings"]), decimal("28000.00"));
    assert_eq!(amount(&body["net_pay"]), decimal("27800.00"));
}

#[tokio::test]
async fn test_executive_structure_lists_items_in_catalog_order() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/breakdown",
        json!({ "employee": employee_json("emp_003", "1200000", 0, Some("struct_executive")) }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // Conveyance is outside the structure but still feeds special allowance
    assert_eq!(
        line_items(&body["earnings"]),
        vec![
            item("Basic Salary", "40000"),
            item("House Rent Allowance", "20000"),
            item("Special Allowance", "38400"),
            item("Medical Allowance", "1250"),
        ]
    );
    assert_eq!(
        line_items(&body["deductions"]),
        vec![
            item("Provident Fund", "4800"),
            item("Professional Tax", "200"),
            item("Employee State Insurance", "450"),
        ]
    );
    assert_eq!(amount(&body["net_pay"]), decimal("94200"));
}

#[tokio::test]
async fn test_executive_structure_does_not_prorate_unflagged_earnings() {
    let (_, body) = post_json(
        create_router_for_test(),
        "/breakdown",
        json!({ "employee": employee_json("emp_003", "1200000", 3, Some("struct_executive")) }),
    )
    .await;

    let earnings = line_items(&body["earnings"]);
    assert_eq!(earnings[3], item("Medical Allowance", "1250"));
    assert_eq!(amount(&body["total_earnings"]), decimal("89810"));
    assert_eq!(amount(&body["net_pay"]), decimal("84360"));
}

// =============================================================================
// Payroll runs
// =============================================================================

#[tokio::test]
async fn test_payroll_run_totals_net_pay() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/payroll-run",
        json!({
            "employees": [
                employee_json("emp_001", "1200000", 0, Some("struct_standard")),
                employee_json("emp_002", "600000", 2, Some("struct_trainee")),
                employee_json("emp_003", "900000", 0, None),
            ],
            "working_days": 31
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["working_days"], 31);
    let breakdowns = body["breakdowns"].as_array().unwrap();
    assert_eq!(breakdowns.len(), 2);
    assert_eq!(breakdowns[0]["employee_id"], "emp_001");
    assert_eq!(breakdowns[1]["employee_id"], "emp_002");
    assert_eq!(breakdowns[1]["working_days"], 31);
    assert_eq!(amount(&body["total_payroll"]), decimal("122800.00"));
    assert!(body["id"].as_str().is_some());
}

#[tokio::test]
async fn test_empty_payroll_run_is_refused() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/payroll-run",
        json!({ "employees": [] }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "NO_ELIGIBLE_EMPLOYEES");
}

#[tokio::test]
async fn test_payroll_run_without_assigned_structures_is_refused() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/payroll-run",
        json!({
            "employees": [
                employee_json("emp_001", "1200000", 0, None),
                employee_json("emp_002", "600000", 0, Some("")),
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "NO_ELIGIBLE_EMPLOYEES");
    assert_eq!(body["message"], "No employees with salary structures assigned");
}

#[tokio::test]
async fn test_payroll_run_with_only_unknown_structures_is_empty() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/payroll-run",
        json!({ "employees": [employee_json("emp_001", "1200000", 0, Some("struct_missing"))] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["breakdowns"].as_array().unwrap().is_empty());
    assert_eq!(amount(&body["total_payroll"]), Decimal::ZERO);
}

// =============================================================================
// Catalog listing
// =============================================================================

#[tokio::test]
async fn test_components_endpoint_describes_catalog() {
    let (status, body) = send(
        create_router_for_test(),
        Request::builder()
            .method("GET")
            .uri("/components")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["currency"], "INR");
    let components = body["components"].as_array().unwrap();
    let descriptions: Vec<(&str, &str)> = components
        .iter()
        .map(|c| (c["id"].as_str().unwrap(), c["description"].as_str().unwrap()))
        .collect();
    assert_eq!(descriptions[1], ("hra", "50% of Basic Salary"));
    assert_eq!(
        descriptions[3],
        (
            "special_allowance",
            "CTC (Monthly) - Basic Salary - House Rent Allowance - Conveyance Allowance"
        )
    );
    assert_eq!(
        descriptions[7],
        ("esi", "0.75% of Basic Salary + 0.75% of House Rent Allowance")
    );
    assert_eq!(components[5]["component_type"], "deduction");
}

// =============================================================================
// Error cases
// =============================================================================

#[tokio::test]
async fn test_invalid_json_syntax_returns_400() {
    let router = create_router_for_test();
    let (status, body) = send(
        router,
        Request::builder()
            .method("POST")
            .uri("/payroll-run")
            .header("Content-Type", "application/json")
            .body(Body::from("{\"employees\": ["))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_wrong_field_type_returns_malformed_json() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/breakdown",
        json!({ "employee": employee_json("emp_001", "1200000", 0, Some("struct_standard")), "working_days": "thirty" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_unknown_structure_returns_400() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/breakdown",
        json!({ "employee": employee_json("emp_001", "1200000", 0, Some("struct_missing")) }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "STRUCTURE_NOT_FOUND");
    assert!(body["message"].as_str().unwrap().contains("struct_missing"));
}

#[tokio::test]
async fn test_negative_ctc_returns_validation_error() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/breakdown",
        json!({ "employee": employee_json("emp_001", "-1200000", 0, Some("struct_standard")) }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["message"].as_str().unwrap().contains("negative ctc"));
}

#[tokio::test]
async fn test_blank_employee_name_returns_validation_error() {
    let mut employee = employee_json("emp_001", "1200000", 0, Some("struct_standard"));
    employee["name"] = json!("   ");

    let (status, body) = post_json(
        create_router_for_test(),
        "/payroll-run",
        json!({ "employees": [employee] }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_overflowing_breakdown_returns_500() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/breakdown",
        json!({
            "employee": employee_json(
                "emp_001",
                "10000000000000000000000000",
                4_000_000_000,
                Some("struct_standard"),
            )
        }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "CALCULATION_ERROR");
    assert!(body["details"].as_str().unwrap().contains("overflows"));
}

fn cyclic_config() -> PayrollConfig {
    let metadata = PayrollMetadata {
        name: "Cyclic".to_string(),
        version: "test".to_string(),
        currency: "INR".to_string(),
        default_working_days: 30,
    };
    let components = vec![
        Component::percentage("a", "A", ComponentType::Earning, decimal("10"), "b"),
        Component::percentage("b", "B", ComponentType::Earning, decimal("10"), "a"),
    ];
    let structures = vec![SalaryStructure {
        id: "struct_cyclic".to_string(),
        name: "Cyclic".to_string(),
        component_ids: vec!["a".to_string(), "b".to_string()],
    }];
    PayrollConfig::new(metadata, components, structures)
}

#[tokio::test]
async fn test_cyclic_catalog_returns_500() {
    let router = create_router(AppState::new(ConfigLoader::from_config(cyclic_config())));

    let (status, body) = post_json(
        router,
        "/breakdown",
        json!({ "employee": employee_json("emp_001", "1200000", 0, Some("struct_cyclic")) }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "CIRCULAR_REFERENCE");
    assert!(body["details"].as_str().unwrap().contains("a → b → a"));
}

#[test]
fn test_cyclic_catalog_fails_strict_validation() {
    assert!(matches!(
        validate_catalog(&cyclic_config()),
        Err(EngineError::CircularReference { .. })
    ));
}

// =============================================================================
// Library usage
// =============================================================================

#[test]
fn test_library_breakdown_matches_api() {
    let config = load_config();
    let structure = config.get_structure("struct_standard").unwrap();

    let breakdown =
        calculate_employee_breakdown(&employee("1200000", 3), structure, config.config(), None)
            .unwrap();

    assert_eq!(breakdown.net_pay, decimal("85000"));
    assert_eq!(breakdown.working_days, 30);
}

#[test]
fn test_ad_hoc_formula_against_shipped_catalog() {
    let config = load_config();
    let mut cache = CalculatedAmounts::new();

    // basic * conveyance / conveyance - hra, left to right within each tier
    let terms = vec![
        FormulaTerm::component("basic"),
        FormulaOperator::Multiply.into(),
        FormulaTerm::component("conveyance"),
        FormulaOperator::Divide.into(),
        FormulaTerm::component("conveyance"),
        FormulaOperator::Subtract.into(),
        FormulaTerm::component("hra"),
    ];

    let value = evaluate_formula(&terms, decimal("1200000"), config.config(), &mut cache).unwrap();

    assert_eq!(value, decimal("20000"));
    assert_eq!(cache.get("basic"), Some(decimal("40000")));
    assert_eq!(cache.get("conveyance"), Some(decimal("1600")));
}

#[test]
fn test_ctc_reference_in_formula() {
    let config = load_config();
    let mut cache = CalculatedAmounts::new();
    let terms = vec![
        FormulaTerm::component(ComponentRef::Ctc),
        FormulaOperator::Subtract.into(),
        FormulaTerm::percentage(decimal("12"), "basic"),
    ];

    let value = evaluate_formula(&terms, decimal("1200000"), config.config(), &mut cache).unwrap();

    assert_eq!(value, decimal("95200"));
}
