//! Query Execution Tests
//!
//! End-to-end behavior of validated queries against real records:
//! - Filters (numeric comparisons, wildcards, logic)
//! - GROUP / APPLY aggregates and their rounding
//! - Composite, stable ORDER
//! - The 5000-row result cap
//! - Type mismatches fail the whole query

use campusdb::dataset::{Room, Section};
use campusdb::engine::{QueryEngine, QueryError};
use campusdb::executor::{ExecutionResult, ExecutorErrorCode, RESULT_LIMIT};
use serde_json::{json, Value};

// =============================================================================
// Fixtures
// =============================================================================

fn sections() -> Vec<Section> {
    serde_json::from_value(json!([
        {"uuid": "1", "id": "310", "title": "sw eng", "instructor": "smith, john",
         "dept": "cpsc", "year": 2015, "avg": 95, "pass": 30, "fail": 0, "audit": 0},
        {"uuid": "2", "id": "310", "title": "sw eng", "instructor": "doe, jane",
         "dept": "cpsc", "year": 2016, "avg": 85.5, "pass": 40, "fail": 0, "audit": 1},
        {"uuid": "3", "id": "110", "title": "intro", "instructor": "",
         "dept": "cpsc", "year": 2015, "avg": 70.25, "pass": 100, "fail": 5, "audit": 0},
        {"uuid": "4", "id": "100", "title": "calculus", "instructor": "lee, ann",
         "dept": "math", "year": 2015, "avg": 60, "pass": 50, "fail": 10, "audit": 0},
        {"uuid": "5", "id": "101", "title": "intro psych", "instructor": "",
         "dept": "psyc", "year": 1900, "avg": 88, "pass": 200, "fail": 1, "audit": 2},
        {"uuid": "6", "id": "100", "title": "calculus", "instructor": "lee, ann",
         "dept": "math", "year": 2016, "avg": 60, "pass": 45, "fail": 2, "audit": 0}
    ]))
    .unwrap()
}

fn rooms() -> Vec<Room> {
    serde_json::from_value(json!([
        {"fullname": "Hugh Dempster Pavilion", "shortname": "DMP", "number": "110",
         "name": "DMP_110", "address": "6245 Agronomy Road V6T 1Z4", "lat": 49.26125,
         "lon": -123.24807, "seats": 120, "type": "Tiered Large Group",
         "furniture": "Classroom-Fixed Tablets", "href": "http://example.org/DMP-110"},
        {"fullname": "Hugh Dempster Pavilion", "shortname": "DMP", "number": "201",
         "name": "DMP_201", "address": "6245 Agronomy Road V6T 1Z4", "lat": 49.26125,
         "lon": -123.24807, "seats": 40, "type": "Small Group",
         "furniture": "Classroom-Movable Tables & Chairs", "href": "http://example.org/DMP-201"},
        {"fullname": "Woodward (Instructional Resources Centre-IRC)", "shortname": "WOOD",
         "number": "2", "name": "WOOD_2", "address": "2194 Health Sciences Mall",
         "lat": 49.26478, "lon": -123.24673, "seats": 503, "type": "Tiered Large Group",
         "furniture": "Classroom-Fixed Tablets", "href": "http://example.org/WOOD-2"}
    ]))
    .unwrap()
}

fn many_sections(n: usize) -> Vec<Section> {
    (0..n)
        .map(|i| Section {
            uuid: i.to_string(),
            id: "100".into(),
            title: "bulk".into(),
            instructor: "".into(),
            dept: if i % 2 == 0 { "cpsc".into() } else { "math".into() },
            year: 2015,
            avg: (i % 100) as f64,
            pass: 1,
            fail: 0,
            audit: 0,
        })
        .collect()
}

fn run_sections(query: Value) -> Result<ExecutionResult, QueryError> {
    QueryEngine::new().run(&query, &sections())
}

fn rows(query: Value) -> Value {
    run_sections(query).unwrap().to_json()
}

fn uuids(filter: Value) -> Vec<String> {
    let result = run_sections(json!({
        "WHERE": filter,
        "OPTIONS": {"COLUMNS": ["sections_uuid"], "ORDER": "sections_uuid"}
    }))
    .unwrap();
    result
        .iter()
        .map(|row| row["sections_uuid"].as_str().unwrap().to_string())
        .collect()
}

fn assert_execution_failed(result: Result<ExecutionResult, QueryError>) {
    match result {
        Err(QueryError::Failed(e)) => assert_eq!(e.code(), ExecutorErrorCode::QueryExecutionFailed),
        other => panic!("expected execution failure, got {:?}", other),
    }
}

// =============================================================================
// Filters
// =============================================================================

#[test]
fn test_empty_where_matches_everything() {
    assert_eq!(uuids(json!({})), vec!["1", "2", "3", "4", "5", "6"]);
}

#[test]
fn test_numeric_comparisons_are_strict() {
    assert_eq!(uuids(json!({"GT": {"sections_avg": 85.5}})), vec!["1", "5"]);
    assert_eq!(uuids(json!({"LT": {"sections_avg": 70.25}})), vec!["4", "6"]);
    assert_eq!(uuids(json!({"EQ": {"sections_year": 1900}})), vec!["5"]);
    assert!(uuids(json!({"GT": {"sections_avg": 95}})).is_empty());
}

#[test]
fn test_string_patterns() {
    assert_eq!(uuids(json!({"IS": {"sections_dept": "math"}})), vec!["4", "6"]);
    assert_eq!(uuids(json!({"IS": {"sections_dept": "ma*"}})), vec!["4", "6"]);
    assert_eq!(uuids(json!({"IS": {"sections_dept": "*sc"}})), vec!["1", "2", "3"]);
    assert_eq!(uuids(json!({"IS": {"sections_dept": "*ps*"}})), vec!["1", "2", "3", "5"]);
    assert!(uuids(json!({"IS": {"sections_dept": "MATH"}})).is_empty());
}

#[test]
fn test_wildcard_alone_matches_empty_strings() {
    assert_eq!(uuids(json!({"IS": {"sections_instructor": "*"}})).len(), 6);
    assert_eq!(uuids(json!({"IS": {"sections_instructor": ""}})), vec!["3", "5"]);
}

#[test]
fn test_logic_operators() {
    assert_eq!(
        uuids(json!({"AND": [
            {"IS": {"sections_dept": "cpsc"}},
            {"GT": {"sections_avg": 80}}
        ]})),
        vec!["1", "2"]
    );
    assert_eq!(
        uuids(json!({"OR": [
            {"IS": {"sections_dept": "psyc"}},
            {"EQ": {"sections_avg": 60}}
        ]})),
        vec!["4", "5", "6"]
    );
    assert_eq!(
        uuids(json!({"NOT": {"IS": {"sections_dept": "cpsc"}}})),
        vec!["4", "5", "6"]
    );
    assert_eq!(
        uuids(json!({"NOT": {"NOT": {"EQ": {"sections_year": 2016}}}})),
        vec!["2", "6"]
    );
}

#[test]
fn test_numeric_filter_on_string_field_fails() {
    assert_execution_failed(run_sections(json!({
        "WHERE": {"GT": {"sections_dept": 1}},
        "OPTIONS": {"COLUMNS": ["sections_dept"]}
    })));
}

#[test]
fn test_string_filter_on_numeric_field_fails() {
    assert_execution_failed(run_sections(json!({
        "WHERE": {"IS": {"sections_avg": "9*"}},
        "OPTIONS": {"COLUMNS": ["sections_dept"]}
    })));
}

#[test]
fn test_type_mismatch_in_any_branch_fails() {
    assert_execution_failed(run_sections(json!({
        "WHERE": {"OR": [
            {"IS": {"sections_dept": "*"}},
            {"GT": {"sections_title": 1}}
        ]},
        "OPTIONS": {"COLUMNS": ["sections_dept"]}
    })));
}

// =============================================================================
// Projection and Sort
// =============================================================================

#[test]
fn test_projection_keeps_only_columns() {
    assert_eq!(
        rows(json!({
            "WHERE": {"EQ": {"sections_year": 1900}},
            "OPTIONS": {"COLUMNS": ["sections_dept", "sections_id", "sections_avg"]}
        })),
        json!([{"sections_dept": "psyc", "sections_id": "101", "sections_avg": 88}])
    );
}

#[test]
fn test_composite_sort_up_and_down() {
    let columns = json!(["sections_dept", "sections_avg"]);
    let up = rows(json!({
        "WHERE": {},
        "OPTIONS": {
            "COLUMNS": columns.clone(),
            "ORDER": {"dir": "UP", "keys": ["sections_dept", "sections_avg"]}
        }
    }));
    assert_eq!(
        up,
        json!([
            {"sections_dept": "cpsc", "sections_avg": 70.25},
            {"sections_dept": "cpsc", "sections_avg": 85.5},
            {"sections_dept": "cpsc", "sections_avg": 95},
            {"sections_dept": "math", "sections_avg": 60},
            {"sections_dept": "math", "sections_avg": 60},
            {"sections_dept": "psyc", "sections_avg": 88}
        ])
    );

    let down = rows(json!({
        "WHERE": {},
        "OPTIONS": {
            "COLUMNS": columns,
            "ORDER": {"dir": "DOWN", "keys": ["sections_dept", "sections_avg"]}
        }
    }));
    assert_eq!(
        down,
        json!([
            {"sections_dept": "psyc", "sections_avg": 88},
            {"sections_dept": "math", "sections_avg": 60},
            {"sections_dept": "math", "sections_avg": 60},
            {"sections_dept": "cpsc", "sections_avg": 95},
            {"sections_dept": "cpsc", "sections_avg": 85.5},
            {"sections_dept": "cpsc", "sections_avg": 70.25}
        ])
    );
}

#[test]
fn test_sort_is_stable_for_ties() {
    let order = |dir: &str| {
        let result = run_sections(json!({
            "WHERE": {},
            "OPTIONS": {
                "COLUMNS": ["sections_uuid", "sections_avg"],
                "ORDER": {"dir": dir, "keys": ["sections_avg"]}
            }
        }))
        .unwrap();
        result
            .iter()
            .map(|row| row["sections_uuid"].as_str().unwrap().to_string())
            .collect::<Vec<_>>()
    };

    assert_eq!(order("UP"), vec!["4", "6", "3", "2", "5", "1"]);
    assert_eq!(order("DOWN"), vec!["1", "5", "2", "3", "4", "6"]);
}

#[test]
fn test_unordered_result_keeps_record_order() {
    let result = run_sections(json!({
        "WHERE": {"IS": {"sections_dept": "math"}},
        "OPTIONS": {"COLUMNS": ["sections_uuid"]}
    }))
    .unwrap();
    assert_eq!(result.to_json(), json!([{"sections_uuid": "4"}, {"sections_uuid": "6"}]));
    assert_eq!(result.scanned_count, 6);
    assert_eq!(result.matched_count, 2);
}

// =============================================================================
// Transformations
// =============================================================================

#[test]
fn test_group_with_every_aggregate() {
    let result = rows(json!({
        "WHERE": {},
        "OPTIONS": {
            "COLUMNS": ["sections_dept", "avgAvg", "maxAvg", "minAvg", "totalFail", "courses"]
        },
        "TRANSFORMATIONS": {
            "GROUP": ["sections_dept"],
            "APPLY": [
                {"avgAvg": {"AVG": "sections_avg"}},
                {"maxAvg": {"MAX": "sections_avg"}},
                {"minAvg": {"MIN": "sections_avg"}},
                {"totalFail": {"SUM": "sections_fail"}},
                {"courses": {"COUNT": "sections_id"}}
            ]
        }
    }));

    assert_eq!(
        result,
        json!([
            {"sections_dept": "cpsc", "avgAvg": 83.58, "maxAvg": 95, "minAvg": 70.25,
             "totalFail": 5, "courses": 2},
            {"sections_dept": "math", "avgAvg": 60, "maxAvg": 60, "minAvg": 60,
             "totalFail": 12, "courses": 1},
            {"sections_dept": "psyc", "avgAvg": 88, "maxAvg": 88, "minAvg": 88,
             "totalFail": 1, "courses": 1}
        ])
    );
}

#[test]
fn test_group_by_several_keys_and_order_by_alias() {
    let result = rows(json!({
        "WHERE": {"NOT": {"IS": {"sections_dept": "psyc"}}},
        "OPTIONS": {
            "COLUMNS": ["sections_dept", "sections_year", "sections"],
            "ORDER": {"dir": "DOWN", "keys": ["sections", "sections_dept", "sections_year"]}
        },
        "TRANSFORMATIONS": {
            "GROUP": ["sections_dept", "sections_year"],
            "APPLY": [{"sections": {"COUNT": "sections_uuid"}}]
        }
    }));

    assert_eq!(
        result,
        json!([
            {"sections_dept": "cpsc", "sections_year": 2015, "sections": 2},
            {"sections_dept": "math", "sections_year": 2016, "sections": 1},
            {"sections_dept": "math", "sections_year": 2015, "sections": 1},
            {"sections_dept": "cpsc", "sections_year": 2016, "sections": 1}
        ])
    );
}

#[test]
fn test_group_without_apply() {
    assert_eq!(
        rows(json!({
            "WHERE": {},
            "OPTIONS": {"COLUMNS": ["sections_title"], "ORDER": "sections_title"},
            "TRANSFORMATIONS": {"GROUP": ["sections_title"], "APPLY": []}
        })),
        json!([
            {"sections_title": "calculus"},
            {"sections_title": "intro"},
            {"sections_title": "intro psych"},
            {"sections_title": "sw eng"}
        ])
    );
}

#[test]
fn test_count_accepts_string_fields_only_numeric_aggregates_do_not() {
    let count = rows(json!({
        "WHERE": {},
        "OPTIONS": {"COLUMNS": ["sections_year", "people"], "ORDER": "sections_year"},
        "TRANSFORMATIONS": {
            "GROUP": ["sections_year"],
            "APPLY": [{"people": {"COUNT": "sections_instructor"}}]
        }
    }));
    assert_eq!(
        count,
        json!([
            {"sections_year": 1900, "people": 1},
            {"sections_year": 2015, "people": 3},
            {"sections_year": 2016, "people": 2}
        ])
    );

    assert_execution_failed(run_sections(json!({
        "WHERE": {},
        "OPTIONS": {"COLUMNS": ["sections_year", "total"]},
        "TRANSFORMATIONS": {
            "GROUP": ["sections_year"],
            "APPLY": [{"total": {"SUM": "sections_dept"}}]
        }
    })));
}

#[test]
fn test_rooms_group_by_building() {
    let result = QueryEngine::new()
        .run(
            &json!({
                "WHERE": {"IS": {"rooms_furniture": "*Tabl*"}},
                "OPTIONS": {
                    "COLUMNS": ["rooms_shortname", "maxSeats"],
                    "ORDER": {"dir": "DOWN", "keys": ["maxSeats"]}
                },
                "TRANSFORMATIONS": {
                    "GROUP": ["rooms_shortname"],
                    "APPLY": [{"maxSeats": {"MAX": "rooms_seats"}}]
                }
            }),
            &rooms(),
        )
        .unwrap();

    assert_eq!(
        result.to_json(),
        json!([
            {"rooms_shortname": "WOOD", "maxSeats": 503},
            {"rooms_shortname": "DMP", "maxSeats": 120}
        ])
    );
}

#[test]
fn test_rooms_coordinates_keep_precision() {
    let result = QueryEngine::new()
        .run(
            &json!({
                "WHERE": {"GT": {"rooms_lat": 49.2612}},
                "OPTIONS": {"COLUMNS": ["rooms_name", "rooms_lat", "rooms_lon"], "ORDER": "rooms_name"}
            }),
            &rooms(),
        )
        .unwrap();

    assert_eq!(result.len(), 3);
    assert_eq!(result.rows[0]["rooms_lon"], json!(-123.24807));
}

// =============================================================================
// Result Cap
// =============================================================================

#[test]
fn test_result_over_cap_is_too_large() {
    let records = many_sections(RESULT_LIMIT + 1);
    let err = QueryEngine::new()
        .run(
            &json!({"WHERE": {}, "OPTIONS": {"COLUMNS": ["sections_uuid"]}}),
            &records,
        )
        .unwrap_err();

    assert!(err.is_too_large());
    assert_eq!(err.code(), "QUERY_RESULT_TOO_LARGE");
}

#[test]
fn test_result_at_cap_is_returned() {
    let records = many_sections(RESULT_LIMIT);
    let result = QueryEngine::new()
        .run(
            &json!({"WHERE": {}, "OPTIONS": {"COLUMNS": ["sections_uuid"]}}),
            &records,
        )
        .unwrap();
    assert_eq!(result.len(), RESULT_LIMIT);
}

#[test]
fn test_cap_applies_after_filter_and_grouping() {
    let records = many_sections(RESULT_LIMIT * 2);
    let engine = QueryEngine::new();

    let filtered = engine
        .run(
            &json!({
                "WHERE": {"IS": {"sections_dept": "cpsc"}},
                "OPTIONS": {"COLUMNS": ["sections_uuid"]}
            }),
            &records,
        )
        .unwrap();
    assert_eq!(filtered.len(), RESULT_LIMIT);

    let grouped = engine
        .run(
            &json!({
                "WHERE": {},
                "OPTIONS": {"COLUMNS": ["sections_dept", "n"], "ORDER": "sections_dept"},
                "TRANSFORMATIONS": {
                    "GROUP": ["sections_dept"],
                    "APPLY": [{"n": {"COUNT": "sections_uuid"}}]
                }
            }),
            &records,
        )
        .unwrap();
    assert_eq!(
        grouped.to_json(),
        json!([
            {"sections_dept": "cpsc", "n": RESULT_LIMIT},
            {"sections_dept": "math", "n": RESULT_LIMIT}
        ])
    );
}

#[test]
fn test_lower_configured_limit() {
    let err = QueryEngine::with_result_limit(2)
        .run(
            &json!({"WHERE": {}, "OPTIONS": {"COLUMNS": ["sections_uuid"]}}),
            &sections(),
        )
        .unwrap_err();
    assert!(err.is_too_large());
}

// =============================================================================
// Determinism and Dataset Kind
// =============================================================================

#[test]
fn test_repeated_runs_are_identical() {
    let query = json!({
        "WHERE": {"OR": [{"IS": {"sections_dept": "cpsc"}}, {"GT": {"sections_pass": 45}}]},
        "OPTIONS": {
            "COLUMNS": ["sections_dept", "avgGrade"],
            "ORDER": {"dir": "DOWN", "keys": ["avgGrade"]}
        },
        "TRANSFORMATIONS": {
            "GROUP": ["sections_dept"],
            "APPLY": [{"avgGrade": {"AVG": "sections_avg"}}]
        }
    });

    let first = run_sections(query.clone()).unwrap();
    for _ in 0..20 {
        assert_eq!(run_sections(query.clone()).unwrap(), first);
    }
}

#[test]
fn test_room_fields_rejected_for_sections() {
    let err = run_sections(json!({
        "WHERE": {"GT": {"sections_seats": 100}},
        "OPTIONS": {"COLUMNS": ["sections_dept"]}
    }))
    .unwrap_err();
    assert_eq!(err.code(), "QUERY_DATASET_MISMATCH");
}
