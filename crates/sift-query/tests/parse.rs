use sift_query::{
    FilterClause, FilterOperator, FilterValue, Operator, ParseError, QueryOptions, SortClause,
    SortDirection, parse_filters, parse_options, parse_sorts,
};

#[test]
fn parse_full_options_document() {
    let options = parse_options(
        r#"{
            "skip": 20,
            "take": 10,
            "filter": [
                { "field": "city", "operator": "eq", "value": "Austin" },
                { "field": "total", "operator": "gte", "value": 250 },
                { "field": "number", "operator": "startswith", "value": "SO-" }
            ],
            "sort": [
                { "field": "placed", "dir": "desc" },
                { "field": "id", "dir": "asc" }
            ]
        }"#,
    )
    .unwrap();

    assert_eq!(options.skip, 20);
    assert_eq!(options.take, 10);
    assert_eq!(
        options.filter,
        vec![
            FilterClause::new("city", Operator::Eq, "Austin"),
            FilterClause::new("total", Operator::Gte, 250),
            FilterClause::new("number", Operator::StartsWith, "SO-"),
        ]
    );
    assert_eq!(
        options.sort,
        vec![SortClause::desc("placed"), SortClause::asc("id")]
    );
}

#[test]
fn parse_missing_sections_default() {
    let options = parse_options(r#"{ "take": 5 }"#).unwrap();
    assert_eq!(options.skip, 0);
    assert_eq!(options.take, 5);
    assert!(options.filter.is_empty());
    assert!(options.sort.is_empty());
}

#[test]
fn parse_unknown_operator_is_kept_per_clause() {
    let filters = parse_filters(
        r#"[
            { "field": "name", "operator": "like", "value": "A%" },
            { "field": "name", "operator": "contains", "value": "A" }
        ]"#,
    )
    .unwrap();
    assert_eq!(filters[0].operator, FilterOperator::Unknown("like".into()));
    assert_eq!(filters[1].operator, FilterOperator::Known(Operator::Contains));
}

#[test]
fn parse_missing_value_is_null() {
    let filters = parse_filters(r#"[{ "field": "discount", "operator": "eq" }]"#).unwrap();
    assert_eq!(filters[0].value, FilterValue::Null);
}

#[test]
fn parse_sort_direction_defaults_to_asc() {
    let sorts = parse_sorts(r#"[{ "field": "name" }, { "field": "age", "dir": "desc" }]"#).unwrap();
    assert_eq!(sorts[0].dir, SortDirection::Asc);
    assert_eq!(sorts[1].dir, SortDirection::Desc);
}

#[test]
fn parse_ignores_type_discriminators() {
    let options = parse_options(
        r#"{ "$type": "Reports.ReportOptions, Reports", "take": 3, "filter": [] }"#,
    )
    .unwrap();
    assert_eq!(options.take, 3);
}

#[test]
fn parse_rejects_null_document() {
    assert!(matches!(parse_options("null"), Err(ParseError::Json(_))));
}

#[test]
fn parse_rejects_empty_payload() {
    assert!(matches!(parse_options("   "), Err(ParseError::Empty)));
}

#[test]
fn parse_sort_direction_ignores_case() {
    let sorts = parse_sorts(
        r#"[{ "field": "a", "dir": "DESC" }, { "field": "b", "dir": "Asc" }, { "field": "c", "dir": 1 }]"#,
    )
    .unwrap();
    let dirs: Vec<_> = sorts.iter().map(|s| s.dir).collect();
    assert_eq!(dirs, [SortDirection::Desc, SortDirection::Asc, SortDirection::Desc]);
}

#[test]
fn parse_operator_ignores_case() {
    let filters = parse_filters(r#"[{ "field": "name", "operator": "EndsWith", "value": "x" }]"#)
        .unwrap();
    assert_eq!(filters[0].operator, FilterOperator::Known(Operator::EndsWith));
}

#[test]
fn parse_rejects_unknown_sort_direction() {
    assert!(parse_sorts(r#"[{ "field": "name", "dir": "sideways" }]"#).is_err());
}

#[test]
fn from_str_matches_parse_options() {
    let payload = r#"{ "skip": 1, "take": 2 }"#;
    let a: QueryOptions = payload.parse().unwrap();
    let b = parse_options(payload).unwrap();
    assert_eq!(a, b);
}

#[test]
fn options_serialize_back_to_wire_names() {
    let options = QueryOptions::new()
        .take(1)
        .filter(FilterClause::new("name", Operator::EndsWith, "x"))
        .sort(SortClause::desc("name"));
    let json = serde_json::to_value(&options).unwrap();
    assert_eq!(json["filter"][0]["operator"], "endswith");
    assert_eq!(json["sort"][0]["dir"], "desc");
}
