use std::io::Write;

use serde_json::{Value, json};

use super::*;

fn normalized(item: &Item) -> serde_json::Map<String, Value> {
    normalize_item(item).expect("item should normalize")
}

fn write_export(items: &[Item]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let body = json!({ "Items": items });
    file.write_all(body.to_string().as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_normalize_decimal_whole_values_become_integers() {
    assert_eq!(normalize_decimal("75").unwrap().as_i64(), Some(75));
    assert_eq!(normalize_decimal("75.0").unwrap().as_i64(), Some(75));
    assert_eq!(normalize_decimal("7.5e1").unwrap().as_i64(), Some(75));
    assert_eq!(normalize_decimal("-3").unwrap().as_i64(), Some(-3));
    assert_eq!(normalize_decimal(" 12 ").unwrap().as_i64(), Some(12));
}

#[test]
fn test_normalize_decimal_fractional_values_become_floats() {
    let n = normalize_decimal("72.5").unwrap();
    assert!(n.is_f64());
    assert_eq!(n.as_f64(), Some(72.5));

    let n = normalize_decimal("0.1").unwrap();
    assert!(n.as_i64().is_none());
    assert_eq!(n.as_f64(), Some(0.1));
}

#[test]
fn test_normalize_decimal_rejects_garbage() {
    for raw in ["", "abc", "NaN", "inf", "1e400", "7O"] {
        assert!(
            matches!(
                normalize_decimal(raw),
                Err(StoreError::MalformedNumber { .. })
            ),
            "{raw:?} should be rejected"
        );
    }
}

#[test]
fn test_normalize_is_recursive() {
    let item = Item::from([
        (
            "nested".to_string(),
            AttributeValue::Map(
                [(
                    "inner".to_string(),
                    AttributeValue::List(vec![
                        AttributeValue::n("1.0"),
                        AttributeValue::n("2.25"),
                        AttributeValue::NumberSet(vec!["3".into(), "4.5".into()]),
                    ]),
                )]
                .into(),
            ),
        ),
        (
            "tags".to_string(),
            AttributeValue::StringSet(vec!["a".into(), "b".into()]),
        ),
        ("flag".to_string(), AttributeValue::Bool(true)),
        ("nothing".to_string(), AttributeValue::Null(true)),
    ]);

    let map = normalized(&item);

    assert_eq!(map["nested"]["inner"][0], json!(1));
    assert!(map["nested"]["inner"][0].is_i64());
    assert_eq!(map["nested"]["inner"][1], json!(2.25));
    assert_eq!(map["nested"]["inner"][2], json!([3, 4.5]));
    assert_eq!(map["tags"], json!(["a", "b"]));
    assert_eq!(map["flag"], json!(true));
    assert!(map["nothing"].is_null());
}

#[test]
fn test_normalize_fails_on_nested_malformed_number() {
    let item = Item::from([(
        "optimal_temp_range".to_string(),
        AttributeValue::List(vec![AttributeValue::n("70"), AttributeValue::n("eighty")]),
    )]);

    let err = normalize_item(&item).unwrap_err();
    assert!(err.to_string().contains("eighty"));
}

#[test]
fn test_attribute_value_typed_json_shape() {
    let raw = r#"{"disease_id": {"S": "DISEASE-001"}, "optimal_humidity_min": {"N": "75"},
                  "symptoms": {"L": [{"S": "lesions"}]}, "tags": {"SS": ["x"]}}"#;
    let item: Item = serde_json::from_str(raw).unwrap();

    assert_eq!(item["disease_id"], AttributeValue::s("DISEASE-001"));
    assert_eq!(item["optimal_humidity_min"], AttributeValue::n(75));
    assert_eq!(
        item["symptoms"],
        AttributeValue::string_list(["lesions"])
    );
    assert_eq!(item["tags"], AttributeValue::StringSet(vec!["x".into()]));
}

#[test]
fn test_record_from_item_full() {
    let mut item = disease_item("DISEASE-001", "Corn", (70.0, 85.0), 75.0, &["lesions", "ndvi_decline"]);
    item.insert("scientific_name".into(), AttributeValue::s("Cercospora zeae-maydis"));
    item.insert("treatment".into(), AttributeValue::s("Pyraclostrobin"));
    item.insert("cost_per_acre".into(), AttributeValue::n("22.50"));
    item.insert("yield_loss_min".into(), AttributeValue::n(15));
    item.insert("yield_loss_max".into(), AttributeValue::n(30));
    item.insert("spread_rate".into(), AttributeValue::s("moderate"));
    item.insert(
        "growth_stages_vulnerable".into(),
        AttributeValue::string_list(["V8", "R1"]),
    );

    let record = DiseaseRecord::from_item(&normalized(&item));

    assert_eq!(record.disease_id, "DISEASE-001");
    assert_eq!(record.name, "Disease DISEASE-001");
    assert_eq!(record.crop_type, "corn");
    assert_eq!(
        record.optimal_temp_range,
        RecordField::Present(TempRange::new(70.0, 85.0).unwrap())
    );
    assert_eq!(record.optimal_humidity_min, RecordField::Present(75.0));
    assert_eq!(record.symptoms, vec!["lesions", "ndvi_decline"]);
    assert_eq!(record.growth_stages_vulnerable, vec!["V8", "R1"]);
    assert_eq!(record.cost_per_acre, Some(22.5));
    assert_eq!(record.yield_loss_min, Some(15.0));
    assert_eq!(record.yield_loss_max, Some(30.0));
    assert_eq!(record.spread_rate, Some(SpreadRate::Label("moderate".into())));
    assert!(!record.has_malformed_thresholds());
}

#[test]
fn test_record_from_empty_item_uses_placeholders() {
    let record = DiseaseRecord::from_item(&serde_json::Map::new());

    assert_eq!(record.disease_id, DiseaseRecord::UNKNOWN_ID);
    assert_eq!(record.name, DiseaseRecord::UNKNOWN_NAME);
    assert_eq!(record.scientific_name, DiseaseRecord::UNKNOWN_SCIENTIFIC_NAME);
    assert_eq!(record.treatment, DiseaseRecord::NO_TREATMENT);
    assert_eq!(record.crop_type, "");
    assert_eq!(record.optimal_temp_range, RecordField::Missing);
    assert_eq!(record.optimal_humidity_min, RecordField::Missing);
    assert!(record.symptoms.is_empty());
    assert!(record.cost_per_acre.is_none());
    assert!(record.spread_rate.is_none());
}

#[test]
fn test_parse_temp_range_variants() {
    assert!(parse_temp_range(&json!([70, 85])).is_present());
    assert!(parse_temp_range(&json!([70.5, 70.5])).is_present());
    assert!(parse_temp_range(&json!(["60", "80"])).is_present());

    for raw in [
        json!([85, 70]),
        json!([70]),
        json!([60, 70, 80]),
        json!("70-85"),
        json!({"min": 70, "max": 85}),
        json!([70, "warm"]),
        json!([null, 85]),
    ] {
        assert_eq!(
            parse_temp_range(&raw),
            RecordField::Malformed(raw.clone()),
            "{raw} should be malformed"
        );
    }
}

#[test]
fn test_record_malformed_thresholds_are_flagged() {
    let mut item = disease_item("D-1", "wheat", (60.0, 80.0), 70.0, &[]);
    item.insert(
        "optimal_temp_range".into(),
        AttributeValue::List(vec![AttributeValue::n(90), AttributeValue::n(50)]),
    );
    item.insert("optimal_humidity_min".into(), AttributeValue::s("humid"));

    let record = DiseaseRecord::from_item(&normalized(&item));

    assert!(record.optimal_temp_range.is_malformed());
    assert!(record.optimal_humidity_min.is_malformed());
    assert!(record.has_malformed_thresholds());
}

#[test]
fn test_record_lenient_symptoms_and_optionals() {
    let mut item = disease_item("D-2", "soybeans", (60.0, 75.0), 70.0, &[]);
    item.insert(
        "symptoms".into(),
        AttributeValue::List(vec![
            AttributeValue::s("root_rot"),
            AttributeValue::n(3),
            AttributeValue::s("leaf_yellowing"),
        ]),
    );
    item.insert("cost_per_acre".into(), AttributeValue::s("expensive"));
    item.insert("spread_rate".into(), AttributeValue::n("0.75"));

    let record = DiseaseRecord::from_item(&normalized(&item));

    assert_eq!(record.symptoms, vec!["root_rot", "leaf_yellowing"]);
    assert!(record.cost_per_acre.is_none());
    assert_eq!(record.spread_rate, Some(SpreadRate::Rate(0.75)));
}

#[test]
fn test_record_symptoms_not_a_list() {
    let mut item = disease_item("D-3", "corn", (60.0, 75.0), 70.0, &[]);
    item.insert("symptoms".into(), AttributeValue::s("lesions"));

    let record = DiseaseRecord::from_item(&normalized(&item));
    assert!(record.symptoms.is_empty());
}

#[test]
fn test_record_builder_unordered_range_is_malformed() {
    let record = DiseaseRecord::new("D-4", "Backwards", "Corn").with_temp_range(90.0, 60.0);

    assert_eq!(record.crop_type, "corn");
    assert!(record.optimal_temp_range.is_malformed());
}

#[test]
fn test_temp_range_bounds() {
    let range = TempRange::new(70.0, 85.0).unwrap();
    assert!(range.contains(70.0));
    assert!(range.contains(85.0));
    assert!(!range.contains(85.01));

    let near = range.widened(5.0);
    assert_eq!(near.min(), 65.0);
    assert_eq!(near.max(), 90.0);

    assert!(TempRange::new(f64::NAN, 10.0).is_none());
    assert_eq!(serde_json::to_value(range).unwrap(), json!([70.0, 85.0]));
}

#[tokio::test]
async fn test_scan_all_concatenates_pages() {
    let store = MockKnowledgeStore::with_pages(vec![
        vec![
            disease_item("A", "corn", (70.0, 85.0), 75.0, &[]),
            disease_item("B", "corn", (60.0, 80.0), 70.0, &[]),
        ],
        vec![],
        vec![disease_item("C", "wheat", (50.0, 65.0), 70.0, &[])],
    ]);

    let scan = scan_all(&store).await.unwrap();

    assert_eq!(scan.pages, 3);
    assert_eq!(scan.items.len(), 3);
    assert_eq!(scan.items[2]["disease_id"], AttributeValue::s("C"));
    assert_eq!(store.scan_count(), 1);
    assert_eq!(store.page_request_count(), 3);
}

#[tokio::test]
async fn test_scan_all_detects_stalled_pagination() {
    let store = MockKnowledgeStore::with_items(vec![disease_item("A", "corn", (70.0, 85.0), 75.0, &[])]);
    store.set_stall(true);

    let err = scan_all(&store).await.unwrap_err();
    assert!(matches!(err, StoreError::PaginationStalled { pages: 2, .. }));
}

#[tokio::test]
async fn test_scan_all_propagates_failure() {
    let store = MockKnowledgeStore::new();
    store.set_failure(Some("AccessDeniedException"));

    let err = scan_all(&store).await.unwrap_err();
    assert!(matches!(err, StoreError::ScanFailed { .. }));
    assert!(err.to_string().contains("AccessDeniedException"));
}

#[tokio::test]
async fn test_json_file_store_pages_by_primary_key() {
    let items: Vec<Item> = (1..=5)
        .map(|i| disease_item(&format!("DISEASE-00{i}"), "corn", (60.0, 80.0), 70.0, &[]))
        .collect();
    let file = write_export(&items);
    let store = JsonFileStore::new(file.path(), 2);

    let first = store.scan_page(None).await.unwrap();
    assert_eq!(first.items.len(), 2);
    assert_eq!(
        first.last_evaluated_key,
        Some(PageKey::from([(
            "disease_id".to_string(),
            AttributeValue::s("DISEASE-002")
        )]))
    );

    let scan = scan_all(&store).await.unwrap();
    assert_eq!(scan.pages, 3);
    let ids: Vec<_> = scan
        .items
        .iter()
        .map(|item| item["disease_id"].clone())
        .collect();
    assert_eq!(
        ids,
        (1..=5)
            .map(|i| AttributeValue::s(format!("DISEASE-00{i}")))
            .collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_json_file_store_exact_page_multiple() {
    let items: Vec<Item> = (1..=4)
        .map(|i| disease_item(&format!("D{i}"), "corn", (60.0, 80.0), 70.0, &[]))
        .collect();
    let file = write_export(&items);
    let store = JsonFileStore::new(file.path(), 2);

    let scan = scan_all(&store).await.unwrap();
    assert_eq!(scan.pages, 2);
    assert_eq!(scan.items.len(), 4);
}

#[tokio::test]
async fn test_json_file_store_unknown_start_key() {
    let file = write_export(&[disease_item("D1", "corn", (60.0, 80.0), 70.0, &[])]);
    let store = JsonFileStore::new(file.path(), 10);
    let key = PageKey::from([("disease_id".to_string(), AttributeValue::s("NOPE"))]);

    assert!(matches!(
        store.scan_page(Some(&key)).await,
        Err(StoreError::UnknownStartKey { .. })
    ));
}

#[tokio::test]
async fn test_json_file_store_missing_file() {
    let store = JsonFileStore::new("/no/such/export.json", 10);

    assert!(matches!(
        scan_all(&store).await,
        Err(StoreError::Io { .. })
    ));
}

#[tokio::test]
async fn test_json_file_store_invalid_json() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"{\"Items\": [{\"disease_id\": {\"Q\": 1}}]}").unwrap();
    let store = JsonFileStore::new(file.path(), 10).with_table_name("Broken");

    let err = scan_all(&store).await.unwrap_err();
    assert!(matches!(err, StoreError::Parse { .. }));
    assert_eq!(store.table_name(), "Broken");
}

/// Serves two pages whose keys point at each other.
struct CyclingStore;

impl KnowledgeStore for CyclingStore {
    fn table_name(&self) -> &str {
        "Cycling"
    }

    async fn scan_page(&self, start_key: Option<&PageKey>) -> StoreResult<ScanPage> {
        let key = |id: &str| PageKey::from([("disease_id".to_string(), AttributeValue::s(id))]);
        let next = match start_key.and_then(|k| k.get("disease_id")) {
            Some(AttributeValue::String(id)) if id == "A" => key("B"),
            _ => key("A"),
        };
        Ok(ScanPage {
            items: vec![disease_item("X", "corn", (70.0, 85.0), 75.0, &[])],
            last_evaluated_key: Some(next),
        })
    }
}

#[tokio::test]
async fn test_scan_all_detects_multi_page_cycle() {
    let err = scan_all(&CyclingStore).await.unwrap_err();

    assert!(matches!(
        err,
        StoreError::PaginationStalled { pages: 3, .. }
    ));
}

#[tokio::test]
async fn test_json_file_store_rejects_duplicate_primary_keys() {
    let items = vec![
        disease_item("A", "corn", (70.0, 85.0), 75.0, &[]),
        disease_item("B", "corn", (70.0, 85.0), 75.0, &[]),
        disease_item("A", "wheat", (60.0, 80.0), 80.0, &[]),
        disease_item("C", "corn", (70.0, 85.0), 75.0, &[]),
    ];
    let file = write_export(&items);
    let store = JsonFileStore::new(file.path(), 1);

    let scan = tokio::time::timeout(std::time::Duration::from_secs(5), scan_all(&store))
        .await
        .expect("scan should terminate");

    let err = scan.unwrap_err();
    assert!(matches!(
        err,
        StoreError::DuplicatePrimaryKey { index: 2, .. }
    ));
    assert!(err.to_string().contains("\"A\""));
}
