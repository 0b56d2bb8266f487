use serde_json::json;
use tempfile::tempdir;

use athlete_etl::db::{self, SqliteSink};
use athlete_etl::pipeline::ingestion::SourceData;
use athlete_etl::{constants, EtlError, Pipeline};

#[test]
fn test_exported_document_loads_into_sqlite() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("db").join("databank.sqlite");

    let sources = SourceData::from_documents([(
        constants::ATHLETES_FEED,
        json!([
            {"id": "a1", "first_name": "Albert", "last_name": "Gator", "current_team_id": "t1"},
            {"id": "a2", "first_name": "Alberta", "last_name": "Gator"}
        ]),
    )])
    .unwrap();
    let document = Pipeline::new().build_document(&sources).unwrap();

    let inserted = db::with_sink(&db_path, |sink| {
        sink.create_schema()?;
        sink.load_document(&document)
    })
    .unwrap();
    // Two athletes, two metadata rows, one athlete-season link
    assert_eq!(inserted, 5);

    // A second scope sees what the first one committed
    let rows = db::with_sink(&db_path, |sink| {
        sink.run_query("SELECT \"First Name\" FROM \"Athletes\" ORDER BY \"First Name\"")
    })
    .unwrap();
    assert_eq!(rows, vec![vec![json!("Albert")], vec![json!("Alberta")]]);
}

#[test]
fn test_clear_every_table() {
    let dir = tempdir().unwrap();
    let sink = SqliteSink::open(dir.path().join("databank.sqlite")).unwrap();
    sink.create_schema().unwrap();
    sink.load_document(&json!({"Teams": [{"Team ID": "t1"}, {"Team ID": "t2"}]}))
        .unwrap();

    assert_eq!(sink.delete_table_data(&[]).unwrap(), 2);
    assert_eq!(
        sink.run_query("SELECT COUNT(*) FROM \"Teams\"").unwrap(),
        vec![vec![json!(0)]]
    );
    sink.close().unwrap();
}

#[test]
fn test_clear_rejects_unknown_table() {
    let sink = SqliteSink::open_in_memory().unwrap();
    sink.create_schema().unwrap();

    let err = sink.delete_table_data(&["Teams", "Rosters"]).unwrap_err();
    assert!(matches!(err, EtlError::UnknownTable(ref t) if t == "Rosters"));
}

#[test]
fn test_query_errors_surface() {
    let sink = SqliteSink::open_in_memory().unwrap();
    assert!(matches!(
        sink.run_query("SELECT * FROM missing_table"),
        Err(EtlError::Database { .. })
    ));
}
