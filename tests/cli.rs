mod common;

use std::fs;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use serde_json::Value as Json;
use vehicle_thefts::{config::DatasetConfig, dataset, data::Value};

use common::{SAMPLE, TestWorkspace, fixture_path};

fn sample() -> String {
    fixture_path(SAMPLE).to_str().unwrap().to_string()
}

fn bin() -> Command {
    Command::cargo_bin("vehicle-thefts").expect("binary exists")
}

#[test]
fn top_models_prints_a_table() {
    bin()
        .args(["top-models", "-i", &sample(), "--prepare", "-y", "2019"])
        .assert()
        .success()
        .stdout(
            contains("model")
                .and(contains("GOL"))
                .and(contains("CORSA"))
                .and(contains("ONIX"))
                .and(contains("208").not()),
        );
}

#[test]
fn top_models_emits_json() {
    let output = bin()
        .args([
            "top-models",
            "-i",
            &sample(),
            "--prepare",
            "-y",
            "2019",
            "--top",
            "1",
            "--format",
            "json",
        ])
        .output()
        .expect("run binary");
    assert!(output.status.success());
    let parsed: Json = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(parsed, serde_json::json!([{ "model": "GOL", "count": 4 }]));
}

#[test]
fn gender_json_has_exactly_three_buckets() {
    let output = bin()
        .args([
            "gender", "-i", &sample(), "--prepare", "-y", "2019", "--format", "json",
        ])
        .output()
        .expect("run binary");
    assert!(output.status.success());
    let parsed: Json = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(
        parsed,
        serde_json::json!({ "female": 2, "male": 5, "other": 2 })
    );
}

#[test]
fn out_of_range_year_exits_with_client_error() {
    bin()
        .args(["busiest-office", "-i", &sample(), "--prepare", "-y", "2025"])
        .assert()
        .code(2)
        .stderr(contains("outside the supported range 2018-2022"));
}

#[test]
fn empty_year_exits_with_not_found() {
    bin()
        .args(["busiest-office", "-i", &sample(), "--prepare", "-y", "2020"])
        .assert()
        .code(3)
        .stderr(contains("No records found for year 2020"));
}

#[test]
fn querying_a_raw_snapshot_without_prepare_reports_missing_column() {
    bin()
        .args(["gender", "-i", &sample(), "-y", "2019"])
        .assert()
        .code(2)
        .stderr(contains("Column 'Anio_tramite' not found"));
}

#[test]
fn least_models_for_unknown_brand_succeeds_empty() {
    let output = bin()
        .args(["least-models", "-i", &sample(), "-b", "RENAULT", "--format", "json"])
        .output()
        .expect("run binary");
    assert!(output.status.success());
    let parsed: Json = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(parsed, serde_json::json!([]));
}

#[test]
fn prepare_writes_a_queryable_snapshot() {
    let workspace = TestWorkspace::new();
    let prepared = workspace.path().join("prepared.csv");
    bin()
        .args([
            "prepare",
            "-i",
            &sample(),
            "-o",
            prepared.to_str().unwrap(),
        ])
        .assert()
        .success();

    let table = dataset::load_table(&prepared, b',', encoding_rs::UTF_8).expect("load prepared");
    let config = DatasetConfig::default();
    let year_idx = table.column_index(&config.year_column).expect("year column");
    let origin_idx = table.column_index(&config.origin_column).expect("origin column");
    assert_eq!(table.rows()[0][year_idx], Some(Value::Integer(2019)));
    assert_eq!(table.rows()[0][origin_idx], Some(Value::String("N".to_string())));
    // "Mercosur" is not an origin label.
    assert_eq!(table.rows()[10][origin_idx], None);

    bin()
        .args(["busiest-office", "-i", prepared.to_str().unwrap(), "-y", "2021"])
        .assert()
        .success()
        .stdout(contains("ROSARIO N 3"));
}

#[test]
fn unparseable_date_exits_with_server_error() {
    let workspace = TestWorkspace::new();
    let input = workspace.write(
        "bad_dates.csv",
        "tramite_tipo,tramite_fecha,automotor_origen,titular_tipo_persona,titular_genero\n\
         DENUNCIA DE ROBO O HURTO,2019-01-15,Nacional,Física,Masculino\n\
         DENUNCIA DE ROBO O HURTO,ayer,Nacional,Física,Masculino\n",
    );
    bin()
        .args(["prepare", "-i", input.to_str().unwrap()])
        .assert()
        .code(1)
        .stderr(contains("row 2").and(contains("'ayer'")));
}

#[test]
fn profile_lists_every_column() {
    bin()
        .args(["profile", "-i", &sample(), "--prepare"])
        .assert()
        .success()
        .stdout(
            contains("non_null_%")
                .and(contains("titular_genero"))
                .and(contains("string, null"))
                .and(contains("Anio_tramite")),
        );
}

#[test]
fn config_file_can_widen_the_year_range() {
    let workspace = TestWorkspace::new();
    let config = workspace.write("dataset.yml", "min_year: 2010\n");
    bin()
        .args([
            "top-models",
            "-i",
            &sample(),
            "--prepare",
            "-y",
            "2015",
            "--config",
            config.to_str().unwrap(),
        ])
        .assert()
        .success();
}

#[test]
fn tab_delimited_input_is_detected_by_extension() {
    let workspace = TestWorkspace::new();
    let contents = fs::read_to_string(fixture_path(SAMPLE)).expect("read sample");
    let input = workspace.write("sample.tsv", &contents.replace(',', "\t"));
    bin()
        .args(["least-models", "-i", input.to_str().unwrap(), "-b", "FIAT"])
        .assert()
        .success()
        .stdout(contains("PALIO"));
}

#[test]
fn prepare_leaves_untouched_columns_verbatim() {
    let workspace = TestWorkspace::new();
    let input = workspace.write(
        "extra_columns.csv",
        "tramite_tipo,tramite_fecha,automotor_origen,titular_tipo_persona,titular_genero,codigo,flag,otra_fecha\n\
         DENUNCIA DE ROBO O HURTO,2019-01-15,Nacional,Física,Masculino,12345678901234567890,Yes,15/01/2019\n\
         DENUNCIA DE ROBO O HURTO,2019-01-16,Importado,Jurídica,Femenino,00208,no,16/01/2019\n",
    );
    bin()
        .args(["prepare", "-i", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(
            contains(",12345678901234567890,Yes,15/01/2019,")
                .and(contains(",00208,no,16/01/2019,"))
                .and(contains("9223372036854775807").not()),
        );
}

#[test]
fn profile_reports_mixed_kinds_per_cell() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("mixed.csv", "anio\n2019\nabc\n");
    let output = bin()
        .args(["profile", "-i", input.to_str().unwrap(), "--format", "json"])
        .output()
        .expect("run binary");
    assert!(output.status.success());
    let parsed: Json = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(parsed[0]["kinds"], serde_json::json!(["integer", "string"]));

    bin()
        .args(["profile", "-i", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("integer, string"));
}
