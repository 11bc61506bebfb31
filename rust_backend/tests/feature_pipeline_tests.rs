//! End-to-end tests for the feature generation pipeline:
//! raw CSV in, four-column synthetic feature CSV out.

use polars::prelude::*;
use std::io::Write;
use tempfile::{Builder, NamedTempFile, TempDir};

use flights_rust::features::generator::{
    FeatureGenerator, COL_DAY_PERIOD, COL_DELAY_15, COL_HIGH_SEASON, COL_MIN_DIFF,
};
use flights_rust::features::{generate_features, FeatureError, FeaturePipeline};
use flights_rust::parsing::csv_parser::parse_flights_csv;

const SAMPLE_CSV: &str = "\
Fecha-I,Fecha-O
2017-12-25 20:00:00,2017-12-25 20:20:00
2017-05-01 08:30:00,2017-05-01 08:25:00
2017-07-20 13:00:00,2017-07-20 13:15:00
2017-09-15 04:59:00,2017-09-15 05:30:00
";

fn write_temp_csv(content: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn read_csv(path: &std::path::Path) -> DataFrame {
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.into()))
        .unwrap()
        .finish()
        .unwrap()
}

#[test]
fn test_generate_features_end_to_end() {
    let input = write_temp_csv(SAMPLE_CSV);
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("synthetic_features.csv");

    let report = generate_features(input.path(), &output).unwrap();
    assert_eq!(report.total_flights, 4);
    assert_eq!(report.delayed_flights, 2); // +20 and +31 minutes
    assert_eq!(report.high_season_flights, 3);

    let exported = read_csv(&output);
    assert_eq!(exported.height(), 4);

    // Column order is the downstream compatibility contract
    let names: Vec<&str> = exported
        .get_column_names()
        .iter()
        .map(|s| s.as_str())
        .collect();
    assert_eq!(
        names,
        vec![COL_HIGH_SEASON, COL_MIN_DIFF, COL_DELAY_15, COL_DAY_PERIOD]
    );

    let minutes = exported.column(COL_MIN_DIFF).unwrap().i64().unwrap();
    assert_eq!(minutes.get(0), Some(20));
    assert_eq!(minutes.get(1), Some(-5));
    assert_eq!(minutes.get(2), Some(15));
    assert_eq!(minutes.get(3), Some(31));

    let periods = exported.column(COL_DAY_PERIOD).unwrap().str().unwrap();
    assert_eq!(periods.get(0), Some("night"));
    assert_eq!(periods.get(1), Some("morning"));
    assert_eq!(periods.get(2), Some("afternoon"));
    assert_eq!(periods.get(3), Some("night")); // 04:59 is still night
}

#[test]
fn test_export_round_trip_is_lossless() {
    let input = write_temp_csv(SAMPLE_CSV);
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("features.csv");

    let df = parse_flights_csv(input.path()).unwrap();
    let mut generator = FeatureGenerator::new(df);
    generator.convert_dates().unwrap();
    generator.generate_min_diff().unwrap();
    generator.generate_15_delay().unwrap();
    generator.generate_seasonality().unwrap();
    generator.generate_day_period().unwrap();
    generator.export_synthetic_features(&output).unwrap();

    let expected = generator.synthetic_features().unwrap();
    let reloaded = read_csv(&output);

    assert!(
        reloaded.equals(&expected),
        "reloaded features differ from exported: {:?} vs {:?}",
        reloaded,
        expected
    );
}

#[test]
fn test_export_before_generation_is_descriptive() {
    let input = write_temp_csv(SAMPLE_CSV);
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("features.csv");

    let df = parse_flights_csv(input.path()).unwrap();
    let mut generator = FeatureGenerator::new(df);
    generator.convert_dates().unwrap();

    let err = generator.export_synthetic_features(&output).unwrap_err();
    match err {
        FeatureError::MissingFeature { column, step } => {
            assert_eq!(column, COL_HIGH_SEASON);
            assert_eq!(step, "generate_seasonality");
        }
        other => panic!("Expected missing-feature error, got: {}", other),
    }
    assert!(!output.exists());
}

#[test]
fn test_pipeline_rejects_malformed_timestamps() {
    let input = write_temp_csv(
        "\
Fecha-I,Fecha-O
2017-01-02 23:30:00,2017-01-02 23:40:00
02/01/2017 23:30,2017-01-02 23:40:00
",
    );

    let err = FeaturePipeline::new().run(input.path()).unwrap_err();
    let chain = format!("{:#}", err);
    assert!(chain.contains("Fecha-I"), "unexpected error: {}", chain);
    assert!(chain.contains("row 1"), "unexpected error: {}", chain);
}

#[test]
fn test_day_period_boundaries_through_pipeline() {
    let input = write_temp_csv(
        "\
Fecha-I,Fecha-O
2017-06-01 04:59:00,2017-06-01 05:00:00
2017-06-01 05:00:00,2017-06-01 05:00:00
2017-06-01 11:59:00,2017-06-01 12:00:00
2017-06-01 12:00:00,2017-06-01 12:00:00
2017-06-01 18:59:00,2017-06-01 19:00:00
2017-06-01 19:00:00,2017-06-01 19:00:00
2017-06-01 23:59:00,2017-06-02 00:10:00
2017-06-01 00:00:00,2017-06-01 00:01:00
",
    );

    let report = FeaturePipeline::new().run(input.path()).unwrap();
    let periods = report.dataframe.column(COL_DAY_PERIOD).unwrap().str().unwrap();

    let expected = [
        "night",
        "morning",
        "morning",
        "afternoon",
        "afternoon",
        "night",
        "night",
        "night",
    ];
    for (i, want) in expected.iter().enumerate() {
        assert_eq!(periods.get(i), Some(*want), "row {}", i);
    }
}
