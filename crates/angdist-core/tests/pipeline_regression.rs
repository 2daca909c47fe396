use angdist_core::modules::{
    CdfSeries, InverseCdfSampler, build_bin_table, parse_records, read_bin_table,
    read_density_table, render_bin_table, render_density_table, solve_record, tabulate_density,
    validate_bin_table,
};
use angdist_core::{EnergyRecord, ExecutionMode, PipelineConfig};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct BoundaryReference {
    cases: Vec<BoundaryCase>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BoundaryCase {
    id: String,
    energy: f64,
    coefficients: Vec<f64>,
    expected_boundaries: BTreeMap<usize, f64>,
    abs_tol: f64,
}

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn fixture_records() -> Vec<EnergyRecord> {
    let source = fs::read_to_string(fixture_path("o16_elastic_da.txt"))
        .expect("fixed-width fixture should be readable");
    parse_records(&source, &PipelineConfig::default()).expect("fixture should parse")
}

fn load_reference() -> BoundaryReference {
    let source = fs::read_to_string(fixture_path("boundary_reference.json"))
        .expect("reference fixture should be readable");
    serde_json::from_str(&source).expect("reference fixture should parse")
}

fn record_from_case(case: &BoundaryCase) -> EnergyRecord {
    let mut coefficients = vec![0.0; 9];
    coefficients[0] = 1.0;
    coefficients[1..=case.coefficients.len()].copy_from_slice(&case.coefficients);
    EnergyRecord::new(case.energy, coefficients)
}

#[test]
fn fixture_records_parse_in_file_order() {
    let records = fixture_records();
    assert_eq!(
        records.iter().map(EnergyRecord::energy).collect::<Vec<_>>(),
        vec![1.0e-5, 1.0e5, 1.0e6, 5.0e6, 1.0e7, 1.5e7]
    );
    assert!(records.iter().all(|record| record.coefficients().len() == 9));
    assert!(records.iter().all(|record| record.coefficients()[0] == 1.0));

    assert_eq!(records[0].coefficients()[1], -2.62229e-12);
    assert_eq!(records[1].coefficients()[2], -3.456e-4);
    assert_eq!(records[2].coefficients()[7], 8.1e-6);
    assert_eq!(records[2].coefficients()[8], 0.0);
    assert_eq!(records[4].coefficients()[8], 1.003734e-3);
    assert_eq!(records[4].source_line(), 18);
}

#[test]
fn boundaries_match_reference_values() {
    for case in load_reference().cases {
        let record = record_from_case(&case);
        let row = solve_record(&record, 0, &PipelineConfig::default())
            .unwrap_or_else(|error| panic!("{}: {error}", case.id));

        for (bin, expected) in &case.expected_boundaries {
            let actual = row.boundaries()[*bin];
            assert!(
                (actual - expected).abs() <= case.abs_tol,
                "{} mu_{bin}: actual={actual} expected={expected}",
                case.id
            );
        }
    }
}

#[test]
fn scenario_row_meets_table_invariants() {
    let case = load_reference()
        .cases
        .into_iter()
        .find(|case| case.id == "O16-1E7")
        .expect("scenario case present");
    let record = record_from_case(&case);
    let cdf = CdfSeries::from_record(&record);
    assert!((cdf.evaluate(1.0) - 1.0).abs() < 1.0e-6);

    let row = solve_record(&record, 0, &PipelineConfig::default()).expect("scenario row");
    let columns: Vec<f64> = row.columns().collect();
    assert_eq!(columns.len(), 102);
    assert_eq!(columns[0], 1.0e7);
    assert_eq!(columns[1], -1.0);
    assert_eq!(columns[101], 1.0);
    assert!(row.interior().iter().all(|mu| *mu > -1.0 && *mu < 1.0));
    assert!(row.boundaries().windows(2).all(|pair| pair[0] < pair[1]));
    for (offset, mu) in row.interior().iter().enumerate() {
        let target = (offset + 1) as f64 / 100.0;
        assert!((cdf.evaluate(*mu) - target).abs() <= 1.0e-3);
    }
}

#[test]
fn persisted_table_validates_against_its_source() {
    let records = fixture_records();
    let config = PipelineConfig::default();
    let table = build_bin_table(&records, &config).expect("fixture table");
    assert_eq!(table.len(), records.len());

    let serial = build_bin_table(
        &records,
        &config.clone().with_execution_mode(ExecutionMode::Serial),
    )
    .expect("serial fixture table");
    assert_eq!(serial, table);

    let text = render_bin_table(&table, 8);
    assert_eq!(text.lines().count(), 6);
    assert!(text.lines().all(|line| line.split(' ').count() == 102));
    assert!(text.starts_with("1.00000000e-05 -1.00000000e+00 "));

    let persisted = read_bin_table(&text).expect("rendered table reads back");
    let report = validate_bin_table(&persisted, &records, &config).expect("table validates");
    assert!(report.passed);
    assert_eq!(report.rows_checked, 6);
    assert_eq!(report.values_checked, 600);
    assert!(report.max_error < 1.0e-3, "max error {}", report.max_error);
}

#[test]
fn density_table_round_trips_through_text() {
    let records = fixture_records();
    let table = tabulate_density(&records, &PipelineConfig::default());
    assert_eq!(table.len(), 6);
    assert!(table.rows().iter().all(|row| row.values().len() == 100));
    assert!(
        table
            .rows()
            .iter()
            .flat_map(|row| row.values())
            .all(|value| *value > 0.0)
    );

    let parsed = read_density_table(&render_density_table(&table, 8)).expect("density reads back");
    for (parsed_row, row) in parsed.rows().iter().zip(table.rows()) {
        assert_eq!(parsed_row.energy(), row.energy());
        for (left, right) in parsed_row.values().iter().zip(row.values()) {
            assert!((left - right).abs() <= 1.0e-8 * right.abs());
        }
    }
}

#[test]
fn sampler_reads_generated_table() {
    let records = fixture_records();
    let table = build_bin_table(&records, &PipelineConfig::default()).expect("fixture table");
    let sampler = InverseCdfSampler::new(table.clone()).expect("ascending energies");

    let row = &table.rows()[4];
    assert_eq!(sampler.closest_row(1.1e7).expect("closest").energy(), 1.0e7);
    assert_eq!(sampler.cosine(1.1e7, 0.5).expect("median"), row.boundaries()[50]);
    assert_eq!(sampler.cosine(1.1e7, 0.0).expect("p=0"), -1.0);

    let interpolated = sampler.interpolated_cosine(1.1e7, 0.505).expect("interpolated");
    assert!(interpolated > row.boundaries()[50] && interpolated < row.boundaries()[51]);
}
