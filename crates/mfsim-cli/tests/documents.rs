//! Loading, checking and summarizing container documents on disk.

use std::fs;
use std::path::Path;

use mfsim_cli::document::{load_container, render_container, save_container};
use mfsim_cli::report::{ViolationKind, check_container, summarize};
use mfsim_model::{BasicType, Matrix, MatrixElement, TypeFormat, ValueItem, ValueItemContainer};

const SOLVENTS: [&str; 3] = ["Ethanol", "Oil", "Water"];

fn solvent_row(name: &str, fraction: &str) -> Vec<MatrixElement> {
    let texts = SOLVENTS.map(String::from).to_vec();
    let format = TypeFormat::selection(texts, Some(name), true, false).unwrap();
    let bounds = TypeFormat::numeric_with_bounds(2, 0.0, 1.0).unwrap();
    vec![
        MatrixElement::new(format),
        MatrixElement::with_value(fraction, bounds).unwrap(),
    ]
}

fn job() -> ValueItemContainer {
    let mut temperature = ValueItem::named("Temperature", BasicType::Scalar);
    temperature.set_display_name("Temperature [K]");
    temperature.set_block_name("Conditions");
    temperature.set_vertical_position(0);
    let bounds = TypeFormat::numeric_with_bounds(1, 0.0, 1000.0).unwrap();
    temperature.set_matrix(Matrix::single(MatrixElement::with_value("298.5", bounds).unwrap()));

    let mut solvents = ValueItem::named("Solvents", BasicType::FlexibleMatrix);
    solvents.set_display_name("Solvent mixture");
    solvents.set_block_name("Mixture");
    solvents.set_vertical_position(1);
    solvents.set_matrix_column_names(vec!["Solvent".into(), "Fraction".into()]);
    solvents.set_matrix(Matrix::new(vec![solvent_row("Water", "0.75"), solvent_row("Oil", "0.25")]).unwrap());
    solvents.set_constant_sum_column(Some(1));
    solvents.set_hint("Fractions sum to one");

    let mut container = ValueItemContainer::new();
    container.add_value_items(vec![solvents, temperature], false).unwrap();
    container
}

fn write_job(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("job.xml");
    save_container(&job(), &path).unwrap();
    path
}

#[test]
fn saved_job_checks_clean() {
    let dir = tempfile::tempdir().unwrap();
    let container = load_container(&write_job(dir.path())).unwrap();

    let report = check_container(&container);
    assert!(report.is_clean(), "{:?}", report.violations);
    assert_eq!(report.checked_items, 2);
    assert_eq!(report.checked_cells, 5);
}

#[test]
fn summary_json_lists_items_in_vertical_order() {
    let dir = tempfile::tempdir().unwrap();
    let container = load_container(&write_job(dir.path())).unwrap();

    insta::assert_json_snapshot!(summarize(&container), @r#"
    {
      "item_count": 2,
      "blocks": [
        "Conditions",
        "Mixture"
      ],
      "error_count": 0,
      "hint_count": 1,
      "items": [
        {
          "name": "Temperature",
          "display_name": "Temperature [K]",
          "block": "Conditions",
          "basic_type": "SCALAR",
          "rows": 1,
          "columns": 1,
          "vertical_position": 0,
          "is_displayed": true,
          "status": []
        },
        {
          "name": "Solvents",
          "display_name": "Solvent mixture",
          "block": "Mixture",
          "basic_type": "FLEXIBLE_MATRIX",
          "rows": 2,
          "columns": 2,
          "vertical_position": 1,
          "is_displayed": true,
          "status": [
            "HAS_HINT"
          ]
        }
      ]
    }
    "#);
}

#[test]
fn edited_document_reports_violations_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_job(dir.path());
    let xml = fs::read_to_string(&path).unwrap();
    let edited = xml
        .replace("<Value>298.5</Value>", "<Value>1200.5</Value>")
        .replace("<Value>Oil</Value>", "<Value>Water</Value>");
    assert_ne!(edited, xml);
    fs::write(&path, edited).unwrap();

    let report = check_container(&load_container(&path).unwrap());
    let found: Vec<(&str, usize, usize, ViolationKind)> = report
        .violations
        .iter()
        .map(|violation| (violation.item.as_str(), violation.row, violation.column, violation.kind))
        .collect();
    assert_eq!(
        found,
        [
            ("Temperature", 0, 0, ViolationKind::NotAllowed),
            ("Solvents", 1, 0, ViolationKind::DuplicateExclusiveValue),
        ]
    );
    assert_eq!(report.violations[0].value, "1200.5");
}

#[test]
fn formatting_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_job(dir.path());
    let first = fs::read_to_string(&path).unwrap();

    let rendered = render_container(&load_container(&path).unwrap()).unwrap();
    assert_eq!(rendered, first);
}

#[test]
fn broken_document_error_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.xml");
    fs::write(&path, "<ValueItemContainer><Version>Version 2.0</Version></ValueItemContainer>").unwrap();

    let error = load_container(&path).unwrap_err();
    assert!(format!("{error:#}").contains("broken.xml"));
}
