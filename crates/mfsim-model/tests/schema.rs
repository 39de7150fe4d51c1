//! Schema extraction and matching on two-row molecule tables.

use mfsim_model::{BasicType, DataType, Matrix, MatrixElement, TypeFormat, ValueItem};

fn molecule_table(names: [&str; 2], columns: &[&str]) -> ValueItem {
    let rows = names
        .iter()
        .map(|name| {
            vec![
                MatrixElement::with_value(name, TypeFormat::text("Molecule")).unwrap(),
                MatrixElement::with_value("C(O)", TypeFormat::of_type(DataType::MolecularStructure)).unwrap(),
                MatrixElement::with_value("[START]", TypeFormat::of_type(DataType::MonomerStructure)).unwrap(),
            ]
        })
        .collect();
    let mut item = ValueItem::named("MoleculeTable", BasicType::Matrix);
    item.set_matrix_column_names(columns.iter().map(|column| column.to_string()).collect());
    item.set_matrix_column_widths(vec!["120".into(), "300".into(), "300".into()]);
    item.set_matrix(Matrix::new(rows).unwrap());
    item
}

const COLUMNS: [&str; 3] = ["Name", "Structure", "Monomers"];

#[test]
fn schema_wildcards_structure_cells() {
    let item = molecule_table(["Water", "Ethanol"], &COLUMNS);
    let schema = item.schema_value_item("Solvents").unwrap();

    assert_eq!(schema.basic_type(), BasicType::Matrix);
    assert_eq!(schema.display_name(), "Solvents");
    assert!(schema.name().starts_with("Solvents ("));
    assert!(schema.name().ends_with(')'));
    assert_eq!(schema.matrix_column_names(), item.matrix_column_names());
    assert_eq!(schema.matrix_column_width(1), Some(300));

    let matrix = schema.matrix().unwrap();
    assert_eq!((matrix.row_count(), matrix.column_count()), (2, 3));
    assert_eq!(matrix.column_values(0), ["Water", "Ethanol"]);
    assert_eq!(matrix.column_values(1), ["*", "*"]);
    assert_eq!(matrix.column_values(2), ["*", "*"]);
    for row in matrix.rows() {
        for cell in row {
            assert_eq!(cell.type_format().data_type(), DataType::Text);
            assert!(!cell.type_format().is_editable());
        }
    }
}

#[test]
fn schema_applies_to_same_structure_only() {
    let item = molecule_table(["Water", "Ethanol"], &COLUMNS);
    let schema = item.schema_value_item("Solvents").unwrap();

    let other_values = molecule_table(["Octane", "Benzene"], &COLUMNS);
    assert!(other_values.can_apply_schema_value_item(&schema));
    assert!(!other_values.matches_schema_value_item(&schema));

    let other_columns = molecule_table(["Water", "Ethanol"], &["Name", "Smiles", "Monomers"]);
    assert!(!other_columns.can_apply_schema_value_item(&schema));
}

#[test]
fn structure_values_are_ignored_when_matching() {
    let item = molecule_table(["Water", "Ethanol"], &COLUMNS);
    let schema = item.schema_value_item("Solvents").unwrap();

    let mut edited = molecule_table(["Water", "Ethanol"], &COLUMNS);
    edited.set_value_at("CCO", 1, 1).unwrap();
    assert!(edited.matches_schema_value_item(&schema));
}

#[test]
fn flexible_matrix_accepts_matrix_schema() {
    let item = molecule_table(["Water", "Ethanol"], &COLUMNS);
    let schema = item.schema_value_item("Solvents").unwrap();

    let mut flexible = molecule_table(["Water", "Ethanol"], &COLUMNS);
    flexible.set_basic_type(BasicType::FlexibleMatrix);
    assert!(flexible.can_apply_schema_value_item(&schema));
    assert!(flexible.matches_schema_value_item(&schema));

    let flexible_schema = flexible.schema_value_item("Flexible").unwrap();
    assert_eq!(flexible_schema.basic_type(), BasicType::Matrix);
}
