//! Admission, formatting and default rules of type formats.

use mfsim_model::{DataType, ModelError, TypeFormat};

fn texts(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn numeric_bounds_and_decimals() {
    let format = TypeFormat::numeric_with_bounds(2, 0.0, 100.0).unwrap();
    assert!(format.is_value_allowed("0"));
    assert!(format.is_value_allowed("99.99"));
    assert!(format.is_value_allowed("-0"));
    assert!(!format.is_value_allowed("100.01"));
    assert!(!format.is_value_allowed("1.234"));
    assert!(!format.is_value_allowed("1e2"));
    assert!(!format.is_value_allowed(" 1"));
    assert!(!format.is_value_allowed(""));
    assert_eq!(format.format_value("3"), "3.00");
    assert_eq!(format.format_value("abc"), "abc");
}

#[test]
fn integer_format_rejects_decimal_point() {
    let format = TypeFormat::numeric(0);
    assert!(format.is_integer_number());
    assert!(format.is_value_allowed("42"));
    assert!(!format.is_value_allowed("42."));
    assert_eq!(format.minimum_value_representation(), "not defined");
}

#[test]
fn numeric_default_outside_bounds_is_rejected() {
    let result = TypeFormat::numeric_with_default("11", 1, 0.0, 10.0);
    assert!(matches!(result, Err(ModelError::InvalidDefault { .. })));

    let format = TypeFormat::numeric_with_default("2.5", 1, 0.0, 10.0).unwrap();
    assert_eq!(format.default_value(), "2.5");
    assert_eq!(format.maximum_value_representation(), "10.0");
}

#[test]
fn numeric_null_accepts_sentinel() {
    let format = TypeFormat::numeric_null(1);
    assert!(format.is_value_allowed("null"));
    assert!(format.is_value_allowed("1.5"));
    assert!(!format.is_value_allowed("NULL"));
    assert_eq!(format.format_value("null"), "null");
}

#[test]
fn text_patterns_constrain_characters_and_shape() {
    let format = TypeFormat::text_with_patterns("Job", "[A-Za-z0-9]", "[A-Z][a-z0-9]*", false).unwrap();
    assert!(format.is_character_allowed('x'));
    assert!(!format.is_character_allowed('-'));
    assert!(format.is_value_allowed("Job2"));
    assert!(!format.is_value_allowed("job2"));
    assert!(!format.is_value_allowed("Job-2"));
}

#[test]
fn invalid_pattern_is_a_typed_error() {
    let result = TypeFormat::text_with_patterns("", "[", "", false);
    assert!(matches!(result, Err(ModelError::RegexCompile { .. })));
}

#[test]
fn text_empty_forbids_texts_case_insensitively() {
    let format = TypeFormat::text_empty("", "", texts(&["Water"])).unwrap();
    assert!(format.is_value_allowed(""));
    assert!(format.is_value_allowed("Oil"));
    assert!(!format.is_value_allowed("WATER"));
    assert!(format.is_in_forbidden_texts("water"));
}

#[test]
fn selection_default_must_be_member() {
    let result = TypeFormat::selection(texts(&["A", "B"]), Some("C"), false, false);
    assert!(matches!(result, Err(ModelError::InvalidDefault { .. })));

    let format = TypeFormat::selection(texts(&["A", "B"]), None, false, false).unwrap();
    assert_eq!(format.default_value(), "A");
    assert!(format.is_value_allowed("B"));
    assert!(!format.is_value_allowed("b"));
    assert_eq!(format.first_non_default_selection_text(), Some("B"));
}

#[test]
fn selection_texts_fall_back_to_first_member() {
    let mut format = TypeFormat::selection(texts(&["A", "B"]), Some("B"), false, false).unwrap();
    format.set_selection_texts(texts(&["C", "D"])).unwrap();
    assert_eq!(format.default_value(), "C");

    let mut numeric = TypeFormat::numeric(0);
    assert!(matches!(
        numeric.set_selection_texts(texts(&["1"])),
        Err(ModelError::WrongDataType { .. })
    ));
}

#[test]
fn unique_default_shortens_base_to_keep_match() {
    let format = TypeFormat::text_with_patterns("Abc", "", "[A-Za-z0-9]{1,3}", true).unwrap();
    assert_eq!(format.unique_default_value(&["Xyz"]).unwrap(), "Abc");
    assert_eq!(format.unique_default_value(&["Abc"]).unwrap(), "Ab1");
    assert_eq!(format.unique_default_value(&["Abc", "Ab1"]).unwrap(), "Ab2");
}

#[test]
fn timestamps_use_standard_format() {
    let format = TypeFormat::of_type(DataType::Timestamp);
    assert!(format.is_value_allowed("2024/02/29 - 13:05:00"));
    assert!(!format.is_value_allowed("2024-02-29 13:05:00"));
    assert!(!format.is_value_allowed(""));

    let empty = TypeFormat::of_type(DataType::TimestampEmpty);
    assert!(empty.is_value_allowed("  "));
}

#[test]
fn directory_and_file_check_the_file_system() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("job.xml");
    std::fs::write(&file, "<ValueItemContainer/>").unwrap();
    let dir_text = dir.path().to_string_lossy().into_owned();
    let file_text = file.to_string_lossy().into_owned();

    let directory = TypeFormat::of_type(DataType::Directory);
    assert!(directory.is_value_allowed(""));
    assert!(directory.is_value_allowed(&dir_text));
    assert!(!directory.is_value_allowed(&file_text));

    let regular = TypeFormat::of_type(DataType::File);
    assert!(regular.is_value_allowed(&file_text));
    assert!(!regular.is_value_allowed(&dir_text));
    assert!(!regular.is_value_allowed(&dir.path().join("missing").to_string_lossy()));
}

#[test]
fn structures_accept_anything() {
    let format = TypeFormat::of_type(DataType::MolecularStructure);
    assert!(format.is_value_allowed("[H]O[H]"));
    assert!(format.is_value_allowed(""));
}
