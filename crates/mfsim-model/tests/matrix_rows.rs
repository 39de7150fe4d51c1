//! Row insertion and removal on flexible matrices.

use std::collections::BTreeSet;

use mfsim_model::{BasicType, ChangeKind, ChangeRecorder, Matrix, MatrixElement, TypeFormat, ValueItem};
use proptest::prelude::*;

fn exclusive(texts: &[&str]) -> TypeFormat {
    let texts = texts.iter().map(|text| text.to_string()).collect();
    TypeFormat::selection(texts, None, true, false).unwrap()
}

fn flexible(cell: MatrixElement) -> ValueItem {
    let mut item = ValueItem::named("Components", BasicType::FlexibleMatrix);
    item.set_matrix(Matrix::single(cell));
    item
}

fn row_texts(item: &ValueItem, row: usize) -> Vec<String> {
    item.type_format_at(row, 0).unwrap().selection_texts().to_vec()
}

#[test]
fn inserted_row_takes_a_free_color() {
    let mut item = flexible(MatrixElement::new(exclusive(&["Red", "Green", "Blue"])));
    assert_eq!(item.value(), Some("Red"));

    assert!(item.insert_matrix_row(1));
    let added = item.value_at(1, 0).unwrap().to_string();
    assert!(added == "Green" || added == "Blue");

    let first = row_texts(&item, 0);
    let second = row_texts(&item, 1);
    assert!(first.contains(&"Red".to_string()));
    assert!(!first.contains(&added));
    assert!(second.contains(&added));
    assert!(!second.contains(&"Red".to_string()));
}

#[test]
fn exclusive_value_can_move_to_a_free_text() {
    let mut item = flexible(MatrixElement::new(exclusive(&["Red", "Green", "Blue"])));
    item.insert_matrix_row(1);
    let taken = item.value_at(1, 0).unwrap().to_string();

    let error = item.set_value_at(&taken, 0, 0).unwrap_err();
    assert!(matches!(error, mfsim_model::ModelError::ExclusiveSelectionViolation { .. }));

    let free = ["Red", "Green", "Blue"]
        .into_iter()
        .find(|text| *text != taken && *text != "Red")
        .unwrap();
    assert!(item.set_value_at(free, 0, 0).unwrap());
    assert_eq!(item.type_format_at(0, 0).unwrap().default_value(), free);
    assert!(row_texts(&item, 1).contains(&"Red".to_string()));
}

#[test]
fn single_row_is_never_removed() {
    let format = TypeFormat::numeric(1);
    let mut item = flexible(MatrixElement::with_value("2.5", format).unwrap());
    let recorder = ChangeRecorder::new();
    item.add_change_receiver(recorder.clone()).unwrap();

    assert!(!item.remove_matrix_row(0));
    assert_eq!(item.matrix_row_count(), 1);
    assert_eq!(item.value(), Some("2.5"));
    assert!(recorder.events().is_empty());
}

#[test]
fn row_changes_are_announced_as_matrix_changes() {
    let mut item = flexible(MatrixElement::new(TypeFormat::text("x")));
    let recorder = ChangeRecorder::new();
    item.add_change_receiver(recorder.clone()).unwrap();

    assert!(item.insert_matrix_row(0));
    assert!(item.remove_matrix_row(1));
    assert_eq!(recorder.kinds(), [ChangeKind::MatrixChange, ChangeKind::MatrixChange]);
    assert!(item.has_change_detected());
}

#[test]
fn maximum_row_count_limits_growth() {
    let mut item = flexible(MatrixElement::new(TypeFormat::text("x")));
    item.set_matrix_maximum_number_of_rows(3);
    assert!(item.insert_matrix_row(0));
    assert!(item.copy_matrix_row(0));
    assert!(!item.insert_matrix_row(0));
    assert!(!item.copy_matrix_row(0));
    assert_eq!(item.matrix_row_count(), 3);
}

#[test]
fn fixed_matrices_keep_their_rows() {
    let mut item = ValueItem::named("Fixed", BasicType::Matrix);
    let rows = vec![
        vec![MatrixElement::new(TypeFormat::text("a"))],
        vec![MatrixElement::new(TypeFormat::text("b"))],
    ];
    item.set_matrix(Matrix::new(rows).unwrap());
    assert!(!item.can_insert_matrix_row());
    assert!(!item.remove_matrix_row(0));
    assert_eq!(item.matrix_row_count(), 2);
}

const PALETTE: [&str; 5] = ["Amber", "Blue", "Cyan", "Green", "Red"];

proptest! {
    #[test]
    fn exclusive_column_stays_consistent(
        text_count in 2usize..=5,
        operations in proptest::collection::vec((any::<bool>(), 0usize..8), 1..24),
    ) {
        let palette = &PALETTE[..text_count];
        let mut item = flexible(MatrixElement::new(exclusive(palette)));
        for (insert, index) in operations {
            if insert {
                item.insert_matrix_row(index);
            } else {
                item.remove_matrix_row(index);
            }

            let rows = item.matrix_row_count();
            prop_assert!(rows >= 1 && rows <= text_count);
            let values: Vec<String> = (0..rows).map(|row| item.value_at(row, 0).unwrap().to_string()).collect();
            let distinct: BTreeSet<&String> = values.iter().collect();
            prop_assert_eq!(distinct.len(), rows);

            let mut known: BTreeSet<String> = BTreeSet::new();
            for (row, value) in values.iter().enumerate() {
                let texts = row_texts(&item, row);
                prop_assert!(texts.contains(value));
                for (other, other_value) in values.iter().enumerate() {
                    if other != row {
                        prop_assert!(!texts.contains(other_value));
                    }
                }
                known.extend(texts);
            }
            let expected: BTreeSet<String> = palette.iter().map(|text| text.to_string()).collect();
            prop_assert_eq!(known, expected);
        }
    }
}

proptest! {
    #[test]
    fn inserted_row_keeps_existing_order(rows in 1usize..6, index in 0usize..8) {
        let cells = (0..rows)
            .map(|row| vec![MatrixElement::with_value(&format!("r{row}"), TypeFormat::text("new")).unwrap()])
            .collect();
        let mut item = ValueItem::named("Labels", BasicType::FlexibleMatrix);
        item.set_matrix(Matrix::new(cells).unwrap());
        let before = item.matrix().unwrap().column_values(0);

        prop_assert!(item.insert_matrix_row(index));
        let mut after = item.matrix().unwrap().column_values(0);
        prop_assert_eq!(after.len(), rows + 1);

        let inserted = index.min(rows);
        prop_assert_eq!(after.remove(inserted), "new");
        prop_assert_eq!(after, before);
    }
}
