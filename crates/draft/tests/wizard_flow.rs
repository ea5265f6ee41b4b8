//! End-to-end wizard scenarios exercised through the public form API.

use boek_draft::form::{FieldEdit, SeriesForm};
use boek_draft::{BookSummary, DraftError, Field};

fn book(id: u64, name: &str) -> BookSummary {
    BookSummary {
        id,
        code: format!("B{id:05}"),
        name: name.to_string(),
        image_url: Some(format!("https://cdn.boek.live/covers/{id}.jpg")),
        publisher: "NXB Kim Đồng".to_string(),
        cover_price: 72_000.0,
        released_year: 2019,
    }
}

#[test]
fn adding_the_same_book_twice_keeps_one_entry_and_raises_the_duplicate_error() {
    let mut form = SeriesForm::new();
    assert!(form.draft().selected_books.is_empty());

    form.open_picker();
    form.add_book(book(1, "Sách A")).unwrap();
    let ids: Vec<u64> = form.draft().selected_books.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![1]);

    form.open_picker();
    let err = form.add_book(book(1, "Sách A")).unwrap_err();
    assert!(matches!(err, DraftError::DuplicateSelection { .. }));

    let ids: Vec<u64> = form.draft().selected_books.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![1], "rejected add must not change the selection");
}

#[test]
fn short_isbn10_reports_length_and_a_corrected_value_clears_it() {
    let mut form = SeriesForm::new();

    form.apply(FieldEdit::Isbn10("123456789".into())).unwrap();
    assert_eq!(
        form.errors().get(Field::Isbn10),
        Some("ISBN10 must be 10 characters")
    );

    form.apply(FieldEdit::Isbn10("1234567890".into())).unwrap();
    assert_eq!(form.errors().get(Field::Isbn10), None);
}

#[test]
fn cancel_keeps_the_selection_and_confirm_removes_exactly_the_target() {
    let mut form = SeriesForm::new();
    form.add_book(book(1, "Sách A")).unwrap();
    form.add_book(book(2, "Sách B")).unwrap();

    form.request_removal(2);
    form.cancel_removal();
    let ids: Vec<u64> = form.draft().selected_books.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![1, 2]);

    form.request_removal(2);
    form.confirm_removal().unwrap();
    let ids: Vec<u64> = form.draft().selected_books.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![1]);
}

#[test]
fn picker_search_narrows_by_name_regardless_of_case() {
    let catalog = vec![book(1, "Dế Mèn phiêu lưu ký"), book(2, "Kính Vạn Hoa")];
    let mut form = SeriesForm::new();

    form.open_picker();
    form.set_picker_query("KÍNH");
    match form.picker_listing(&catalog) {
        boek_draft::PickerListing::Books(matches) => {
            assert_eq!(matches.len(), 1);
            assert_eq!(matches[0].id, 2);
        }
        other => panic!("expected matches, got {other:?}"),
    }

    form.set_picker_query("không tồn tại");
    assert!(matches!(
        form.picker_listing(&catalog),
        boek_draft::PickerListing::NoMatches
    ));
}
