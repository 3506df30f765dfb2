use std::sync::Arc;

use sdf_columns::{
    ColumnKind, ColumnRef, FloatColumnBuilder, IntColumnBuilder, StrColumnBuilder,
    MAX_RESERVED_ROWS,
};
use sdf_common::{ErrorKind, Field, Position, TextSlice};

fn field(text: &str, column: usize) -> Field {
    Field::new(TextSlice::owned(text), Position::at(7, column, 0))
}

#[test]
fn test_builders_freeze_into_indexable_columns() {
    let mut x = FloatColumnBuilder::with_capacity("x", 3);
    let mut order = IntColumnBuilder::with_capacity("order", 3);
    for (text, bond) in [("1.2333", "1"), ("-0.6952", "2"), ("0.7958", "3")] {
        x.push_field(&field(text, 1)).unwrap();
        order.push_field(&field(bond, 7)).unwrap();
    }
    let x = x.freeze().unwrap();
    let order = order.freeze().unwrap();

    assert_eq!(x.name(), "x");
    assert_eq!(x.len(), 3);
    assert_eq!(x.value(1), -0.6952);
    assert_eq!(order.iter().sum::<i32>(), 6);
    assert_eq!(order.get(3), None);
}

#[test]
fn test_malformed_number_keeps_text_and_position() {
    let mut y = FloatColumnBuilder::new("y");
    let err = y.push_field(&field("0.8x50", 11)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedNumber);
    assert_eq!(err.position(), Some(Position::at(7, 11, 0)));
    let diagnostic = err.diagnostic();
    assert_eq!((diagnostic.line, diagnostic.column), (7, 11));
    assert!(diagnostic.message.contains("0.8x50"));
    assert!(diagnostic.message.contains('y'));
}

#[test]
fn test_freeze_is_one_way() {
    let mut charge = IntColumnBuilder::new("charge");
    charge.push(0).unwrap();
    assert!(!charge.is_frozen());
    let column = charge.freeze().unwrap();
    assert!(charge.is_frozen());
    assert_eq!(column.as_slice(), &[0]);

    let err = charge.push_field_or_zero(&field("", 1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UseAfterFreeze);
    assert_eq!(err.position(), None);
    assert_eq!(charge.freeze().unwrap_err().kind(), ErrorKind::UseAfterFreeze);
}

#[test]
fn test_string_columns_share_the_input() {
    let input: Arc<str> = Arc::from("> <DATABASE_ID>\n0\n");
    let mut header = StrColumnBuilder::sliced("data_header");
    header.push(TextSlice::new(Arc::clone(&input), 2, 15)).unwrap();
    let header = header.freeze().unwrap();

    let value = header.value(0);
    assert_eq!(value, "<DATABASE_ID>");
    assert!(input.as_bytes().as_ptr_range().contains(&value.as_ptr()));
}

#[test]
fn test_interned_symbols() {
    let mut symbols = StrColumnBuilder::interned_with_capacity("type_symbol", 21);
    for symbol in "O O O O C C C C C C C C C H H H H H H H H".split(' ') {
        symbols.push(TextSlice::owned(symbol)).unwrap();
    }
    let symbols = symbols.freeze().unwrap();
    assert_eq!(symbols.len(), 21);
    assert_eq!(symbols.distinct(), Some(3));
    assert_eq!(symbols.value(20), "H");
    assert_eq!(symbols.iter().filter(|s| *s == "C").count(), 9);
}

#[test]
fn test_column_ref_by_kind() {
    let mut x = FloatColumnBuilder::new("x");
    x.push(0.825).unwrap();
    let x = x.freeze().unwrap();
    let mut symbol = StrColumnBuilder::sliced("type_symbol");
    symbol.push(TextSlice::owned("P")).unwrap();
    let symbol = symbol.freeze().unwrap();

    let float = ColumnRef::Float(&x);
    assert_eq!(float.kind(), ColumnKind::Float);
    assert_eq!(float.name(), "x");
    assert_eq!(float.display(0).as_deref(), Some("0.825"));
    assert!(float.as_int().is_none());
    assert_eq!(float.display(1), None);

    let text = ColumnRef::Str(&symbol);
    assert_eq!(text.kind(), ColumnKind::Str);
    assert_eq!(text.as_str().map(|c| c.value(0)), Some("P"));
}

#[test]
fn test_declared_capacity_is_bounded() {
    let mut atom_index = IntColumnBuilder::with_capacity("atom_index_a", usize::MAX);
    assert!(atom_index.capacity() <= MAX_RESERVED_ROWS);
    for value in 0..(MAX_RESERVED_ROWS as i32 + 10) {
        atom_index.push(value).unwrap();
    }
    assert_eq!(atom_index.freeze().unwrap().len(), MAX_RESERVED_ROWS + 10);

    let mut symbols = StrColumnBuilder::interned_with_capacity("type_symbol", usize::MAX);
    symbols.push(TextSlice::owned("C")).unwrap();
    let mut data = StrColumnBuilder::sliced_with_capacity("data", usize::MAX);
    data.push(TextSlice::owned("0")).unwrap();
    assert_eq!(symbols.freeze().unwrap().value(0), "C");
    assert_eq!(data.freeze().unwrap().value(0), "0");
}
