//! End-to-end parsing of multi-record SD files.

use std::time::Duration;

use sdf_common::ErrorKind;
use sdf_pipeline::{
    parse_sdf, parse_sdf_with, CancelFlag, NoProgress, ParseFailure, ParserOptions, Progress,
    SdfReader, YieldPolicy,
};

const SAMPLE: &str = include_str!("fixtures/sample.sdf");

/// Records every call for inspection.
#[derive(Debug, Default)]
struct Recorder {
    yields: usize,
    reports: Vec<(usize, usize)>,
    cancel_after_reports: Option<usize>,
}

impl Progress for Recorder {
    fn should_yield(&mut self) -> bool {
        self.yields += 1;
        true
    }

    fn report_progress(&mut self, current: usize, max: usize) {
        self.reports.push((current, max));
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_after_reports
            .is_some_and(|limit| self.reports.len() >= limit)
    }
}

#[test]
fn test_sample_file() {
    let file = parse_sdf(SAMPLE).unwrap();
    assert_eq!(file.len(), 3);

    let first = &file.compounds[0];
    let atoms = &first.mol_file.atoms;
    let bonds = &first.mol_file.bonds;
    assert_eq!(atoms.count, 5);
    assert_eq!(bonds.count, 4);
    assert!((atoms.x.value(0) - 0.0).abs() < 1e-3);
    assert!((atoms.y.value(0) - 0.825).abs() < 1e-4);
    assert!((atoms.z.value(0) - 0.0).abs() < 1e-4);
    assert_eq!(atoms.type_symbol.value(0), "O");
    assert_eq!(bonds.atom_index_a.value(3), 4);
    assert_eq!(bonds.atom_index_b.value(3), 5);
    assert_eq!(bonds.order.value(3), 1);

    let items = &first.data_items;
    assert_eq!(items.count, 32);
    assert_eq!(items.data_header.value(0), "<DATABASE_ID>");
    assert_eq!(items.data.value(0), "0");
    assert_eq!(items.data_header.value(1), "<DATABASE_NAME>");
    assert_eq!(items.data.value(1), "drugbank");
    assert_eq!(items.data_header.value(2), "5225 <TEST_FIELD>");
    assert_eq!(items.data.value(2), "whatever");
    assert_eq!(items.data_header.value(31), "<SYNONYMS>");
    assert_eq!(items.data.value(31), "Orthophosphate; Phosphate");
}

#[test]
fn test_shifted_second_record() {
    let file = parse_sdf(SAMPLE).unwrap();
    let second = &file.compounds[1];
    assert_eq!(second.index, 1);
    assert_eq!(second.mol_file.header.program(), "Comp 2");
    assert_eq!(second.mol_file.atoms.count, 5);
    assert_eq!(second.mol_file.bonds.count, 4);
    assert_eq!(second.mol_file.atoms.position(1), [-0.825, 0.0, 0.0]);
    assert_eq!(second.mol_file.atoms.charge.value(2), 5);
    assert_eq!(second.data_items.count, 1);
    assert_eq!(second.data_items.data.value(0), "1");
}

#[test]
fn test_multi_line_payloads() {
    let file = parse_sdf(SAMPLE).unwrap();
    let third = &file.compounds[2];
    assert_eq!(third.mol_file.header.title(), "2244");
    assert_eq!(third.mol_file.atoms.count, 21);
    assert_eq!(third.mol_file.bonds.count, 21);
    assert!(third.mol_file.check_bond_indices().is_ok());

    let items = &third.data_items;
    assert_eq!(items.count, 22);
    assert_eq!(items.data_header.value(2), "<PUBCHEM_CONFORMER_DIVERSEORDER>");
    assert_eq!(
        items.data.value(2),
        "1\n11\n10\n3\n15\n17\n13\n5\n16\n7\n14\n9\n8\n4\n18\n6\n12\n2"
    );
    assert_eq!(items.data_header.value(21), "<PUBCHEM_COORDINATE_TYPE>");
    assert_eq!(items.data.value(21), "2\n5\n10");
}

#[test]
fn test_records_do_not_bleed() {
    let file = parse_sdf(SAMPLE).unwrap();
    let last_header = file.compounds[0].data_items.data_header.value(31);
    assert!(file.compounds[1]
        .data_items
        .data_header
        .iter()
        .all(|header| header != last_header));
    let indices: Vec<usize> = file.iter().map(|compound| compound.index).collect();
    assert_eq!(indices, [0, 1, 2]);
}

#[test]
fn test_empty_and_blank_input() {
    assert!(parse_sdf("").unwrap().is_empty());
    assert!(parse_sdf("\n  \n").unwrap().is_empty());
}

#[test]
fn test_truncated_file() {
    let cut = SAMPLE.find("    3.7105").unwrap();
    let err = parse_sdf(&SAMPLE[..cut]).unwrap_err();
    let ParseFailure::Parse(err) = err else {
        panic!("expected a parse error, got {err:?}");
    };
    assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    let line = SAMPLE[..cut].lines().count() + 1;
    assert_eq!(err.position().map(|p| (p.line, p.column)), Some((line, 1)));
}

#[test]
fn test_malformed_number_aborts_whole_parse() {
    let input = SAMPLE.replacen("   -2.7855    0.7636", "   -2.7855    0.76x6", 1);
    let failure = parse_sdf(&input).unwrap_err();
    let diagnostic = failure.diagnostic().unwrap();
    assert!(diagnostic.message.contains("0.76x6"));
    assert_eq!(diagnostic.column, 11);
    let expected_line = input
        .lines()
        .position(|line| line.contains("0.76x6"))
        .unwrap()
        + 1;
    assert_eq!(diagnostic.line, expected_line);
}

#[test]
fn test_reader_pulls_one_record_at_a_time() {
    let mut reader = SdfReader::new(SAMPLE, ParserOptions::default());
    let first = reader.next().unwrap().unwrap();
    assert_eq!(first.index, 0);
    assert_eq!(reader.records_read(), 1);
    assert!(reader.offset() < reader.len());
    assert_eq!(reader.by_ref().count(), 2);
    assert!(reader.next().is_none());
}

#[test]
fn test_reader_stops_after_error() {
    let input = SAMPLE.replacen("Comp 2\n\n5  4", "Comp 2\n\nxx  4", 1);
    let mut reader = SdfReader::new(&input, ParserOptions::default());
    assert!(reader.next().unwrap().is_ok());
    let err = reader.next().unwrap().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedCountsLine);
    assert!(reader.next().is_none());
}

#[test]
fn test_unknown_separator() {
    let input = SAMPLE.replacen("$$$$\n", "$$$$ extra\n", 1);
    let err = parse_sdf(&input).unwrap_err();
    assert_eq!(
        err.diagnostic().map(|d| d.line),
        SAMPLE.lines().position(|line| line == "$$$$").map(|i| i + 1)
    );
    let ParseFailure::Parse(err) = err else {
        panic!("expected a parse error");
    };
    assert_eq!(err.kind(), ErrorKind::UnknownRecordSeparator);
}

#[test]
fn test_progress_reports_at_record_boundaries() {
    let mut recorder = Recorder::default();
    let file = parse_sdf_with(
        SAMPLE,
        &ParserOptions::default(),
        YieldPolicy::every_record(),
        &mut recorder,
    )
    .unwrap();
    assert_eq!(file.len(), 3);
    assert_eq!(recorder.yields, 3);
    // one report per record plus the final one
    assert_eq!(recorder.reports.len(), 4);
    assert!(recorder.reports.windows(2).all(|w| w[0].0 <= w[1].0));
    assert_eq!(recorder.reports[3], (SAMPLE.len(), SAMPLE.len()));
}

#[test]
fn test_yield_cadence_by_record_count() {
    let mut recorder = Recorder::default();
    let policy = YieldPolicy::default()
        .with_every_records(2)
        .with_interval(Duration::from_secs(3600));
    parse_sdf_with(SAMPLE, &ParserOptions::default(), policy, &mut recorder).unwrap();
    assert_eq!(recorder.yields, 1);
}

#[test]
fn test_cancellation_keeps_completed_records() {
    let mut recorder = Recorder {
        cancel_after_reports: Some(2),
        ..Recorder::default()
    };
    let failure = parse_sdf_with(
        SAMPLE,
        &ParserOptions::default(),
        YieldPolicy::every_record(),
        &mut recorder,
    )
    .unwrap_err();
    assert!(failure.is_cancelled());
    assert!(failure.diagnostic().is_none());
    let ParseFailure::Cancelled(cancelled) = failure else {
        unreachable!()
    };
    assert_eq!(cancelled.compounds.len(), 2);
    assert_eq!(cancelled.compounds[1].mol_file.atoms.count, 5);
    assert_eq!(cancelled.compounds[1].data_items.data.value(0), "1");
}

#[test]
fn test_cancel_flag_before_start() {
    let flag = CancelFlag::new();
    flag.cancel();
    let failure = parse_sdf_with(SAMPLE, &ParserOptions::default(), YieldPolicy::default(), flag)
        .unwrap_err();
    let ParseFailure::Cancelled(cancelled) = failure else {
        panic!("expected cancellation");
    };
    assert!(cancelled.compounds.is_empty());
    assert_eq!(cancelled.position.line, 1);
}

#[test]
fn test_no_progress_runs_to_end() {
    let file = parse_sdf_with(
        SAMPLE,
        &ParserOptions::default(),
        YieldPolicy::every_record(),
        NoProgress,
    )
    .unwrap();
    assert_eq!(file.into_iter().count(), 3);
}

#[test]
fn test_strict_properties_accept_sample() {
    let options = ParserOptions::default().with_strict_properties(true);
    let file = parse_sdf_with(SAMPLE, &options, YieldPolicy::default(), NoProgress).unwrap();
    assert_eq!(file.compounds[0].mol_file.properties.charges.count, 3);
}
