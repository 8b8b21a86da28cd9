use anyhow::Result;
use camino::Utf8PathBuf;
use optlog::model::DedupPolicy;
use optlog::parser::{parse_char_log, parse_char_log_from_text, parse_char_log_from_text_with};
use optlog::ranking::{apply_top_n, rank_error_components};
use optlog::view::CharView;
use optlog::{FormatError, LogError};
use tempfile::tempdir;

fn parse(text: &str) -> optlog::parser::CharLog {
    parse_char_log_from_text(text, DedupPolicy::LastWins).expect("valid char log")
}

fn format_err(text: &str) -> FormatError {
    match parse_char_log_from_text(text, DedupPolicy::LastWins) {
        Err(LogError::Format(e)) => e,
        other => panic!("expected format error, got {other:?}"),
    }
}

const SCENARIO_B: &str = "Sol\t|\t(RES1)\tERR_RES2\nsolutionX+7.txt\t\t3.0\t1.0\n";

#[test]
fn scenario_b_columns_solution_and_shares() {
    let log = parse(SCENARIO_B);
    let keys: Vec<&str> = log.err_columns().iter().map(|c| c.key.as_str()).collect();
    assert_eq!(keys, vec!["RES1", "RES2"]);
    assert_eq!(log.err_columns()[0].index, 2);
    assert_eq!(log.sentinel_index(), Some(1));

    assert_eq!(log.solutions().len(), 1);
    let sol = &log.solutions()[0];
    assert_eq!(sol.number, 7);
    assert_eq!(sol.token, "solutionX+7.txt");
    assert_eq!(sol.row_index, 1);

    let top = apply_top_n(&log.component_rows(sol), 100);
    assert_eq!(top.rows.len(), 2);
    assert_eq!((top.rows[0].name.as_str(), top.rows[0].value), ("RES1", 3.0));
    assert_eq!(top.rows[0].share, 0.75);
    assert_eq!((top.rows[1].name.as_str(), top.rows[1].value), ("RES2", 1.0));
    assert_eq!(top.rows[1].share, 0.25);
    assert_eq!((top.rows[0].rank, top.rows[1].rank), (1, 2));
}

#[test]
fn scenario_c_last_occurrence_wins() {
    let text = "a\t|\t(E)\nsolution+2.txt\t\t1\nother\t\t5\nsolution+2.txt\t\t9\n";
    let log = parse(text);
    assert_eq!(log.solutions().len(), 1);
    assert_eq!(log.solutions()[0].number, 2);
    assert_eq!(log.solutions()[0].row_index, 3);
    assert_eq!(log.component_rows(&log.solutions()[0])[0].value, 9.0);
}

#[test]
fn first_wins_policy_keeps_earlier_row() {
    let text = "a\t|\t(E)\nsolution+2.txt\t\t1\nsolution+2.txt\t\t9\n";
    let log = parse_char_log_from_text(text, DedupPolicy::FirstWins).unwrap();
    assert_eq!(log.solutions()[0].row_index, 1);
}

#[test]
fn catalog_is_sorted_by_number() {
    let text = "\
id,|,(A),(B)
run/solutionQ+10.txt,,1,2

\"solutionQ+3.txt\",,4,5
no token here,,0,0
solutionQ+7.txt,,1,1
";
    let log = parse(text);
    assert_eq!(log.delimiter(), ',');
    let numbers: Vec<u32> = log.solutions().iter().map(|s| s.number).collect();
    assert_eq!(numbers, vec![3, 7, 10]);
    assert_eq!(log.solutions()[0].token, "solutionQ+3.txt");
    assert_eq!(log.solutions()[2].token, "run/solutionQ+10.txt");
    assert_eq!(log.solutions()[2].row_index, 1);
}

#[test]
fn token_is_searched_from_the_right() {
    let text = "a\t|\t(E)\tnote\nsolution+1.txt\t\t1\tsolution+4.txt\n";
    let log = parse(text);
    assert_eq!(log.solutions()[0].number, 4);
}

#[test]
fn uses_last_separator_and_ignores_keyless_columns() {
    let text = "id\t|\tjunk\t|\t(A)*2\tplain\tERR_B\t()\nsolution+1.txt\t\t\t\t1\t2\t3\t4\n";
    let log = parse(text);
    assert_eq!(log.sentinel_index(), Some(3));
    let keys: Vec<&str> = log.err_columns().iter().map(|c| c.key.as_str()).collect();
    assert_eq!(keys, vec!["A", "B"]);
}

#[test]
fn quoted_header_cells_are_normalized() {
    let text = "\"id\",\"|\",\"(A)\",'ERR_B'\nsolution+1.txt,,1,2\n";
    let log = parse(text);
    let keys: Vec<&str> = log.err_columns().iter().map(|c| c.key.as_str()).collect();
    assert_eq!(keys, vec!["A", "B"]);
}

#[test]
fn structural_errors_are_distinct() {
    assert_eq!(
        format_err("a\tb\tc\nsolution+1.txt\t1\t2\n"),
        FormatError::MissingSeparator {
            sentinel: "|".to_string()
        }
    );
    assert_eq!(format_err("a\t|\tplain\nsolution+1.txt\t\t2\n"), FormatError::NoErrColumns);
    assert_eq!(format_err("a\t|\t(E)\nnothing\t\t2\n"), FormatError::NoSolutions);
    assert_eq!(format_err("a\t|\t(E)\n"), FormatError::NoSolutions);
}

#[test]
fn configured_sentinel_opens_error_columns() {
    let text = "a\t#\t(E)\nsolution+1.txt\t\t2\n";
    let log = parse_char_log_from_text_with(text, DedupPolicy::LastWins, "#").unwrap();
    assert_eq!(log.sentinel_index(), Some(1));
    let keys: Vec<&str> = log.err_columns().iter().map(|c| c.key.as_str()).collect();
    assert_eq!(keys, vec!["E"]);

    assert_eq!(
        format_err(text),
        FormatError::MissingSeparator {
            sentinel: "|".to_string()
        }
    );
}

#[test]
fn empty_file_gives_empty_catalogs() {
    let log = parse("");
    assert!(log.is_empty());
    assert!(log.err_columns().is_empty());
    assert_eq!(log.default_selection(), None);
}

#[test]
fn missing_and_bad_cells_read_as_zero() {
    let log = parse("a\t|\t(A)\t(B)\t(C)\nsolution+1.txt\t\tabc\t2\n");
    let rows = log.component_rows(&log.solutions()[0]);
    let got: Vec<(&str, f64)> = rows.iter().map(|r| (r.name.as_str(), r.value)).collect();
    assert_eq!(got, vec![("B", 2.0), ("A", 0.0), ("C", 0.0)]);
}

#[test]
fn share_is_zero_when_total_is_not_positive() {
    let log = parse(
        "a\t|\t(A)\t(B)\t(C)\nsolution+1.txt\t\t-1\t0\t-3\nsolution+2.txt\t\t0\t0\t0\n",
    );
    for sol in log.solutions() {
        let top = apply_top_n(&log.component_rows(sol), 10);
        assert!(top.total <= 0.0);
        for r in &top.rows {
            assert_eq!(r.share, 0.0);
            assert!(!r.share.is_nan());
        }
    }
}

#[test]
fn nan_components_sort_last_and_zero_every_share() {
    let log = parse("a\t|\t(A)\t(B)\t(C)\nsolution+1.txt\t\tNaN\t2\t1\n");
    let rows = log.component_rows(&log.solutions()[0]);
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["B", "C", "A"]);
    assert!(rows[2].value.is_nan());

    let top = apply_top_n(&rows, 10);
    assert!(top.total.is_nan());
    for r in &top.rows {
        assert_eq!(r.share, 0.0);
    }
}

#[test]
fn share_uses_total_of_all_components() {
    let log = parse("a\t|\t(A)\t(B)\t(C)\t(D)\nsolution+1.txt\t\t1\t4\t2\t3\n");
    let rows = log.component_rows(&log.solutions()[0]);
    let top = apply_top_n(&rows, 2);
    let got: Vec<(&str, f64)> = top.rows.iter().map(|r| (r.name.as_str(), r.share)).collect();
    assert_eq!(got, vec![("B", 0.4), ("D", 0.3)]);
    assert_eq!(top.total, 10.0);
    assert_eq!(top.buckets[0].len(), 1);
    assert_eq!(top.buckets[1].len(), 1);
    assert!(top.buckets[2].is_empty());
}

#[test]
fn equal_values_keep_column_order() {
    let log = parse("a\t|\t(A)\t(B)\t(C)\nsolution+1.txt\t\t1\t5\t1\n");
    let rows = rank_error_components(
        log.line(1).unwrap(),
        log.delimiter(),
        log.err_columns(),
    );
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["B", "A", "C"]);
}

#[test]
fn char_view_defaults_to_highest_solution() {
    let log = parse("a\t|\t(A)\t(B)\nsolution+1.txt\t\t1\t2\nsolution+9.txt\t\t8\t2\n");
    let view = CharView::compute(&log, None, 100);
    assert_eq!(view.selected, Some(1));
    assert_eq!(view.components.rows[0].value, 8.0);
    assert_eq!(view.components.rows[0].share, 0.8);

    let view = CharView::compute(&log, Some(0), 1);
    assert_eq!(view.components.rows.len(), 1);
    assert_eq!(view.components.rows[0].name, "B");

    let view = CharView::compute(&log, Some(5), 10);
    assert_eq!(view.selected, None);
    assert!(view.components.rows.is_empty());
}

#[test]
fn reads_char_log_from_disk() -> Result<()> {
    let tmp = tempdir()?;
    let path = Utf8PathBuf::from_path_buf(tmp.path().join("opt_char(7).xls")).unwrap();
    std::fs::write(&path, SCENARIO_B.replace('\n', "\r\n"))?;
    let log = parse_char_log(&path)?;
    assert_eq!(log.solutions()[0].number, 7);
    assert_eq!(log.err_columns().len(), 2);
    Ok(())
}
