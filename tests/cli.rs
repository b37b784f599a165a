//! Integration tests for the command-line surface: argument words,
//! environment variables, error routing and exit codes.

use assert_cmd::Command;

use refold::USAGE;

fn refold() -> Command {
    let mut cmd = Command::cargo_bin("refold").expect("binary under test");
    // Keep the host environment from leaking options into tests.
    cmd.env_remove("PARBODY")
        .env_remove("PARPROTECT")
        .env_remove("PARQUOTE")
        .env_remove("PARINIT");
    cmd
}

/// Verifies the basic filter path: text on stdin comes back reflowed
/// to the width given by a `w` argument.
#[test]
fn reflows_stdin_at_the_requested_width() {
    refold()
        .arg("w15")
        .write_stdin("The quick brown fox jumps\nover the lazy dog.\n")
        .assert()
        .success()
        .stdout("The quick brown\nfox jumps over\nthe lazy dog.\n");
}

/// Verifies that a bare decimal argument greater than 8 is read as a
/// width rather than a prefix length.
#[test]
fn a_bare_number_above_eight_is_a_width() {
    refold()
        .arg("15")
        .write_stdin("The quick brown fox jumps\nover the lazy dog.\n")
        .assert()
        .success()
        .stdout("The quick brown\nfox jumps over\nthe lazy dog.\n");
}

/// Verifies that the `version` word prints the crate version and
/// exits successfully.
#[test]
fn version_prints_and_exits_cleanly() {
    refold()
        .arg("version")
        .assert()
        .success()
        .stdout(format!("refold {}\n", env!("CARGO_PKG_VERSION")));
}

/// Verifies that the `help` word prints the usage text and exits
/// successfully.
#[test]
fn help_prints_the_usage_text() {
    refold().arg("help").assert().success().stdout(USAGE);
}

/// Verifies that an argument outside the grammar fails with a "Bad
/// argument" report followed by the usage text, both on stdout since
/// errors only move to stderr on request.
#[test]
fn a_bad_argument_reports_and_shows_usage() {
    refold()
        .arg("zq")
        .assert()
        .failure()
        .stdout(format!("refold error:\nBad argument: zq\n{USAGE}"));
}

/// Verifies that `E1` routes the error report to stderr, here for an
/// over-long word rejected under `R1`.
#[test]
fn errors_move_to_stderr_on_request() {
    refold()
        .args(["E1", "w10", "R1"])
        .write_stdin("supercalifragilisticexpialidocious\n")
        .assert()
        .failure()
        .stderr("refold error:\nWord too long: supercalifragilisticexpialidocious\n");
}

/// Verifies that `PARINIT` words are parsed ahead of the command
/// line and configure the run like ordinary arguments.
#[test]
fn parinit_supplies_leading_arguments() {
    refold()
        .env("PARINIT", "w15")
        .write_stdin("The quick brown fox jumps\nover the lazy dog.\n")
        .assert()
        .success()
        .stdout("The quick brown\nfox jumps over\nthe lazy dog.\n");
}

/// Verifies that `PARPROTECT` seeds the protective set: a line
/// opening with the seeded byte is copied verbatim even at a width
/// that would otherwise break it.
#[test]
fn parprotect_seeds_the_protective_set() {
    refold()
        .env("PARPROTECT", "%")
        .arg("w5")
        .write_stdin("% untouched protected line\n")
        .assert()
        .success()
        .stdout("% untouched protected line\n");
}

/// Verifies that `PARQUOTE` replaces the quote set used by the `q`
/// feature, so a vacant line appears between differing `|` nesting
/// levels.
#[test]
fn parquote_feeds_the_quote_feature() {
    refold()
        .env("PARQUOTE", "| ")
        .arg("q1")
        .write_stdin("| A\n| | B\n")
        .assert()
        .success()
        .stdout("| A\n|\n| | B\n");
}

/// Verifies the width guard: a paragraph whose affixes leave no body
/// room fails with the width/prefix/suffix report.
#[test]
fn a_width_narrower_than_the_affixes_fails() {
    refold()
        .arg("w4")
        .write_stdin("#### ab ####\n#### cd ####\n")
        .assert()
        .failure()
        .stdout("refold error:\n<width> (4) <= <prefix> (5) + <suffix> (5)\n");
}

/// Verifies that an unjustifiable paragraph aborts with the
/// "Cannot justify." report.
#[test]
fn justification_failure_names_itself() {
    refold()
        .args(["w6", "j1", "l1"])
        .write_stdin("abcde abcde\n")
        .assert()
        .failure()
        .stdout("refold error:\nCannot justify.\n");
}

/// Verifies that empty input is passed through as empty output with
/// a clean exit.
#[test]
fn empty_input_produces_empty_output() {
    refold().write_stdin("").assert().success().stdout("");
}
