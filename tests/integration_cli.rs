// Binary-level checks that don't need a TTY: help output, the non-tty
// guard, and configuration validation, which all run before the
// alternate screen is entered.

use assert_cmd::Command;

#[test]
fn help_describes_the_headline() {
    let output = Command::cargo_bin("marquee")
        .unwrap()
        .arg("--help")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("typewriter"));
    assert!(stdout.contains("--word"));
    assert!(stdout.contains("--font"));
}

#[test]
fn refuses_to_run_without_a_tty() {
    let output = Command::cargo_bin("marquee").unwrap().output().unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("stdin must be a tty"));
}

#[test]
fn rejects_zero_type_interval_before_entering_the_tui() {
    let output = Command::cargo_bin("marquee")
        .unwrap()
        .args(["--type-interval-ms", "0"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("type interval"));
}

#[test]
fn rejects_zero_caret_blink() {
    let output = Command::cargo_bin("marquee")
        .unwrap()
        .args(["--caret-blink-ms", "0"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("caret blink"));
}

#[test]
fn unknown_font_value_is_rejected_by_the_parser() {
    let output = Command::cargo_bin("marquee")
        .unwrap()
        .args(["--font", "comic-sans"])
        .output()
        .unwrap();

    assert!(!output.status.success());
}
