// Minimal integration test that drives the compiled binary through a PTY.
// This exercises the real event loop, font loading and terminal teardown
// without relying on internal modules.
//
// Notes:
// - Requires a TTY; uses expectrl which allocates a pseudo terminal.
// - Marked Unix-only and ignored by default to avoid CI/platform issues.
// - Run manually via: `cargo test --test integration_pty -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn auto_exit_run_terminates_cleanly() -> Result<(), Box<dyn std::error::Error>> {
    // Resolve path to compiled binary (debug build during tests)
    let bin = assert_cmd::cargo::cargo_bin("marquee");
    let cmd = format!("{} -s 1 --in-order -w tester", bin.display());

    // Spawn the TUI inside a pseudo terminal; it should exit on its own
    // after the one-second auto-exit timer.
    let mut p = spawn(cmd)?;
    p.expect(Eof)?;
    Ok(())
}

#[test]
#[ignore]
fn escape_quits_an_interactive_run() -> Result<(), Box<dyn std::error::Error>> {
    let bin = assert_cmd::cargo::cargo_bin("marquee");
    let cmd = format!("{} --in-order -w tester", bin.display());

    let mut p = spawn(cmd)?;

    // Give the app a moment to initialize the terminal/alternate screen
    std::thread::sleep(Duration::from_millis(300));

    // Send ESC to exit
    p.send("\x1b")?;

    // Wait for the program to terminate cleanly
    p.expect(Eof)?;
    Ok(())
}
