use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn amazed(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_amazed"))
        .args(args)
        .output()
        .expect("Failed to execute amazed")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_solve_corridor() {
    let map = fixture("corridor.map");
    let output = amazed(&["solve", map.to_str().unwrap(), "--executor", "inline"]);

    let stdout = stdout(&output);
    assert!(
        output.status.success(),
        "stderr: {}\nstdout: {}",
        String::from_utf8_lossy(&output.stderr),
        stdout
    );
    assert!(stdout.contains("Solving maze"), "Should announce the maze");
    assert!(
        stdout.contains("Path found (2 steps): 6 -> 7 -> 8"),
        "Should print the path"
    );
    assert!(stdout.contains("Search Statistics"), "Should print statistics");
}

#[test]
fn test_solve_show_renders_path() {
    let map = fixture("branches.map");
    let output = amazed(&[
        "solve",
        map.to_str().unwrap(),
        "--executor",
        "pool",
        "-j",
        "2",
        "--fork-after",
        "2",
        "--show",
    ]);

    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("Executor: pool (2 workers)"));
    assert!(stdout.contains('+'), "Rendered map should mark the path");
    assert!(stdout.contains('@') && stdout.contains('$'));
}

#[test]
fn test_solve_sequential_threads() {
    let map = fixture("branches.map");
    let output = amazed(&[
        "solve",
        map.to_str().unwrap(),
        "--executor",
        "threads",
        "--sequential",
    ]);

    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("Fork after: never"));
    assert!(stdout.contains("Tasks spawned: 1"));
}

#[test]
fn test_solve_no_path_exit_code() {
    let map = fixture("walled.map");
    let output = amazed(&["solve", map.to_str().unwrap(), "-f", "1"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).contains("No path found."));
}

#[test]
fn test_solve_bad_map() {
    let map = fixture("bad.map");
    let output = amazed(&["solve", map.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid maze map"));
    assert!(stderr.contains("unknown glyph '#' at line 2, column 4"));
}

#[test]
fn test_solve_missing_file() {
    let output = amazed(&["solve", "/nonexistent/amazed.map"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to read maze map"));
}

#[test]
fn test_generate_is_reproducible() {
    let a = amazed(&["generate", "--width", "15", "--height", "7", "--seed", "5"]);
    let b = amazed(&["generate", "--width", "15", "--height", "7", "--seed", "5"]);

    assert!(a.status.success());
    assert_eq!(a.stdout, b.stdout);

    let text = stdout(&a);
    assert_eq!(text.lines().count(), 7);
    assert!(text.lines().all(|l| l.chars().count() == 15));
    assert!(text.contains('@') && text.contains('$'));
}

#[test]
fn test_generate_too_small() {
    let output = amazed(&["generate", "--width", "2", "--height", "2"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("too small"));
}
