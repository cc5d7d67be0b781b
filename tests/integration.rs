//! Integration tests for the gamma binary.
//!
//! Spawns the binary, feeds batch commands on stdin and checks stdout and
//! stderr like a batch client would.

use std::io::Write;
use std::process::{Command, Stdio};

struct Output {
    stdout: String,
    stderr: String,
}

/// Sends `script` to the binary's stdin and collects both output streams.
fn run_gamma(script: &str) -> Output {
    let exe = env!("CARGO_BIN_EXE_gamma");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to start gamma");

    let mut stdin = child.stdin.take().unwrap();
    stdin.write_all(script.as_bytes()).unwrap();
    drop(stdin);

    let output = child.wait_with_output().expect("failed to wait on child");
    assert!(output.status.success());
    Output {
        stdout: String::from_utf8(output.stdout).unwrap(),
        stderr: String::from_utf8(output.stderr).unwrap(),
    }
}

#[test]
fn batch_session_answers_every_command() {
    let out = run_gamma(
        "B 4 4 2 1\n\
         m 1 0 0\n\
         m 1 1 0\n\
         m 1 3 3\n\
         m 2 3 3\n\
         b 1\n\
         f 1\n\
         q 1\n\
         p\n",
    );
    assert_eq!(out.stdout, "OK 1\n1\n1\n0\n1\n2\n3\n1\n...2\n....\n....\n11..\n");
    assert_eq!(out.stderr, "");
}

#[test]
fn invalid_lines_report_their_number_on_stderr() {
    let out = run_gamma(
        "m 1 0 0\n\
         B 3 3 2 1\n\
         B 3 3 2 1\n\
         m 1 0\n\
         x 1 2 3\n\
         m 1 -1 0\n\
         \x20\n\
         b 1\n",
    );
    assert_eq!(out.stdout, "OK 2\n0\n");
    assert_eq!(out.stderr, "ERROR 1\nERROR 3\nERROR 4\nERROR 5\nERROR 6\nERROR 7\n");
}

#[test]
fn comments_and_empty_lines_are_ignored() {
    let out = run_gamma("# a comment\n\nB 2 2 2 2\n# another\nb 2\n");
    assert_eq!(out.stdout, "OK 3\n0\n");
    assert_eq!(out.stderr, "");
}

#[test]
fn invalid_game_parameters_are_an_error() {
    let out = run_gamma("B 0 5 2 2\nB 5 5 0 2\nB 5 5 2 0\nB 2 2 2 2\n");
    assert_eq!(out.stdout, "OK 4\n");
    assert_eq!(out.stderr, "ERROR 1\nERROR 2\nERROR 3\n");
}

#[test]
fn golden_move_over_protocol() {
    let out = run_gamma(
        "B 3 3 2 2\n\
         m 1 0 0\n\
         q 1\n\
         q 2\n\
         g 2 0 0\n\
         g 2 0 0\n\
         q 2\n\
         p\n",
    );
    assert_eq!(out.stdout, "OK 1\n1\n0\n1\n1\n0\n0\n...\n...\n2..\n");
}

#[test]
fn wide_player_numbers_are_padded() {
    let out = run_gamma("B 2 1 10 1\nm 10 1 0\nm 3 0 0\np\n");
    assert_eq!(out.stdout, "OK 1\n1\n1\n 3 10\n");
}

#[test]
fn eof_without_game_exits_cleanly() {
    let out = run_gamma("");
    assert_eq!(out.stdout, "");
    assert_eq!(out.stderr, "");
}

#[test]
fn reads_commands_from_file_argument() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "B 2 2 1 1\nm 1 1 1\nf 1\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_gamma"))
        .arg(file.path())
        .stdin(Stdio::null())
        .output()
        .expect("failed to run gamma");
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "OK 1\n1\n2\n");
}

#[test]
fn missing_input_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_gamma"))
        .arg(dir.path().join("missing.txt"))
        .stdin(Stdio::null())
        .output()
        .expect("failed to run gamma");
    assert!(!output.status.success());
    assert!(String::from_utf8(output.stderr).unwrap().starts_with("gamma:"));
}

#[test]
fn playout_binary_writes_jsonl() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("games.jsonl");
    let output = Command::new(env!("CARGO_BIN_EXE_playout"))
        .args(["--games", "3", "--width", "6", "--height", "5", "--players", "3"])
        .args(["--areas", "2", "--threads", "1", "--seed", "7", "--quiet", "--output"])
        .arg(&path)
        .output()
        .expect("failed to run playout");
    assert!(output.status.success());

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 3);
    for line in text.lines() {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(value["summary"]["config"]["players"], 3);
    }
}
