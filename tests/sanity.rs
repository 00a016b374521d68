//! End-to-end tests driving the `kui-probe` binary directly, the way a
//! real caller would: raw bytes on stdin, decoded/expanded keys on
//! stdout.

use assert_cmd::Command;
use std::process::Output;

#[test]
fn unmapped_bytes_pass_through_unchanged() {
    let output: Output = Command::cargo_bin("kui-probe")
        .unwrap()
        .write_stdin(b"hello".to_vec())
        .output()
        .unwrap();
    assert_eq!(output.stdout, b"hello");
}

#[test]
fn registered_macro_expands_on_stdout() {
    let output: Output = Command::cargo_bin("kui-probe")
        .unwrap()
        .arg("--map")
        .arg("<C-a>=hello")
        .write_stdin(vec![0x01u8])
        .output()
        .unwrap();
    assert_eq!(output.stdout, b"hello");
}

#[test]
fn map_file_loads_multiple_entries() {
    let dir = std::env::temp_dir().join(format!("kui-probe-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let map_path = dir.join("macros.kui");
    std::fs::write(&map_path, "# a comment\njj=<Esc>\nx=y\n").unwrap();

    let output: Output = Command::cargo_bin("kui-probe")
        .unwrap()
        .arg("--map-file")
        .arg(&map_path)
        .write_stdin(b"x".to_vec())
        .output()
        .unwrap();
    assert_eq!(output.stdout, b"y");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn echo_names_prints_tag_syntax_for_raw_bytes() {
    let output: Output = Command::cargo_bin("kui-probe")
        .unwrap()
        .arg("--echo-names")
        .write_stdin(b"a".to_vec())
        .output()
        .unwrap();
    assert_eq!(String::from_utf8(output.stdout).unwrap().trim(), "a");
}

#[test]
fn escape_sequence_decodes_before_macro_expansion() {
    // ESC [ A is the xterm "cursor up" sequence; map the resulting
    // symbolic <Up> key onto a literal byte to prove the cascade runs
    // terminal decoding before user macros, not instead of it.
    let output: Output = Command::cargo_bin("kui-probe")
        .unwrap()
        .arg("--map")
        .arg("<Up>=G")
        .write_stdin(vec![0x1b, b'[', b'A'])
        .output()
        .unwrap();
    assert_eq!(output.stdout, b"G");
}

#[test]
fn malformed_map_file_entry_exits_nonzero() {
    let dir = std::env::temp_dir().join(format!("kui-probe-test-bad-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let map_path = dir.join("missing.kui");
    // Point at a file that does not exist; loading should fail, not hang.
    std::fs::remove_file(&map_path).ok();

    let output: Output = Command::cargo_bin("kui-probe")
        .unwrap()
        .arg("--map-file")
        .arg(&map_path)
        .write_stdin(Vec::new())
        .output()
        .unwrap();
    assert!(!output.status.success());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn stats_json_is_emitted_on_exit() {
    let output: Output = Command::cargo_bin("kui-probe")
        .unwrap()
        .arg("--stats-json")
        .write_stdin(b"ab".to_vec())
        .output()
        .unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("\"keys_resolved\""), "stderr was: {stderr}");
}
