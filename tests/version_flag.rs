use std::process::Command;

#[test]
fn prints_version() {
    let exe = env!("CARGO_BIN_EXE_blog-cards");
    let output = Command::new(exe)
        .arg("--version")
        .output()
        .expect("run blog-cards --version");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout utf8");
    assert!(
        stdout.contains(env!("CARGO_PKG_VERSION")),
        "stdout was: {}",
        stdout.trim()
    );
}

#[test]
fn prints_help() {
    let exe = env!("CARGO_BIN_EXE_blog-cards");
    let output = Command::new(exe)
        .arg("--help")
        .output()
        .expect("run blog-cards --help");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout utf8");
    assert!(stdout.contains("blog-cards"));
    assert!(stdout.contains("--version"));
    assert!(stdout.contains("--topic"));
}

#[test]
fn rejects_unknown_flags() {
    let exe = env!("CARGO_BIN_EXE_blog-cards");
    let output = Command::new(exe)
        .arg("--colour")
        .output()
        .expect("run blog-cards --colour");
    assert!(!output.status.success());
}

#[test]
fn overflow_without_topic_is_rejected() {
    let exe = env!("CARGO_BIN_EXE_blog-cards");
    let output = Command::new(exe)
        .arg("--overflow")
        .output()
        .expect("run blog-cards --overflow");
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("stderr utf8");
    assert!(stderr.contains("--overflow requires --topic"), "stderr was: {stderr}");
}
