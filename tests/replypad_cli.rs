use std::process::Command;

fn combined_output(output: &std::process::Output) -> String {
    let mut combined = String::new();
    combined.push_str(&String::from_utf8_lossy(&output.stdout));
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    combined
}

fn replypad_bin() -> &'static str {
    option_env!("CARGO_BIN_EXE_replypad").expect("replypad test binary not built")
}

#[test]
fn replypad_help_mentions_name() {
    let output = Command::new(replypad_bin())
        .arg("--help")
        .output()
        .expect("run replypad --help");
    assert!(output.status.success());
    let combined = combined_output(&output);
    assert!(combined.contains("Replypad"));
}

#[test]
fn replypad_demo_commits_the_canned_reply() {
    let output = Command::new(replypad_bin())
        .args(["--reply-latency-ms", "50", "--step-ms", "10"])
        .output()
        .expect("run replypad demo");
    assert!(output.status.success());
    let combined = combined_output(&output);
    assert!(combined.contains("session transcript:"));
    assert!(combined.contains("Thank you for the opportunity"));
    assert!(combined.contains("field content: Thank you for the opportunity"));
}

#[test]
fn replypad_close_early_leaves_field_unchanged() {
    let output = Command::new(replypad_bin())
        .args(["--close-early", "--reply-latency-ms", "100", "--step-ms", "10"])
        .output()
        .expect("run replypad --close-early");
    assert!(output.status.success());
    let combined = combined_output(&output);
    assert!(combined.contains("field content: (unchanged)"));
    assert!(!combined.contains(r#""role": "assistant""#));
}

#[test]
fn replypad_rejects_out_of_range_latency() {
    let output = Command::new(replypad_bin())
        .args(["--reply-latency-ms", "600000"])
        .output()
        .expect("run replypad with bad latency");
    assert!(!output.status.success());
    let combined = combined_output(&output);
    assert!(combined.contains("--reply-latency-ms"));
}
