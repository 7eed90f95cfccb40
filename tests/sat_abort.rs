use std::process::Command;

// The enumerator back-end terminates the whole process on satisfiable
// queries, so these runs are observed from outside.

#[test]
fn satisfiable_query_aborts_with_exit_code_1() {
	let output = Command::new(env!("CARGO_BIN_EXE_musket"))
		.args(["mus", "-m", "count2", "-k", "10"])
		.output()
		.expect("failed to spawn musket");
	assert_eq!(output.status.code(), Some(1));
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("satisfiable"), "stderr was: {}", stderr);
}

#[test]
fn unsatisfiable_query_logs_each_mus_and_succeeds() {
	let output = Command::new(env!("CARGO_BIN_EXE_musket"))
		.args(["mus", "-m", "count2", "-k", "5"])
		.output()
		.expect("failed to spawn musket");
	assert!(output.status.success());
	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.contains("MUS #1"), "stdout was: {}", stdout);
	assert!(stdout.contains("SPEC_"), "stdout was: {}", stdout);
	assert!(stdout.contains("Result: "), "stdout was: {}", stdout);
}

#[test]
fn unknown_model_is_reported() {
	let output = Command::new(env!("CARGO_BIN_EXE_musket"))
		.args(["mus", "-m", "no-such-model", "-k", "5"])
		.output()
		.expect("failed to spawn musket");
	assert_eq!(output.status.code(), Some(1));
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("unknown model"), "stderr was: {}", stderr);
}
