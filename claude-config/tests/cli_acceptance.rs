use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

struct CliTestEnv {
    _temp_dir: TempDir,
    home: PathBuf,
    xdg_config: PathBuf,
    xdg_state: PathBuf,
    project: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let home = base.join("home");
        let xdg_config = base.join("xdg-config");
        let xdg_state = base.join("xdg-state");
        let project = base.join("project");

        fs::create_dir_all(&home).expect("failed to create HOME");
        fs::create_dir_all(&xdg_config).expect("failed to create XDG_CONFIG_HOME");
        fs::create_dir_all(&xdg_state).expect("failed to create XDG_STATE_HOME");
        fs::create_dir_all(&project).expect("failed to create project dir");

        Self {
            _temp_dir: temp_dir,
            home,
            xdg_config,
            xdg_state,
            project,
        }
    }

    /// Same environment with the Korean fixture session installed.
    fn with_session() -> Self {
        let env = Self::new();
        seed_claude_fixture(&env.home);
        env
    }
}

fn seed_claude_fixture(home: &Path) {
    let source = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../claude-config-core/tests/fixtures/claude-code/korean-session.jsonl");
    let target = home
        .join(".claude/projects/-home-user-app")
        .join("korean-session.jsonl");

    fs::create_dir_all(target.parent().expect("missing fixture parent"))
        .expect("failed to create fixture directories");
    fs::copy(source, target).expect("failed to copy fixture");
}

fn run_bin(env: &CliTestEnv, args: &[&str]) -> Output {
    let bin_path = PathBuf::from(assert_cmd::cargo::cargo_bin!("claude-config"));

    Command::new(bin_path)
        .args(args)
        .current_dir(&env.project)
        .env("HOME", &env.home)
        .env("XDG_CONFIG_HOME", &env.xdg_config)
        .env("XDG_STATE_HOME", &env.xdg_state)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("failed to execute claude-config: {e}"))
}

fn assert_success(args: &[&str], output: &Output) {
    assert!(
        output.status.success(),
        "claude-config {:?} failed\nstdout:\n{}\nstderr:\n{}",
        args,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn run_ok(env: &CliTestEnv, args: &[&str]) -> String {
    let output = run_bin(env, args);
    assert_success(args, &output);
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn help_lists_subcommands() {
    let env = CliTestEnv::new();
    let stdout = run_ok(&env, &["--help"]);

    for command in ["init", "analyze", "learn", "hooks", "handoff"] {
        assert!(stdout.contains(command), "missing {command} in help:\n{stdout}");
    }
}

#[test]
fn analyze_without_logs_reports_no_data() {
    let env = CliTestEnv::new();
    let stdout = run_ok(&env, &["analyze"]);
    assert!(stdout.contains("No conversations found."));
}

#[test]
fn analyze_exports_json() {
    let env = CliTestEnv::with_session();
    let export = env.project.join("analysis.json");
    let export_arg = export.to_string_lossy().into_owned();

    let stdout = run_ok(&env, &["analyze", "-l", "5", "-o", &export_arg]);
    assert!(stdout.contains("Analyzed 1 sessions"));
    assert!(stdout.contains("Corrections: 2"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&export).expect("export written"))
            .expect("valid JSON");
    assert_eq!(json["conversations"], 1);
    assert_eq!(json["report"]["edit_patterns"]["total_edits"], 2);
    assert_eq!(json["tool_usage"][0]["label"], "Edit");
}

#[test]
fn init_writes_document_and_backs_up() {
    let env = CliTestEnv::with_session();

    run_ok(&env, &["init", "-y"]);
    let path = env.project.join("CLAUDE.md");
    let content = fs::read_to_string(&path).expect("CLAUDE.md written");
    assert!(content.starts_with("# CLAUDE.md"));
    assert!(content.contains("### 말투 교정 이력"));
    assert!(content.contains("## 최근 학습 (Recent)"));

    let stdout = run_ok(&env, &["init", "-y"]);
    assert!(stdout.contains("Backed up existing file"));
    assert!(env.project.join("CLAUDE.md.backup").exists());
}

#[test]
fn learn_previews_then_applies() {
    let env = CliTestEnv::with_session();
    let path = env.project.join("CLAUDE.md");
    fs::write(&path, "# Project\n\n## 영구 규칙 (Permanent)\n- 기존 규칙\n").unwrap();

    let stdout = run_ok(&env, &["learn"]);
    assert!(stdout.contains("# CLAUDE.md 업데이트 리포트"));
    assert!(stdout.contains("말투 관련 교정 1회 감지"));
    assert!(stdout.contains("Run with --apply"));
    assert!(!fs::read_to_string(&path).unwrap().contains("말투 규칙"));

    let stdout = run_ok(&env, &["learn", "--apply", "-y"]);
    assert!(stdout.contains("(1 added)"));
    let updated = fs::read_to_string(&path).unwrap();
    assert!(updated.contains("- 기존 규칙\n\n### ["));
    assert!(updated.contains("- 반말 사용 금지"));

    // Second run finds nothing new
    let stdout = run_ok(&env, &["learn", "--apply", "-y"]);
    assert!(stdout.contains("Nothing new to add"));
    assert_eq!(fs::read_to_string(&path).unwrap(), updated);
}

#[test]
fn learn_without_logs_reports_no_data() {
    let env = CliTestEnv::new();
    let stdout = run_ok(&env, &["learn"]);
    assert!(stdout.contains("No conversations to learn from."));
}

#[test]
fn hooks_lifecycle() {
    let env = CliTestEnv::new();
    let settings = env.project.join(".claude/settings.json");

    let stdout = run_ok(&env, &["hooks", "list"]);
    assert!(stdout.contains("No hooks configured"));

    run_ok(&env, &["hooks", "init"]);
    assert!(settings.exists());
    let stdout = run_ok(&env, &["hooks", "init"]);
    assert!(stdout.contains("already initialized"));

    run_ok(&env, &["hooks", "add", "lint-js"]);
    run_ok(&env, &["hooks", "add", "no-force-push", "--event", "preToolUse"]);
    run_ok(
        &env,
        &["hooks", "add-custom", "--matcher", "Write", "--command", "echo hi"],
    );

    let stdout = run_ok(&env, &["hooks", "list"]);
    assert!(stdout.contains("npx eslint $FILE"));
    assert!(stdout.contains("echo hi"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&settings).unwrap()).unwrap();
    assert_eq!(json["hooks"]["preToolUse"][0]["matcher"], "Bash");
    assert_eq!(json["hooks"]["postToolUse"].as_array().unwrap().len(), 2);

    let stdout = run_ok(&env, &["hooks", "remove", "Write"]);
    assert!(stdout.contains("Removed"));
    let stdout = run_ok(&env, &["hooks", "remove", "Write"]);
    assert!(stdout.contains("No postToolUse hooks found"));

    let output = run_bin(&env, &["hooks", "add", "lint-cobol"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown hook template"));
}

#[test]
fn hooks_suggest_uses_project_dir() {
    let env = CliTestEnv::new();
    let other = env.home.join("py-project");
    fs::create_dir_all(&other).unwrap();
    fs::write(other.join("pyproject.toml"), "[project]\n").unwrap();
    let other_arg = other.to_string_lossy().into_owned();

    let stdout = run_ok(&env, &["hooks", "suggest", "--project-dir", &other_arg]);
    assert!(stdout.contains("lint-python"));
    assert!(stdout.contains("test-python"));

    let stdout = run_ok(&env, &["hooks", "templates"]);
    assert!(stdout.contains("type-check"));
}

#[test]
fn handoff_latest_and_quick() {
    let env = CliTestEnv::with_session();

    let stdout = run_ok(&env, &["handoff", "-n", "배포 대기"]);
    assert!(stdout.contains("Created handoff"));
    let md = fs::read_to_string(env.project.join("HANDOFF.md")).unwrap();
    assert!(md.contains("> 세션 ID: korean-session"));
    assert!(md.contains("배포 대기"));

    let stdout = run_ok(&env, &["handoff", "-s", "no-such-session"]);
    assert!(stdout.contains("Session not found: no-such-session"));

    let quick = env.project.join("quick.md");
    let quick_arg = quick.to_string_lossy().into_owned();
    run_ok(&env, &["handoff", "--quick", "-n", "절반 완료", "-o", &quick_arg]);
    assert!(fs::read_to_string(&quick).unwrap().contains("## 현재 상태\n\n절반 완료"));

    let output = run_bin(&env, &["handoff", "--quick"]);
    assert!(!output.status.success());
}

#[test]
fn handoff_without_sessions() {
    let env = CliTestEnv::new();
    let stdout = run_ok(&env, &["handoff"]);
    assert!(stdout.contains("No sessions found."));
    assert!(!env.project.join("HANDOFF.md").exists());
}
