//! Integration tests for top-level CLI behavior.

use std::path::PathBuf;
use std::process::Command;

fn run_devlens(args: &[&str], home: Option<&PathBuf>) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_devlens");
    let mut cmd = Command::new(bin);
    cmd.args(args).env_remove("DEVLENS_RECORD").env_remove("DEVLENS_CONFIG");
    if let Some(home) = home {
        cmd.env("DEVLENS_HOME", home);
    }
    cmd.output().expect("failed to run devlens binary")
}

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("devlens_cli_{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn schema_prints_entities_as_json() {
    let dir = scratch("schema");
    let file = dir.join("schema.prisma");
    std::fs::write(&file, "model User {\n  id Int @id\n  posts Post[]\n}\n").unwrap();

    let output = run_devlens(&["schema", file.to_str().unwrap()], None);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let entities: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(entities[0]["name"], "User");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn schema_needs_dialect_for_unknown_names() {
    let dir = scratch("schema_dialect");
    let file = dir.join("models.txt");
    std::fs::write(&file, "class Post(models.Model):\n    title = models.CharField(max_length=9)\n").unwrap();

    let output = run_devlens(&["schema", file.to_str().unwrap()], None);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--dialect"));

    let output = run_devlens(&["schema", file.to_str().unwrap(), "--dialect", "django"], None);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Post"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn outline_file_prints_symbols() {
    let dir = scratch("outline");
    let file = dir.join("app.py");
    std::fs::write(&file, "class Greeter:\n    def greet(self):\n        pass\n").unwrap();

    let output = run_devlens(&["outline-file", file.to_str().unwrap()], None);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("Greeter"));
    assert!(stdout.contains("greet"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn list_with_empty_store() {
    let home = scratch("list");
    let output = run_devlens(&["list"], Some(&home));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("No projects imported."));
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn import_rejects_non_github_urls() {
    let home = scratch("import");
    let output = run_devlens(&["import", "https://gitlab.com/acme/widgets"], Some(&home));
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid GitHub repository URL"));
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn help_lists_subcommands() {
    let output = run_devlens(&["--help"], None);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    for name in ["import", "sync", "outline", "analyze", "schema"] {
        assert!(stdout.contains(name), "{name}");
    }
}

#[test]
fn version_prints_to_stdout() {
    let output = run_devlens(&["--version"], None);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn invalid_subcommand_exits_with_error() {
    let output = run_devlens(&["nonsense"], None);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("unrecognized subcommand"));
}
