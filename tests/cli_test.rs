use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn gendist() -> Command {
    Command::cargo_bin("gendist").unwrap()
}

/// Project with one package `Foo` and a config pointing the generator at `generator`
fn project_with_generator(generator: &Path) -> TempDir {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir_all(tmp.path().join("Apps/Foo/Src")).unwrap();
    let config = format!(
        r#"
transient_files = []
special_relocations = []

[generator]
executable = "{}"
exclude = []

[[packages]]
name = "Foo"
root = "Apps/Foo/Src"
"#,
        generator.display()
    );
    std::fs::write(tmp.path().join("gendist.toml"), config).unwrap();
    tmp
}

#[cfg(unix)]
fn script(dir: &Path, body: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join("fake_generator.sh");
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

// ─── Help & version ──────────────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    gendist()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("clean"))
        .stdout(predicate::str::contains("packages"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_version_flag() {
    gendist()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gendist"));
}

#[test]
fn test_no_subcommand_shows_help() {
    gendist()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

// ─── Config command ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_defaults() {
    let tmp = TempDir::new().unwrap();
    gendist()
        .args(["config", "show", "-C"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("LinderdaumCore"))
        .stdout(predicate::str::contains("pugixml.hpp"));
}

#[test]
fn test_config_init_refuses_overwrite() {
    let tmp = TempDir::new().unwrap();
    gendist()
        .args(["config", "init", "-C"])
        .arg(tmp.path())
        .assert()
        .success();
    assert!(tmp.path().join("gendist.toml").exists());

    gendist()
        .args(["config", "init", "-C"])
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    gendist()
        .args(["config", "init", "--force", "-C"])
        .arg(tmp.path())
        .assert()
        .success();
}

#[test]
fn test_invalid_config_exit_code() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("gendist.toml"), "packages = 3").unwrap();
    gendist()
        .args(["packages", "-C"])
        .arg(tmp.path())
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Config error"));
}

// ─── Packages command ────────────────────────────────────────────────────────

#[test]
fn test_packages_json() {
    let tmp = project_with_generator(Path::new("/bin/true"));
    gendist()
        .args(["packages", "--format", "json", "-C"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Foo\""))
        .stdout(predicate::str::contains("\"exists\": true"));
}

// ─── Run command ─────────────────────────────────────────────────────────────

#[test]
fn test_run_missing_source_root() {
    let tmp = project_with_generator(Path::new("/bin/true"));
    std::fs::remove_dir_all(tmp.path().join("Apps/Foo/Src")).unwrap();
    gendist()
        .args(["run", "-C"])
        .arg(tmp.path())
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Missing path"));
}

#[test]
fn test_run_missing_generator() {
    let tmp = project_with_generator(Path::new("/nonexistent/generator/xyz"));
    gendist()
        .args(["run", "-C"])
        .arg(tmp.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Generator invocation failed"));
}

#[cfg(unix)]
#[test]
fn test_run_distributes_generated_files() {
    let bin = TempDir::new().unwrap();
    let generator = script(
        bin.path(),
        "mkdir -p Out/LSDC_Foo/Export Out/LSDC_Foo/Serialization\n\
         echo y > Out/LSDC_Foo/Export/Y.h\n\
         echo x > Out/LSDC_Foo/Serialization/X.cpp",
    );
    let tmp = project_with_generator(&generator);

    gendist()
        .args(["run", "--quiet", "-C"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Done."));

    assert!(tmp.path().join("Apps/Foo/Src/Generated/Exports/Y.h").exists());
    assert!(tmp.path().join("Apps/Foo/Src/Generated/Serialization/X.cpp").exists());
    assert!(!tmp.path().join("Out/LSDC_Foo/Export/Y.h").exists());
}

#[cfg(unix)]
#[test]
fn test_run_json_report() {
    let bin = TempDir::new().unwrap();
    let generator = script(bin.path(), "exit 0");
    let tmp = project_with_generator(&generator);

    gendist()
        .args(["run", "--format", "json", "-C"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"stage\": \"done\""))
        .stdout(predicate::str::contains("--package Apps/Foo/Src"));
}

#[cfg(unix)]
#[test]
fn test_run_generator_failure_leaves_package_untouched() {
    let bin = TempDir::new().unwrap();
    let generator = script(bin.path(), "exit 3");
    let tmp = project_with_generator(&generator);
    let existing = tmp.path().join("Apps/Foo/Src/Generated/Exports/Existing.h");
    std::fs::create_dir_all(existing.parent().unwrap()).unwrap();
    std::fs::write(&existing, "keep").unwrap();

    gendist()
        .args(["run", "-C"])
        .arg(tmp.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("exited with status 3"));

    assert!(existing.exists());
}

#[cfg(unix)]
#[test]
fn test_run_lenient_continues() {
    let bin = TempDir::new().unwrap();
    let generator = script(bin.path(), "exit 3");
    let tmp = project_with_generator(&generator);

    gendist()
        .args(["run", "--lenient", "--format", "quiet", "-C"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("done"));
}

// ─── Clean command ───────────────────────────────────────────────────────────

#[test]
fn test_clean_sweeps_shared_output() {
    let tmp = project_with_generator(Path::new("/bin/true"));
    let leftover = tmp.path().join("Out/LSDC_Foo/Export/Leftover.h");
    let ignore = tmp.path().join("Out/LSDC_Foo/.gitignore");
    std::fs::create_dir_all(leftover.parent().unwrap()).unwrap();
    std::fs::write(&leftover, "old").unwrap();
    std::fs::write(&ignore, "*").unwrap();

    gendist()
        .args(["clean", "--format", "quiet", "-C"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1"));

    assert!(!leftover.exists());
    assert!(ignore.exists());
}

#[cfg(unix)]
#[test]
fn test_run_with_relative_project_root() {
    let parent = TempDir::new().unwrap();
    let proj = parent.path().join("proj");
    std::fs::create_dir_all(proj.join("Apps/Foo/Src")).unwrap();
    std::fs::create_dir_all(proj.join("Tools/LSDC")).unwrap();
    let generator = script(
        &proj.join("Tools/LSDC"),
        "mkdir -p Out/LSDC_Foo/Export\necho y > Out/LSDC_Foo/Export/Y.h",
    );
    std::fs::rename(&generator, proj.join("Tools/LSDC/LSDC")).unwrap();
    std::fs::write(
        proj.join("gendist.toml"),
        r#"
transient_files = []
special_relocations = []

[[packages]]
name = "Foo"
root = "Apps/Foo/Src"
"#,
    )
    .unwrap();

    gendist()
        .current_dir(parent.path())
        .args(["run", "--quiet", "-C", "proj"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Done."));

    assert!(proj.join("Apps/Foo/Src/Generated/Exports/Y.h").exists());
}

#[cfg(unix)]
#[test]
fn test_run_json_stdout_is_pure_json() {
    let bin = TempDir::new().unwrap();
    let generator = script(bin.path(), "echo 'LSDC statistics: 42 classes'");
    let tmp = project_with_generator(&generator);

    let output = gendist()
        .args(["run", "--format", "json", "-C"])
        .arg(tmp.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["stage"], "done");
    assert!(String::from_utf8_lossy(&output.stderr).contains("LSDC statistics: 42 classes"));
}
