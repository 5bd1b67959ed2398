use std::fs;
use std::path::Path;
use assert_cmd::Command;

fn bikes(dir: &Path, args: &[&str]) -> std::process::Output {
    Command::cargo_bin("bikes")
        .unwrap()
        .current_dir(dir)
        .env("RUST_LOG", "off")
        .env_remove("BIKES__CATALOG__PATH")
        .arg("--file")
        .arg(dir.join("shop.txt"))
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_build_catalog_from_scratch() {
    let dir = tempfile::tempdir().unwrap();

    assert!(bikes(dir.path(), &["add-part", "SP1", "--name", "Spoke", "--cost", "2"]).status.success());
    assert!(bikes(dir.path(), &["add-part", "RM1", "--name", "Rim", "--cost", "60"]).status.success());
    assert!(bikes(
        dir.path(),
        &["add-compound", "WH1", "--name", "Wheel", "--components", "SP1:32,RM1:1"]
    )
    .status
    .success());

    assert_eq!(
        fs::read_to_string(dir.path().join("shop.txt")).unwrap(),
        "RM1, Rim, 60\nSP1, Spoke, 2\nWH1, Wheel, 124, SP1:32,RM1:1\n"
    );

    let cost = bikes(dir.path(), &["cost", "WH1"]);
    assert_eq!(stdout(&cost).trim(), "124");

    let deps = bikes(dir.path(), &["deps", "WH1"]);
    assert_eq!(stdout(&deps), "SP1\nRM1\n");
}

#[test]
fn test_refusals_leave_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("shop.txt");
    fs::write(&file, "SP1, Spoke, 2\nWH1, Wheel, 0, SP1:32\n").unwrap();
    let before = fs::read_to_string(&file).unwrap();

    let removed = bikes(dir.path(), &["remove", "SP1"]);
    assert!(!removed.status.success());
    assert!(String::from_utf8_lossy(&removed.stderr).contains("SP1 is used by WH1"));

    assert!(!bikes(dir.path(), &["add-part", "SP1"]).status.success());
    assert!(!bikes(dir.path(), &["set-cost", "WH1", "10"]).status.success());
    assert!(!bikes(dir.path(), &["set-components", "WH1", "SP1:2,XX"]).status.success());

    assert_eq!(fs::read_to_string(&file).unwrap(), before);
}

#[test]
fn test_list_json() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("shop.txt"), "SP1, Spoke, 2\nWH1, Wheel, 0, SP1:32\n").unwrap();

    let output = bikes(dir.path(), &["list", "--format", "json"]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json[1]["id"], "WH1");
    assert_eq!(json[1]["kind"], "COMPOUND");
    assert_eq!(json[1]["cost"], 64);
    assert_eq!(json[0]["components"].as_array().unwrap().len(), 0);
}
