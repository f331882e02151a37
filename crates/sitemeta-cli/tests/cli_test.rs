use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use rstest::rstest;

#[test]
fn test_init_and_build() {
    let dir = tempfile::tempdir().unwrap();

    // Init project
    cargo_bin_cmd!("sitemeta")
        .args(["init", dir.path().to_str().unwrap(), "--name", "demo"])
        .assert()
        .success();

    // Verify generated files exist
    assert!(dir.path().join("sitemeta.yaml").exists());
    assert!(dir.path().join("src/index.md").exists());
    assert!(dir.path().join("src/data/site.json").exists());
    assert!(dir.path().join("src/data/authors/example.yaml").exists());
    assert!(dir.path().join("data/nav.yaml").exists());

    // Validate
    cargo_bin_cmd!("sitemeta")
        .args(["--config", dir.path().to_str().unwrap(), "validate"])
        .assert()
        .success();

    // Build to stdout
    let output = cargo_bin_cmd!("sitemeta")
        .args(["--config", dir.path().to_str().unwrap(), "build", "--compact"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let tree: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(tree["site"]["title"], "demo");
    assert_eq!(tree["authors"][0]["name"], "Example Author");
    assert_eq!(tree["nav"]["primary"][1]["url"], "/about/");
}

#[test]
fn test_init_refuses_existing_project() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("sitemeta.yaml"), "name: existing\n").unwrap();

    cargo_bin_cmd!("sitemeta")
        .args(["init", dir.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already contains"));
}

#[test]
fn test_build_to_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("src")).unwrap();
    std::fs::write(
        dir.path().join("sitemeta.yaml"),
        "name: out\nmetadata:\n  site: ./src/site.toml\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("src/site.toml"), "title = \"Out\"\n").unwrap();
    let out = dir.path().join("metadata.json");

    cargo_bin_cmd!("sitemeta")
        .args([
            "--config",
            dir.path().to_str().unwrap(),
            "build",
            "--output",
            out.to_str().unwrap(),
        ])
        .assert()
        .success();

    let tree: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(tree, serde_json::json!({"site": {"title": "Out"}}));
}

#[rstest]
#[case::malformed_json("build", "./src/bad.json", Some("{invalid"), "bad.json")]
#[case::malformed_toml("build", "./src/bad.toml", Some("title = "), "bad.toml")]
#[case::missing_external("build", "./data/missing.yaml", None, "missing.yaml")]
#[case::unsupported_on_validate("validate", "./README.md", None, "unsupported data format")]
#[case::unsupported_on_build("build", "./src/notes.txt", Some("text"), "unsupported data format")]
fn test_bad_source_fails(
    #[case] command: &str,
    #[case] source: &str,
    #[case] contents: Option<&str>,
    #[case] expected: &str,
) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("src")).unwrap();
    std::fs::write(
        dir.path().join("sitemeta.yaml"),
        format!("name: bad\nmetadata:\n  bad: {source}\n"),
    )
    .unwrap();
    if let Some(contents) = contents {
        std::fs::write(dir.path().join(source), contents).unwrap();
    }

    cargo_bin_cmd!("sitemeta")
        .args(["--config", dir.path().to_str().unwrap(), command])
        .assert()
        .failure()
        .stderr(predicate::str::contains(expected));
}
