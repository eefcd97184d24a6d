//! End-to-end smoke tests for the pjbuild binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn pjbuild() -> Command {
  Command::cargo_bin("pjbuild").unwrap()
}

#[test]
fn help_lists_subcommands() {
  pjbuild()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("source"))
    .stdout(predicate::str::contains("plan"))
    .stdout(predicate::str::contains("build"))
    .stdout(predicate::str::contains("package"))
    .stdout(predicate::str::contains("info"));
}

#[test]
fn plan_with_defaults_derives_the_default_flags() {
  pjbuild()
    .arg("plan")
    .assert()
    .success()
    .stdout(predicate::str::contains("--disable-install-examples"))
    .stdout(predicate::str::contains("--enable-ext-sound"))
    .stdout(predicate::str::contains("--disable-video"))
    .stdout(predicate::str::contains("--disable-shared"))
    .stdout(predicate::str::contains("--disable-uuid").not())
    .stdout(predicate::str::contains("bash_cv_wcwidth_broken").not())
    .stdout(predicate::str::contains("openssl"));
}

#[test]
fn plan_json_matches_the_option_mapping() {
  let output = pjbuild()
    .args([
      "plan",
      "--no-uuid",
      "--samplerate",
      "--format",
      "json",
    ])
    .output()
    .unwrap();
  assert!(output.status.success());

  let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  let args: Vec<&str> = plan["configure_args"]
    .as_array()
    .unwrap()
    .iter()
    .map(|v| v.as_str().unwrap())
    .collect();

  assert!(args.contains(&"--disable-uuid"));
  assert!(args.contains(&"--enable-libsamplerate"));
  assert!(args.contains(&"--disable-video"));
  assert!(args.contains(&"--enable-ext-sound"));
  assert!(args.contains(&"--disable-install-examples"));
  assert!(!args.contains(&"--disable-floating-point"));
  assert_eq!(plan["cross"], false);

  let deps: Vec<&str> = plan["dependencies"]
    .as_array()
    .unwrap()
    .iter()
    .map(|d| d["name"].as_str().unwrap())
    .collect();
  assert_eq!(deps, vec!["openssl", "libsamplerate"]);
}

#[test]
fn plan_for_a_cross_build_adds_the_wcwidth_workaround() {
  // 32-bit ARM is foreign to any host this test realistically runs on
  pjbuild()
    .args(["plan", "--target", "armv7-unknown-linux-gnueabihf"])
    .assert()
    .success()
    .stdout(predicate::str::contains("bash_cv_wcwidth_broken=yes"))
    .stdout(predicate::str::contains("--host=armv7-unknown-linux-gnueabihf"));
}

#[test]
fn info_reports_fixed_lookup_names_for_an_empty_package() {
  let temp = tempfile::tempdir().unwrap();

  pjbuild()
    .args(["info", "--work-dir"])
    .arg(temp.path())
    .arg("--format")
    .arg("json")
    .assert()
    .success()
    .stdout(predicate::str::contains("\"cmake_file_name\": \"pjproject\""))
    .stdout(predicate::str::contains("\"pkg_config_name\": \"libpjproject\""));
}

#[test]
fn source_command_rejects_an_unknown_version() {
  let temp = tempfile::tempdir().unwrap();
  let recipe = temp.path().join("sources.toml");
  std::fs::write(
    &recipe,
    "[sources.\"2.15.1\"]\nurl = \"http://invalid.invalid/a.tar.gz\"\nsha256 = \"00\"\n",
  )
  .unwrap();

  pjbuild()
    .args(["source", "--recipe"])
    .arg(&recipe)
    .args(["--pjsip-version", "9.9.9"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("no source declared for version 9.9.9"));
}
