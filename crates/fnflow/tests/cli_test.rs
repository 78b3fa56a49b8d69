#![allow(deprecated)] // TODO: cargo_bin → cargo_bin_cmd! へ移行

use assert_cmd::Command;
use predicates::prelude::*;

const SETTINGS_VARS: [&str; 11] = [
    "COMPARTMENT_ID",
    "COMPARTMENT_NAME",
    "OCIR_FN_IMAGE",
    "FN_PAYLOAD",
    "FN_RUN_NAME",
    "FN_MEMORY_MB",
    "FN_TIMEOUT_SECONDS",
    "AVAILABILITY_DOMAIN",
    "OCI_CONFIG_PATH",
    "OCI_CONFIG_PROFILE",
    "DEBUG",
];

/// 環境変数を消した状態の fnflow コマンド
fn fnflow() -> Command {
    let mut cmd = Command::cargo_bin("fnflow").unwrap();
    for var in SETTINGS_VARS {
        cmd.env_remove(var);
    }
    // oci CLI が呼ばれたら失敗させる
    cmd.env("PATH", "/nonexistent");
    cmd
}

/// CLIヘルプが正しく表示されることを確認
#[test]
fn test_cli_help() {
    fnflow()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("setup"))
        .stdout(predicate::str::contains("invoke"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("teardown"));
}

/// バージョン表示は設定なしで動作することを確認
#[test]
fn test_cli_version() {
    fnflow()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fnflow"));
}

/// setupコマンドのヘルプが正しく表示されることを確認
#[test]
fn test_setup_help() {
    fnflow()
        .arg("setup")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--image"))
        .stdout(predicate::str::contains("--name"));
}

/// teardownコマンドのヘルプが正しく表示されることを確認
#[test]
fn test_teardown_help() {
    fnflow()
        .arg("teardown")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--yes"));
}

/// 不正なコマンドでエラーになることを確認
#[test]
fn test_invalid_command() {
    fnflow().arg("invalid-command").assert().failure();
}

/// コンパートメント未設定ではどのコマンドも失敗することを確認
#[test]
fn test_missing_compartment() {
    for command in ["setup", "invoke", "status", "teardown"] {
        fnflow()
            .arg(command)
            .assert()
            .failure()
            .stderr(predicate::str::contains("COMPARTMENT_ID"));
    }
}

/// イメージ未設定の setup はリモート呼び出し前に失敗することを確認
#[test]
fn test_setup_without_image() {
    fnflow()
        .env("COMPARTMENT_ID", "ocid1.compartment.oc1..test")
        .arg("setup")
        .assert()
        .failure()
        .stderr(predicate::str::contains("OCIR_FN_IMAGE"))
        .stderr(predicate::str::contains("oci CLI").not());
}

/// 不正なメモリサイズを拒否することを確認
#[test]
fn test_invalid_memory() {
    fnflow()
        .env("COMPARTMENT_ID", "ocid1.compartment.oc1..test")
        .env("OCIR_FN_IMAGE", "phx.ocir.io/t/fn/hello:1")
        .env("FN_MEMORY_MB", "100")
        .arg("setup")
        .assert()
        .failure()
        .stderr(predicate::str::contains("FN_MEMORY_MB"));
}

/// oci CLI が見つからない場合に分かりやすく失敗することを確認
#[test]
fn test_missing_oci_cli() {
    fnflow()
        .env("COMPARTMENT_ID", "ocid1.compartment.oc1..test")
        .arg("invoke")
        .assert()
        .failure()
        .stderr(predicate::str::contains("oci CLI not found"));
}

/// PATH 上に置く偽の oci CLI（compartment "sandbox" と ACTIVE な関数を返す）
#[cfg(unix)]
mod with_fake_oci {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    const FAKE_OCI: &str = r#"#!/bin/sh
case "$*" in
  *--version*)
    echo 3.50.0 ;;
  *"iam compartment list"*)
    echo '{"data": [{"id": "ocid1.compartment.oc1..sb", "name": "sandbox", "lifecycle-state": "ACTIVE"}]}' ;;
  *"fn application list"*)
    echo '{"data": [{"id": "ocid1.fnapp.oc1..a", "compartment-id": "ocid1.compartment.oc1..sb", "display-name": "demo-app", "lifecycle-state": "ACTIVE", "freeform-tags": {"fnflow-run": "demo"}}]}' ;;
  *"fn function list"*)
    echo '{"data": [{"id": "ocid1.fnfunc.oc1..f", "application-id": "ocid1.fnapp.oc1..a", "display-name": "demo-fn", "image": "img:1", "lifecycle-state": "ACTIVE", "freeform-tags": {"fnflow-run": "demo"}}]}' ;;
  *"fn function invoke"*)
    printf '{"message": "Hello fnflow!"}' ;;
  *" list "*)
    ;;
  *)
    exit 2 ;;
esac
"#;

    /// 偽の oci と OCI 設定ファイルを用意した fnflow コマンド
    fn fnflow_with_fake_oci(dir: &TempDir) -> Command {
        let oci = dir.path().join("oci");
        std::fs::write(&oci, FAKE_OCI).unwrap();
        let mut perms = std::fs::metadata(&oci).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&oci, perms).unwrap();

        let config = dir.path().join("config");
        std::fs::write(&config, "[DEFAULT]\ntenancy=ocid1.tenancy.oc1..t\n").unwrap();

        let mut cmd = fnflow();
        cmd.env("PATH", dir.path())
            .env("OCI_CONFIG_PATH", &config)
            .env("COMPARTMENT_NAME", "sandbox")
            .env("FN_RUN_NAME", "demo");
        cmd
    }

    /// コンパートメント名を解決しても status --json の stdout は JSON のみ
    #[test]
    fn test_status_json_with_compartment_name() {
        let dir = TempDir::new().unwrap();
        let output = fnflow_with_fake_oci(&dir)
            .arg("status")
            .arg("--json")
            .assert()
            .success()
            .stderr(predicate::str::contains("ocid1.compartment.oc1..sb"))
            .get_output()
            .stdout
            .clone();

        let status: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert!(status["vcn"].is_null());
        assert_eq!(status["application"]["id"], "ocid1.fnapp.oc1..a");
        assert_eq!(status["function"]["display-name"], "demo-fn");
    }

    /// invoke は関数のレスポンスを一切加工せずに出力する
    #[test]
    fn test_invoke_prints_raw_body() {
        let dir = TempDir::new().unwrap();
        fnflow_with_fake_oci(&dir)
            .arg("invoke")
            .arg("--payload")
            .arg("fnflow")
            .assert()
            .success()
            .stdout(r#"{"message": "Hello fnflow!"}"#);
    }
}
