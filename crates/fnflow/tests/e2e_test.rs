//! 実環境での通し確認
//!
//! COMPARTMENT_ID と OCIR_FN_IMAGE を設定し、oci CLI を構成した上で
//! `cargo test -p fnflow --test e2e_test -- --ignored` で実行する。

#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

fn fnflow(run: &str) -> Command {
    let mut cmd = Command::cargo_bin("fnflow").unwrap();
    cmd.env("FN_RUN_NAME", run);
    cmd.timeout(std::time::Duration::from_secs(45 * 60));
    cmd
}

#[test]
#[ignore = "creates real OCI resources"]
fn test_setup_invoke_teardown() {
    let run = format!("fnflow-e2e-{}", std::process::id());

    fnflow(&run).args(["setup"]).assert().success();

    let invoke = fnflow(&run)
        .env("FN_PAYLOAD", "hello")
        .arg("invoke")
        .assert();

    // 呼び出しの成否に関わらず片付ける
    let teardown = fnflow(&run).args(["teardown", "--yes"]).assert();

    invoke
        .success()
        .stdout(predicate::str::contains("hello"));
    teardown
        .success()
        .stdout(predicate::str::contains("6 deleted"));
}
