use assert_cmd::prelude::*; // Add methods on commands
use predicates::prelude::*;
use std::process::Command; // Run programs
use tempfile;
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

const SAMPLE: &str = "I am Sam. Sam I am. I do not like this Sam I am. \
Do you like green eggs and ham? I do not like them, Sam I am. \
I do not like green eggs and ham. Would you like them here or there? \
I would not like them here or there. I would not like them anywhere.";

fn round_trip_test(window: &str,chunk: &str) -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = temp_dir.path().join("sample.txt");
    let cmp_path = temp_dir.path().join("sample.cfl");
    let out_path = temp_dir.path().join("sample.out");
    std::fs::write(&in_path,SAMPLE.repeat(8))?;
    let mut cmd = Command::cargo_bin("chunkflate")?;
    cmd.arg("compress")
        .arg("-i").arg(&in_path)
        .arg("-o").arg(&cmp_path)
        .arg("-w").arg(window)
        .arg("-c").arg(chunk)
        .assert()
        .success();
    let mut cmd = Command::cargo_bin("chunkflate")?;
    cmd.arg("expand")
        .arg("-i").arg(&cmp_path)
        .arg("-o").arg(&out_path)
        .arg("-w").arg(window)
        .arg("-c").arg(chunk)
        .assert()
        .success();
    match (std::fs::read(&in_path),std::fs::read(&out_path)) {
        (Ok(v1),Ok(v2)) => {
            assert_eq!(v1,v2);
        },
        _ => panic!("unable to compare output with original")
    }
    Ok(())
}

#[test]
fn cli_round_trip_std() -> STDRESULT {
    round_trip_test("32768","1024")
}

#[test]
fn cli_round_trip_small_window() -> STDRESULT {
    round_trip_test("64","256")
}

#[test]
fn cli_compression_shrinks_repetitive_text() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = temp_dir.path().join("runs.txt");
    let cmp_path = temp_dir.path().join("runs.cfl");
    std::fs::write(&in_path,"Ban".repeat(1200))?;
    let mut cmd = Command::cargo_bin("chunkflate")?;
    cmd.arg("compress")
        .arg("-i").arg(&in_path)
        .arg("-o").arg(&cmp_path)
        .assert()
        .success();
    let original = std::fs::metadata(&in_path)?.len();
    let compressed = std::fs::metadata(&cmp_path)?.len();
    assert!(compressed < original);
    Ok(())
}

#[test]
fn cli_missing_arguments() -> STDRESULT {
    let mut cmd = Command::cargo_bin("chunkflate")?;
    cmd.arg("compress")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
    Ok(())
}
