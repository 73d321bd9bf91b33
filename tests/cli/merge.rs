use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::{CliTest, stderr, stdout};

const CONFIG: &str = r#"{
  "locales": ["ko", "ru"],
  "dictionariesDir": "dict"
}"#;

const BATCH: &str = r#"{
  "Settings": { "ko": "설정", "ru": "Настройки" },
  "Open Jobs": { "ko": "채용 공고" }
}"#;

fn dictionary(test: &CliTest, locale: &str) -> Result<Value> {
    let content = test.read_file(&format!("dict/_{}_dict.json", locale))?;
    Ok(serde_json::from_str(&content)?)
}

#[test]
fn test_merge_dry_run_writes_nothing() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".glotwirerc.json", CONFIG)?;
    test.write_file("batch.json", BATCH)?;

    let output = test.merge_command().arg("batch.json").output()?;
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(out.contains("Would merge 3 of 2 batch entries into 2 locale(s):"));
    assert!(out.contains("ko  +2 added, 0 unchanged, 0 kept  dict/_ko_dict.json"));
    assert!(out.contains("ru  +1 added, 0 unchanged, 0 kept  dict/_ru_dict.json"));
    assert!(out.contains("Run with --apply to write the dictionaries."));
    assert!(!test.root().join("dict").exists());

    Ok(())
}

#[test]
fn test_merge_apply_writes_dictionaries() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".glotwirerc.json", CONFIG)?;
    test.write_file("batch.json", BATCH)?;

    let output = test.merge_command().args(["batch.json", "--apply"]).output()?;
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Merged 3 of 2 batch entries"));

    let ko = dictionary(&test, "ko")?;
    assert_eq!(ko["Settings"], "설정");
    assert_eq!(ko["Open Jobs"], "채용 공고");
    assert_eq!(dictionary(&test, "ru")?["Settings"], "Настройки");
    assert!(test.read_file("dict/_ko_dict.json")?.contains("\"설정\""));

    Ok(())
}

#[test]
fn test_merge_keeps_existing_translations() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".glotwirerc.json", CONFIG)?;
    test.write_file("dict/_ko_dict.json", r#"{"Settings": "환경설정"}"#)?;
    test.write_file("batch.json", BATCH)?;

    let output = test.merge_command().args(["batch.json", "--apply"]).output()?;
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("ko  +1 added, 0 unchanged, 1 kept"));

    let ko = dictionary(&test, "ko")?;
    assert_eq!(ko["Settings"], "환경설정");
    assert_eq!(ko["Open Jobs"], "채용 공고");

    Ok(())
}

#[test]
fn test_merge_unknown_locale_is_a_warning() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".glotwirerc.json", CONFIG)?;
    test.write_file("batch.json", r#"{"Settings": {"ko": "설정", "fr": "Paramètres"}}"#)?;

    let output = test.merge_command().args(["batch.json", "--apply"]).output()?;
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(0));
    assert!(out.contains("warning: \"fr\"  unknown-locale"));
    assert!(out.contains("--> batch.json"));
    assert!(out.contains("1 batch entries ignored"));
    assert_eq!(dictionary(&test, "ko")?["Settings"], "설정");
    assert!(!test.root().join("dict/_fr_dict.json").exists());

    Ok(())
}

#[test]
fn test_merge_dictionaries_dir_override() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".glotwirerc.json", CONFIG)?;
    test.write_file("batch.json", BATCH)?;

    let output = test
        .merge_command()
        .args(["batch.json", "--apply", "--dictionaries-dir", "out"])
        .output()?;

    assert_eq!(output.status.code(), Some(0));
    assert!(test.root().join("out/_ko_dict.json").exists());
    assert!(!test.root().join("dict").exists());

    Ok(())
}

#[test]
fn test_merge_invalid_batch_is_fatal() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".glotwirerc.json", CONFIG)?;
    test.write_file("batch.json", r#"{"Settings": "설정"}"#)?;

    let output = test.merge_command().args(["batch.json", "--apply"]).output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Invalid batch: batch.json"));
    assert!(!test.root().join("dict").exists());

    Ok(())
}

#[test]
fn test_merge_missing_batch_is_fatal() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".glotwirerc.json", CONFIG)?;

    let output = test.merge_command().arg("missing.json").output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Failed to read file: missing.json"));

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_merge_runs_apply_command_per_saved_locale() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".glotwirerc.json",
        r#"{
  "locales": ["ko", "ru"],
  "dictionariesDir": "dict",
  "applyCommand": ["sh", "-c", "echo \"$1 $2\" >> applied.log", "apply"]
}"#,
    )?;
    test.write_file("dict/_ru_dict.json", r#"{"Settings": "Настройки"}"#)?;
    test.write_file("batch.json", r#"{"Settings": {"ko": "설정", "ru": "Настройки"}}"#)?;

    let output = test.merge_command().args(["batch.json", "--apply"]).output()?;

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("dict/_ko_dict.json  applied"));
    // ru gained nothing, so it is neither saved nor applied.
    assert_eq!(test.read_file("applied.log")?, "ko dict/_ko_dict.json\n");

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_merge_failing_apply_command_keeps_dictionaries() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".glotwirerc.json",
        r#"{
  "locales": ["ko", "ru"],
  "dictionariesDir": "dict",
  "applyCommand": ["sh", "-c", "echo boom >&2; exit 3", "apply"]
}"#,
    )?;
    test.write_file("batch.json", BATCH)?;

    let output = test.merge_command().args(["batch.json", "--apply"]).output()?;
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(1));
    assert!(out.contains("apply-failed"));
    assert!(out.contains("'sh' exited with status 3: boom"));
    assert!(out.contains("2 problems (2 errors, 0 warnings)"));
    assert_eq!(dictionary(&test, "ko")?["Settings"], "설정");
    assert_eq!(dictionary(&test, "ru")?["Settings"], "Настройки");

    Ok(())
}
