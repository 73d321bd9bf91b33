use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, stderr, stdout};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    for field in [
        "sourceRoot",
        "fileName",
        "catalogPath",
        "hookName",
        "collisionPolicy",
        "locales",
        "dictionaryFile",
    ] {
        assert!(
            parsed.get(field).is_some(),
            "Config should have '{}' field",
            field
        );
    }
    assert_eq!(parsed["collisionPolicy"], "reject");
    assert_eq!(parsed["dictionaryFile"], "_{locale}_dict.json");

    assert!(content.contains("\n  \""), "Config should use 2-space indentation");
    assert!(content.ends_with('\n'));

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("Created .glotwirerc.json"));

    let content = test.read_file(".glotwirerc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".glotwirerc.json", "{}")?;

    let output = test.command().arg("init").output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains(".glotwirerc.json already exists"));
    assert_eq!(test.read_file(".glotwirerc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;
    test.command().arg("init").output()?;
    test.write_page("settings", "export default function P() {\n  return <h1>Settings</h1>;\n}\n")?;

    let output = test.wire_command().output()?;
    assert!(
        output.status.success(),
        "wire should work with the initialized config. stderr: {}",
        stderr(&output)
    );

    Ok(())
}
