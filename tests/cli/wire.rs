use anyhow::{Context, Result};
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::{CliTest, PAGE_IMPORT, stderr, stdout};

const CATALOG: &str = "src/lib/translations/en.json";

fn catalog(test: &CliTest) -> Result<Value> {
    let content = test.read_file(CATALOG)?;
    serde_json::from_str(&content).context("catalog should be valid JSON")
}

#[test]
fn test_wire_dry_run_changes_nothing() -> Result<()> {
    let test = CliTest::new()?;
    let body = "export default function SettingsPage() {\n  return <h1>Settings</h1>;\n}\n";
    test.write_page("settings", body)?;

    let output = test.wire_command().output()?;
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(out.contains("Would wire 1 text(s) in 1 file(s):"));
    assert!(out.contains("src/app/dashboard/settings/page.tsx"));
    assert!(out.contains("Run with --apply"));
    assert_eq!(
        test.read_file("src/app/dashboard/settings/page.tsx")?,
        format!("{}{}", PAGE_IMPORT, body)
    );
    assert!(!test.root().join(CATALOG).exists());

    Ok(())
}

#[test]
fn test_wire_apply_rewrites_page_and_catalog() -> Result<()> {
    let test = CliTest::new()?;
    test.write_page(
        "settings",
        "export default function SettingsPage() {\n  return <h1>Settings</h1>;\n}\n",
    )?;

    let output = test.wire_command().arg("--apply").output()?;
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Wired 1 text(s) in 1 file(s):"));

    assert_eq!(
        test.read_file("src/app/dashboard/settings/page.tsx")?,
        format!(
            "{}export default function SettingsPage() {{\n  const {{ t }} = useTranslation();\n  return <h1>{{t('settings.settings')}}</h1>;\n}}\n",
            PAGE_IMPORT
        )
    );
    assert_eq!(catalog(&test)?["settings"]["settings"], "Settings");
    assert!(test.read_file(CATALOG)?.ends_with("}\n"));

    Ok(())
}

#[test]
fn test_wire_twice_is_idempotent() -> Result<()> {
    let test = CliTest::new()?;
    test.write_page(
        "jobs",
        "export default function JobsPage() {\n  return (\n    <div>\n      <h1>Open Jobs</h1>\n      <input placeholder=\"Search Jobs\" />\n    </div>\n  );\n}\n",
    )?;

    test.wire_command().arg("--apply").output()?;
    let page = test.read_file("src/app/dashboard/jobs/page.tsx")?;
    let catalog_content = test.read_file(CATALOG)?;

    let output = test.wire_command().arg("--apply").output()?;
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("nothing to wire"));
    assert_eq!(test.read_file("src/app/dashboard/jobs/page.tsx")?, page);
    assert_eq!(test.read_file(CATALOG)?, catalog_content);

    Ok(())
}

#[test]
fn test_wire_reuses_existing_catalog_keys() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(CATALOG, "{\n  \"common\": {\n    \"save\": \"Save Changes\"\n  }\n}\n")?;
    test.write_page(
        "settings",
        "export default function P() {\n  return <button>Save Changes</button>;\n}\n",
    )?;

    let output = test.wire_command().arg("--apply").output()?;
    assert_eq!(output.status.code(), Some(0));
    assert!(
        test.read_file("src/app/dashboard/settings/page.tsx")?
            .contains("{t('common.save')}")
    );
    // No key added, so the catalog is not rewritten.
    assert_eq!(
        test.read_file(CATALOG)?,
        "{\n  \"common\": {\n    \"save\": \"Save Changes\"\n  }\n}\n"
    );

    Ok(())
}

#[test]
fn test_wire_uses_config_namespaces_and_source_root() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".glotwirerc.json",
        r#"{
            "sourceRoot": "app",
            "catalogPath": "messages/en.json",
            "namespaces": { "settings/phone": "settingsPhone" }
        }"#,
    )?;
    test.write_file(
        "app/settings/phone/page.tsx",
        &format!(
            "{}export default function P() {{\n  return <h2>Phone Numbers</h2>;\n}}\n",
            PAGE_IMPORT
        ),
    )?;

    let output = test.wire_command().arg("--apply").output()?;
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let catalog: Value = serde_json::from_str(&test.read_file("messages/en.json")?)?;
    assert_eq!(catalog["settingsPhone"]["phoneNumbers"], "Phone Numbers");

    Ok(())
}

#[test]
fn test_wire_parse_error_is_reported_and_others_continue() -> Result<()> {
    let test = CliTest::new()?;
    test.write_page("broken", "export default function P( {\n  return <h1>Broken</h1>;\n")?;
    test.write_page(
        "settings",
        "export default function P() {\n  return <h1>Settings</h1>;\n}\n",
    )?;

    let output = test.wire_command().arg("--apply").output()?;
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(1));
    assert!(out.contains("parse-error"));
    assert!(out.contains("src/app/dashboard/broken/page.tsx"));
    assert!(out.contains("Wired 1 text(s) in 1 file(s):"));
    assert!(
        test.read_file("src/app/dashboard/settings/page.tsx")?
            .contains("{t('settings.settings')}")
    );

    Ok(())
}

#[test]
fn test_wire_collision_is_a_warning() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(CATALOG, r#"{"jobs": {"status": "Status"}}"#)?;
    test.write_page(
        "jobs",
        "export default function P() {\n  return <th>STATUS</th>;\n}\n",
    )?;

    let output = test.wire_command().output()?;
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(0));
    assert!(out.contains("warning: \"STATUS\"  key-collision"));
    assert!(out.contains("jobs.status already holds \"Status\""));
    assert!(out.contains("nothing to wire"));

    Ok(())
}

#[test]
fn test_wire_catalog_flush_failure_keeps_source_edits() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("blocker", "")?;
    test.write_page(
        "settings",
        "export default function P() {\n  return <h1>Settings</h1>;\n}\n",
    )?;

    let output = test
        .wire_command()
        .args(["--apply", "--catalog", "blocker/en.json"])
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Failed to create directory"));
    assert!(
        test.read_file("src/app/dashboard/settings/page.tsx")?
            .contains("{t('settings.settings')}")
    );

    Ok(())
}

#[test]
fn test_wire_malformed_catalog_is_fatal() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(CATALOG, "{ not json")?;
    test.write_page(
        "settings",
        "export default function P() {\n  return <h1>Settings</h1>;\n}\n",
    )?;

    let output = test.wire_command().arg("--apply").output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Failed to parse JSON"));
    assert!(
        !test
            .read_file("src/app/dashboard/settings/page.tsx")?
            .contains("{t(")
    );

    Ok(())
}

#[test]
fn test_wire_verbose_lists_each_candidate() -> Result<()> {
    let test = CliTest::new()?;
    test.write_page(
        "billing",
        "export default function P() {\n  return <Field label=\"Total Amount Due\" />;\n}\n",
    )?;

    let output = test.wire_command().arg("-v").output()?;
    let out = stdout(&output);

    assert!(out.contains("label=\"Total Amount Due\" -> billing.totalAmountDue (new)"));

    Ok(())
}

#[test]
fn test_wire_skips_text_where_translator_is_rebound() -> Result<()> {
    let test = CliTest::new()?;
    test.write_page(
        "items",
        "export default function P({ items }) {\n  const { t } = useTranslation();\n  return <ul>{items.map(t => <li key={t}>Open Item</li>)}</ul>;\n}\n",
    )?;

    let output = test.wire_command().arg("--apply").output()?;
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(0));
    assert!(out.contains("warning: \"Open Item\"  shadowed-translator"));
    assert!(out.contains("nothing to wire"));
    assert!(
        test.read_file("src/app/dashboard/items/page.tsx")?
            .contains("<li key={t}>Open Item</li>")
    );

    Ok(())
}
