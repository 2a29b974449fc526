use std::path::Path;

use anyhow::{bail, Result};
use tracing::warn;

use vitrine_core::form::{FormRules, InquiryForm, SubmissionStatus};
use vitrine_core::transport::{InquiryTransport, JsonlTransport};
use vitrine_core::{AppConfig, PageSpec};

/// Validate `fields` against the page form; store the payload if accepted
pub async fn run(config: &AppConfig, page_path: &Path, fields: &[(String, String)]) -> Result<()> {
    let page = PageSpec::load(page_path)?;
    let Some(form_spec) = page.form.as_ref() else {
        bail!("{} has no inquiry form", page_path.display());
    };
    if !form_spec.status_region {
        bail!("{} has no form status region; submissions are not handled", page_path.display());
    }

    let mut form = InquiryForm::new(form_spec.fields.clone(), FormRules::from(&config.form));
    for (name, value) in fields {
        if !form.set_value(name, value.clone()) {
            warn!(field = %name, "Ignoring value for unknown field");
        }
    }

    let outcome = form.submit();
    for violation in &outcome.violations {
        println!("  {}: {}", violation.field, violation.message());
    }
    println!(
        "[{}] {}",
        outcome.result.category().as_str(),
        outcome.result.message
    );

    if outcome.result.status != SubmissionStatus::Success {
        bail!("Inquiry was not accepted");
    }

    if let Some(payload) = outcome.payload {
        let transport = JsonlTransport::new(config.inquiry_log_path());
        let record = transport.submit(payload).await?;
        println!("Stored inquiry {} in {}", record.id, transport.path().display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        title = "Contact"

        [form]
        fields = [
            { name = "email", type = "email", required = true },
            { name = "project", type = "textarea", required = true },
        ]
    "#;

    fn setup() -> (tempfile::TempDir, AppConfig, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let page_path = dir.path().join("page.toml");
        std::fs::write(&page_path, PAGE).unwrap();

        let mut config = AppConfig::default();
        config.general.data_dir = dir.path().join("data");
        (dir, config, page_path)
    }

    fn field(name: &str, value: &str) -> (String, String) {
        (name.to_string(), value.to_string())
    }

    #[tokio::test]
    async fn test_valid_submission_is_stored() {
        let (_dir, config, page_path) = setup();
        let fields = vec![
            field("email", "ada@example.com"),
            field("project", "A landing page for our new product line"),
        ];

        run(&config, &page_path, &fields).await.unwrap();

        let records = JsonlTransport::new(config.inquiry_log_path())
            .list()
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].fields.get("email"), Some("ada@example.com"));
    }

    #[tokio::test]
    async fn test_short_brief_is_rejected_and_not_stored() {
        let (_dir, config, page_path) = setup();
        let fields = vec![field("email", "ada@example.com"), field("project", "  short  ")];

        assert!(run(&config, &page_path, &fields).await.is_err());
        assert!(!config.inquiry_log_path().exists());
    }

    #[tokio::test]
    async fn test_page_without_form() {
        let dir = tempfile::tempdir().unwrap();
        let page_path = dir.path().join("page.toml");
        std::fs::write(&page_path, "title = \"No form\"").unwrap();

        let result = run(&AppConfig::default(), &page_path, &[]).await;
        assert!(result.is_err());
    }
}
