use anyhow::Result;

use vitrine_core::transport::JsonlTransport;
use vitrine_core::AppConfig;

pub async fn run(config: &AppConfig) -> Result<()> {
    let transport = JsonlTransport::new(config.inquiry_log_path());
    let records = transport.list().await?;

    if records.is_empty() {
        println!("No inquiries yet.");
        println!("\nLog file: {}", transport.path().display());
        return Ok(());
    }

    println!("Inquiries ({}):\n", records.len());
    for record in &records {
        println!(
            "  {} - {}",
            record.received_at.format("%Y-%m-%d %H:%M"),
            record.id
        );
        for (name, value) in &record.fields.0 {
            println!("    {}: {}", name, value);
        }
        println!();
    }

    Ok(())
}
