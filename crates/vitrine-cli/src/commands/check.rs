use std::path::Path;

use anyhow::Result;

use vitrine_core::format::NumberLocale;
use vitrine_core::page::ElementKind;
use vitrine_core::{AppConfig, Capabilities, PageSpec};

pub fn run(config: &AppConfig, page_path: &Path, capabilities: Capabilities) -> Result<()> {
    let page = PageSpec::load(page_path)?;
    let locale = NumberLocale::from(&config.number);

    println!("{} ({})\n", page.title, page_path.display());

    let motion = if capabilities.animations_enabled() {
        "animated"
    } else {
        "static (content shown immediately)"
    };
    println!(
        "Capabilities: reduced_motion={} fine_pointer={} observer={} -> {}",
        capabilities.reduced_motion(),
        capabilities.fine_pointer(),
        capabilities.observer_supported(),
        motion
    );

    let elements = page.elements();
    println!("\nElements ({}):", elements.len());
    for element in &elements {
        match element.kind {
            ElementKind::Reveal { section } => {
                println!("  #{:<3} reveal   {}", element.id.0, page.sections[section].heading);
            }
            ElementKind::Counter { section, index } => {
                let markup = &page.sections[section].counters[index];
                let spec = markup.spec();
                println!(
                    "  #{:<3} counter  {} -> {}",
                    element.id.0,
                    markup.label,
                    spec.render_final(&locale)
                );
            }
        }
    }

    let links = page.nav_links();
    if !links.is_empty() {
        let toggle = if page.has_menu_toggle() { "with toggle" } else { "no toggle" };
        println!("\nNavigation ({}):", toggle);
        for link in links {
            let resolved = if page.section_index(&link.target).is_some() {
                ""
            } else {
                "  [missing section]"
            };
            println!("  {} -> #{}{}", link.label, link.target, resolved);
        }
    }

    match &page.form {
        Some(form) => {
            let status = if form.status_region { "" } else { " (no status region, inactive)" };
            println!("\nForm{}:", status);
            for field in &form.fields {
                let mut constraints = Vec::new();
                if field.required {
                    constraints.push("required".to_string());
                }
                if let Some(min) = field.min_length {
                    constraints.push(format!("min {}", min));
                }
                if let Some(max) = field.max_length {
                    constraints.push(format!("max {}", max));
                }
                println!(
                    "  {} ({:?}) {}",
                    field.name,
                    field.kind,
                    constraints.join(", ")
                );
            }
        }
        None => println!("\nNo form."),
    }

    Ok(())
}
