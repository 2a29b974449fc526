use std::path::Path;

use anyhow::Result;

use vitrine_core::AppConfig;
use vitrine_tui::available_themes;

pub fn show(config: &AppConfig) -> Result<()> {
    print!("{}", toml::to_string_pretty(config)?);
    println!();
    println!("# Available themes: {}", available_themes().join(", "));
    Ok(())
}

pub fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        println!("Config already exists at {}", path.display());
        println!("Use --force to overwrite it.");
        return Ok(());
    }
    AppConfig::default().save_to(path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

pub fn path(path: &Path) -> Result<()> {
    println!("{}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_does_not_clobber() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        init(&path, false).unwrap();
        let written = AppConfig::load_from(&path).unwrap();
        assert_eq!(written.menu.breakpoint_px, 896);

        std::fs::write(&path, "[menu]\nbreakpoint_px = 700\n").unwrap();
        init(&path, false).unwrap();
        assert_eq!(AppConfig::load_from(&path).unwrap().menu.breakpoint_px, 700);

        init(&path, true).unwrap();
        assert_eq!(AppConfig::load_from(&path).unwrap().menu.breakpoint_px, 896);
    }
}
