//! Configuration command handlers

use crate::catalog::Catalog;
use crate::cli::{ConfigAction, ConfigArgs, ConfigFormat, ConfigInitArgs, ConfigShowArgs, OutputFormat};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::{OutputFormatter, OutputWriter};

/// Handle the config command
pub fn handle_config(args: ConfigArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    match args.action {
        ConfigAction::Init(init_args) => handle_config_init(init_args, output),
        ConfigAction::Show(show_args) => handle_config_show(show_args, config, output),
    }
}

/// Handle config init subcommand
fn handle_config_init(args: ConfigInitArgs, output: &mut OutputWriter) -> Result<()> {
    let path = match args.path {
        Some(path) => path,
        None => Config::user_config_path()
            .ok_or_else(|| Error::config("Unable to determine user config directory"))?,
    };

    if path.exists() && !args.force {
        output.warning(&format!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        ))?;
        return Ok(());
    }

    Config::example().save(&path)?;
    output.success(&format!("✓ Created config at {}", path.display()))?;
    output.info("Edit the enums and transformations sections to describe your step arguments.")?;

    Ok(())
}

/// Handle config show subcommand
fn handle_config_show(args: ConfigShowArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    // Building the catalog checks enums and transformations before showing them
    let catalog = Catalog::from_config(config)?;
    catalog.registry(&config.transformations)?;

    let format = match args.format {
        ConfigFormat::Json => OutputFormat::JsonPretty,
        ConfigFormat::Yaml => OutputFormat::Yaml,
    };
    let content = format.format(config)?;
    output.write(&content)?;
    if !content.ends_with('\n') {
        output.writeln("")?;
    }

    output.info(&format!(
        "{} enum(s), {} transformation(s)",
        catalog.enums().count(),
        config.transformations.len()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Buffer {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn writer(buffer: &Buffer) -> OutputWriter {
        OutputWriter::with_writer(OutputFormat::Human, false, false, Box::new(buffer.clone()))
    }

    #[test]
    fn test_init_writes_example_and_keeps_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("steparg.yaml");
        let buffer = Buffer::default();
        let mut output = writer(&buffer);

        handle_config_init(
            ConfigInitArgs {
                path: Some(path.clone()),
                force: false,
            },
            &mut output,
        )
        .unwrap();
        assert_eq!(Config::from_file(&path).unwrap(), Config::example());

        std::fs::write(&path, "default_locale: fr-FR\n").unwrap();
        handle_config_init(
            ConfigInitArgs {
                path: Some(path.clone()),
                force: false,
            },
            &mut output,
        )
        .unwrap();
        assert!(buffer.text().contains("already exists"));
        assert_eq!(
            Config::from_file(&path).unwrap().default_locale.as_deref(),
            Some("fr-FR")
        );
    }

    #[test]
    fn test_show_json() {
        let buffer = Buffer::default();
        let mut output = writer(&buffer);

        handle_config_show(
            ConfigShowArgs {
                format: ConfigFormat::Json,
            },
            &Config::example(),
            &mut output,
        )
        .unwrap();

        let text = buffer.text();
        assert!(text.contains("\"default_locale\": \"en-US\""));
        assert!(text.contains("INFO: 1 enum(s), 1 transformation(s)"));
    }

    #[test]
    fn test_show_rejects_broken_catalog() {
        let mut config = Config::default();
        config.enums.insert("Empty".to_string(), Vec::new());
        let buffer = Buffer::default();

        assert!(handle_config_show(
            ConfigShowArgs {
                format: ConfigFormat::Yaml,
            },
            &config,
            &mut writer(&buffer),
        )
        .is_err());
    }
}
