//! Shared utilities for command handlers

use crate::catalog::Catalog;
use crate::cli::ConversionArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use steparg_core::{
    BindingType, ConverterRegistry, DirectInvoker, Locale, MemoryTracer, StepArgumentTypeConverter,
    Table, TestTracer, Value,
};

/// Tracer that logs warnings and keeps them for the report
#[derive(Debug, Default)]
pub struct CollectingTracer {
    recorded: MemoryTracer,
}

impl CollectingTracer {
    pub fn warnings(&self) -> Vec<String> {
        self.recorded.warnings()
    }
}

impl TestTracer for CollectingTracer {
    fn trace_warning(&self, message: &str) {
        tracing::warn!("{}", message);
        self.recorded.trace_warning(message);
    }
}

/// Everything a convert or probe command needs
pub struct ConversionSession {
    pub converter: StepArgumentTypeConverter,
    pub tracer: Arc<CollectingTracer>,
    pub value: Value,
    pub target: BindingType,
    pub locale: Locale,
}

impl ConversionSession {
    pub fn new(args: &ConversionArgs, config: &Config) -> Result<Self> {
        let catalog = Catalog::from_config(config)?;
        let registry = catalog.registry(&config.transformations)?;
        let target = BindingType::Runtime(catalog.resolve(&args.target)?);

        let locale_tag = args
            .locale
            .as_deref()
            .or(config.default_locale.as_deref())
            .unwrap_or("");
        let locale = Locale::parse(locale_tag)?;

        let value = match (&args.value, &args.table) {
            (Some(text), None) => Value::from(text.as_str()),
            (None, Some(path)) => Value::Table(read_table(path)?),
            _ => return Err(Error::invalid_args("give either a VALUE or --table")),
        };

        let tracer = Arc::new(CollectingTracer::default());
        let converter = StepArgumentTypeConverter::new(
            Arc::new(registry),
            Arc::new(DirectInvoker),
            tracer.clone(),
            Arc::new(ConverterRegistry::new()),
        );

        tracing::debug!(
            target_type = %target,
            locale = %locale,
            transformations = config.transformations.len(),
            "Prepared conversion session"
        );

        Ok(Self {
            converter,
            tracer,
            value,
            target,
            locale,
        })
    }

    /// Name of the transformation the engine will pick, without warning
    pub fn transformation_name(&self) -> Option<String> {
        self.converter
            .get_matching_step_transformation(&self.value, &self.target, false)
            .map(|binding| binding.name().to_string())
    }
}

/// Read a Gherkin-style data table; the first row is the header
pub fn read_table(path: &Path) -> Result<Table> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path)?;
    parse_table(&content).map_err(|reason| match reason {
        TableError::Format(reason) => Error::InvalidFormat {
            path: path.to_path_buf(),
            reason,
        },
        TableError::Core(e) => Error::Core(e),
    })
}

#[derive(Debug)]
enum TableError {
    Format(String),
    Core(steparg_core::Error),
}

fn parse_table(content: &str) -> std::result::Result<Table, TableError> {
    let mut rows = content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(number, line)| parse_row(line).map(|cells| (number, cells)));

    let (_, header) = rows
        .next()
        .ok_or_else(|| TableError::Format("the table has no header row".to_string()))??;
    let mut table = Table::new(header.clone()).map_err(TableError::Core)?;

    for row in rows {
        let (number, cells) = row?;
        if cells.len() != header.len() {
            return Err(TableError::Format(format!(
                "line {} has {} cells, the header has {}",
                number,
                cells.len(),
                header.len()
            )));
        }
        table.add_row(cells).map_err(TableError::Core)?;
    }

    Ok(table)
}

/// Split `| a | b |` into trimmed cells, honouring `\|`, `\\` and `\n`
fn parse_row(line: &str) -> std::result::Result<Vec<String>, TableError> {
    let inner = line
        .strip_prefix('|')
        .and_then(|rest| rest.strip_suffix('|'))
        .ok_or_else(|| TableError::Format(format!("'{}' is not a table row", line)))?;

    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('n') => cell.push('\n'),
                Some(escaped) => cell.push(escaped),
                None => cell.push('\\'),
            },
            '|' => cells.push(std::mem::take(&mut cell).trim().to_string()),
            other => cell.push(other),
        }
    }
    cells.push(cell.trim().to_string());
    Ok(cells)
}
