//! Convert command handler

use super::utils::ConversionSession;
use crate::cli::ConversionArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::{ConversionReport, OutputWriter};
use steparg_core::StepArgumentConverter;

/// Handle the convert command
pub fn handle_convert(args: ConversionArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let session = ConversionSession::new(&args, config)?;
    let transformation = session.transformation_name();

    let value = session
        .converter
        .convert(Some(&session.value), &session.target, &session.locale)?;

    tracing::info!(
        target_type = %session.target,
        value_type = %value.type_name(),
        transformation = ?transformation,
        "Converted step argument"
    );

    let warnings = if config.output.show_warnings {
        session.tracer.warnings()
    } else {
        Vec::new()
    };

    output.conversion(&ConversionReport {
        input: session.value.to_json(),
        target: session.target.to_string(),
        locale: session.locale.to_string(),
        transformation,
        value_type: value.type_name(),
        value: value.to_json(),
        warnings,
    })
}
