//! Probe command handler

use super::utils::ConversionSession;
use crate::cli::ConversionArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::{OutputWriter, ProbeReport};
use steparg_core::StepArgumentConverter;

/// Handle the probe command
pub fn handle_probe(args: ConversionArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let session = ConversionSession::new(&args, config)?;

    let convertible = session
        .converter
        .can_convert(Some(&session.value), &session.target, &session.locale)?;

    tracing::info!(target_type = %session.target, convertible, "Probed step argument");

    output.probe(&ProbeReport {
        input: session.value.to_json(),
        target: session.target.to_string(),
        locale: session.locale.to_string(),
        convertible,
        transformation: session.transformation_name(),
    })
}
