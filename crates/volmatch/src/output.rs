//! Output formatting functions.

use serde::Serialize;
use volmatch_core::domain::Registration;

use crate::cli::OutputFormat;
use crate::storage::ProvisionReport;

/// Format a value as compact JSON.
pub fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

/// Format a value for output, using `pretty` for the text form.
pub fn format_output<T: Serialize + ?Sized>(
    value: &T,
    format: OutputFormat,
    pretty: impl Fn(&T) -> String,
) -> String {
    match format {
        OutputFormat::Json => format_json(value),
        OutputFormat::Pretty => pretty(value),
    }
}

/// Format a registration for display.
pub fn format_registration(registration: &Registration) -> String {
    let status = registration
        .status
        .map_or_else(|| "UNSET".to_string(), |s| s.to_string());
    let mut output = format!(
        "{} [{}]\n  User: {}\n  Opportunity: {}",
        registration.id, status, registration.user_id, registration.opportunity_id
    );
    if let Some(at) = &registration.registration_time {
        output.push_str(&format!("\n  Registered: {}", at.to_rfc3339()));
    }
    output
}

/// Format registrations for display.
pub fn format_registrations(registrations: &[Registration]) -> String {
    if registrations.is_empty() {
        return "No registrations found.".to_string();
    }
    let mut output = format!("REGISTRATIONS ({})\n", registrations.len());
    output.push_str(&"-".repeat(40));
    for registration in registrations {
        output.push_str(&format!("\n{}", format_registration(registration)));
        output.push('\n');
    }
    output
}

/// Format a provisioning report for display.
pub fn format_report(report: &ProvisionReport) -> String {
    let mut output = String::new();
    for container in &report.created {
        output.push_str(&format!("ok      {container}\n"));
    }
    for failure in &report.failed {
        output.push_str(&format!("FAILED  {}: {}\n", failure.container, failure.error));
    }
    output
}
