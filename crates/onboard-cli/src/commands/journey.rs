use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;

use onboard_application::{
    BootRequest, Frame, JourneyRuntime, KycMethod, ScreenRegistry, file_backed,
};
use onboard_core::config::LatencyConfig;
use onboard_core::journey::{FormData, JourneyController, keys};

use super::parse_fields;
use crate::JourneyAction;

/// Boots the file-backed journey, applies `action` and prints the frame.
pub async fn run(
    config: Option<PathBuf>,
    state_dir: Option<PathBuf>,
    action: JourneyAction,
    json: bool,
) -> Result<()> {
    let bootstrapper = file_backed(config, state_dir)?;

    let request = boot_request(&action);
    let outcome = bootstrapper.boot(request).await;
    tracing::debug!(source = %outcome.source, "Journey booted");

    let mut controller = outcome.controller;
    apply(&mut controller, action)?;

    // One-shot invocation: nothing waits on simulated delays
    let mut runtime = JourneyRuntime::new(
        controller,
        ScreenRegistry::builtin(),
        bootstrapper.analytics(),
        LatencyConfig::instant(),
    );
    let frame = runtime.render().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&frame)?);
    } else {
        print_frame(&frame);
    }
    Ok(())
}

/// Invite links take the route parameter; the resume marker applies to the
/// stored journey.
fn boot_request(action: &JourneyAction) -> BootRequest {
    match action {
        JourneyAction::Open { param } => BootRequest {
            route_param: Some(param.clone()),
            resume: false,
        },
        JourneyAction::Status { resume } | JourneyAction::Next { resume } => BootRequest {
            route_param: None,
            resume: *resume,
        },
        _ => BootRequest::default(),
    }
}

fn apply(controller: &mut JourneyController, action: JourneyAction) -> Result<()> {
    match action {
        JourneyAction::Status { .. } | JourneyAction::Open { .. } => {}
        // With a pending resume this is the jump to the stored position
        JourneyAction::Next { .. } => controller.advance(),
        JourneyAction::Back => controller.retreat(),
        JourneyAction::Goto { step_id } => controller.jump_to_step(&step_id)?,
        JourneyAction::Select { journey_type } => controller.select_journey_type(journey_type),
        JourneyAction::Kyc { method } => {
            let method: KycMethod = method
                .parse()
                .with_context(|| format!("Unknown KYC method '{}'", method))?;
            let mut choice = FormData::new();
            choice.set(keys::KYC_METHOD, method.to_string());
            controller.update_form_data(choice);
            match method {
                KycMethod::Physical => controller.switch_to_physical_kyc_flow(),
                KycMethod::Digital => controller.switch_to_digital_kyc_flow(),
            }
        }
        JourneyAction::Set { fields } => controller.update_form_data(parse_fields(&fields)?),
        JourneyAction::Reset => controller.reset_all(),
    }
    Ok(())
}

fn print_frame(frame: &Frame) {
    if let Some(error) = &frame.error {
        println!("{} {}", "Error:".red().bold(), error.title);
        println!("  {}", error.message);
        println!("  Run `onboard journey reset` to start over.");
        return;
    }

    let journey = frame
        .journey_type
        .map(|journey_type| format!("{} ({})", journey_type, journey_type.label()))
        .unwrap_or_else(|| "none".to_string());
    println!("{} {}", "Journey:".bold(), journey);

    match &frame.step {
        Some(step) => {
            let marker = if frame.branched { " [branch]" } else { "" };
            println!(
                "{} {}/{}: {} - {}{}",
                "Step".bold(),
                frame.position + 1,
                frame.total,
                step.id.to_string().cyan(),
                step.title,
                marker
            );
        }
        None => println!("{}", "No active step".yellow()),
    }

    if let Some(bar) = &frame.bottom_bar {
        let label = format!("[{}]", bar.label);
        if bar.enabled {
            println!("  {}", label.green());
        } else {
            println!("  {}", label.dimmed());
        }
        if let Some(hint) = &bar.hint {
            println!("  {}", hint.dimmed());
        }
    }
}
