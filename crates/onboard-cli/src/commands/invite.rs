use anyhow::{Context, Result};
use colored::Colorize;
use uuid::Uuid;

use onboard_core::invite::{Employee, InvitePayload};
use onboard_core::journey::JourneyType;
use onboard_infrastructure::{create_invite_token, parse_invite_token};

use super::parse_fields;

pub fn create(
    journey_type: JourneyType,
    employee_id: String,
    name: String,
    email: String,
    phone: Option<String>,
    prefill: &[String],
) -> Result<()> {
    let employee = Employee {
        id: employee_id,
        name,
        email,
        phone,
    };
    if !employee.is_complete() {
        anyhow::bail!("An invite needs the employee id, name and email");
    }

    let prefilled = parse_fields(prefill)?;
    let payload = InvitePayload::new(Uuid::new_v4().to_string(), journey_type, employee, prefilled);
    let token = create_invite_token(&payload).context("Failed to encode invite token")?;

    println!(
        "{} {} for {}",
        "Invite created:".green().bold(),
        payload.id,
        payload.employee.name
    );
    println!("  Journey: {} ({})", journey_type, journey_type.label());
    println!("  Token:   {}", token);
    println!("  Link:    /journey/{}", token);

    Ok(())
}

pub fn inspect(token: &str) -> Result<()> {
    let Some(payload) = parse_invite_token(token) else {
        anyhow::bail!("Not a valid invite token");
    };

    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
