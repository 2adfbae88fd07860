use colored::Colorize;
use strum::IntoEnumIterator;

use onboard_core::journey::JourneyType;

pub fn list() {
    for journey_type in JourneyType::iter() {
        println!(
            "{:<9} {}",
            journey_type.to_string().cyan().bold(),
            journey_type.label()
        );

        let steps: Vec<String> = journey_type
            .step_ids()
            .iter()
            .map(|id| id.to_string())
            .collect();
        println!("          {}", steps.join(" -> "));
    }
}
