use clap::Args;

use super::common::{self, InputArgs};

#[derive(Args, Debug)]
pub struct InsightsArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: InsightsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let common::Loaded {
        optimizer, user_id, ..
    } = common::load(&args.input)?;

    let insights = optimizer
        .productivity_insights(&user_id)
        .ok_or_else(|| format!("no pattern for user {user_id}"))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&insights)?);
        return Ok(());
    }

    println!("Completed tasks: {}", insights.total_completed_tasks);
    if insights.total_completed_tasks == 0 {
        println!("No completed tasks for analysis.");
    } else {
        println!(
            "Average completion ratio: {:.2}",
            insights.average_task_completion_ratio
        );
        for (task_type, ratio) in &insights.task_type_performance {
            println!("  {:<10} {ratio:.2}x of estimate", task_type.as_str());
        }
        if let Some(most) = insights.most_efficient_task_type {
            println!("Most efficient: {} ({:.2})", most.task_type, most.ratio);
        }
        if let Some(least) = insights.least_efficient_task_type {
            println!("Least efficient: {} ({:.2})", least.task_type, least.ratio);
        }
    }

    let hours: Vec<String> = insights
        .recommended_peak_hours
        .iter()
        .map(|h| format!("{h:02}:00"))
        .collect();
    println!("Recommended peak hours: {}", hours.join(", "));
    println!(
        "Focus {}min, break {}min",
        insights.average_focus_duration, insights.optimal_break_duration
    );
    Ok(())
}
