use clap::Args;

use super::common::{self, InputArgs};

#[derive(Args, Debug)]
pub struct SuggestArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Day to plan and review (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<String>,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: SuggestArgs) -> Result<(), Box<dyn std::error::Error>> {
    let common::Loaded {
        mut optimizer,
        user_id,
        now,
    } = common::load(&args.input)?;
    let date = common::parse_date(args.date.as_deref())?;

    optimizer.generate_optimal_schedule_at(&user_id, date, 1, now);
    if optimizer.schedule(date).is_none() {
        return Err(format!("nothing could be scheduled on {date}").into());
    }
    let suggestions = optimizer.suggest_schedule_adjustments(date);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
        return Ok(());
    }

    if suggestions.is_empty() {
        println!("No adjustments suggested for {date}.");
        return Ok(());
    }
    for s in &suggestions {
        println!(
            "[{}] {}: {}",
            s.priority.as_str(),
            s.kind.as_str(),
            s.suggestion
        );
    }
    Ok(())
}
