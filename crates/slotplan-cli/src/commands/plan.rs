use clap::Args;
use std::collections::BTreeMap;

use slotplan_core::export::render_text;
use slotplan_core::DailySchedule;

use super::common::{self, InputArgs};

#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// First day to plan (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub start: Option<String>,
    /// Number of days to plan, defaults to the configured horizon
    #[arg(long)]
    pub days: Option<u32>,
    /// Print the schedules as a JSON map keyed by date
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: PlanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let common::Loaded {
        mut optimizer,
        user_id,
        now,
    } = common::load(&args.input)?;
    let start = common::parse_date(args.start.as_deref())?;
    let days = args
        .days
        .unwrap_or(optimizer.config().optimization_horizon_days);

    let schedules = optimizer.generate_optimal_schedule_at(&user_id, start, days, now);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&schedules)?);
        return Ok(());
    }

    print_schedules(&schedules);
    Ok(())
}

fn print_schedules(schedules: &BTreeMap<String, DailySchedule>) {
    if schedules.is_empty() {
        println!("No schedules generated.");
        return;
    }
    let rendered: Vec<String> = schedules.values().map(render_text).collect();
    println!("{}", rendered.join("\n\n"));
}
