use clap::Args;

use slotplan_core::ExportFormat;

use super::common::{self, InputArgs};

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Day to plan and export (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<String>,
    /// Output format: json or text
    #[arg(long, default_value = "json")]
    pub format: String,
}

pub fn run(args: ExportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let format: ExportFormat = args.format.parse()?;
    let common::Loaded {
        mut optimizer,
        user_id,
        now,
    } = common::load(&args.input)?;
    let date = common::parse_date(args.date.as_deref())?;

    optimizer.generate_optimal_schedule_at(&user_id, date, 1, now);
    match optimizer.export_schedule(date, format)? {
        Some(out) => println!("{out}"),
        None => return Err(format!("nothing could be scheduled on {date}").into()),
    }
    Ok(())
}
