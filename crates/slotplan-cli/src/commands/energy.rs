//! Energy curve command for displaying a pattern's energy levels.

use clap::Args;
use std::path::PathBuf;

use slotplan_core::EnergyCurve;

use super::common;

#[derive(Args, Debug)]
pub struct EnergyArgs {
    /// Pattern file whose curve to show; the default research curve otherwise
    #[arg(long)]
    pub pattern: Option<PathBuf>,
    /// First hour shown
    #[arg(long, default_value_t = 6)]
    pub from: u32,
    /// Hour after the last one shown
    #[arg(long, default_value_t = 22)]
    pub to: u32,
}

pub fn run(args: EnergyArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.from >= args.to || args.to > 24 {
        return Err(format!("invalid hour range {}..{}", args.from, args.to).into());
    }

    let curve = match &args.pattern {
        Some(path) => common::load_pattern(path)?.energy,
        None => EnergyCurve::research_default(),
    };

    println!("{}", curve.render_ascii_chart(args.from, args.to));

    let fmt_hours = |hours: Vec<u8>| {
        if hours.is_empty() {
            "-".to_string()
        } else {
            hours
                .iter()
                .map(|h| format!("{h:02}:00"))
                .collect::<Vec<_>>()
                .join(", ")
        }
    };
    println!("Peak hours: {}", fmt_hours(curve.peak_hours()));
    println!("Low hours:  {}", fmt_hours(curve.low_hours()));
    Ok(())
}
