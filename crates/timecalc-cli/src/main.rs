use anyhow::Result;
use clap::Parser;

use timecalc_engine::{evaluate, format_value};

#[derive(Parser)]
#[command(name = "timecalc")]
#[command(about = "Calculator for time, duration, and transfer-rate expressions")]
#[command(version)]
struct Cli {
    /// Expression to evaluate, e.g. "2:56am + 3.5h" or "2h30m @ 1.5GB -> 10GB"
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    expression: Vec<String>,

    /// Emit the result as JSON instead of labeled rows
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let expression = cli.expression.join(" ");

    let value = evaluate(&expression)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        let rows = format_value(&value);
        let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        for (label, text) in &rows {
            println!("{label:>width$}: {text}");
        }
    }

    Ok(())
}
