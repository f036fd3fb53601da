use clap::Args;
use serde_json::Value;

use rei_core::exchange::like_kind::{self, Exchange1031Input};

use crate::input;

/// Arguments for like-kind exchange analysis
#[derive(Args)]
pub struct ExchangeArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_exchange(args: ExchangeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let ex_input: Exchange1031Input = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for exchange analysis".into());
    };
    let result = like_kind::analyze_exchange(&ex_input)?;
    Ok(serde_json::to_value(result)?)
}
