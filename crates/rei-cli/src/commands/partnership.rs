use clap::Args;
use serde_json::Value;

use rei_core::partnership::joint_venture::{self, JointVentureInput};

use crate::input;

/// Arguments for joint-venture waterfall distribution
#[derive(Args)]
pub struct JointVentureArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_joint_venture(args: JointVentureArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let jv_input: JointVentureInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for waterfall distribution".into());
    };
    let result = joint_venture::distribute(&jv_input)?;
    Ok(serde_json::to_value(result)?)
}
