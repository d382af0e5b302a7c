//! Get command - reads one path of a JSON data file.

use std::fs;

use myopie::{DataStore, Value};

use crate::cli::GetArgs;
use crate::output::OutputFormat;

/// Run the get command
pub fn run(args: &GetArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let store = DataStore::new(Value::from_json_str(&fs::read_to_string(&args.data)?)?);

    let Some(value) = store.get(args.path.as_str()) else {
        eprintln!("no value at path '{}'", args.path);
        std::process::exit(1);
    };

    match format {
        OutputFormat::Human => println!("{value}"),
        OutputFormat::Json => println!("{}", serde_json::to_string(&value)?),
    }

    Ok(())
}
