//! Patch command - reconciles markup into a page once and prints the result.

use std::fs;

use myopie::{Page, Renderer, Value, render::Options};
use tracing::info;

use crate::cli::PatchArgs;
use crate::output::{OutputFormat, mutation_counts, mutation_summary};

/// Run the patch command
pub fn run(args: &PatchArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let page = Page::load(&args.page)?;
    let markup = fs::read_to_string(&args.markup)?;

    let renderer = Renderer::new(
        page.clone(),
        &args.mount,
        move |_| markup.clone(),
        Value::object(),
        Options::immediate(),
    )?;
    if !renderer.render() {
        eprintln!("mount point not found: {}", args.mount);
        std::process::exit(1);
    }
    let stats = renderer.last_patch().unwrap_or_default();
    info!(mount = %args.mount, mutations = stats.total(), "page patched");

    match format {
        OutputFormat::Human => {
            println!("{}", page.html());
            println!();
            println!("{}", mutation_summary(&mutation_counts(&stats)));
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "html": page.html(),
                "stats": stats,
            });
            println!("{}", serde_json::to_string(&value)?);
        }
    }

    Ok(())
}
