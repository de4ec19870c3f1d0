//! `lander build`: fill template placeholders from the product config

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use lander_common::{substitute, TemplateVars};
use tracing::info;

use crate::output::{print_success, print_warning};

/// Remaining placeholders are listed individually below this count
const LIST_LIMIT: usize = 20;

#[derive(Args)]
pub struct BuildArgs {
    /// KEY="value" config file
    #[arg(long, default_value = "product.config")]
    pub config: PathBuf,

    /// Template page
    #[arg(long, default_value = "index.html")]
    pub page: PathBuf,

    /// Where to write the result; defaults to overwriting --page
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Exit non-zero when placeholders remain
    #[arg(long)]
    pub strict: bool,
}

pub fn execute(args: BuildArgs) -> anyhow::Result<i32> {
    let config = std::fs::read_to_string(&args.config)
        .with_context(|| format!("reading {}", args.config.display()))?;
    let template = std::fs::read_to_string(&args.page)
        .with_context(|| format!("reading {}", args.page.display()))?;

    let vars = TemplateVars::parse(&config);
    info!("Loaded {} values from {}", vars.len(), args.config.display());

    let result = substitute(&template, &vars);
    let output = args.output.as_ref().unwrap_or(&args.page);
    std::fs::write(output, &result.output)
        .with_context(|| format!("writing {}", output.display()))?;

    println!("Replacements done. Remaining placeholders:");
    println!("{} placeholders remaining", result.remaining.len());

    if result.is_complete() {
        print_success(&format!("Wrote {}", output.display()));
        return Ok(0);
    }

    if result.remaining.len() < LIST_LIMIT {
        println!("{}", result.remaining.join(", "));
    }
    print_warning(&format!("{} still has unresolved placeholders", output.display()));
    Ok(if args.strict { 1 } else { 0 })
}
