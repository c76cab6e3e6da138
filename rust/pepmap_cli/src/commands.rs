use tracing::{
    info,
    instrument,
};

use crate::cli::{
    RunArgs,
    WriteTemplateArgs,
};
use crate::config::Config;
use crate::error::CliError;
use crate::processing::run;

/// Main function for the 'run' subcommand.
#[instrument]
pub fn main_run(args: RunArgs) -> Result<(), CliError> {
    let config = Config::from_args(&args)?;
    info!("Using configuration: {:#?}", config);

    let summary = run(&config)?;
    summary.log();
    println!(
        "Wrote {} reports ({} of {} records matched, {} rows skipped)",
        summary.views.len(),
        summary.num_matched_records,
        summary.num_records,
        summary.skipped_rows.len()
    );
    Ok(())
}

pub fn main_write_template(args: WriteTemplateArgs) -> Result<(), CliError> {
    let target_dir = args.output_path;
    std::fs::create_dir_all(&target_dir)?;

    let path = target_dir.join("pepmap_config_template.json");
    std::fs::write(&path, serde_json::to_string_pretty(&Config::template())?)?;
    println!("Wrote config template to: {}", path.display());
    Ok(())
}
