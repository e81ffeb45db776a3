use anyhow::Result;
use dqm_compare::cli::Cli;
use dqm_compare::{driver, logging};

fn main() -> Result<()> {
    let cli_args = Cli::parse_normalized();
    logging::init_logging(cli_args.verbose)?;

    let config = cli_args.load_config()?;
    let job = cli_args.job();
    let options = cli_args.run_options(&config);

    driver::run(&job, &options, &config)?;

    Ok(())
}
