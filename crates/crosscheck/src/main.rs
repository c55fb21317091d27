use std::io::{self, Write};

use clap::Parser;
use crosscheck::{Cli, execute, init_logging};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref(), &cli.log_level)?;

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    execute(&cli, &mut out)?;
    out.flush()?;

    tracing::debug!("done");
    Ok(())
}
