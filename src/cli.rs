use clap::{Parser, Subcommand, ValueHint};
use std::path::PathBuf;

/* Argument Stucture
 *
 * [--output-dir <dir>] [--logo <file>] (stay | simple | tour)
 *
 * Everything printed on the invoice is asked for interactively.
 */

#[derive(Parser)]
#[clap(about = "Prompt for billing details and render a proforma invoice")]
pub struct Opts {
    /// Directory the invoice file is written to
    #[clap(short, long, default_value=".",
        value_hint=ValueHint::DirPath)]
    pub output_dir: PathBuf,

    /// Logo to place on the invoice, omitted with a warning when missing
    /// [default: logo.png for HTML, logo.jpg for PDF, in the output dir]
    #[clap(short, long, value_hint=ValueHint::FilePath)]
    pub logo: Option<PathBuf>,

    #[clap(subcommand)]
    pub subcommand: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Proforma for a stay with room type and tax, as HTML or PDF
    Stay,

    /// Short proforma PDF for a stay, without tax
    Simple,

    /// Invoice for a guided tour, as a tabular PDF
    Tour,
}
