/*
 * Proforma and tour invoices for the reserve
 *
 * Three kinds of invoice, each a single interactive run:
 *  - stay: customer, agency, agent, room type, people, nightly rate, tax and
 *    stay dates; saved as HTML or PDF
 *  - simple: the same stay without room type or tax, saved as PDF
 *  - tour: a tour from the fixed menu, its time, participants, price per
 *    person and tax; saved as a tabular PDF
 *
 * Every answer is checked before anything is computed. The first problem
 * found is reported and the run ends without writing a file.
 */

mod billing;
mod cli;
mod error;
mod input;
mod layout;
mod logging;
mod output;
mod pdf;
mod run;
mod templates;

use clap::Parser;
use crate::cli::Opts;

fn main() {
    logging::init();
    let opts = Opts::parse();

    if let Err(error) = run::run_cmd(opts) {
        eprintln!("Error: {}", error);
        std::process::exit(1);
    }
}
