use clap::CommandFactory;
use clap_complete::{generate_to, shells::Bash};
use std::env;
use std::io::Error;

include!("src/cli.rs");

// Bash completion for the subcommands and the output/logo flags, written
// next to the other build artifacts.
fn main() -> Result<(), Error> {
    let Some(completions_dir) = env::var_os("OUT_DIR") else {
        return Ok(());
    };

    let mut proforma = Opts::command();
    let script = generate_to(Bash, &mut proforma, "proforma", completions_dir)?;

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:warning=bash completion for proforma: {}", script.display());

    Ok(())
}
