//! Slug command
//!
//! Print the slug a title would get in a note file name.

use anyhow::Result;
use clap::Args;

use nudger_core::export::slug;

/// Arguments for the slug command
#[derive(Debug, Args)]
pub struct SlugArgs {
    /// Text to slug; words are joined with spaces
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

/// Execute the slug command
pub fn execute(args: SlugArgs) -> Result<()> {
    println!("{}", slug(args.text.join(" ").as_str()));
    Ok(())
}
