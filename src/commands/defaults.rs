//! `cardboard defaults`: print the default configuration file.

use anyhow::Result;

use crate::config::{self, Config};

pub fn run() -> Result<()> {
    print!("{}", config::serialize(&Config::default()));
    Ok(())
}
