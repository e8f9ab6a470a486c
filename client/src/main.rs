#![deny(warnings)]

use {anyhow::Result, racecat::Config, std::env, tokio::runtime};

fn main() -> Result<()> {
    let config = Config::from_args(env::args())?;

    pretty_env_logger::init();

    let runtime = runtime::Builder::new_current_thread().enable_all().build()?;
    let result = runtime.block_on(racecat::run(config));

    // The blocking stdin read may still be parked; shutting down in the
    // background keeps it from holding up process exit.
    runtime.shutdown_background();

    result
}
