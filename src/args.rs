use clap::Parser;

#[derive(Parser)]
#[command(name = "geo-doctor")]
#[command(about = "Diagnose whether this machine is permitted and able to resolve its own location")]
pub struct Args {
    #[arg(long, default_value = "5")]
    pub timeout: u64,

    #[arg(long)]
    pub verbose: bool,
}
