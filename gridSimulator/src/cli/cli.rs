use clap::Parser;

#[derive(Parser)]
#[command(author, version, about = "Headless driver for the marbles energy grid game", long_about = None)]
pub struct Args {
    #[arg(long, help = "Random seed for deterministic sessions")]
    seed: Option<u64>,

    #[arg(long, help = "Run the plant commit/charge self-test and exit", default_value_t = false)]
    test: bool,

    #[arg(long, help = "Command script to play, one key per token ('-' reads stdin)")]
    script: Option<String>,

    #[arg(long, help = "Play N sessions with the built-in autopilot")]
    autoplay: Option<usize>,

    #[arg(short, long, help = "JSON file overriding the game configuration")]
    config: Option<String>,

    #[arg(long, help = "Directory for CSV exports of round history")]
    export_dir: Option<String>,

    #[arg(long, help = "Print the final session snapshot as JSON", default_value_t = false)]
    json: bool,

    #[arg(long, default_value_t = false)]
    enable_timing: bool,

    #[arg(long, default_value_t = false)]
    debug_logging: bool,
}

impl Args {
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn test(&self) -> bool {
        self.test
    }

    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    pub fn autoplay(&self) -> Option<usize> {
        self.autoplay
    }

    pub fn config(&self) -> Option<&str> {
        self.config.as_deref()
    }

    pub fn export_dir(&self) -> Option<&str> {
        self.export_dir.as_deref()
    }

    pub fn json(&self) -> bool {
        self.json
    }

    pub fn enable_timing(&self) -> bool {
        self.enable_timing
    }

    pub fn debug_logging(&self) -> bool {
        self.debug_logging
    }
}
