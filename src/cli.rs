// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "temple-ascent")]
#[command(about = "Scroll-driven temple ascent scene", long_about = None)]
pub struct Cli {
    /// Scene configuration file (JSON); built-in defaults when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Seed for every procedural texture and particle layout
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the scrollable range in pixels
    #[arg(long = "scroll-range")]
    pub scroll_range: Option<f32>,

    /// Run the frame loop without a window
    #[arg(long, default_value = "false")]
    pub headless: bool,

    /// Frames to run in headless mode
    #[arg(long, default_value_t = 600)]
    pub frames: u64,

    /// Disable the overlay copy
    #[arg(long = "no-overlay", default_value = "false")]
    pub no_overlay: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["temple-ascent"]);
        assert!(cli.config.is_none());
        assert!(!cli.headless);
        assert_eq!(cli.frames, 600);
        assert!(!cli.no_overlay);
    }

    #[test]
    fn headless_run() {
        let cli = Cli::parse_from([
            "temple-ascent",
            "--headless",
            "--frames",
            "30",
            "--seed",
            "7",
            "--scroll-range",
            "20000",
        ]);
        assert!(cli.headless);
        assert_eq!(cli.frames, 30);
        assert_eq!(cli.seed, Some(7));
        assert_eq!(cli.scroll_range, Some(20_000.0));
    }
}
