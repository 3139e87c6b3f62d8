use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "softpomo", version, about = "A soft Pomodoro focus/break timer")]
pub struct Args {
    /// Focus duration in minutes
    #[arg(short, long)]
    pub focus: Option<i64>,

    /// Break duration in minutes
    #[arg(short = 'b', long = "break")]
    pub break_minutes: Option<i64>,

    /// Read settings from a JSON file (never written back)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Disable the alert chime
    #[arg(long)]
    pub no_sound: bool,

    /// Where log records go
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn should_parse_durations_and_flags() {
        let args = Args::parse_from(["softpomo", "-f", "40", "--break", "8", "--no-sound"]);
        assert_eq!(args.focus, Some(40));
        assert_eq!(args.break_minutes, Some(8));
        assert!(args.no_sound);
        assert!(args.config.is_none());
    }

    #[test]
    fn should_reject_non_numeric_minutes() {
        assert!(Args::try_parse_from(["softpomo", "--focus", "soon"]).is_err());
    }
}
