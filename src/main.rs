mod config;
mod core;
mod google;
mod shared;

use clap::Parser;
use crate::config::Config;
use crate::core::freetime::FreeTime;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "freetime",
    version,
    about = "Lists your open meeting slots over the next few workdays, based on the busy calendars in your Google Calendar."
)]
pub struct Cli {
    #[arg(long, value_name = "N", help = "Number of workdays to look ahead.")]
    pub days: Option<u32>,
    #[arg(
        long,
        value_name = "MINUTES",
        help = "Drop free slots shorter than this many minutes."
    )]
    pub min_minutes: Option<i64>,
    #[arg(long, value_name = "HOUR", help = "Workday start hour (0-23).")]
    pub start_hour: Option<u32>,
    #[arg(long, value_name = "HOUR", help = "Workday end hour (1-23).")]
    pub end_hour: Option<u32>,
    #[arg(
        long = "calendar",
        value_name = "NAME",
        help = "Busy calendar name; repeat to list several. Replaces the configured names."
    )]
    pub calendars: Vec<String>,
    #[arg(long, value_name = "TZ", help = "Time zone, e.g. America/Chicago.")]
    pub tz: Option<String>,
    #[arg(long, short = 'v', help = "Log debug output to stderr.")]
    pub verbose: bool,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        let workday = &mut config.workday;
        if let Some(days) = self.days {
            workday.lookahead_days = days;
        }
        if let Some(minutes) = self.min_minutes {
            workday.min_duration_minutes = minutes;
        }
        if let Some(hour) = self.start_hour {
            workday.start_hour = hour;
        }
        if let Some(hour) = self.end_hour {
            workday.end_hour = hour;
        }
        if !self.calendars.is_empty() {
            config.source.google.calendar.busy_calendars = self.calendars.clone();
        }
        if let Some(tz) = &self.tz {
            config.settings.tz = Some(tz.clone());
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "freetime=debug" } else { "freetime=info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: &Cli) -> anyhow::Result<String> {
    let mut config = config::init()?;
    cli.apply(&mut config);

    let mut freetime = FreeTime::new(config);
    freetime.oauth().await?;
    freetime.find_free_time().await
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli).await {
        Ok(rendered) => print!("{}", rendered),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        GoogleCalendar, GoogleOAuth2, GoogleSource, Output, Settings, Source, Workday,
    };

    fn base_config() -> Config {
        Config {
            source: Source {
                google: GoogleSource {
                    oauth2: GoogleOAuth2 {
                        client_id: "id".to_string(),
                        client_secret: "secret".to_string(),
                        redirect_url: "http://127.0.0.1:9004".to_string(),
                        scopes: vec![],
                    },
                    calendar: GoogleCalendar {
                        busy_calendars: vec!["UIUC".to_string(), "YMCA".to_string()],
                    },
                },
            },
            workday: Workday::default(),
            output: Output {
                template: String::new(),
            },
            settings: Settings {
                tz: None,
                oauth_file_path: String::new(),
            },
        }
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "freetime",
            "--days",
            "5",
            "--min-minutes",
            "45",
            "--end-hour",
            "17",
            "--calendar",
            "Work",
            "--calendar",
            "Gym",
            "--tz",
            "Asia/Tokyo",
        ]);
        let mut config = base_config();

        cli.apply(&mut config);

        assert_eq!(config.workday.lookahead_days, 5);
        assert_eq!(config.workday.min_duration_minutes, 45);
        assert_eq!(config.workday.start_hour, 10);
        assert_eq!(config.workday.end_hour, 17);
        assert_eq!(
            config.source.google.calendar.busy_calendars,
            vec!["Work".to_string(), "Gym".to_string()]
        );
        assert_eq!(config.settings.tz, Some("Asia/Tokyo".to_string()));
    }

    #[test]
    fn test_cli_without_flags_keeps_config() {
        let cli = Cli::parse_from(["freetime"]);
        let mut config = base_config();

        cli.apply(&mut config);

        assert_eq!(config, base_config());
    }
}
