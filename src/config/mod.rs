pub mod error;
pub mod templates;

use crate::config::error::ConfigError;
use crate::core::filter::DEFAULT_MIN_DURATION_MINUTES;
use crate::shared::utils;
use mlua::{Lua, Table, Value};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_BUSY_CALENDARS: [&str; 3] = ["UIUC", "Personal", "YMCA"];
pub const DEFAULT_SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";
pub const DEFAULT_REDIRECT_URL: &str = "http://127.0.0.1:9004";

#[derive(Debug, PartialEq, Eq)]
pub struct Config {
    pub source: Source,
    pub workday: Workday,
    pub output: Output,
    pub settings: Settings,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Settings {
    /// `None` means the system's local time zone.
    pub tz: Option<String>,
    pub oauth_file_path: String,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Source {
    pub google: GoogleSource,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Output {
    pub template: String,
}

#[derive(Debug, PartialEq, Eq)]
pub struct GoogleSource {
    pub oauth2: GoogleOAuth2,
    pub calendar: GoogleCalendar,
}

#[derive(Debug, PartialEq, Eq)]
pub struct GoogleOAuth2 {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
    pub scopes: Vec<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct GoogleCalendar {
    pub busy_calendars: Vec<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Workday {
    pub start_hour: u32,
    pub end_hour: u32,
    pub lookahead_days: u32,
    pub min_duration_minutes: i64,
}

impl Default for Workday {
    fn default() -> Self {
        Self {
            start_hour: 10,
            end_hour: 18,
            lookahead_days: 3,
            min_duration_minutes: DEFAULT_MIN_DURATION_MINUTES,
        }
    }
}

pub fn init() -> anyhow::Result<Config> {
    let path_buf = get_config_file_path()?;
    load_config(&path_buf)
}

fn get_config_file_path() -> anyhow::Result<PathBuf> {
    let config_file_path_buf = match env::var("FREETIME_CONFIG_FILE_PATH") {
        Ok(path) => utils::path::expand_tilde(path.trim()),
        Err(_) => utils::path::default_config_file()?,
    };

    if config_file_path_buf.is_file() {
        Ok(config_file_path_buf)
    } else {
        Err(
            ConfigError::ConfigFileNotFoundError(utils::path::contract_tilde(
                &config_file_path_buf,
            ))
            .into(),
        )
    }
}

fn load_config(config_file_path: &Path) -> anyhow::Result<Config> {
    let lua = Lua::new();
    let shown_path = utils::path::contract_tilde(config_file_path);

    let config_path = config_file_path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .to_string_lossy();

    lua.load(format!(
        r#"package.path = package.path .. ";{}/?.lua""#,
        config_path
    ))
    .exec()?;

    let freetime_mod = lua.create_table()?;
    let template_sub_mod = lua.create_table()?;

    template_sub_mod
        .set("table", crate::config::templates::slots::TABLE)
        .map_err(|e| ConfigError::LuaRuntimeError(e.to_string()))?;
    template_sub_mod
        .set("list", crate::config::templates::slots::LIST)
        .map_err(|e| ConfigError::LuaRuntimeError(e.to_string()))?;
    freetime_mod.set("template", template_sub_mod)?;

    let globals = lua.globals();
    let package: Table = globals.get("package")?;
    let loaded: Table = package.get("loaded")?;

    loaded.set("freetime", freetime_mod)?;

    let config_code = fs::read_to_string(config_file_path)?;
    let config_eval: Value = lua.load(&config_code).eval()?;

    let Value::Table(config_tbl) = config_eval else {
        return Err(ConfigError::RequiredFieldNotFound(
            "config.lua did not return a table!".to_owned(),
            shown_path,
        )
        .into());
    };

    let source_tbl = required_table(&config_tbl, "source", "source", &shown_path)?;
    let google_tbl = required_table(&source_tbl, "google", "source.google", &shown_path)?;
    let google_oauth2_tbl =
        required_table(&google_tbl, "oauth2", "source.google.oauth2", &shown_path)?;

    let google_oauth2_client_id: String = google_oauth2_tbl
        .get::<_, Option<String>>("clientID")?
        .ok_or_else(|| {
            ConfigError::RequiredFieldNotFound(
                "source.google.oauth2.clientID".to_owned(),
                shown_path.clone(),
            )
        })?;
    let google_oauth2_client_secret: String = google_oauth2_tbl
        .get::<_, Option<String>>("clientSecret")?
        .ok_or_else(|| {
            ConfigError::RequiredFieldNotFound(
                "source.google.oauth2.clientSecret".to_owned(),
                shown_path.clone(),
            )
        })?;

    let google_oauth2_scopes: Vec<String> = match google_oauth2_tbl
        .get::<_, Option<Table>>("scopes")?
    {
        Some(scopes) => scopes.sequence_values().collect::<Result<_, _>>()?,
        None => vec![DEFAULT_SCOPE.to_string()],
    };

    let redirect_url: String = google_oauth2_tbl
        .get::<_, Option<String>>("redirectURL")?
        .unwrap_or(DEFAULT_REDIRECT_URL.to_string());

    let busy_calendars: Vec<String> = match google_tbl
        .get::<_, Option<Table>>("calendar")?
        .map(|tbl| tbl.get::<_, Option<Table>>("busyCalendars"))
        .transpose()?
        .flatten()
    {
        Some(names) => names.sequence_values().collect::<Result<_, _>>()?,
        None => DEFAULT_BUSY_CALENDARS.iter().map(|s| s.to_string()).collect(),
    };

    let workday = match config_tbl.get::<_, Option<Table>>("workday")? {
        Some(tbl) => load_workday(&tbl, &shown_path)?,
        None => Workday::default(),
    };

    let template: String = match config_tbl.get::<_, Option<Table>>("output")? {
        Some(output_tbl) => output_tbl
            .get::<_, Option<String>>("template")?
            .unwrap_or(crate::config::templates::slots::TABLE.to_string()),
        None => crate::config::templates::slots::TABLE.to_string(),
    };

    let oauth_default_path = utils::path::default_token_file()?
        .to_string_lossy()
        .to_string();
    let settings = match config_tbl.get::<_, Option<Table>>("settings")? {
        Some(table) => {
            let oauth_file_path = table
                .get::<_, Option<String>>("oauthFilePath")?
                .map(|p| utils::path::expand_tilde(&p).to_string_lossy().to_string())
                .unwrap_or(oauth_default_path);
            let tz = table.get::<_, Option<String>>("TZ")?;

            Settings {
                oauth_file_path,
                tz,
            }
        }
        None => Settings {
            oauth_file_path: oauth_default_path,
            tz: None,
        },
    };

    Ok(Config {
        source: Source {
            google: GoogleSource {
                oauth2: GoogleOAuth2 {
                    client_id: google_oauth2_client_id,
                    client_secret: google_oauth2_client_secret,
                    redirect_url,
                    scopes: google_oauth2_scopes,
                },
                calendar: GoogleCalendar { busy_calendars },
            },
        },
        workday,
        output: Output { template },
        settings,
    })
}

fn required_table<'lua>(
    tbl: &Table<'lua>,
    key: &str,
    field: &str,
    shown_path: &str,
) -> anyhow::Result<Table<'lua>> {
    tbl.get::<_, Option<Table>>(key)?.ok_or_else(|| {
        ConfigError::RequiredFieldNotFound(field.to_owned(), shown_path.to_owned()).into()
    })
}

fn load_workday(tbl: &Table, shown_path: &str) -> anyhow::Result<Workday> {
    let defaults = Workday::default();
    let workday = Workday {
        start_hour: tbl
            .get::<_, Option<u32>>("startHour")?
            .unwrap_or(defaults.start_hour),
        end_hour: tbl
            .get::<_, Option<u32>>("endHour")?
            .unwrap_or(defaults.end_hour),
        lookahead_days: tbl
            .get::<_, Option<u32>>("lookaheadDays")?
            .unwrap_or(defaults.lookahead_days),
        min_duration_minutes: tbl
            .get::<_, Option<i64>>("minDurationMinutes")?
            .unwrap_or(defaults.min_duration_minutes),
    };

    if workday.start_hour >= workday.end_hour || workday.end_hour > 23 {
        return Err(ConfigError::InvalidField(
            "workday.startHour/endHour".to_owned(),
            shown_path.to_owned(),
            format!(
                "start {} must be before end {} and end at most 23",
                workday.start_hour, workday.end_hour
            ),
        )
        .into());
    }
    if workday.lookahead_days == 0 {
        return Err(ConfigError::InvalidField(
            "workday.lookaheadDays".to_owned(),
            shown_path.to_owned(),
            "must be at least 1".to_owned(),
        )
        .into());
    }
    if workday.min_duration_minutes < 0 {
        return Err(ConfigError::InvalidField(
            "workday.minDurationMinutes".to_owned(),
            shown_path.to_owned(),
            "must not be negative".to_owned(),
        )
        .into());
    }

    Ok(workday)
}
