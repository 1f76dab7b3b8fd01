use clap::Parser;
use std::path::PathBuf;

use crate::models::ContentType;

/// Keyword accepted by `--rating` to select titles without a rating.
pub const UNRATED_KEYWORD: &str = "unrated";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Descriptive statistics over a streaming catalog export
#[derive(Parser, Debug, Clone)]
#[command(
    name = "catalog-dash",
    about = "Descriptive statistics over a streaming catalog export",
    version
)]
pub struct Settings {
    /// Path to the catalog CSV file
    #[arg(env = "CATALOG_DASH_INPUT")]
    pub input: Option<PathBuf>,

    /// Earliest release year to include
    #[arg(long)]
    pub year_min: Option<i32>,

    /// Latest release year to include
    #[arg(long)]
    pub year_max: Option<i32>,

    /// Content type to include (repeatable; default: all observed)
    #[arg(long = "type", value_parser = ["movie", "tv-show"])]
    pub types: Vec<String>,

    /// Rating to include, any case (repeatable; "unrated" selects titles with no rating)
    #[arg(long = "rating")]
    pub ratings: Vec<String>,

    /// Output format
    #[arg(long, default_value = "table", value_parser = ["table", "json"])]
    pub format: String,

    /// Cap the number of entries printed per frequency table (leaderboards stay at their own size)
    #[arg(long)]
    pub top: Option<usize>,

    /// Print up to N of the filtered titles after the dashboard
    #[arg(long, value_name = "N")]
    pub show_rows: Option<usize>,

    /// Field delimiter of the input file
    #[arg(long, default_value = ",")]
    pub delimiter: char,

    /// Print every dropped row after the summary
    #[arg(long)]
    pub show_errors: bool,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments and resolve derived values.
    pub fn load() -> Self {
        Self::resolve(Settings::parse())
    }

    /// Same as [`Settings::load`] but with an explicit argument list.
    pub fn load_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Settings::try_parse_from(args).map(Self::resolve)
    }

    /// `--debug` overrides the log level.
    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Content types selected with `--type`; empty means "all observed".
    pub fn content_types(&self) -> Vec<ContentType> {
        self.types
            .iter()
            .filter_map(|t| ContentType::parse(t))
            .collect()
    }

    /// Ratings selected with `--rating`, `None` standing for "unrated".
    /// Empty means "all observed".
    pub fn rating_selection(&self) -> Vec<Option<String>> {
        self.ratings
            .iter()
            .map(|r| r.trim())
            .filter(|r| !r.is_empty())
            .map(|r| {
                if r.eq_ignore_ascii_case(UNRATED_KEYWORD) {
                    None
                } else {
                    Some(r.to_string())
                }
            })
            .collect()
    }

    /// The delimiter as the byte the CSV reader expects.
    ///
    /// Returns `None` for non-ASCII delimiters.
    pub fn delimiter_byte(&self) -> Option<u8> {
        u8::try_from(self.delimiter).ok().filter(|b| b.is_ascii())
    }

    pub fn wants_json(&self) -> bool {
        self.format == "json"
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
