use chrono::NaiveTime;
use dotenvy::dotenv;
use std::env;

use crate::utils::timefmt;

#[derive(Clone)]
pub struct Config {
    pub api_base_url: String,
    /// Opaque bearer token; absent means the operator must log in first.
    pub api_token: Option<String>,
    pub default_check_in: NaiveTime,
    pub default_check_out: NaiveTime,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            api_base_url: env::var("API_BASE_URL").expect("API_BASE_URL must be set"),
            api_token: env::var("API_TOKEN").ok().filter(|t| !t.trim().is_empty()),
            default_check_in: time_var("DEFAULT_CHECK_IN", "09:30"),
            default_check_out: time_var("DEFAULT_CHECK_OUT", "19:00"),
        }
    }
}

fn time_var(key: &str, default: &str) -> NaiveTime {
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    timefmt::parse_hhmm(&raw).unwrap_or_else(|| panic!("{key} must be HH:MM, got {raw}"))
}
