//! Verification API connection arguments.

use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;
use std::time::Duration;
use url::Url;

pub const ARG_API_URL: &str = "api-url";
pub const ARG_API_TOKEN: &str = "api-token";
pub const ARG_API_TIMEOUT_SECONDS: &str = "api-timeout-seconds";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_URL)
                .long(ARG_API_URL)
                .help("Base URL of the verification API, example: https://api.snowpro.app")
                .env("SNOWPRO_API_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_API_TOKEN)
                .long(ARG_API_TOKEN)
                .help("Bearer token sent with every API request")
                .env("SNOWPRO_API_TOKEN")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_API_TIMEOUT_SECONDS)
                .long(ARG_API_TIMEOUT_SECONDS)
                .help("API request timeout in seconds, 0 disables it")
                .default_value("10")
                .env("SNOWPRO_API_TIMEOUT_SECONDS")
                .value_parser(clap::value_parser!(u64)),
        )
}

#[derive(Debug)]
pub struct Options {
    pub url: String,
    pub token: Option<SecretString>,
    pub timeout: Option<Duration>,
}

impl Options {
    /// # Errors
    /// Returns an error if the API URL is missing or not an absolute http(s) URL.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let url = matches
            .get_one::<String>(ARG_API_URL)
            .cloned()
            .context("missing required argument: --api-url")?;

        let parsed = Url::parse(&url).with_context(|| format!("invalid SNOWPRO_API_URL: {url}"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(anyhow!(
                "invalid SNOWPRO_API_URL: unsupported scheme {}",
                parsed.scheme()
            ));
        }

        let token = matches
            .get_one::<String>(ARG_API_TOKEN)
            .filter(|token| !token.is_empty())
            .map(|token| SecretString::from(token.clone()));

        let timeout = matches
            .get_one::<u64>(ARG_API_TIMEOUT_SECONDS)
            .copied()
            .filter(|seconds| *seconds > 0)
            .map(Duration::from_secs);

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            token,
            timeout,
        })
    }
}
