//! App store destinations for the instructor deep link.

use crate::flow::platform::{Destinations, DEFAULT_ANDROID_STORE_URL, DEFAULT_IOS_STORE_URL};
use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};

pub const ARG_IOS_STORE_URL: &str = "ios-store-url";
pub const ARG_ANDROID_STORE_URL: &str = "android-store-url";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_IOS_STORE_URL)
                .long(ARG_IOS_STORE_URL)
                .help("App Store page iOS devices are sent to")
                .default_value(DEFAULT_IOS_STORE_URL)
                .env("SNOWPRO_IOS_STORE_URL"),
        )
        .arg(
            Arg::new(ARG_ANDROID_STORE_URL)
                .long(ARG_ANDROID_STORE_URL)
                .help("Google Play page Android devices are sent to")
                .default_value(DEFAULT_ANDROID_STORE_URL)
                .env("SNOWPRO_ANDROID_STORE_URL"),
        )
}

/// # Errors
/// Returns an error if either store URL does not parse.
pub fn parse(matches: &ArgMatches) -> Result<Destinations> {
    let ios = matches
        .get_one::<String>(ARG_IOS_STORE_URL)
        .map_or(DEFAULT_IOS_STORE_URL, String::as_str);
    let android = matches
        .get_one::<String>(ARG_ANDROID_STORE_URL)
        .map_or(DEFAULT_ANDROID_STORE_URL, String::as_str);

    Destinations::parse(ios, android)
        .with_context(|| format!("invalid store URL: {ios} / {android}"))
}
