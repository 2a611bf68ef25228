//! Map validated CLI arguments to the server action.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{api, store};
use anyhow::Result;

/// # Errors
/// Returns an error if required arguments are missing or a URL is invalid.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);

    let api_opts = api::Options::parse(matches)?;
    let destinations = store::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        api_url: api_opts.url,
        api_token: api_opts.token,
        api_timeout: api_opts.timeout,
        destinations,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn builds_server_action() {
        temp_env::with_vars(
            [
                ("SNOWPRO_API_URL", Some("https://api.snowpro.app")),
                ("SNOWPRO_PORT", Some("9090")),
                ("SNOWPRO_API_TOKEN", None::<&str>),
                ("SNOWPRO_API_TIMEOUT_SECONDS", Some("5")),
                ("SNOWPRO_IOS_STORE_URL", None),
                ("SNOWPRO_ANDROID_STORE_URL", None),
            ],
            || {
                let matches = crate::cli::commands::new().get_matches_from(vec!["snowpro"]);
                let Ok(Action::Server(args)) = handler(&matches) else {
                    panic!("expected server action");
                };
                assert_eq!(args.port, 9090);
                assert_eq!(args.api_url, "https://api.snowpro.app");
                assert!(args.api_token.is_none());
                assert_eq!(args.api_timeout, Some(Duration::from_secs(5)));
            },
        );
    }

    #[test]
    fn invalid_api_url_is_rejected() {
        temp_env::with_vars(
            [
                ("SNOWPRO_API_URL", Some("api.snowpro.app")),
                ("SNOWPRO_IOS_STORE_URL", None::<&str>),
                ("SNOWPRO_ANDROID_STORE_URL", None),
            ],
            || {
                let matches = crate::cli::commands::new().get_matches_from(vec!["snowpro"]);
                let result = handler(&matches);
                assert!(result.is_err());
                if let Err(err) = result {
                    assert!(err.to_string().contains("invalid SNOWPRO_API_URL"));
                }
            },
        );
    }
}
