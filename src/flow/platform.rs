//! Device redirect: the instructor deep link.
//!
//! No remote call is involved. The requesting device is classified from its
//! User-Agent and phones are sent to their app store with a replace navigation
//! (a `303 See Other`, so the redirect page never lands in history). Anything
//! else stays on a page offering both store links.

use super::error::ValidationError;
use super::params::{extract, Field, NavigationContext};
use regex::Regex;
use serde::Serialize;
use url::Url;

pub const DEFAULT_IOS_STORE_URL: &str = "https://apps.apple.com/us/app/snowpro/idXXXXXXXXX";
pub const DEFAULT_ANDROID_STORE_URL: &str =
    "https://play.google.com/store/apps/details?id=com.googuar.snowpro";

const INSTRUCTOR_FIELDS: [Field; 1] = [Field::text("id")];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
    Other,
}

impl Platform {
    /// Classify a User-Agent. Total: every input maps to exactly one platform.
    #[must_use]
    pub fn classify(user_agent: &str) -> Self {
        // IE Mobile on Windows Phone advertises itself as an iPhone.
        let windows_phone =
            Regex::new(r"(?i)windows phone|iemobile").is_ok_and(|re| re.is_match(user_agent));

        if !windows_phone
            && Regex::new(r"iPad|iPhone|iPod").is_ok_and(|re| re.is_match(user_agent))
        {
            Self::Ios
        } else if Regex::new(r"(?i)android").is_ok_and(|re| re.is_match(user_agent)) {
            Self::Android
        } else {
            Self::Other
        }
    }
}

/// The two fixed storefront addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destinations {
    pub ios: Url,
    pub android: Url,
}

impl Destinations {
    /// # Errors
    /// Returns an error if either URL does not parse.
    pub fn parse(ios: &str, android: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            ios: Url::parse(ios)?,
            android: Url::parse(android)?,
        })
    }

    #[must_use]
    pub fn for_platform(&self, platform: Platform) -> Option<&Url> {
        match platform {
            Platform::Ios => Some(&self.ios),
            Platform::Android => Some(&self.android),
            Platform::Other => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectDecision {
    Navigate(Url),
    /// No automatic navigation; the page offers both destinations.
    Offer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRedirect {
    pub instructor_id: String,
    pub platform: Platform,
    pub decision: RedirectDecision,
}

impl DeviceRedirect {
    /// # Errors
    /// Returns [`ValidationError::Missing`] when the instructor id is absent or blank.
    pub fn resolve(
        context: &NavigationContext,
        user_agent: Option<&str>,
        destinations: &Destinations,
    ) -> Result<Self, ValidationError> {
        let params = extract(context, &INSTRUCTOR_FIELDS)?;
        let platform = Platform::classify(user_agent.unwrap_or_default());
        let decision = destinations
            .for_platform(platform)
            .map_or(RedirectDecision::Offer, |url| {
                RedirectDecision::Navigate(url.clone())
            });

        Ok(Self {
            instructor_id: params.text("id")?.to_string(),
            platform,
            decision,
        })
    }
}
