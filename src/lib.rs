//! # SnowPro web
//!
//! Server-rendered pages backing the SnowPro mobile app's web presence:
//!
//! - `/instructors/:id` sends phones to the matching app store and offers both
//!   store links to everything else.
//! - `/verify-email` confirms an email address from the link sent at signup.
//! - `/reset-password` verifies a forgot-password link and then accepts the new
//!   password through a follow-up form.
//!
//! ## Flow model
//!
//! Every page runs a one-shot flow (see [`flow`]): parameters are pulled from the
//! request and validated locally, then exactly one call goes out to the
//! verification API through an injected [`client::VerificationClient`]. The flow
//! ends in a single terminal state (`Success` or `Failure`) that the presentation
//! layer renders. Invalid links never reach the network.

pub mod cli;
pub mod client;
pub mod flow;
pub mod locale;
pub mod snowpro;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
