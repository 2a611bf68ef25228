//! Email verification from the signup link (`?email_id=&secret_code=`).

use super::{
    params::{extract, Field},
    Flow, FlowError, NavigationContext,
};
use crate::client::{VerificationClient, VerifyEmailRequest};
use crate::locale::{Locale, Strings};
use serde::Serialize;

const FIELDS: [Field; 2] = [Field::integer("email_id"), Field::text("secret_code")];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailParams {
    pub email_id: i64,
    pub secret_code: String,
}

/// Confirmation that the address is verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmailConfirmed {
    pub email_id: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct EmailVerification {
    strings: &'static Strings,
}

impl EmailVerification {
    #[must_use]
    pub fn new(locale: Locale) -> Self {
        Self {
            strings: locale.strings(),
        }
    }
}

impl Flow for EmailVerification {
    type Params = EmailParams;
    type Payload = EmailConfirmed;

    const NAME: &'static str = "verify_email";

    fn extract(&self, context: &NavigationContext) -> Result<EmailParams, FlowError> {
        let params = extract(context, &FIELDS)?;
        Ok(EmailParams {
            email_id: params.integer("email_id")?,
            secret_code: params.text("secret_code")?.to_string(),
        })
    }

    async fn call<C: VerificationClient>(
        &self,
        client: &C,
        params: &EmailParams,
    ) -> Result<EmailConfirmed, FlowError> {
        let response = client
            .verify_email(VerifyEmailRequest {
                email_id: params.email_id,
                secret_code: params.secret_code.clone(),
            })
            .await?;

        if response.success {
            Ok(EmailConfirmed {
                email_id: params.email_id,
            })
        } else {
            Err(FlowError::rejected(response.message))
        }
    }

    fn describe(&self, error: &FlowError) -> String {
        match error {
            FlowError::Validation(_) => self.strings.invalid_link.to_string(),
            FlowError::NegativeResult { .. } | FlowError::Transport(_) => error
                .supplied_message()
                .unwrap_or(self.strings.verification_failed)
                .to_string(),
            FlowError::LocalPolicy(_) => self.strings.unknown_error.to_string(),
        }
    }
}
