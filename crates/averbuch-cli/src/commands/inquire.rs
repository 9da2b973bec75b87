use anyhow::{bail, Result};

use averbuch_core::forms::{FormClient, FormKind, FormPayload, FormState, InquiryForm, SubmissionOutcome, Validate};
use averbuch_core::site::content::{INQUIRY_INTRO, INQUIRY_TITLE};
use averbuch_core::AppConfig;

use super::prompt;

pub struct Fields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub message: Option<String>,
}

pub async fn run(config: &AppConfig, fields: Fields, dry_run: bool) -> Result<()> {
    let interactive = fields.name.is_none() || fields.email.is_none() || fields.message.is_none();
    if interactive {
        println!("{}\n{}\n", INQUIRY_TITLE, INQUIRY_INTRO);
    }

    let name = prompt::field("Name", fields.name, false)?;
    let email = prompt::field("Email", fields.email, false)?;
    // Only ask for the company when prompting for the rest anyway
    let company = match fields.company {
        Some(company) => Some(company),
        None if interactive => Some(prompt::field("Company", None, true)?),
        None => None,
    };
    let form = InquiryForm {
        name,
        email,
        company: company.filter(|c| !c.trim().is_empty()),
        message: prompt::paragraph("Message", fields.message)?,
    };

    let errors = form.field_errors();
    if !errors.is_empty() {
        for error in &errors {
            eprintln!("  {}", error);
        }
        bail!("inquiry not sent");
    }

    if dry_run {
        println!("{}", serde_json::to_string_pretty(&form.payload())?);
        return Ok(());
    }

    let client = FormClient::from_config(config)?;
    let mut state = FormState::new(FormKind::Inquiry);
    state.begin();
    println!("{}", state.button_label());

    let outcome = client.submit(&form).await?;
    state.finish(&outcome);
    if let Some(message) = state.message() {
        println!("{}", message);
    }
    if let SubmissionOutcome::Failed { reason, .. } = &outcome {
        bail!("inquiry was not accepted: {}", reason);
    }
    Ok(())
}
