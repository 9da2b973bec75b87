use anyhow::{bail, Result};

use averbuch_core::forms::{
    format_phone, ApplicationForm, FormClient, FormKind, FormPayload, FormState, Position,
    SubmissionOutcome, Validate,
};
use averbuch_core::site::content::{APPLICATION_INTRO, APPLICATION_TITLE};
use averbuch_core::AppConfig;

use super::prompt;

pub struct Fields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub location: Option<String>,
    pub cover_letter: Option<String>,
    pub experience: Option<String>,
}

impl Fields {
    fn is_complete(&self) -> bool {
        self.name.is_some()
            && self.email.is_some()
            && self.position.is_some()
            && self.location.is_some()
            && self.cover_letter.is_some()
            && self.experience.is_some()
    }
}

pub async fn run(config: &AppConfig, fields: Fields, dry_run: bool) -> Result<()> {
    let interactive = !fields.is_complete();
    if interactive {
        println!("{}\n{}\n", APPLICATION_TITLE, APPLICATION_INTRO);
    }

    let name = prompt::field("Full Name", fields.name, false)?;
    let email = prompt::field("Email", fields.email, false)?;
    let phone = match fields.phone {
        Some(phone) => phone,
        None if interactive => prompt::field("Phone", None, true)?,
        None => String::new(),
    };

    if fields.position.is_none() {
        for (i, position) in Position::ALL.iter().enumerate() {
            println!("  {}. {}", i + 1, position.label());
        }
    }
    let position = prompt::field("Position", fields.position, false)?;
    let position = if position.trim().is_empty() {
        None
    } else {
        Some(position.parse::<Position>()?)
    };

    let form = ApplicationForm {
        name,
        email,
        phone: format_phone(&phone),
        position,
        location: prompt::field("Location", fields.location, false)?,
        cover_letter: prompt::paragraph("Cover Letter", fields.cover_letter)?,
        experience: prompt::paragraph("Relevant Experience", fields.experience)?,
    };

    let errors = form.field_errors();
    if !errors.is_empty() {
        for error in &errors {
            eprintln!("  {}", error);
        }
        bail!("application not submitted");
    }

    if dry_run {
        println!("{}", serde_json::to_string_pretty(&form.payload())?);
        return Ok(());
    }

    let client = FormClient::from_config(config)?;
    let mut state = FormState::new(FormKind::Application);
    state.begin();
    println!("{}", state.button_label());

    let outcome = client.submit(&form).await?;
    state.finish(&outcome);
    if let Some(message) = state.message() {
        println!("{}", message);
    }
    if let SubmissionOutcome::Failed { reason, .. } = &outcome {
        bail!("application was not accepted: {}", reason);
    }
    Ok(())
}
