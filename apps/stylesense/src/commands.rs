//! Command handlers behind the CLI.
//!
//! Each handler takes the shared state (and a stylist when it talks to the
//! model) and returns the text to print, so `main` only parses arguments and
//! reports errors.

use std::path::Path;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::image::path_to_data_url;
use crate::models::history::{AnalysisEntry, HistoryRecord};
use crate::models::user::Preferences;
use crate::render;
use crate::session::{self, NewAccount, SessionContext};
use crate::state::AppState;
use crate::stylist::chat::{Consultation, CONSULTATION_INTERRUPTED};
use crate::stylist::orchestrator::Stylist;
use crate::stylist::recommendation::RecommendationRequest;

/// Optional preference edits; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct PreferenceChanges {
    pub gender: Option<String>,
    pub age: Option<String>,
    pub colors: Option<Vec<String>>,
    pub budget: Option<String>,
    pub skin_tone: Option<String>,
}

impl PreferenceChanges {
    fn is_empty(&self) -> bool {
        self.gender.is_none()
            && self.age.is_none()
            && self.colors.is_none()
            && self.budget.is_none()
            && self.skin_tone.is_none()
    }

    fn apply(self, mut prefs: Preferences) -> Preferences {
        if let Some(gender) = self.gender {
            prefs.gender = gender;
        }
        if let Some(age) = self.age {
            prefs.age = age;
        }
        if let Some(colors) = self.colors {
            prefs.colors = colors;
        }
        if let Some(budget) = self.budget {
            prefs.budget = budget;
        }
        if let Some(skin_tone) = self.skin_tone {
            prefs.skin_tone = Some(skin_tone);
        }
        prefs
    }
}

pub fn register(state: &AppState, account: NewAccount) -> Result<String, AppError> {
    if account.name.trim().is_empty() {
        return Err(AppError::Validation("Name must not be empty".to_string()));
    }
    if !account.email.contains('@') {
        return Err(AppError::Validation(format!(
            "'{}' is not a valid email address",
            account.email
        )));
    }
    if account.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".to_string()));
    }

    let session = session::register(&state.store, account)?;
    Ok(format!(
        "Welcome, {}! Your profile is ready.\n{}",
        session.user().first_name(),
        render::profile_card(session.user())
    ))
}

pub fn login(state: &AppState, email: &str, password: &str) -> Result<String, AppError> {
    let session = session::login(&state.store, email, password)?;
    Ok(format!("Signed in as {}.\n", session.user().name))
}

pub fn logout(state: &AppState) -> Result<String, AppError> {
    match session::restore(&state.store)? {
        Some(session) => {
            let name = session.user().name.clone();
            session::logout(&state.store, session)?;
            Ok(format!("Signed out {name}.\n"))
        }
        None => Ok("Nobody is signed in.\n".to_string()),
    }
}

pub fn whoami(state: &AppState) -> Result<String, AppError> {
    let session = session::require(&state.store)?;
    Ok(render::profile_card(session.user()))
}

pub fn preferences(state: &AppState, changes: PreferenceChanges) -> Result<String, AppError> {
    let mut session = session::require(&state.store)?;
    if changes.is_empty() {
        return Ok(render::profile_card(session.user()));
    }

    let current = session.user().preferences.clone().unwrap_or_default();
    let updated = state
        .store
        .update_preferences(session.user_id(), changes.apply(current))?
        .ok_or_else(|| AppError::Validation("Signed-in user no longer exists".to_string()))?;
    session.refresh(updated);
    Ok(render::profile_card(session.user()))
}

pub fn history(state: &AppState) -> Result<String, AppError> {
    let session = session::require(&state.store)?;
    let entries = state.store.get_history(session.user_id())?;
    Ok(render::history_list(&entries))
}

/// Accepts a path to an image file or an inline data URL.
fn load_image(source: &str) -> Result<String, AppError> {
    if source.starts_with("data:") {
        return Ok(source.to_string());
    }
    Ok(path_to_data_url(Path::new(source))?)
}

pub async fn analyze(
    state: &AppState,
    stylist: &Stylist,
    session: &SessionContext,
    image_source: &str,
) -> Result<String, AppError> {
    let image = load_image(image_source)?;
    let permit = state.admit(session.user_id())?;

    let result = stylist.analyze(&image, session.user()).await?;
    state.complete(session.user_id(), permit)?;

    let card = render::analysis_card(&result);
    let record = HistoryRecord::Analysis(AnalysisEntry { result, image });
    state.store.save_to_history(session.user_id(), record)?;
    Ok(card)
}

pub async fn recommend(
    state: &AppState,
    stylist: &Stylist,
    session: &SessionContext,
    request: RecommendationRequest,
    image_source: Option<&str>,
) -> Result<String, AppError> {
    let image = image_source.map(load_image).transpose()?;
    let permit = state.admit(session.user_id())?;

    let result = stylist
        .recommend(session.user(), &request, image.as_deref())
        .await?;
    state.complete(session.user_id(), permit)?;

    let card = render::recommendation_card(&result);
    state
        .store
        .save_to_history(session.user_id(), HistoryRecord::Recommendation(result))?;
    Ok(card)
}

/// Runs the consultation REPL until `exit`, `quit` or end of input.
pub async fn chat<R, W>(
    stylist: &Stylist,
    session: &SessionContext,
    input: R,
    mut output: W,
) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut consultation =
        Consultation::start(stylist.endpoint(), stylist.primary_model(), session.user());
    write_out(&mut output, &format!("{}\n\n> ", consultation.greeting())).await?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.map_err(anyhow::Error::from)? {
        let message = line.trim();
        if message.eq_ignore_ascii_case("exit") || message.eq_ignore_ascii_case("quit") {
            break;
        }
        if !message.is_empty() {
            let reply = match consultation.send(message).await {
                Ok(reply) => reply,
                Err(e) => {
                    warn!("Consultation error ({}): {e}", e.kind().code());
                    CONSULTATION_INTERRUPTED.to_string()
                }
            };
            write_out(&mut output, &format!("\n{reply}\n")).await?;
        }
        write_out(&mut output, "\n> ").await?;
    }

    info!(
        "Consultation ended after {} turns",
        consultation.transcript().len() / 2
    );
    Ok(())
}

async fn write_out<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<(), AppError> {
    output
        .write_all(text.as_bytes())
        .await
        .map_err(anyhow::Error::from)?;
    output.flush().await.map_err(anyhow::Error::from)?;
    Ok(())
}
