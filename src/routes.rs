use std::sync::Arc;

use axum::{
    extract::{multipart::Field, Multipart, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;

use crate::{
    contact::{Contact, ContactUpdate, DEFAULT_IMG},
    error::AppError,
    flash::{mint_token, SESSION_COOKIE},
    search::{self, sort_by_name},
    state::AppState,
    store::StoreError,
    utils::save_upload,
    validate::{self, ValidationError},
    views,
};

/// Returns the request's flash token, minting the `sid` cookie on first
/// contact. The jar must go back out with the response for the mint to stick.
fn session(jar: CookieJar) -> (CookieJar, String) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let token = cookie.value().to_string();
        return (jar, token);
    }
    let token = mint_token();
    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .path("/")
        .build();
    (jar.add(cookie), token)
}

pub async fn index_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let (jar, token) = session(jar);
    let flash = state.flash.take(&token).await;

    // A leftover search result survives exactly this one render.
    let (contacts, from_search) = match flash.search_results {
        Some(results) => (results, true),
        None => {
            let mut contacts = state.store.find_all().await?;
            sort_by_name(&mut contacts);
            (contacts, false)
        }
    };

    let page = views::index_page(&contacts, &flash.messages, from_search);
    Ok((jar, Html(page)).into_response())
}

pub async fn add_form_handler() -> Html<String> {
    Html(views::add_page(&[]))
}

#[derive(Deserialize)]
pub struct SearchForm {
    pub search: String,
}

pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<SearchForm>,
) -> Result<Response, AppError> {
    let (jar, token) = session(jar);
    let term = form.search.trim();
    if term.is_empty() {
        return Ok((jar, Redirect::to("/")).into_response());
    }

    let contacts = search::search_by_name(state.store.as_ref(), term).await?;
    if contacts.is_empty() {
        state
            .flash
            .push_message(&token, format!("{term} not found!"))
            .await;
    } else {
        state.flash.set_search_results(&token, contacts).await;
    }
    Ok((jar, Redirect::to("/")).into_response())
}

#[derive(Deserialize)]
pub struct FavouriteForm {
    #[serde(rename = "isFavourite")]
    pub is_favourite: Option<String>,
}

pub async fn favourite_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    jar: CookieJar,
    Form(form): Form<FavouriteForm>,
) -> Result<Response, AppError> {
    let (jar, token) = session(jar);
    let is_favourite = form.is_favourite.as_deref() == Some("on");

    let hits = search::find_by_name(state.store.as_ref(), &name).await?;
    if hits.is_empty() {
        state
            .flash
            .push_message(&token, format!("{name} not found!"))
            .await;
        return Ok((jar, Redirect::to("/")).into_response());
    }

    // Name stays untouched, so no duplicate check.
    let update = ContactUpdate {
        is_favourite: Some(is_favourite),
        ..Default::default()
    };
    state.store.update_by_name(&name, update).await?;
    Ok((jar, Redirect::to("/")).into_response())
}

#[derive(Default)]
struct Submission {
    form: validate::ContactForm,
    old_name: String,
    upload: Option<(String, Vec<u8>)>,
}

async fn read_text(field: Field<'_>) -> Result<String, AppError> {
    field.text().await.map_err(|_| AppError::MalformedPayload)
}

async fn read_submission(mut multipart: Multipart) -> Result<Submission, AppError> {
    let mut submission = Submission::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::MalformedPayload)?
    {
        let Some(field_name) = field.name().map(str::to_string) else {
            continue;
        };
        match field_name.as_str() {
            "name" => submission.form.name = read_text(field).await?,
            "email" => submission.form.email = read_text(field).await?,
            "num" => submission.form.num = read_text(field).await?,
            "oldName" => submission.old_name = read_text(field).await?,
            "img" => {
                let filename = field.file_name().map(str::to_string);
                let bytes = field.bytes().await.map_err(|_| AppError::MalformedPayload)?;
                if let Some(filename) = filename {
                    // Browsers send an empty part when no file was picked.
                    if !filename.is_empty() && !bytes.is_empty() {
                        submission.upload = Some((filename, bytes.to_vec()));
                    }
                }
            }
            _ => {}
        }
    }
    Ok(submission)
}

pub async fn create_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let (jar, token) = session(jar);
    let submission = read_submission(multipart).await?;

    let errors = validate::validate_new(state.store.as_ref(), &submission.form).await?;
    if !errors.is_empty() {
        return Ok((jar, Html(views::add_page(&errors))).into_response());
    }

    let img = match &submission.upload {
        Some((filename, bytes)) => save_upload(&state.config.public_dir, filename, bytes).await?,
        None => DEFAULT_IMG.to_string(),
    };
    let contact = Contact {
        name: submission.form.name,
        email: submission.form.email,
        num: validate::normalize_phone(&submission.form.num),
        is_favourite: false,
        img,
    };

    match state.store.insert(contact).await {
        Ok(_) => {}
        // The unique index closes the check-then-insert race.
        Err(StoreError::Duplicate) => {
            let errors = [ValidationError::DuplicateContact];
            return Ok((jar, Html(views::add_page(&errors))).into_response());
        }
        Err(err) => return Err(err.into()),
    }

    state
        .flash
        .push_message(&token, "Contact added successfully!")
        .await;
    Ok((jar, Redirect::to("/")).into_response())
}

pub async fn detail_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Html<String>, AppError> {
    let hits = state.store.find_by_name_exact(&name).await?;
    let contact = hits.first().ok_or_else(|| AppError::NotFound(name.clone()))?;
    Ok(Html(views::detail_page(contact)))
}

pub async fn update_form_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Html<String>, AppError> {
    let hits = state.store.find_by_name_exact(&name).await?;
    let contact = hits.first().ok_or_else(|| AppError::NotFound(name.clone()))?;
    Ok(Html(views::update_page(contact, &[])))
}

pub async fn update_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let (jar, token) = session(jar);
    let submission = read_submission(multipart).await?;

    let (errors, existing) = validate::validate_update(
        state.store.as_ref(),
        &submission.old_name,
        &submission.form,
    )
    .await?;
    if !errors.is_empty() {
        let prefill = existing.first().cloned().unwrap_or_else(|| Contact {
            name: submission.form.name.clone(),
            email: submission.form.email.clone(),
            num: submission.form.num.clone(),
            is_favourite: false,
            img: DEFAULT_IMG.to_string(),
        });
        return Ok((jar, Html(views::update_page(&prefill, &errors))).into_response());
    }

    let current = &existing[0];
    let img = match &submission.upload {
        Some((filename, bytes)) => save_upload(&state.config.public_dir, filename, bytes).await?,
        None => current.img.clone(),
    };
    let update = ContactUpdate {
        name: Some(submission.form.name),
        email: Some(submission.form.email),
        num: Some(validate::normalize_phone(&submission.form.num)),
        is_favourite: None,
        img: Some(img),
    };

    match state.store.update_by_name(&current.name, update).await {
        Ok(_) => {}
        Err(StoreError::Duplicate) => {
            let errors = [ValidationError::DuplicateContact];
            return Ok((jar, Html(views::update_page(current, &errors))).into_response());
        }
        Err(err) => return Err(err.into()),
    }

    state
        .flash
        .push_message(&token, "Contact updated successfully!")
        .await;
    Ok((jar, Redirect::to("/")).into_response())
}

pub async fn delete_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let (jar, token) = session(jar);
    let hits = state.store.find_by_name_exact(&name).await?;
    if hits.is_empty() {
        return Err(AppError::NotFound(name));
    }

    state.store.delete_by_name(&name).await?;
    state
        .flash
        .push_message(&token, "Deleted contact successfully!")
        .await;
    Ok((jar, Redirect::to("/")).into_response())
}

pub async fn not_found_handler() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}
