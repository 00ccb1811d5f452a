//! ASP.NET form handling: static templates and anti-forgery tokens.

use crate::error::{ScrapeError, ScrapeResult};
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;

/// Form fields posted as `application/x-www-form-urlencoded`.
pub type Form = BTreeMap<String, String>;

pub const REQUEST_VERIFICATION_TOKEN: &str = "__RequestVerificationToken";
pub const VIEW_STATE: &str = "__VIEWSTATE";
pub const VIEW_STATE_GENERATOR: &str = "__VIEWSTATEGENERATOR";
pub const EVENT_VALIDATION: &str = "__EVENTVALIDATION";

const LOGIN_TEMPLATE: &str = include_str!("../forms/login.json");
const TRANSACTIONS_TEMPLATE: &str = include_str!("../forms/tx.json");

/// Static form templates shipped with the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormTemplate {
    Login,
    Transactions,
}

impl FormTemplate {
    /// Load the template's static fields.
    pub fn load(self) -> ScrapeResult<Form> {
        let raw = match self {
            FormTemplate::Login => LOGIN_TEMPLATE,
            FormTemplate::Transactions => TRANSACTIONS_TEMPLATE,
        };
        Ok(serde_json::from_str(raw)?)
    }
}

/// Per-session hidden values the site requires on every POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AntiForgeryTokens {
    pub request_verification: String,
    pub view_state: String,
    pub event_validation: String,
    /// Only present on some pages.
    pub view_state_generator: Option<String>,
}

impl AntiForgeryTokens {
    /// Harvest the tokens from a page's HTML.
    pub fn harvest(html: &str) -> ScrapeResult<Self> {
        let document = Html::parse_document(html);

        let request_verification = input_value(
            &document,
            &format!("input[name=\"{}\"]", REQUEST_VERIFICATION_TOKEN),
        )?
        .ok_or_else(|| ScrapeError::MissingElement(REQUEST_VERIFICATION_TOKEN.to_string()))?;

        let view_state = input_value(&document, &format!("#{}", VIEW_STATE))?
            .ok_or_else(|| ScrapeError::MissingElement(VIEW_STATE.to_string()))?;

        let event_validation = input_value(&document, &format!("#{}", EVENT_VALIDATION))?
            .ok_or_else(|| ScrapeError::MissingElement(EVENT_VALIDATION.to_string()))?;

        let view_state_generator =
            input_value(&document, &format!("#{}", VIEW_STATE_GENERATOR))?;

        Ok(Self {
            request_verification,
            view_state,
            event_validation,
            view_state_generator,
        })
    }

    /// Copy the tokens into a form.
    pub fn apply(&self, form: &mut Form) {
        form.insert(
            REQUEST_VERIFICATION_TOKEN.to_string(),
            self.request_verification.clone(),
        );
        form.insert(VIEW_STATE.to_string(), self.view_state.clone());
        form.insert(EVENT_VALIDATION.to_string(), self.event_validation.clone());
        if let Some(ref generator) = self.view_state_generator {
            form.insert(VIEW_STATE_GENERATOR.to_string(), generator.clone());
        }
    }
}

/// Compile a CSS selector.
pub(crate) fn selector(css: &str) -> ScrapeResult<Selector> {
    Selector::parse(css).map_err(|e| ScrapeError::Selector(format!("{}: {}", css, e)))
}

/// `value` attribute of the first element matching `css`.
///
/// An element without a `value` attribute yields an empty string.
fn input_value(document: &Html, css: &str) -> ScrapeResult<Option<String>> {
    let sel = selector(css)?;
    Ok(document
        .select(&sel)
        .next()
        .map(|el| el.value().attr("value").unwrap_or_default().to_string()))
}

/// Concatenated text of an element, trimmed.
pub(crate) fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Text fragments of an element joined by a single space.
pub(crate) fn element_text_spaced(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
