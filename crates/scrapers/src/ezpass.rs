//! E-ZPass MA account scraper.
//!
//! The account site is a DotNetNuke application. Every POST needs the
//! hidden anti-forgery fields of the page it is posted from, so each step is
//! a GET to harvest them followed by a POST of the filled-in form. The
//! session cookie from the login carries over to the transaction query.

use crate::error::{ScrapeError, ScrapeResult};
use crate::form::{element_text, element_text_spaced, selector, AntiForgeryTokens, Form, FormTemplate};
use crate::source::TollSource;
use async_trait::async_trait;
use checkbot_core::{TollBalance, Transaction, TransactionReport};
use chrono::NaiveDate;
use scraper::Html;
use std::time::Duration;
use tracing::{debug, info, warn};

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_14_0) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/69.0.3497.100 Safari/537.36";

const LOGIN_PATH: &str = "/ezpassmalogin";
const TRANSACTIONS_PATH: &str = "/ezpassviewtransactions";

const USERNAME_FIELD: &str = "dnn$ctr689$View$txtUserName";
const PASSWORD_FIELD: &str = "dnn$ctr689$View$txtPassword";
const START_DATE_FIELD: &str = "dnn$ctr1180$ucMassDotTcoreTransaction$ucBaseTcoreTransaction$txtStartDate";
const END_DATE_FIELD: &str = "dnn$ctr1180$ucMassDotTcoreTransaction$ucBaseTcoreTransaction$txtEndDate";

const BALANCE_ID: &str = "dnn_ctr670_ucAccountSummaryMassDot_lblBalance";
const TRANSACTIONS_TABLE_ID: &str =
    "dnn_ctr1180_ucMassDotTcoreTransaction_ucBaseTcoreTransaction_AccountGridView";

/// Column layout of the transaction grid.
mod column {
    pub const POSTED_ON: usize = 0;
    pub const OCCURRED_AT: usize = 1;
    pub const TYPE: usize = 2;
    pub const LOCATION: usize = 6;
    pub const AMOUNT: usize = 8;
    pub const MIN_CELLS: usize = AMOUNT + 1;
}

/// Account login.
#[derive(Debug, Clone)]
pub struct EzPassCredentials {
    pub username: String,
    pub password: String,
}

/// Session-holding E-ZPass client.
pub struct EzPassClient {
    http: reqwest::Client,
    base_url: String,
    credentials: EzPassCredentials,
}

impl EzPassClient {
    pub const BASE_URL: &'static str = "https://www.ezdrivema.com";

    /// Create a client against the production site.
    pub fn new(credentials: EzPassCredentials, timeout: Duration) -> ScrapeResult<Self> {
        Self::with_base_url(credentials, timeout, Self::BASE_URL)
    }

    /// Create a client against a custom base URL.
    pub fn with_base_url(
        credentials: EzPassCredentials,
        timeout: Duration,
        base_url: impl Into<String>,
    ) -> ScrapeResult<Self> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_page(&self, url: &str) -> ScrapeResult<String> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        info!(url = %url, status = status.as_u16(), "get");
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }

    async fn post_form(&self, url: &str, form: &Form) -> ScrapeResult<String> {
        let response = self.http.post(url).form(form).send().await?;
        let status = response.status();
        info!(url = %url, status = status.as_u16(), "post");
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }

    /// GET a page and return its template filled with the page's tokens.
    async fn prepare_form(&self, url: &str, template: FormTemplate) -> ScrapeResult<Form> {
        let page = self.get_page(url).await?;
        let tokens = AntiForgeryTokens::harvest(&page)?;
        let mut form = template.load()?;
        tokens.apply(&mut form);
        Ok(form)
    }
}

#[async_trait]
impl TollSource for EzPassClient {
    async fn login(&self) -> ScrapeResult<TollBalance> {
        let url = self.url(LOGIN_PATH);

        let mut form = self.prepare_form(&url, FormTemplate::Login).await?;
        form.insert(USERNAME_FIELD.to_string(), self.credentials.username.clone());
        form.insert(PASSWORD_FIELD.to_string(), self.credentials.password.clone());

        let page = self.post_form(&url, &form).await?;
        let balance = parse_balance(&page).map_err(|e| match e {
            ScrapeError::MissingElement(_) if is_login_page(&page) => {
                ScrapeError::LoginRejected(self.credentials.username.clone())
            }
            other => other,
        })?;

        info!(balance = %balance, "Balance fetched");
        Ok(balance)
    }

    async fn transactions(&self, day: NaiveDate) -> ScrapeResult<TransactionReport> {
        let url = self.url(TRANSACTIONS_PATH);
        let date = format_query_date(day);

        let mut form = self.prepare_form(&url, FormTemplate::Transactions).await?;
        form.insert(START_DATE_FIELD.to_string(), date.clone());
        form.insert(END_DATE_FIELD.to_string(), date);

        let page = self.post_form(&url, &form).await?;
        let report = parse_transactions(&page)?;
        debug!(
            day = %day,
            count = report.len(),
            skipped = report.skipped,
            "Transactions parsed"
        );
        Ok(report)
    }
}

/// Date format of the transaction search fields.
pub fn format_query_date(day: NaiveDate) -> String {
    day.format("%m/%d/%Y").to_string()
}

/// Read the balance label of the account summary page.
pub fn parse_balance(html: &str) -> ScrapeResult<TollBalance> {
    let document = Html::parse_document(html);
    let sel = selector(&format!("#{}", BALANCE_ID))?;
    document
        .select(&sel)
        .next()
        .map(|el| TollBalance::new(element_text(el)))
        .ok_or_else(|| ScrapeError::MissingElement(BALANCE_ID.to_string()))
}

/// The login POST answers with the login form again when it is rejected.
fn is_login_page(html: &str) -> bool {
    let document = Html::parse_document(html);
    match selector(&format!("input[name=\"{}\"]", USERNAME_FIELD)) {
        Ok(sel) => document.select(&sel).next().is_some(),
        Err(_) => false,
    }
}

/// Parse the transaction grid.
///
/// The first row is the header and the last row holds the total. A grid
/// with a single row has no transactions.
pub fn parse_transactions(html: &str) -> ScrapeResult<TransactionReport> {
    let document = Html::parse_document(html);
    let table_sel = selector(&format!("#{}", TRANSACTIONS_TABLE_ID))?;
    let row_sel = selector("tr")?;
    let cell_sel = selector("td")?;

    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| ScrapeError::MissingElement(TRANSACTIONS_TABLE_ID.to_string()))?;

    let rows: Vec<_> = table.select(&row_sel).collect();
    if rows.len() <= 1 {
        info!("No transactions found");
        return Ok(TransactionReport::empty());
    }

    let total_row = rows[rows.len() - 1];
    let total = total_row
        .select(&cell_sel)
        .last()
        .map(element_text)
        .ok_or_else(|| ScrapeError::MissingElement("transaction total".to_string()))?;

    let mut transactions = Vec::with_capacity(rows.len() - 2);
    let mut skipped = 0;
    for (index, row) in rows[1..rows.len() - 1].iter().enumerate() {
        let cells: Vec<_> = row.select(&cell_sel).collect();
        if cells.len() < column::MIN_CELLS {
            warn!(
                row = index + 1,
                cells = cells.len(),
                "Skipping short transaction row"
            );
            skipped += 1;
            continue;
        }

        transactions.push(Transaction::new(
            &element_text(cells[column::TYPE]),
            element_text(cells[column::POSTED_ON]),
            element_text_spaced(cells[column::OCCURRED_AT]),
            element_text(cells[column::LOCATION]),
            element_text(cells[column::AMOUNT]),
        ));
    }

    Ok(TransactionReport {
        transactions,
        skipped,
        total: Some(total),
    })
}
