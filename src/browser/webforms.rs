//! ASP.NET WebForms client
//!
//! WebForms pages are one big `<form>`: every postback must send back all
//! form fields (`__VIEWSTATE`, `__EVENTVALIDATION`, ...) plus whichever
//! control was activated.

use std::time::Duration;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::Browser;
use crate::error::NavError;
use crate::extract::{DATE_INPUT_ID, NEXT_WEEK_ID, SEARCH_BUTTON_ID};
use crate::page::HtmlPage;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Every successful control's name and value, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FormFields(Vec<(String, String)>);

impl FormFields {
    fn set(&mut self, name: &str, value: &str) {
        if let Some(existing) = self.0.iter_mut().find(|(n, _)| n == name) {
            existing.1 = value.to_string();
        } else {
            self.0.push((name.to_string(), value.to_string()));
        }
    }

    #[cfg(test)]
    fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

/// Collect the fields a browser would submit with this page's form
pub(crate) fn extract_form_fields(html: &Html) -> Result<FormFields, NavError> {
    let input_sel = selector("input").ok_or(NavError::MissingViewState)?;
    let mut fields = Vec::new();
    let mut has_viewstate = false;

    for input in html.select(&input_sel) {
        let name = match input.attr("name") {
            Some(n) if !n.is_empty() => n,
            _ => continue,
        };
        let input_type = input.attr("type").unwrap_or("text").to_lowercase();

        // Buttons only submit when they are the activated control
        if matches!(input_type.as_str(), "submit" | "image" | "button") {
            continue;
        }
        if matches!(input_type.as_str(), "radio" | "checkbox") && input.attr("checked").is_none() {
            continue;
        }

        if name == "__VIEWSTATE" {
            has_viewstate = true;
        }
        fields.push((
            name.to_string(),
            input.attr("value").unwrap_or_default().to_string(),
        ));
    }

    if let Some(select_sel) = selector("select")
        && let Some(option_sel) = selector("option")
    {
        for select in html.select(&select_sel) {
            let Some(name) = select.attr("name").filter(|n| !n.is_empty()) else {
                continue;
            };
            let options: Vec<ElementRef<'_>> = select.select(&option_sel).collect();
            let chosen = options
                .iter()
                .find(|o| o.attr("selected").is_some())
                .or(options.first());
            if let Some(option) = chosen {
                let value = option
                    .attr("value")
                    .map(str::to_string)
                    .unwrap_or_else(|| option.text().collect());
                fields.push((name.to_string(), value));
            }
        }
    }

    if !has_viewstate {
        let title = selector("title")
            .and_then(|sel| html.select(&sel).next())
            .map(|t| t.text().collect::<String>());
        warn!(?title, inputs = fields.len(), "no __VIEWSTATE in response");
        return Err(NavError::MissingViewState);
    }

    Ok(FormFields(fields))
}

/// Postback parameters: all fields with `__EVENTTARGET` and overrides applied
fn build_postback(
    fields: &FormFields,
    event_target: &str,
    overrides: &[(String, String)],
) -> Vec<(String, String)> {
    let mut params = fields.clone();
    params.set("__EVENTTARGET", event_target);
    for (name, value) in overrides {
        params.set(name, value);
    }
    params.0
}

/// `javascript:__doPostBack('ctl00$Content$X','')` → `ctl00$Content$X`
fn do_postback_target(href: &str) -> Option<&str> {
    let rest = href.split_once("__doPostBack(")?.1.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    let rest = &rest[1..];
    let end = rest.find(quote)?;
    Some(&rest[..end])
}

/// Parameters for activating the control with element id `id`
pub(crate) fn control_postback(
    html: &Html,
    fields: &FormFields,
    id: &str,
) -> Result<Vec<(String, String)>, NavError> {
    let missing = || NavError::MissingControl { id: id.to_string() };
    let sel = selector(&format!("#{id}")).ok_or_else(missing)?;
    let control = html.select(&sel).next().ok_or_else(missing)?;
    let element = control.value();

    // Server-side name; WebForms derives ids from names by swapping `$` for `_`
    let name = element
        .attr("name")
        .map(str::to_string)
        .unwrap_or_else(|| id.replace('_', "$"));

    let params = match element.name() {
        "a" => {
            let target = element
                .attr("href")
                .and_then(do_postback_target)
                .map(str::to_string)
                .unwrap_or(name);
            build_postback(fields, &target, &[])
        }
        "input" => match element.attr("type").unwrap_or("text").to_lowercase().as_str() {
            "image" => build_postback(
                fields,
                "",
                &[(format!("{name}.x"), "10".into()), (format!("{name}.y"), "10".into())],
            ),
            _ => {
                let value = element.attr("value").unwrap_or_default().to_string();
                build_postback(fields, "", &[(name, value)])
            }
        },
        _ => build_postback(fields, &name, &[]),
    };
    Ok(params)
}

/// Live timetable session over HTTP
pub(crate) struct WebFormsBrowser {
    agent: ureq::Agent,
    url: String,
    cookie: Option<String>,
    page: HtmlPage,
    fields: FormFields,
}

impl WebFormsBrowser {
    /// Load the timetable page with the user's session cookie
    pub(crate) fn open(url: &str, cookie: Option<&str>) -> Result<Self, NavError> {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build()
            .into();

        let mut request = agent.get(url);
        if let Some(cookie) = cookie {
            request = request.header("Cookie", cookie);
        }
        let body = request.call()?.into_body().read_to_string()?;
        let page = HtmlPage::parse(&body);
        let fields = extract_form_fields(page.document())?;
        debug!(url, fields = fields.0.len(), "timetable page loaded");

        Ok(Self {
            agent,
            url: url.to_string(),
            cookie: cookie.map(str::to_string),
            page,
            fields,
        })
    }

    fn activate(&mut self, id: &str) -> Result<(), NavError> {
        let params = control_postback(self.page.document(), &self.fields, id)?;

        let mut request = self.agent.post(self.url.as_str());
        if let Some(cookie) = &self.cookie {
            request = request.header("Cookie", cookie);
        }
        let body = request
            .send_form(params.iter().map(|(k, v)| (k.as_str(), v.as_str())))?
            .into_body()
            .read_to_string()?;

        let page = HtmlPage::parse(&body);
        self.fields = extract_form_fields(page.document())?;
        self.page = page;
        debug!(control = id, "postback completed");
        Ok(())
    }

    fn date_input_name(&self) -> String {
        selector(&format!("#{DATE_INPUT_ID}"))
            .and_then(|sel| self.page.document().select(&sel).next())
            .and_then(|input| input.attr("name").map(str::to_string))
            .unwrap_or_else(|| DATE_INPUT_ID.replace('_', "$"))
    }
}

impl Browser for WebFormsBrowser {
    type Page = HtmlPage;

    fn page(&self) -> &HtmlPage {
        &self.page
    }

    fn set_date_input(&mut self, value: &str) {
        let name = self.date_input_name();
        self.fields.set(&name, value);
    }

    fn submit_filter(&mut self) -> Result<(), NavError> {
        self.activate(SEARCH_BUTTON_ID)
    }

    fn next_week(&mut self) -> Result<(), NavError> {
        self.activate(NEXT_WEEK_ID)
    }
}
