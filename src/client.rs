//! Ecosend (GoSquared People API) client.
//!
//! Every list endpoint is read with the same offset/limit cursor: pages of
//! `PAGE_SIZE` are requested until a page comes back empty or short. The
//! API's own totals are never consulted.

use serde_json::Value;

use crate::config::{Config, Credentials};
use crate::error::{ReportError, Result};
use crate::models::{Contact, FeedEvent};

/// Largest page the list endpoints accept.
pub const PAGE_SIZE: usize = 250;

/// One authenticated GET returning a JSON body. `path` is appended to the
/// base URL one segment at a time.
pub trait Transport {
    fn get_json(&self, path: &[&str], params: &[(&str, String)]) -> Result<Value>;
}

/// Blocking HTTP transport that signs each request with the static credentials.
pub struct HttpTransport {
    http: reqwest::blocking::Client,
    base_url: String,
    credentials: Credentials,
}

impl HttpTransport {
    pub fn new(base_url: &str, credentials: Credentials) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }
}

/// Joins `path` onto `base_url`, percent-encoding each segment so ids
/// containing `/`, `?` or `#` stay inside their segment.
pub fn endpoint_url(base_url: &str, path: &[&str]) -> Result<reqwest::Url> {
    let invalid = || ReportError::InvalidUrl(base_url.to_string());
    let mut url = reqwest::Url::parse(base_url).map_err(|_| invalid())?;
    url.path_segments_mut()
        .map_err(|_| invalid())?
        .pop_if_empty()
        .extend(path);
    Ok(url)
}

impl Transport for HttpTransport {
    fn get_json(&self, path: &[&str], params: &[(&str, String)]) -> Result<Value> {
        let endpoint = path.join("/");
        let url = endpoint_url(&self.base_url, path)?;
        let mut query: Vec<(&str, &str)> = params
            .iter()
            .map(|(key, value)| (*key, value.as_str()))
            .collect();
        query.push(("api_key", self.credentials.api_key.as_str()));
        query.push(("site_token", self.credentials.site_token.as_str()));

        let http_error = |source: reqwest::Error| ReportError::Http {
            endpoint: endpoint.clone(),
            source,
        };

        let response = self
            .http
            .get(url)
            .query(&query)
            .send()
            .map_err(http_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReportError::Status {
                endpoint: endpoint.clone(),
                status,
            });
        }

        let body = response.text().map_err(http_error)?;
        serde_json::from_str(&body).map_err(|err| ReportError::Decode {
            endpoint,
            message: err.to_string(),
        })
    }
}

pub struct EcosendClient<T: Transport> {
    transport: T,
}

impl EcosendClient<HttpTransport> {
    /// Fails with `MissingCredentials` when the config carries none.
    pub fn from_config(config: &Config) -> Result<Self> {
        let credentials = config.require_credentials()?.clone();
        Ok(Self::new(HttpTransport::new(&config.base_url, credentials)))
    }
}

impl<T: Transport> EcosendClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn fetch_all_contacts(&self, fields: Option<&str>) -> Result<Vec<Contact>> {
        let mut extra = Vec::new();
        if let Some(fields) = fields {
            extra.push(("fields", fields.to_string()));
        }
        let records = self.fetch_pages(&["people"], &extra)?;
        Ok(records.into_iter().map(Contact::from_value).collect())
    }

    pub fn fetch_contact_feed(
        &self,
        contact_id: &str,
        from_date: Option<&str>,
        to_date: Option<&str>,
        event_type: &str,
    ) -> Result<Vec<FeedEvent>> {
        let mut extra = vec![("type", event_type.to_string())];
        if let Some(from) = from_date {
            extra.push(("from", from.to_string()));
        }
        if let Some(to) = to_date {
            extra.push(("to", to.to_string()));
        }
        let records = self.fetch_pages(&["people", contact_id, "feed"], &extra)?;
        Ok(records.iter().map(FeedEvent::from_value).collect())
    }

    pub fn fetch_smart_group_contacts(
        &self,
        group_id: &str,
        fields: Option<&str>,
    ) -> Result<Vec<Contact>> {
        let mut extra = Vec::new();
        if let Some(fields) = fields {
            extra.push(("fields", fields.to_string()));
        }
        let records = self.fetch_pages(&["smartgroups", group_id, "people"], &extra)?;
        Ok(records.into_iter().map(Contact::from_value).collect())
    }

    /// Raw smart-group listing, unpaged.
    pub fn fetch_smart_groups(&self) -> Result<Value> {
        self.transport.get_json(&["smartgroups"], &[])
    }

    /// Event names tracked upstream, as matched by feed scanning.
    pub fn fetch_event_types(&self) -> Result<Value> {
        self.transport.get_json(&["eventTypes"], &[])
    }

    /// Property definitions; `custom_only` restricts to custom properties,
    /// whose names drive the classification fallback.
    pub fn fetch_property_types(&self, custom_only: bool) -> Result<Value> {
        if custom_only {
            self.transport.get_json(&["propertyTypes", "custom"], &[])
        } else {
            self.transport.get_json(&["propertyTypes"], &[])
        }
    }

    fn fetch_pages(&self, path: &[&str], extra: &[(&str, String)]) -> Result<Vec<Value>> {
        let endpoint = path.join("/");
        let mut records = Vec::new();
        let mut offset = 0usize;

        loop {
            let mut params = vec![("limit", format!("{offset},{PAGE_SIZE}"))];
            params.extend(extra.iter().cloned());

            let body = self.transport.get_json(path, &params)?;
            let page = match body {
                Value::Object(mut map) => match map.remove("list") {
                    Some(Value::Array(items)) => items,
                    _ => Vec::new(),
                },
                _ => Vec::new(),
            };
            log::debug!("{endpoint}: offset {offset} returned {} records", page.len());

            if page.is_empty() {
                break;
            }

            let received = page.len();
            records.extend(page);
            offset += received;

            if received < PAGE_SIZE {
                break;
            }
        }

        Ok(records)
    }
}
