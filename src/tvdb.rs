//! TheTVDB API client used to look up a series' episode titles.
//!
//! Login exchanges an API key for a bearer token, which lives in an explicit
//! [`TvdbSession`] handed to every later call.
//! Base URL: https://api.thetvdb.com/

use std::future::Future;
use std::pin::pin;

use anyhow::{Context, Result, anyhow};
use futures::stream::{self, Stream, TryStreamExt};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::PromptError;
use crate::prompt::Prompt;

pub struct TvdbClient {
    client: Client,
    base_url: String,
}

/// Authenticated handle, valid for the lifetime of the token it carries.
pub struct TvdbSession {
    client: Client,
    base_url: String,
    token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub id: u64,
    pub series_name: String,
    #[serde(default)]
    pub first_aired: Option<String>,
    #[serde(default)]
    pub network: Option<String>,
}

impl Series {
    /// Label shown when the user has to pick between several matches.
    pub fn label(&self) -> String {
        let year = self
            .first_aired
            .as_deref()
            .and_then(|d| d.get(..4))
            .filter(|y| y.chars().all(|c| c.is_ascii_digit()));

        match (year, self.network.as_deref().filter(|n| !n.is_empty())) {
            (Some(year), Some(network)) => format!("{} ({}, {})", self.series_name, year, network),
            (Some(year), None) => format!("{} ({})", self.series_name, year),
            (None, Some(network)) => format!("{} ({})", self.series_name, network),
            (None, None) => self.series_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    #[serde(default)]
    pub aired_season: Option<u32>,
    #[serde(default)]
    pub aired_episode_number: Option<u32>,
    #[serde(default)]
    pub episode_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    #[serde(default)]
    pub next: Option<u32>,
    #[serde(default)]
    pub last: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodePage {
    #[serde(default)]
    pub data: Vec<Episode>,
    #[serde(default)]
    pub links: PageLinks,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Deserialize)]
struct DataResponse<T> {
    data: T,
}

impl TvdbClient {
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client<S: Into<String>>(client: Client, base_url: S) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { client, base_url }
    }

    pub async fn login(&self, api_key: &str) -> Result<TvdbSession> {
        let response = self
            .client
            .post(format!("{}login", self.base_url))
            .json(&serde_json::json!({ "apikey": api_key }))
            .send()
            .await
            .context("Failed to reach TheTVDB")?;

        if !response.status().is_success() {
            return Err(anyhow!("TheTVDB login failed: HTTP {}", response.status()));
        }

        let login: LoginResponse = response.json().await.context("Malformed login response")?;
        debug!("logged in to TheTVDB");

        Ok(TvdbSession {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: login.token,
        })
    }
}

impl TvdbSession {
    async fn get<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        self.get_optional(path, query)
            .await?
            .ok_or_else(|| anyhow!("HTTP error {} for {}", StatusCode::NOT_FOUND, path))
    }

    /// Like `get`, but a 404 is `None` instead of an error.
    async fn get_optional<T>(&self, path: &str, query: &[(&str, String)]) -> Result<Option<T>>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = format!("{}{}", self.base_url, path.trim_start_matches('/'));
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {url}"))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(anyhow!("HTTP error {} for {}", response.status(), url));
        }

        response
            .json()
            .await
            .map(Some)
            .with_context(|| format!("Malformed response from {url}"))
    }

    /// Series matching `name`. TheTVDB answers a search without hits with a
    /// 404, which comes back here as an empty list.
    pub async fn search_series(&self, name: &str) -> Result<Vec<Series>> {
        let response: Option<DataResponse<Vec<Series>>> =
            self.get_optional("search/series", &[("name", name.to_string())]).await?;
        Ok(response.map(|r| r.data).unwrap_or_default())
    }

    pub async fn series_by_id(&self, id: u64) -> Result<Series> {
        let response: DataResponse<Series> = self.get(&format!("series/{id}"), &[]).await?;
        Ok(response.data)
    }

    pub async fn episode_page(&self, series_id: u64, page: u32) -> Result<EpisodePage> {
        self.get(&format!("series/{series_id}/episodes"), &[("page", page.to_string())])
            .await
    }

    pub fn episode_pages(&self, series_id: u64) -> impl Stream<Item = Result<EpisodePage>> + '_ {
        paginate(move |page| self.episode_page(series_id, page))
    }
}

/// Lazily walks pages starting at 1, following `links.next` until the
/// server stops pointing at a later page.
pub fn paginate<F, Fut>(fetch: F) -> impl Stream<Item = Result<EpisodePage>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<EpisodePage>>,
{
    stream::try_unfold((fetch, Some(1u32)), |(mut fetch, next)| async move {
        let Some(page) = next else {
            return Ok::<_, anyhow::Error>(None);
        };

        let result = fetch(page).await?;
        let following = match result.links.next {
            Some(n) if n > page => Some(n),
            Some(n) => {
                warn!(page, next = n, "ignoring backwards page link");
                None
            }
            None => None,
        };

        Ok(Some((result, (fetch, following))))
    })
}

/// `<series> - S01E02 - <name>`, or `None` for an episode without a name.
pub fn format_title(series_name: &str, episode: &Episode) -> Option<String> {
    let name = episode.episode_name.as_deref().map(str::trim).filter(|n| !n.is_empty())?;
    Some(format!(
        "{} - S{:02}E{:02} - {}",
        series_name,
        episode.aired_season.unwrap_or(0),
        episode.aired_episode_number.unwrap_or(0),
        name
    ))
}

/// Picks one series out of the search results, asking when there is a choice.
pub fn pick_series<P: Prompt + ?Sized>(query: &str, mut found: Vec<Series>, prompt: &mut P) -> Result<Series> {
    match found.len() {
        0 => Err(anyhow!("No series found for '{}'", query)),
        1 => Ok(found.remove(0)),
        _ => {
            let labels: Vec<String> = found.iter().map(Series::label).collect();
            let index = prompt.select("Which series did you mean?", &labels, 0)?;
            if index >= found.len() {
                return Err(PromptError::OutOfRange {
                    index,
                    count: found.len(),
                }
                .into());
            }
            Ok(found.swap_remove(index))
        }
    }
}

/// How a series identifier from the command line is looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesQuery<'a> {
    /// All digits, fetched directly.
    Id(u64),
    /// Anything else, searched by name.
    Name(&'a str),
}

impl<'a> SeriesQuery<'a> {
    pub fn parse(query: &'a str) -> Self {
        let query = query.trim();
        if !query.is_empty() && query.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(id) = query.parse() {
                return SeriesQuery::Id(id);
            }
        }
        SeriesQuery::Name(query)
    }
}

pub async fn resolve_series<P: Prompt + ?Sized>(session: &TvdbSession, query: &str, prompt: &mut P) -> Result<Series> {
    match SeriesQuery::parse(query) {
        SeriesQuery::Id(id) => session
            .series_by_id(id)
            .await
            .with_context(|| format!("Could not load series {id}")),
        SeriesQuery::Name(name) => {
            let found = session.search_series(name).await?;
            debug!(query = name, results = found.len(), "series search");
            pick_series(name, found, prompt)
        }
    }
}

/// Every named episode of the series behind `query`, in listing order.
pub async fn fetch_episode_titles<P: Prompt + ?Sized>(
    session: &TvdbSession,
    query: &str,
    prompt: &mut P,
) -> Result<Vec<String>> {
    let series = resolve_series(session, query, prompt).await?;
    info!(id = series.id, name = %series.series_name, "fetching episodes");

    let mut pages = pin!(session.episode_pages(series.id));
    let mut titles = Vec::new();
    let mut page_number = 1;

    while let Some(page) = pages.try_next().await? {
        match page.links.last {
            Some(last) => info!("got page {} of {}", page_number, last),
            None => info!("got page {}", page_number),
        }
        titles.extend(page.data.iter().filter_map(|e| format_title(&series.series_name, e)));
        page_number = page.links.next.unwrap_or(page_number);
    }

    info!(count = titles.len(), "episode titles fetched");
    Ok(titles)
}
