//! B3 listed-companies scraper.
//!
//! ## Page flow
//! - `cias-listadas/empresas-listadas/BuscaEmpresaListada.aspx?Letra=X`:
//!   alphabetical index, one page per letter
//! - detail page: company name (`h2`) and two iframes; the second one
//!   embeds the company summary
//! - summary frame: tickers, trading name, sector classification
//!
//! ## Usage
//! ```rust,ignore
//! let source = HttpPageSource::new(&FetcherConfig::default())?;
//! let fetcher = B3ListingFetcher::new(source, "http://bvmf.bmfbovespa.com.br/", 4)?;
//! let companies = fetcher.fetch_all().await?;
//! ```

use futures::stream::{self, StreamExt, TryStreamExt};
use scraper::Html;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, info};
use url::Url;

use crate::error::{DataError, Result};
use crate::html::{cell_after_label, elements_containing, following_siblings, selector, text_of};
use crate::model::{CompanyRecord, SectorPath};
use crate::source::PageSource;

/// Default B3 site root.
pub const B3_BASE_URL: &str = "http://bvmf.bmfbovespa.com.br/";

/// Path of the listing pages relative to the site root.
const LISTING_PATH: &str = "cias-listadas/empresas-listadas/";

/// Anchor preceding the ticker links in the summary frame.
const TICKER_MARKER: &str = "Mais Códigos";
const TRADED_NAME_LABEL: &str = "Nome de Pregão";
const SECTOR_LABEL: &str = "Classificação Setorial:";

/// Data read from the summary frame of one company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanySummary {
    pub tickers: Vec<String>,
    pub traded_name: String,
    /// Raw classification, e.g. `"Petróleo. Gás e Biocombustíveis / ... / ..."`
    pub sector_path: String,
}

impl CompanySummary {
    /// One record per ticker; company fields repeated on every row.
    pub fn into_records(self, company_name: &str) -> Vec<CompanyRecord> {
        let sector = SectorPath::parse(&self.sector_path);

        self.tickers
            .into_iter()
            .map(|ticker| CompanyRecord::new(company_name, &self.traded_name, ticker, &sector))
            .collect()
    }
}

/// Scraper for the B3 company listing.
pub struct B3ListingFetcher<S> {
    source: S,
    base_url: Url,
    listing_url: Url,
    concurrency: usize,
}

impl<S: PageSource> B3ListingFetcher<S> {
    /// Creates a fetcher rooted at `base_url`.
    ///
    /// `concurrency` is the number of detail pages fetched at once
    /// (clamped to at least 1).
    pub fn new(source: S, base_url: &str, concurrency: usize) -> Result<Self> {
        let base_url = parse_base(base_url)?;
        let listing_url = join(&base_url, LISTING_PATH)?;

        Ok(Self {
            source,
            base_url,
            listing_url,
            concurrency: concurrency.max(1),
        })
    }

    /// Index page for one initial letter.
    pub fn letter_url(&self, letter: char) -> Result<Url> {
        let mut url = join(&self.listing_url, "BuscaEmpresaListada.aspx")?;
        url.query_pairs_mut()
            .append_pair("Letra", &letter.to_string())
            .append_pair("idioma", "pt-br");
        Ok(url)
    }

    /// Collects every company of the listing.
    pub async fn fetch_all(&self) -> Result<Vec<CompanyRecord>> {
        let links = self.fetch_detail_links().await?;
        info!(companies = links.len(), "B3 detail links collected");

        self.fetch_companies(&links).await
    }

    /// Scrapes the given detail pages and concatenates their rows.
    pub async fn fetch_companies(&self, links: &BTreeSet<Url>) -> Result<Vec<CompanyRecord>> {
        let per_company: Vec<Vec<CompanyRecord>> = stream::iter(links.iter())
            .map(|url| self.fetch_company(url))
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        let records: Vec<CompanyRecord> = per_company.into_iter().flatten().collect();
        info!(rows = records.len(), "B3 listing collected");

        Ok(records)
    }

    /// Walks the A–Z index and returns the unique detail page URLs.
    pub async fn fetch_detail_links(&self) -> Result<BTreeSet<Url>> {
        let letters: Vec<Url> = ('A'..='Z')
            .map(|letter| self.letter_url(letter))
            .collect::<Result<_>>()?;

        let pages: Vec<Vec<Url>> = stream::iter(letters.iter())
            .map(|url| async move {
                let html = self.source.fetch(url).await?;
                let links = parse_index_links(&html, &self.listing_url)?;
                debug!(%url, links = links.len(), "index page parsed");
                Ok::<_, DataError>(links)
            })
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        Ok(pages.into_iter().flatten().collect())
    }

    /// Scrapes one company: detail page, then its summary frame.
    pub async fn fetch_company(&self, detail_url: &Url) -> Result<Vec<CompanyRecord>> {
        let html = self.source.fetch(detail_url).await?;
        let detail = parse_detail_page(&html, detail_url)?;
        let frame_url = resolve_frame_url(&self.base_url, &detail.frame_src)?;

        let html = self.source.fetch(&frame_url).await?;
        let summary = parse_company_summary(&html, &frame_url)?;

        debug!(
            company = %detail.company_name,
            tickers = ?summary.tickers,
            "company scraped"
        );

        Ok(summary.into_records(&detail.company_name))
    }
}

/// Company detail page contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPage {
    pub company_name: String,
    /// `src` of the second iframe, as written in the page
    pub frame_src: String,
}

/// Extracts the detail links of an index page.
///
/// The first anchor is site navigation and is dropped; anchors without
/// `href` are ignored.
pub fn parse_index_links(html: &str, listing_url: &Url) -> Result<Vec<Url>> {
    let document = Html::parse_document(html);
    let anchors = selector("a")?;

    document
        .select(&anchors)
        .skip(1)
        .filter_map(|a| a.value().attr("href"))
        .map(|href| join(listing_url, href.trim()))
        .collect()
}

/// Reads the company name and summary frame source from a detail page.
pub fn parse_detail_page(html: &str, url: &Url) -> Result<DetailPage> {
    let document = Html::parse_document(html);

    let company_name = document
        .select(&selector("h2")?)
        .next()
        .map(text_of)
        .ok_or_else(|| DataError::structure(url.as_str(), "missing company heading (h2)"))?;

    let frame_src = document
        .select(&selector("iframe")?)
        .nth(1)
        .and_then(|iframe| iframe.value().attr("src"))
        .map(str::to_string)
        .ok_or_else(|| DataError::structure(url.as_str(), "missing second iframe src"))?;

    Ok(DetailPage {
        company_name,
        frame_src,
    })
}

/// Resolves an iframe `src` written relative to a page two levels deep.
///
/// The result always stays under `base_url`, root-relative sources included.
pub fn resolve_frame_url(base_url: &Url, src: &str) -> Result<Url> {
    let relative = src.trim().replace("../../", "");
    join(base_url, relative.trim_start_matches('/'))
}

/// Extracts tickers, trading name and sector from the summary frame.
pub fn parse_company_summary(html: &str, url: &Url) -> Result<CompanySummary> {
    let document = Html::parse_document(html);

    let markers = elements_containing(&document, "a", TICKER_MARKER)?;
    if markers.is_empty() {
        return Err(DataError::structure(
            url.as_str(),
            format!("missing {TICKER_MARKER:?} anchor"),
        ));
    }

    let mut seen = HashSet::new();
    let tickers: Vec<String> = markers
        .into_iter()
        .flat_map(|marker| following_siblings(marker, "a"))
        .filter(|a| seen.insert(a.id()))
        .map(text_of)
        .filter(|ticker| !ticker.is_empty())
        .collect();

    if tickers.is_empty() {
        return Err(DataError::structure(url.as_str(), "no ticker anchors"));
    }

    let traded_name = cell_after_label(&document, TRADED_NAME_LABEL)?.ok_or_else(|| {
        DataError::structure(url.as_str(), format!("missing {TRADED_NAME_LABEL:?} cell"))
    })?;

    let sector_path = cell_after_label(&document, SECTOR_LABEL)?.ok_or_else(|| {
        DataError::structure(url.as_str(), format!("missing {SECTOR_LABEL:?} cell"))
    })?;

    Ok(CompanySummary {
        tickers,
        traded_name,
        sector_path,
    })
}

/// Parses a site root, forcing a trailing slash so relative joins append.
pub(crate) fn parse_base(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw).map_err(|source| DataError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

pub(crate) fn join(base: &Url, relative: &str) -> Result<Url> {
    base.join(relative).map_err(|source| DataError::InvalidUrl {
        url: format!("{base} + {relative}"),
        source,
    })
}
