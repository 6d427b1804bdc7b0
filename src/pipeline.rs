//! End-to-end page processing.
//!
//! A [`Pipeline`] owns the policy and the optional image source. Single
//! pages run synchronously on the caller's thread; [`Pipeline::process_batch`]
//! spreads independent pages over a bounded rayon pool.

use rayon::prelude::*;
use url::Url;

use crate::block::LayoutBlock;
use crate::clean::{CleanReport, clean};
use crate::dom::{Document, parse_html, parse_html_bytes};
use crate::error::{Error, Result};
use crate::linearize::Linearizer;
use crate::policy::Policy;
use crate::source::{ImageSource, PageSource};
use crate::util::page_name;

/// One page to process: where to read it and what its references resolve
/// against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub location: String,
    pub base: Url,
}

impl PageRequest {
    pub fn new(location: impl Into<String>, base: Url) -> Self {
        Self {
            location: location.into(),
            base,
        }
    }

    /// Request a page whose base is `site_base` joined with the page name.
    ///
    /// `pages/venusaur.html` under `https://pokemondb.net/pokedex/` resolves
    /// against `https://pokemondb.net/pokedex/venusaur`.
    pub fn under(location: impl Into<String>, site_base: &Url) -> Result<Self> {
        let location = location.into();
        let base = site_base.join(&page_name(&location))?;
        Ok(Self { location, base })
    }

    /// Output name for this page.
    pub fn name(&self) -> String {
        page_name(&self.location)
    }
}

/// The result for one page of a batch.
#[derive(Debug)]
pub struct PageOutcome {
    pub name: String,
    pub location: String,
    pub result: Result<Vec<LayoutBlock>>,
}

/// Parse, clean and linearize pages under one policy.
pub struct Pipeline {
    policy: Policy,
    images: Option<Box<dyn ImageSource>>,
}

impl Pipeline {
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            images: None,
        }
    }

    /// Pipeline with the species-page policy.
    pub fn species_page() -> Result<Self> {
        Ok(Self::new(Policy::species_page()?))
    }

    /// Fetch image bytes through `images` during linearization.
    pub fn with_images(mut self, images: impl ImageSource + 'static) -> Self {
        self.images = Some(Box::new(images));
        self
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Run pruning, rewrite and layout classification, in that order.
    pub fn clean(&self, doc: &mut Document) -> CleanReport {
        clean(doc, &self.policy)
    }

    /// Clean the document and linearize it into blocks.
    pub fn run(&self, doc: &mut Document, base: &Url) -> Vec<LayoutBlock> {
        self.clean(doc);

        let mut linearizer = Linearizer::new(&self.policy).with_base(base);
        if let Some(images) = self.images.as_deref() {
            linearizer = linearizer.with_images(images);
        }
        linearizer.linearize(doc)
    }

    pub fn process_html(&self, html: &str, base: &Url) -> Vec<LayoutBlock> {
        let mut doc = parse_html(html);
        self.run(&mut doc, base)
    }

    /// Decode and process raw page bytes.
    pub fn process_bytes(&self, bytes: &[u8], base: &Url) -> Vec<LayoutBlock> {
        let mut doc = parse_html_bytes(bytes);
        self.run(&mut doc, base)
    }

    /// Fetch and process one page.
    pub fn process_page<S>(&self, source: &S, request: &PageRequest) -> Result<Vec<LayoutBlock>>
    where
        S: PageSource + ?Sized,
    {
        let bytes = source.fetch(&request.location)?;
        Ok(self.process_bytes(&bytes, &request.base))
    }

    /// Process independent pages on a pool of `workers` threads.
    ///
    /// Outcomes come back in request order. A page that fails to fetch
    /// yields an error outcome and the others carry on; only a pool that
    /// cannot be built fails the whole batch.
    pub fn process_batch<S>(
        &self,
        source: &S,
        requests: &[PageRequest],
        workers: usize,
    ) -> Result<Vec<PageOutcome>>
    where
        S: PageSource + ?Sized,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .build()
            .map_err(|e| Error::ThreadPool(e.to_string()))?;

        let outcomes = pool.install(|| {
            requests
                .par_iter()
                .map(|request| {
                    let result = self.process_page(source, request);
                    if let Err(e) = &result {
                        log::warn!("failed to process {}: {e}", request.location);
                    }
                    PageOutcome {
                        name: request.name(),
                        location: request.location.clone(),
                        result,
                    }
                })
                .collect()
        });

        Ok(outcomes)
    }
}
