use anyhow::Context;
use modhub_config::HubConfig;
use modhub_core::{SearchEntry, SearchQuery};
use modhub_search::{HttpSearchService, PageOutcome, PageState, Pager};
use serde::Serialize;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::subcommands::SearchArgs;
use crate::output::output;

#[derive(Serialize)]
struct SearchResponse<'a> {
    query: &'a SearchQuery,
    pages_fetched: u32,
    exhausted: bool,
    results: &'a [SearchEntry],
}

/// Handle `modhub search`.
///
/// Uses whichever credential the session cache already holds; the session
/// is not resolved first.
pub async fn handle(
    args: &SearchArgs,
    flags: &GlobalFlags,
    config: &HubConfig,
) -> anyhow::Result<()> {
    let session = bootstrap::open_session(config, flags)?;
    let credential = session.active_credential().cloned();

    let query = build_query(args, config);
    let service = HttpSearchService::new(&config.api).context("failed to build search client")?;
    let mut pager = Pager::new(service);

    let mut pages_fetched = 0;
    let mut next = pager
        .start_query(query.clone(), credential.as_ref())
        .await?;
    while let Some(outcome) = next {
        if let PageOutcome::Failed(error) = outcome {
            return Err(error).context("search request failed");
        }
        pages_fetched += 1;
        if pages_fetched >= args.pages {
            break;
        }
        next = pager.fetch_next_page(credential.as_ref()).await;
    }

    output(
        &SearchResponse {
            query: &query,
            pages_fetched,
            exhausted: pager.state() == PageState::Exhausted,
            results: pager.results(),
        },
        flags.format,
    )
}

fn build_query(args: &SearchArgs, config: &HubConfig) -> SearchQuery {
    SearchQuery::new(args.text.clone())
        .with_field(args.field.into())
        .with_sort(args.sort.into(), args.reverse)
        .with_verification(args.verification.map(Into::into))
        .with_page_size(args.page_size.unwrap_or(config.search.page_size))
}
