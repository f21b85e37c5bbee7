//! `search` command: drive the orchestrator page by page and print the
//! accumulated list.

use std::sync::Arc;

use anyhow::{bail, Context};
use poimap_core::AppConfig;
use poimap_geo::GeoClient;
use poimap_search::{
    show_result, ChannelObserver, Dispatch, ScrollPosition, ScrollToLoad, SearchEvent,
    SearchHandle, SearchOrchestrator,
};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::console::{print_results, ConsoleMap};

pub(crate) async fn run_search(
    config: &AppConfig,
    keyword: &str,
    pages: u32,
    select: Option<usize>,
) -> anyhow::Result<()> {
    let client = GeoClient::from_config(config).context("failed to build geo client")?;
    let (handle, task) = SearchOrchestrator::spawn(Arc::new(client), config.page_size);
    let (observer, mut events) = ChannelObserver::new();
    handle.register(observer).await?;

    let dispatch = handle.start_search(keyword).await?;
    wait_for_page(&dispatch, &mut events).await?;

    // Each extra page is one "scrolled to the bottom" event on the full list.
    let trigger = ScrollToLoad::new(handle.clone());
    for _ in 1..pages {
        let loaded = handle.status().await?.snapshot.len();
        let dispatch = trigger.on_scrolled(bottom_of(loaded)).await?;
        if let Dispatch::Skipped(reason) = dispatch {
            tracing::info!(?reason, "no further pages requested");
            break;
        }
        wait_for_page(&dispatch, &mut events).await?;
    }

    let status = handle.status().await?;
    print_results(&status.snapshot);
    if status.exhausted {
        println!("({} results, no more pages)", status.snapshot.len());
    } else {
        println!(
            "({} results through page {})",
            status.snapshot.len(),
            status.current_page
        );
    }

    if let Some(index) = select {
        let Some(result) = status.snapshot.get(index) else {
            bail!(
                "--select {index} is out of range ({} results)",
                status.snapshot.len()
            );
        };
        show_result(&mut ConsoleMap, result, config.camera_zoom);
    }

    drop(trigger);
    shutdown(handle, task).await;
    Ok(())
}

fn bottom_of(item_count: usize) -> ScrollPosition {
    ScrollPosition {
        last_visible_index: item_count.checked_sub(1),
        item_count,
        can_scroll_down: false,
    }
}

/// Waits until the started request settles, failing on a reported error.
async fn wait_for_page(
    dispatch: &Dispatch,
    events: &mut UnboundedReceiver<SearchEvent>,
) -> anyhow::Result<()> {
    let Dispatch::Started(request) = dispatch else {
        return Ok(());
    };

    let mut failure = None;
    while let Some(event) = events.recv().await {
        match event {
            SearchEvent::Error { kind, message } => {
                failure = Some(format!("{kind}: {message}"));
            }
            SearchEvent::LoadingChanged(false) => break,
            SearchEvent::LoadingChanged(true) | SearchEvent::ResultsUpdated { .. } => {}
        }
    }

    match failure {
        Some(reason) => bail!(
            "page {} of '{}' failed ({reason})",
            request.page,
            request.keyword
        ),
        None => Ok(()),
    }
}

async fn shutdown(handle: SearchHandle, task: tokio::task::JoinHandle<()>) {
    drop(handle);
    if let Err(err) = task.await {
        tracing::warn!(error = %err, "search orchestrator ended abnormally");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bottom_of_loaded_list_is_at_end() {
        assert!(bottom_of(3).at_end());
        assert_eq!(bottom_of(3).last_visible_index, Some(2));
    }

    #[test]
    fn bottom_of_empty_list_is_not_at_end() {
        assert!(!bottom_of(0).at_end());
        assert_eq!(bottom_of(0).last_visible_index, None);
    }
}
