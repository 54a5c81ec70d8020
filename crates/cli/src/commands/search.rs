//! Product search.
//!
//! `jaelle search robe` runs a single query. With `--interactive`, every
//! line read from stdin is treated as the current contents of a search box
//! and fed through the debouncer; results print as they settle.

use std::sync::Arc;

use jaelle_storefront::search::{SearchDebouncer, SearchUpdate};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::timeout;
use tracing::warn;

use super::{CommandError, Context, print_products};

pub async fn once(ctx: &Context, query: &str) -> Result<(), CommandError> {
    let products = ctx.client.search_products(query).await?;
    print_products(&products);
    Ok(())
}

fn print_update(update: &SearchUpdate) {
    match &update.outcome {
        Ok(products) => {
            println!("-- {} ({} result(s))", update.query, products.len());
            print_products(products);
        }
        Err(e) => warn!(query = %update.query, error = %e, "Search failed"),
    }
}

pub async fn interactive(ctx: &Context) -> Result<(), CommandError> {
    let debouncer = SearchDebouncer::spawn(Arc::new(ctx.client.clone()), ctx.config.search);
    let mut updates = debouncer.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let mut last_input = String::new();
    let mut last_printed = String::new();

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(text) => {
                    last_input = text.trim().to_string();
                    debouncer.input(text);
                }
                None => break,
            },
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let latest = updates.borrow_and_update().clone();
                if let Some(update) = latest {
                    print_update(&update);
                    last_printed = update.query;
                }
            }
        }
    }

    // Stdin closed: wait for the final query to settle
    if last_input != last_printed {
        let settle = ctx.config.search.debounce + ctx.config.api.request_timeout;
        if matches!(timeout(settle, updates.changed()).await, Ok(Ok(()))) {
            let latest = updates.borrow_and_update().clone();
            if let Some(update) = latest {
                print_update(&update);
            }
        }
    }
    Ok(())
}
