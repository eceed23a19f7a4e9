//! Terminal storefront: scrolls the product listing through the storefront proxy.
//!
//! Each "scroll to the end" is a `load_more()` on the fetch controller. `--switch-sort` changes
//! the sort after a number of pages, which resets the session exactly as the storefront does.

use product_catalog::client::{FeedController, FeedView, HttpPageSource, LoadOutcome};
use product_catalog::infra::{config, telemetry};
use product_catalog::Sort;

const DEFAULT_PAGE_SIZE: u32 = 20;

struct Args {
    page_size: u32,
    sort: Sort,
    max_pages: Option<usize>,
    switch: Option<(usize, Sort)>,
}

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run -- [--page-size N] [--sort name|price[:asc|desc]] [--max-pages N]\n\
         \x20                   [--switch-sort SORT --after N]\n\
         \n\
         Env vars:\n\
           STOREFRONT_URL (default http://127.0.0.1:3001)\n"
    );
    std::process::exit(2);
}

fn parse_args() -> anyhow::Result<Args> {
    let raw: Vec<String> = std::env::args().skip(1).collect();
    if raw.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    let value = |flag: &str| -> Option<String> {
        raw.iter()
            .position(|a| a == flag)
            .map(|i| raw.get(i + 1).cloned().unwrap_or_else(|| usage_and_exit()))
    };

    let page_size = match value("--page-size") {
        Some(v) => v.parse().map_err(|_| anyhow::anyhow!("--page-size must be a number"))?,
        None => DEFAULT_PAGE_SIZE,
    };
    let sort = match value("--sort") {
        Some(v) => v.parse::<Sort>().map_err(anyhow::Error::msg)?,
        None => Sort::default(),
    };
    let max_pages = match value("--max-pages") {
        Some(v) => Some(v.parse().map_err(|_| anyhow::anyhow!("--max-pages must be a number"))?),
        None => None,
    };
    let switch = match value("--switch-sort") {
        Some(v) => {
            let sort = v.parse::<Sort>().map_err(anyhow::Error::msg)?;
            let after = match value("--after") {
                Some(a) => a.parse().map_err(|_| anyhow::anyhow!("--after must be a number"))?,
                None => 1,
            };
            Some((after, sort))
        }
        None => None,
    };

    Ok(Args {
        page_size,
        sort,
        max_pages,
        switch,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    telemetry::init_tracing();
    let args = parse_args()?;

    let base_url = config::storefront_url();
    let source = HttpPageSource::new(&base_url, config::upstream_timeout()?)?;
    let feed = FeedController::new(source, args.page_size, args.sort);
    println!("> Browsing {} (page size {}, sort {})", base_url, args.page_size, args.sort);

    let mut pages = 0usize;
    let mut switch = args.switch;
    loop {
        if args.max_pages.is_some_and(|max| pages >= max) {
            break;
        }
        if let Some((after, sort)) = switch {
            if pages == after {
                feed.change_sort(sort).await;
                println!("> Sort changed to {}; list reset", sort);
                switch = None;
            }
        }

        match feed.load_more().await {
            LoadOutcome::Appended(n) => {
                pages += 1;
                let snapshot = feed.snapshot().await;
                let start = snapshot.items.len() - n;
                for (i, p) in snapshot.items[start..].iter().enumerate() {
                    let stock = p.stock.map(|s| s.to_string()).unwrap_or_else(|| "?".to_string());
                    println!("{:>5}. {:<28} {:>9}  stock {}", start + i + 1, p.name, p.price, stock);
                }
            }
            LoadOutcome::Exhausted | LoadOutcome::Busy | LoadOutcome::Stale => break,
            LoadOutcome::Failed(err) => {
                // No automatic retry; report and stop like a view showing a retry button.
                eprintln!("> Failed to load page: {}", err);
                break;
            }
        }
    }

    match feed.view().await {
        FeedView::AllLoaded => println!("> All {} items loaded.", feed.len().await),
        FeedView::Empty => println!("> No products."),
        FeedView::Failed { message, retryable } => {
            let hint = if retryable { "retry possible" } else { "retrying will not help" };
            println!("> Stopped with error: {} ({})", message, hint)
        }
        FeedView::More => println!("> Stopped after {} pages; more available.", pages),
        FeedView::Loading => {}
    }
    Ok(())
}
