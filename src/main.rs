//! DataGuard Core - Main Entry Point
//!
//! CLI demo chạy trọn flow trên một dataset CSV: chọn file, parse
//! preview, phân tích 4 giai đoạn, lưu history và export document.
//! Toàn bộ engines nằm trong lib, binary này chỉ là caller.

use std::path::PathBuf;
use std::sync::Arc;

use dataguard_core::api::{self, SessionContext, UploadSession};
use dataguard_core::constants;
use dataguard_core::logic::classify::{Classifier, HeuristicClassifier, SyntheticClassifier};
use dataguard_core::logic::export::to_json_string;
use dataguard_core::logic::history::HistoryStore;
use dataguard_core::logic::ingest::DatasetHandle;
use dataguard_core::PreviewTable;

struct Args {
    dataset: Option<PathBuf>,
    exact_rows: bool,
    synthetic: bool,
    seed: Option<u64>,
    export_dir: Option<PathBuf>,
    show_history: bool,
}

fn usage() -> ! {
    eprintln!("Usage: dataguard [<dataset.csv>] [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --exact-rows     Stream the whole file for an exact row count");
    eprintln!("  --synthetic      Use the random stand-in classifier instead of the heuristic");
    eprintln!("  --seed <n>       Seed the stand-in classifier (implies --synthetic)");
    eprintln!("  --export <dir>   Write the result document as JSON into <dir>");
    eprintln!("  --history        List past analyses for the current owner");
    std::process::exit(2);
}

fn parse_args() -> Args {
    let mut args = Args {
        dataset: None,
        exact_rows: false,
        synthetic: false,
        seed: None,
        export_dir: None,
        show_history: false,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--exact-rows" => args.exact_rows = true,
            "--synthetic" => args.synthetic = true,
            "--seed" => match iter.next().and_then(|s| s.parse().ok()) {
                Some(seed) => {
                    args.synthetic = true;
                    args.seed = Some(seed);
                }
                None => usage(),
            },
            "--export" => match iter.next() {
                Some(dir) => args.export_dir = Some(PathBuf::from(dir)),
                None => usage(),
            },
            "--history" => args.show_history = true,
            "--help" | "-h" => usage(),
            other if !other.starts_with('-') && args.dataset.is_none() => {
                args.dataset = Some(PathBuf::from(other));
            }
            _ => usage(),
        }
    }

    args
}

fn print_preview(preview: &PreviewTable) {
    println!(
        "Preview ({} of up to {} rows):",
        preview.row_count(),
        preview.row_limit()
    );
    println!("  {}", preview.headers().join(" | "));
    for i in 0..preview.row_count() {
        let cells: Vec<&str> = preview
            .headers()
            .iter()
            .map(|h| preview.cell(i, h).unwrap_or(""))
            .collect();
        println!("  {}", cells.join(" | "));
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!(
        "Starting {} Core v{}...",
        constants::APP_NAME,
        constants::APP_VERSION
    );

    let args = parse_args();
    if args.dataset.is_none() && !args.show_history {
        usage();
    }

    let store = match HistoryStore::open(constants::get_history_dir()) {
        Ok(store) => store,
        Err(e) => {
            log::error!("Could not open history store: {}", e);
            std::process::exit(1);
        }
    };
    let ctx = SessionContext::new(constants::get_owner_id());
    log::info!(
        "Session {} (owner '{}') started at {}",
        ctx.session_id(),
        ctx.owner_id(),
        ctx.started_at().to_rfc3339()
    );
    let mut session = UploadSession::new();

    if let Some(path) = &args.dataset {
        let handle = match DatasetHandle::from_path(path) {
            Ok(handle) => handle,
            Err(e) => {
                log::error!("Could not read '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        };

        let preview = match api::select_dataset(&mut session, handle) {
            Ok(preview) => preview,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        };
        print_preview(&preview);

        let classifier: Arc<dyn Classifier> = if args.synthetic {
            match args.seed {
                Some(seed) => Arc::new(SyntheticClassifier::seeded(seed)),
                None => Arc::new(SyntheticClassifier::new()),
            }
        } else {
            Arc::new(HeuristicClassifier::new())
        };
        log::info!("Classifier: {}", classifier.name());

        let deadline = constants::get_run_deadline();
        let outcome = match api::run_analysis(
            &mut session,
            &ctx,
            &store,
            classifier,
            args.exact_rows,
            deadline,
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        };

        match to_json_string(&outcome.result) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("{}", e),
        }
        if outcome.result.is_attack() {
            log::warn!(
                "Attack traffic detected ({}), confidence {:.2}",
                outcome.result.attack_type,
                outcome.result.confidence
            );
        } else {
            log::info!(
                "Traffic looks normal, confidence {:.2}",
                outcome.result.confidence
            );
        }
        if outcome.saved {
            log::info!("History entry saved for owner '{}'", ctx.owner_id());
        } else if let Some(reason) = &outcome.store_error {
            log::warn!("Result available, not saved: {}", reason);
        }

        if let Some(dir) = &args.export_dir {
            match api::export_result(&session, dir) {
                Ok(path) => println!("Exported: {}", path.display()),
                Err(e) => log::error!("{}", e),
            }
        }
    }

    if args.show_history {
        match api::get_history(&store, &ctx) {
            Ok(entries) => {
                println!("History for '{}' ({} entries):", ctx.owner_id(), entries.len());
                for entry in entries {
                    println!(
                        "  {}  {:<6}  {:.2}  {}",
                        entry.date.format("%Y-%m-%d %H:%M:%S"),
                        entry.prediction.as_str(),
                        entry.confidence,
                        entry.file_name
                    );
                }
            }
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        }
    }
}
