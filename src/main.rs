use clap::Parser;
use color_eyre::eyre::bail;
use std::io;
use std::path::Path;

use ls_exif::cli::Args;
use ls_exif::config::Config;
use ls_exif::listing::{Layout, UI};
use ls_exif::log::{LogEntry, write_listing_log};
use ls_exif::scanner::{WalkOptions, walk_directory};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    // --help and --version exit here, before a config file can be created
    let args = Args::parse();

    let config = Config::load()?;

    let human_sizes = args.human || config.listing.human_sizes;
    let theme = config.ui.color.theme.clone();
    let options = WalkOptions {
        recursive: args.recursive,
        show_hidden: args.all || config.listing.show_hidden,
        date_policy: config.dates.policy(),
    };
    let layout = if args.tabular {
        Layout::Table
    } else {
        Layout::Long
    };

    let ui = UI::new()
        .with_color_theme(theme.clone())
        .with_human_sizes(human_sizes);

    if !args.path.is_dir() {
        ui.print_error(&format!("Not a directory: {}", args.path.display()))?;
        bail!("cannot list {}", args.path.display());
    }

    let start = args.path.clone();
    let keep_log = args.log;

    // The walk and the EXIF decoding are blocking.
    let (stats, entries) = tokio::task::spawn_blocking(move || -> io::Result<_> {
        let ui = UI::new()
            .with_color_theme(theme)
            .with_human_sizes(human_sizes);
        let mut entries = Vec::new();
        let mut failure = None;

        let stats = walk_directory(&start, &start, options, |listing| {
            if failure.is_some() {
                return;
            }
            if let Err(e) = ui.print_listing(listing, layout) {
                failure = Some(e);
                return;
            }
            if keep_log {
                entries.push(LogEntry::from_listing(listing));
            }
        });

        match failure {
            Some(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok((stats, entries)),
            Some(e) => Err(e),
            None => Ok((stats, entries)),
        }
    })
    .await??;

    // Write log file if requested
    if args.log {
        match write_listing_log(Path::new("."), &args.path, &stats, &entries).await {
            Ok(log_path) => {
                ui.print_success(&format!("Log written to: {}", log_path.display()))?;
            }
            Err(e) => {
                ui.print_warning(&format!("Failed to write log file: {}", e))?;
            }
        }
    }

    Ok(())
}
