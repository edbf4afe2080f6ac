use anyhow::Result;
use std::collections::BTreeSet;

use crate::{
    filter::ReleaseWindowFilter,
    inventory::Family,
    package::ReleaseLine,
    runtime::Runtime,
};

use super::{build_filter, config::Config};

/// Print the computed window of every filterable family.
#[tracing::instrument(skip(config))]
pub async fn window<R: Runtime>(config: Config<R>) -> Result<()> {
    let release_filter = build_filter(&config).await?;
    print!("{}", render_windows(&release_filter));
    Ok(())
}

/// One line per family: `<family> [umbrella] known=<lines> window=<lines>`.
pub fn render_windows(release_filter: &ReleaseWindowFilter) -> String {
    let mut output = String::new();
    for (name, window) in release_filter.windows() {
        let marker = match window.family() {
            Family::Umbrella => " [umbrella]",
            Family::Component(_) => "",
        };
        let intersecting = if window.is_active() {
            join(window.intersecting())
        } else {
            "(unfiltered)".to_string()
        };
        output.push_str(&format!(
            "{}{} known={} window={}\n",
            name,
            marker,
            join(window.known()),
            intersecting
        ));
    }
    output
}

fn join(lines: &BTreeSet<ReleaseLine>) -> String {
    if lines.is_empty() {
        return "-".to_string();
    }
    lines
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
