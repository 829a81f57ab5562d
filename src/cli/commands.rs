use std::fs;

use pagenav::anchors::{inject_anchors, AnchorConfig};
use pagenav::component::{LogNotifier, Notifier};
use pagenav::dom::{parse_document, RankSet};
use pagenav::toc::{build_toc, TocConfig};
use pagenav::utils::error::{Error, Result};

use super::types::Cli;

/// Process the input document with the selected components
pub fn process(cli: &Cli) -> Result<()> {
    let ranks = cli
        .ranks
        .as_deref()
        .map(|selector| {
            let set = RankSet::parse(selector);
            if set.is_empty() {
                return Err(Error::Config(format!(
                    "unrecognized rank selector: {}",
                    selector
                )));
            }
            Ok(set)
        })
        .transpose()?;

    let input = fs::read_to_string(&cli.input)?;
    let mut doc = parse_document(&input)?;
    let root = doc.root();
    let mut notifier = LogNotifier;

    if cli.anchors {
        let mut config = AnchorConfig {
            icon: cli.icon.clone(),
            before: cli.before,
            ..AnchorConfig::default()
        };
        if let Some(ranks) = ranks {
            config.ranks = ranks;
        }
        let injected = inject_anchors(&mut doc, root, &config);
        log::info!("injected {} heading anchors", injected);
    }

    if cli.toc {
        let mut config = if cli.nested {
            TocConfig::nested()
        } else {
            TocConfig::flat()
        };
        if let Some(ranks) = ranks {
            config.ranks = ranks;
        }
        config.caption = cli.caption.clone();

        let mount = doc
            .descendants(root)
            .into_iter()
            .find(|&node| doc.has_attr(node, "data-toc"));
        match mount {
            Some(mount) => {
                if let Some(markup) = build_toc(&mut doc, root, Some(mount), &config, &mut notifier)
                {
                    doc.set_inner_markup(mount, &markup)?;
                    notifier.ready("toc");
                }
            }
            None => log::warn!(
                "no table of contents mount found (expected an element with a data-toc attribute)"
            ),
        }
    }

    let output = doc.to_html();
    match &cli.output {
        Some(path) => fs::write(path, output)?,
        None => println!("{}", output),
    }
    Ok(())
}
