//! `linestat classify`: run the nearest-neighbor classifier on a synthetic scenario.

use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use linestat_algo::{
    build_labeled_set, screen_labeled_set, DistanceSample, DistanceWeights, KnnClassifier,
    KnnConfig, LineSample, SyntheticLineScenario, VoteTally,
};
use linestat_cli::{OutputFormat, QueryStatus};
use linestat_core::Diagnostics;
use serde::Serialize;
use tabwriter::TabWriter;
use tracing::{info, warn};

pub struct ClassifyArgs {
    pub working: usize,
    pub not_working: usize,
    pub k: usize,
    pub query: QueryStatus,
    pub line_weight: f64,
    pub node_weight: f64,
    pub other_weight: f64,
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct ClassifyReport<'a> {
    query_label: bool,
    predicted_status: bool,
    k: usize,
    tally: VoteTally,
    neighbors: &'a [DistanceSample],
    diagnostics: &'a Diagnostics,
}

pub fn handle(args: &ClassifyArgs) -> Result<()> {
    let scenario = SyntheticLineScenario::new(args.working, args.not_working);
    let pairs = scenario.labeled_node_pairs();
    let (labeled, mut diagnostics) =
        build_labeled_set(pairs.iter().map(|(node1, node2, is_working)| (node1, node2, *is_working)));
    if diagnostics.has_errors() {
        warn!(
            failed = diagnostics.error_count(),
            "some labeled pairs could not be built and were left out"
        );
    }
    let query = scenario
        .query(args.query.is_working())
        .context("building the query sample")?;

    let (comparable, screening) = screen_labeled_set(&labeled, &query);
    diagnostics.merge(screening);
    let labeled: Vec<LineSample> = comparable.iter().map(|&i| labeled[i].clone()).collect();
    if labeled.is_empty() {
        bail!("no labeled sample is comparable with the query");
    }

    let config = KnnConfig {
        k: args.k,
        weights: DistanceWeights {
            line: args.line_weight,
            node: args.node_weight,
            other: args.other_weight,
        },
    };
    info!(
        labeled = labeled.len(),
        k = config.k,
        "classifying line {}-{}",
        query.node1(),
        query.node2()
    );
    let knn = KnnClassifier::new(&labeled, &query, config)?;

    match args.format {
        OutputFormat::Plain => print_table(&knn, &diagnostics),
        OutputFormat::Json => {
            let report = ClassifyReport {
                query_label: query.is_working(),
                predicted_status: knn.predicted_status(),
                k: knn.k(),
                tally: knn.tally(),
                neighbors: knn.neighbors(),
                diagnostics: &diagnostics,
            };
            serde_json::to_writer_pretty(io::stdout(), &report)
                .map_err(|err| anyhow::anyhow!("serializing classification to JSON: {err}"))?;
            println!();
            Ok(())
        }
    }
}

fn status_label(is_working: bool) -> &'static str {
    if is_working {
        "working"
    } else {
        "not working"
    }
}

fn print_table(knn: &KnnClassifier<'_>, diagnostics: &Diagnostics) -> Result<()> {
    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "RANK\tSAMPLE\tSTATUS\tDISTANCE")?;
    for (rank, neighbor) in knn.neighbors().iter().enumerate() {
        writeln!(
            writer,
            "{}\t#{}\t{}\t{:.6}",
            rank + 1,
            neighbor.known_index,
            status_label(neighbor.is_working),
            neighbor.distance
        )?;
    }
    writer.flush()?;

    let tally = knn.tally();
    println!();
    println!(
        "Votes: {} working, {} not working (k = {})",
        tally.working,
        tally.not_working,
        knn.k()
    );
    println!("Predicted status: {}", status_label(knn.predicted_status()));

    if !diagnostics.is_empty() {
        println!();
        println!("Diagnostics: {}", diagnostics.summary());
        for issue in &diagnostics.issues {
            println!("  {issue}");
        }
    }
    Ok(())
}
