use anyhow::{bail, Result};
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use tokio::runtime::Builder;

use switch_topology::collector::{Collector, JsonRecordExecutor};
use switch_topology::config::TopologyConfig;
use switch_topology::network::TopologyBuilder;
use switch_topology::report::{ConsoleSink, QueryReport, ReportFileSink, ResultSink};
use switch_topology::{ranked_neighbors, TopologyError};

#[derive(Parser)]
#[command(name = "switch-topology", about = "Find the nearest switch by spanning-tree path cost")]
struct Cli {
    /// Inventory and settings (JSON)
    #[arg(long, default_value = "topology.json")]
    config: PathBuf,

    /// Switch to find the nearest neighbor of
    #[arg(long)]
    start: String,

    /// Only collect from devices tagged with this site code
    #[arg(long)]
    site: Option<String>,

    #[arg(long)]
    records_dir: Option<PathBuf>,

    #[arg(long)]
    report_dir: Option<PathBuf>,

    /// Print to the console only
    #[arg(long, default_value_t = false)]
    no_report: bool,

    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let mut config = TopologyConfig::load(&cli.config)?;
    if let Some(dir) = cli.records_dir.clone() {
        config.records_dir = dir;
    }
    if let Some(dir) = cli.report_dir.clone() {
        config.report_dir = dir;
    }

    let devices: Vec<_> = config
        .devices_for_site(cli.site.as_deref())
        .into_iter()
        .cloned()
        .collect();
    if devices.is_empty() {
        bail!("no devices to collect from (site filter: {:?})", cli.site);
    }

    let rt = Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let executor = JsonRecordExecutor::new(&config.records_dir);
    let collector = Collector::from_config(executor, &config);

    info!("Gathering topology data from {} devices...", devices.len());
    let pass = rt.block_on(collector.run_pass(&devices));

    info!("Creating network graph...");
    let mut builder = TopologyBuilder::with_default_cost(config.default_port_cost);
    builder.add_pass(&pass);
    let graph = builder.graph();

    let ranked = match ranked_neighbors(graph, &cli.start) {
        Ok(ranked) => ranked,
        Err(TopologyError::UnknownNode(node)) => {
            error!("Switch {} not found in the network topology.", node);
            std::process::exit(2);
        }
        Err(e) => return Err(e.into()),
    };

    let report = QueryReport::new(&pass, graph, &cli.start, ranked);

    let mut sinks: Vec<Box<dyn ResultSink>> = vec![Box::new(ConsoleSink)];
    if !cli.no_report {
        sinks.push(Box::new(ReportFileSink::new(&config.report_dir)));
    }
    for sink in &sinks {
        sink.publish(&report)?;
    }

    Ok(())
}
