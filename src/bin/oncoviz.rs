use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{debug, warn};
use oncoviz_rs::aggregate::{
    asr_summary, distinct, distinct_cancers, distinct_countries, distinct_years, totals_in_encounter_order,
};
use oncoviz_rs::filter::Requirement;
use oncoviz_rs::rank::{top_n, yearly_top_n};
use oncoviz_rs::viz::{LegendMode, RenderOptions};
use oncoviz_rs::{Chart, DashboardConfig, Dataset, Field, FieldSet, Record, Selection, ViewId, ingest, storage, viz};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "oncoviz",
    version,
    about = "Aggregate, rank & chart cancer incidence and research-article datasets"
)]
struct Cli {
    /// JSON config file (data directory, dataset names, default selections).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory holding the CSV datasets (overrides the config).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// More log output (-v info, -vv debug). RUST_LOG still applies.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a CSV file and print what was accepted.
    Inspect(InspectArgs),
    /// Rank countries or cancers by article count, with the per-year residual.
    Top(TopArgs),
    /// Build one view and write it as SVG, PNG, JSON or CSV.
    Chart(ChartArgs),
    /// Write every view with its default selection.
    RenderAll(RenderAllArgs),
    /// List the available views.
    List,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// CSV file to parse.
    csv: PathBuf,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum RankBy {
    Country,
    Cancer,
}

#[derive(Args, Debug)]
struct TopArgs {
    /// CSV file with `Country,Cancer,Year,Articles` columns.
    csv: PathBuf,
    /// Entity to rank.
    #[arg(long, value_enum, default_value_t = RankBy::Country)]
    by: RankBy,
    /// Only records for this country (exact match).
    #[arg(long)]
    country: Option<String>,
    /// Only records for this cancer type (exact match).
    #[arg(long)]
    cancer: Option<String>,
    /// Number of highlighted entries.
    #[arg(short, default_value_t = 5)]
    n: usize,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LegendArg {
    Inside,
    Right,
    Top,
    Bottom,
    Hidden,
}

impl From<LegendArg> for LegendMode {
    fn from(l: LegendArg) -> Self {
        match l {
            LegendArg::Inside => LegendMode::Inside,
            LegendArg::Right => LegendMode::Right,
            LegendArg::Top => LegendMode::Top,
            LegendArg::Bottom => LegendMode::Bottom,
            LegendArg::Hidden => LegendMode::Hidden,
        }
    }
}

#[derive(Args, Debug)]
struct PlotArgs {
    /// Image width (defaults to the config value).
    #[arg(long)]
    width: Option<u32>,
    /// Image height (defaults to the config value).
    #[arg(long)]
    height: Option<u32>,
    /// Legend placement.
    #[arg(long, value_enum, default_value_t = LegendArg::Bottom)]
    legend: LegendArg,
}

#[derive(Args, Debug)]
struct ChartArgs {
    /// View id (see `oncoviz list`).
    view: String,
    /// Country selection, for views with a country dropdown.
    #[arg(long)]
    country: Option<String>,
    /// Cancer selection, for views with a cancer dropdown.
    #[arg(long)]
    cancer: Option<String>,
    /// Output file; the extension picks the format (.svg, .png, .json, .csv).
    #[arg(long)]
    out: PathBuf,
    #[command(flatten)]
    plot: PlotArgs,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ImageFormat {
    Svg,
    Png,
}

#[derive(Args, Debug)]
struct RenderAllArgs {
    /// Directory to write into (created if missing).
    #[arg(long)]
    out_dir: PathBuf,
    /// Image format for cartesian views; maps are always written as JSON.
    #[arg(long, value_enum, default_value_t = ImageFormat::Svg)]
    format: ImageFormat,
    #[command(flatten)]
    plot: PlotArgs,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn load_config(cli: &Cli) -> Result<DashboardConfig> {
    let mut cfg = match &cli.config {
        Some(p) => DashboardConfig::load(p)?,
        None => DashboardConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        cfg.data_dir = dir.clone();
    }
    Ok(cfg)
}

fn render_options(cfg: &DashboardConfig, plot: &PlotArgs) -> RenderOptions {
    let mut opts = RenderOptions::from(&cfg.plot);
    opts.width = plot.width.unwrap_or(opts.width);
    opts.height = plot.height.unwrap_or(opts.height);
    opts.legend = plot.legend.into();
    opts
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let cfg = load_config(&cli)?;
    match &cli.cmd {
        Command::Inspect(args) => cmd_inspect(args),
        Command::Top(args) => cmd_top(args),
        Command::Chart(args) => cmd_chart(args, &cfg),
        Command::RenderAll(args) => cmd_render_all(args, &cfg),
        Command::List => cmd_list(&cfg),
    }
}

fn fmt_opt(v: f64) -> String {
    // Up to 4 decimals, trailing zeros and dot trimmed.
    let s = format!("{:.4}", v);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn cmd_inspect(args: &InspectArgs) -> Result<()> {
    let table = ingest::load_csv(&args.csv)?;
    println!("header: {}", table.header.join(","));
    println!("records={} dropped={}", table.len(), table.dropped);

    let countries = distinct_countries(&table.records);
    let cancers = distinct_cancers(&table.records);
    let years = distinct_years(&table.records);
    if !countries.is_empty() {
        println!("countries={}", countries.len());
    }
    if !cancers.is_empty() {
        println!("cancers={}", cancers.len());
    }
    if let (Some(first), Some(last)) = (years.first(), years.last()) {
        println!("years={} ({first}..={last})", years.len());
    }
    let articles: u64 = table.records.iter().filter_map(|r| r.articles).sum();
    if table.records.iter().any(|r| r.articles.is_some()) {
        println!("articles={articles}");
    }
    if let Some(s) = asr_summary(&table.records) {
        println!(
            "ASR  count={} missing={}  min={} max={} mean={} median={}",
            s.count,
            s.missing,
            fmt_opt(s.min),
            fmt_opt(s.max),
            fmt_opt(s.mean),
            fmt_opt(s.median)
        );
    }
    Ok(())
}

fn cmd_top(args: &TopArgs) -> Result<()> {
    let table = ingest::load_csv(&args.csv)?;
    let by = args.by;
    let entity = move |r: &Record| match by {
        RankBy::Country => r.country.clone(),
        RankBy::Cancer => r.cancer.clone(),
    };
    let ranked_field = match by {
        RankBy::Country => Field::Country,
        RankBy::Cancer => Field::Cancer,
    };
    let has_years = table.has_column(Field::Year);
    let mut fields = FieldSet::of(&[ranked_field, Field::Articles]);
    if has_years {
        fields = fields.with(Field::Year);
    }
    let req = Requirement::new(fields);

    let rows: Vec<&Record> = table
        .records
        .iter()
        .filter(|r| req.accepts(r))
        .filter(|r| args.country.as_deref().is_none_or(|c| r.country() == Some(c)))
        .filter(|r| args.cancer.as_deref().is_none_or(|c| r.cancer() == Some(c)))
        .collect();
    debug!("top: {} of {} records ranked", rows.len(), table.len());

    let ranking = top_n(
        totals_in_encounter_order(rows.iter().copied(), &entity, |r| r.articles),
        args.n,
    );
    for (i, (key, total)) in ranking.top.iter().enumerate() {
        println!("{:>2}. {}  {}", i + 1, key, total);
    }
    println!("    residual  {}", ranking.residual());

    if !has_years {
        return Ok(());
    }
    let years = distinct(rows.iter().copied(), |r| r.year);
    let b = yearly_top_n(rows.iter().copied(), &years, entity, args.n);

    println!();
    print!("year");
    for s in &b.highlighted {
        print!("\t{}", s.key);
    }
    println!("\tresidual\ttotal");
    for (i, year) in b.years.iter().enumerate() {
        print!("{year}");
        for s in &b.highlighted {
            print!("\t{}", s.values[i]);
        }
        println!("\t{}\t{}", b.residual[i], b.totals[i]);
    }
    Ok(())
}

fn build_view(view: ViewId, sel: &Selection, cfg: &DashboardConfig) -> Result<Chart> {
    let path = cfg.dataset_path(view.dataset());
    let table = ingest::load_csv(&path).with_context(|| format!("loading data for view `{view}`"))?;
    let dataset = Dataset::new(view, &table, cfg);
    debug!(
        "{view}: {} of {} records usable",
        dataset.records.len(),
        table.len()
    );
    Ok(dataset.chart(sel, cfg))
}

fn write_chart(chart: &Chart, out: &Path, opts: &RenderOptions) -> Result<()> {
    let ext = out
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("svg")
        .to_ascii_lowercase();
    match ext.as_str() {
        "json" => storage::save_chart_json(chart, out)?,
        "csv" => storage::save_series_csv(chart, out)?,
        "svg" | "png" => viz::render_chart(chart, out, opts)?,
        other => anyhow::bail!("unsupported output format: {}", other),
    }
    Ok(())
}

fn cmd_chart(args: &ChartArgs, cfg: &DashboardConfig) -> Result<()> {
    let view: ViewId = args.view.parse()?;
    let sel = Selection {
        country: args.country.clone(),
        cancer: args.cancer.clone(),
    };
    let chart = build_view(view, &sel, cfg)?;
    if chart.is_empty() {
        warn!("{view}: no data for the current selection");
    }
    write_chart(&chart, &args.out, &render_options(cfg, &args.plot))?;
    eprintln!("Wrote {} to {}", view, args.out.display());
    Ok(())
}

fn cmd_render_all(args: &RenderAllArgs, cfg: &DashboardConfig) -> Result<()> {
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;
    let opts = render_options(cfg, &args.plot);
    let image_ext = match args.format {
        ImageFormat::Svg => "svg",
        ImageFormat::Png => "png",
    };
    for view in ViewId::ALL {
        let ext = if view.is_map() { "json" } else { image_ext };
        let out = args.out_dir.join(format!("{}.{ext}", view.slug()));
        let chart = build_view(view, &Selection::default(), cfg)?;
        write_chart(&chart, &out, &opts)?;
        eprintln!("Wrote {} to {}", view, out.display());
    }
    Ok(())
}

fn cmd_list(cfg: &DashboardConfig) -> Result<()> {
    for view in ViewId::ALL {
        let s = view.selectors();
        let selectors = match (s.country, s.cancer) {
            (true, true) => "country, cancer",
            (true, false) => "country",
            (false, true) => "cancer",
            (false, false) => "-",
        };
        println!(
            "{:<28} {:<40} {:<16} {}",
            view.slug(),
            view.heading(),
            selectors,
            cfg.datasets.file_name(view.dataset())
        );
    }
    Ok(())
}
