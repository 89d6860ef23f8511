use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{DisplayMode, HttpDataAccess, Route, Session};
use serde::Serialize;
use shared::domain::{CompanyId, LocationId};
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::load_settings;
use render::{DetailView, NO_RESULTS_HINT};

#[derive(Parser, Debug)]
#[command(name = "directory", about = "Browse companies and their locations")]
struct Args {
    /// Base URL of the company API (overrides directory.toml and env).
    #[arg(long, global = true)]
    api_base_url: Option<String>,
    /// Per-request timeout in seconds; 0 disables it.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    /// Print views as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show every company.
    List,
    /// Find companies whose name contains QUERY.
    Search { query: String },
    /// Show one company's locations, map framing and category chart.
    Show {
        company_id: i64,
        /// Highlight a location and use its address.
        #[arg(long)]
        select: Option<i64>,
    },
    /// Render the view for an app path such as `/` or `/company/3`.
    Open { path: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let settings = load_settings().with_overrides(args.api_base_url.clone(), args.timeout_secs);
    let data = HttpDataAccess::new(&settings.api_base_url, settings.request_timeout())
        .with_context(|| format!("failed to configure company API at {}", settings.api_base_url))?;
    let mut session = Session::new(Arc::new(data));

    match args.command {
        Command::List => list(&mut session, args.json).await,
        Command::Search { query } => search(&mut session, &query, args.json).await,
        Command::Show { company_id, select } => {
            show(&mut session, CompanyId(company_id), select.map(LocationId), args.json).await
        }
        Command::Open { path } => {
            let route = Route::parse(&path).ok_or_else(|| anyhow!("no view for path '{path}'"))?;
            match route {
                Route::Directory => list(&mut session, args.json).await,
                Route::CompanyDetail(company_id) => {
                    show(&mut session, company_id, None, args.json).await
                }
            }
        }
    }
}

async fn load_directory(session: &mut Session) -> Result<()> {
    session.navigate(Route::Directory);
    session.settle().await;
    if let Some(err) = session.directory().load_error() {
        bail!("failed to load companies: {err}");
    }
    Ok(())
}

async fn list(session: &mut Session, json: bool) -> Result<()> {
    load_directory(session).await?;
    session.directory_mut().set_mode(DisplayMode::List);
    print_companies(session, json)
}

async fn search(session: &mut Session, query: &str, json: bool) -> Result<()> {
    load_directory(session).await?;
    let directory = session.directory_mut();
    directory.set_mode(DisplayMode::Search);
    directory.search(query);
    if directory.shows_no_results_hint() && !json {
        println!("{NO_RESULTS_HINT}");
        return Ok(());
    }
    print_companies(session, json)
}

fn print_companies(session: &Session, json: bool) -> Result<()> {
    let companies = session.directory().filtered_companies();
    if json {
        print_json(&companies)
    } else {
        print!("{}", render::company_list(companies));
        Ok(())
    }
}

async fn show(
    session: &mut Session,
    company_id: CompanyId,
    select: Option<LocationId>,
    json: bool,
) -> Result<()> {
    session.navigate(Route::CompanyDetail(company_id));
    session.settle().await;

    if let Some(err) = session.detail().error() {
        warn!(company_id = company_id.0, error = %err, "detail view unavailable");
        bail!("{}", render::detail_error(company_id, err));
    }
    if let Some(location_id) = select {
        if !session.detail_mut().select(location_id) {
            warn!(location_id = location_id.0, "no such location for this company");
        }
    }

    let view = DetailView::from_controller(session.detail())
        .ok_or_else(|| anyhow!("company {company_id} did not finish loading"))?;
    if json {
        print_json(&view)
    } else {
        print!("{}", render::detail(&view));
        Ok(())
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
