use std::{num::NonZeroU32, process};

use clap::CommandFactory;
use edgesite::{
    application::{
        error::AppError,
        fetcher::{ContentFetcher, FetchPolicy},
        queries::ListRequest,
        render::{RenderService, render_service},
        search::SearchService,
    },
    config::{self, CliArgs},
    domain::blocks::RichText,
    infra::{error::InfraError, graphql::build_backend, telemetry},
    presentation::views::{self, UNAVAILABLE_NOTICE},
};
use serde_json::Value;
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;

    telemetry::init(&settings.logging)?;

    let Some(command) = cli_args.command else {
        CliArgs::command()
            .print_help()
            .map_err(|err| AppError::from(InfraError::from(err)))?;
        return Ok(());
    };

    match command {
        config::Command::Show(args) => run_show(&settings, args).await,
        config::Command::List(args) => run_list(&settings, args).await,
        config::Command::Search(args) => run_search(&settings, args).await,
        config::Command::Render(args) => run_render(args).await,
    }
}

fn build_fetcher(settings: &config::Settings) -> Result<ContentFetcher, AppError> {
    let backend = build_backend(&settings.backend)?;
    let fetcher = ContentFetcher::new(backend, FetchPolicy::from(settings));
    if !fetcher.is_configured() {
        eprintln!("{UNAVAILABLE_NOTICE}");
    }
    Ok(fetcher)
}

async fn run_show(settings: &config::Settings, args: config::ShowArgs) -> Result<(), AppError> {
    let fetcher = build_fetcher(settings)?;

    info!(
        target = "edgesite::show",
        kind = %args.kind,
        identifier = %args.id,
        "Fetching document"
    );

    match fetcher.document(args.kind, &args.id).await {
        Some(document) => {
            let renderer = render_service();
            let article =
                views::document_article(renderer.as_ref(), &document, settings.display.timezone);
            println!("{}", article.to_html());
        }
        None => println!("not found: {} {}", args.kind, args.id),
    }
    Ok(())
}

async fn run_list(settings: &config::Settings, args: config::ListArgs) -> Result<(), AppError> {
    let limit = match args.limit {
        Some(limit) => NonZeroU32::new(limit)
            .ok_or_else(|| AppError::validation("--limit must be greater than zero"))?,
        None => settings.fetch.list_limit,
    };

    let fetcher = build_fetcher(settings)?;
    let documents = fetcher.list(&ListRequest::new(args.kind, limit)).await;

    for document in &documents {
        println!(
            "{}",
            views::summary_line(document, settings.display.timezone)
        );
    }
    info!(
        target = "edgesite::list",
        kind = %args.kind,
        count = documents.len(),
        "Listed documents"
    );
    Ok(())
}

async fn run_search(settings: &config::Settings, args: config::SearchArgs) -> Result<(), AppError> {
    let query = args.query.join(" ");
    let service = SearchService::new(build_fetcher(settings)?);
    let outcome = service.search(&query).await;
    print!("{}", views::search_report(&outcome));
    Ok(())
}

async fn run_render(args: config::RenderArgs) -> Result<(), AppError> {
    let raw = tokio::fs::read_to_string(&args.file)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    let value: Value = serde_json::from_str(&raw).map_err(|err| {
        AppError::validation(format!(
            "`{}` is not valid JSON: {err}",
            args.file.display()
        ))
    })?;

    let rich = RichText::from_value(&value);
    println!("{}", render_service().render_rich_text(&rich).to_html());
    Ok(())
}
