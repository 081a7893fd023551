use std::sync::Arc;

use anyhow::{Context, Result};
use carddesk_core::config::{
    ConfigLoad, ConfigLoader, ConfigLoaderOptions, DeskConfig,
};
use carddesk_core::directory::MessengerDirectory;
use carddesk_core::infra::{ApiClient, BackendApi, HttpBackend};
use carddesk_core::reports::{ReportService, export_file_name};
use carddesk_model::{DispatchFilter, MessengerId, ReportDate};
use tracing::{debug, info};

use super::session::{self, SessionOptions};
use super::{
    Cli, Command, ConfigCommand, DateArgs, GlobalArgs, MessengersCommand,
    render,
};

pub async fn run(cli: Cli) -> Result<()> {
    let Cli { global, command } = cli;
    let mut config = load_config(&global)?;

    match command {
        Command::Config(ConfigCommand::Show) => {
            let text = toml::to_string_pretty(&config.to_file_config())
                .context("failed to render configuration")?;
            print!("{text}");
        }
        Command::Dispatch(args) => {
            if args.quiet {
                config.audible_confirmation = false;
            }
            let options = SessionOptions {
                courier: session::courier_arg(args.messenger.as_deref())?,
                camera_feed: args.camera_feed,
            };
            let api = backend(&config)?;
            session::run(&config, api, options).await?;
        }
        Command::Messengers(command) => {
            let directory = MessengerDirectory::new(backend(&config)?);
            messengers(&directory, command).await?;
        }
        Command::Today => {
            let reports = ReportService::new(backend(&config)?);
            let today = reports
                .today()
                .await
                .context("failed to load today's dispatches")?;
            print!("{}", render::today(&today));
        }
        Command::Dispatches(args) => {
            let reports = ReportService::new(backend(&config)?);
            let mut filter = DispatchFilter {
                date: parse_date(&args.date)?,
                ..DispatchFilter::default()
            };
            if let Some(id) = args.messenger.as_deref() {
                filter = filter.for_messenger(messenger_id(id)?);
            }
            let list = reports
                .dispatches(filter)
                .await
                .context("failed to list dispatches")?;
            print!("{}", render::dispatches(&list));
        }
        Command::Report(args) => {
            let reports = ReportService::new(backend(&config)?);
            let report = reports
                .daily(parse_date(&args)?)
                .await
                .context("failed to load daily report")?;
            print!("{}", render::report(&report));
        }
        Command::Export(args) => {
            let reports = ReportService::new(backend(&config)?);
            let date = parse_date(&args.date)?.unwrap_or_default();
            let out = args.out.unwrap_or_else(|| export_file_name(date).into());
            let written = reports
                .export_excel(Some(date), &out)
                .await
                .with_context(|| format!("failed to export report for {date}"))?;
            println!("wrote {written} bytes to {}", out.display());
        }
    }
    Ok(())
}

async fn messengers(
    directory: &MessengerDirectory,
    command: MessengersCommand,
) -> Result<()> {
    match command {
        MessengersCommand::List => {
            let list = directory
                .list()
                .await
                .context("failed to list messengers")?;
            print!("{}", render::messengers(&list));
        }
        MessengersCommand::Show { id } => {
            let messenger = directory
                .get(&messenger_id(&id)?)
                .await
                .with_context(|| format!("failed to load messenger {id}"))?;
            print!("{}", render::messengers(std::slice::from_ref(&messenger)));
        }
        MessengersCommand::Add { name, contact } => {
            let messenger = directory
                .add(&name, &contact)
                .await
                .context("failed to add messenger")?;
            println!("added {} ({})", messenger.name, messenger.id);
        }
        MessengersCommand::Remove { id } => {
            directory
                .remove(&messenger_id(&id)?)
                .await
                .with_context(|| format!("failed to remove messenger {id}"))?;
            println!("removed {id}");
        }
    }
    Ok(())
}

fn load_config(global: &GlobalArgs) -> Result<DeskConfig> {
    let ConfigLoad {
        mut config,
        config_path,
        env_file_loaded,
    } = ConfigLoader::with_options(ConfigLoaderOptions {
        config_path: global.config.clone(),
        env_file: global.env_file.clone(),
    })
    .load()
    .context("failed to load configuration")?;

    if env_file_loaded {
        debug!("loaded .env file");
    }
    if let Some(path) = config_path {
        debug!(path = %path.display(), "using configuration file");
    }

    if let Some(backend) = &global.backend {
        config.backend_url = backend.clone();
    }
    if let Some(timeout) = global.timeout {
        config.request_timeout = timeout;
    }
    Ok(config)
}

fn backend(config: &DeskConfig) -> Result<Arc<dyn BackendApi>> {
    let client = ApiClient::new(&config.backend_url, config.request_timeout)
        .context("failed to create backend client")?;
    info!(backend = client.base_url(), "using backend");
    Ok(Arc::new(HttpBackend::new(Arc::new(client))))
}

fn parse_date(args: &DateArgs) -> Result<Option<ReportDate>> {
    args.date
        .as_deref()
        .map(|raw| {
            raw.parse::<ReportDate>()
                .with_context(|| format!("invalid --date '{raw}'"))
        })
        .transpose()
}

fn messenger_id(raw: &str) -> Result<MessengerId> {
    MessengerId::new(raw).with_context(|| format!("invalid messenger id '{raw}'"))
}
