use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use clusterforge::backend::{RestBackend, TemplateStore};
use clusterforge::catalog::{self, ProviderId};
use clusterforge::cluster;
use clusterforge::session::WizardSession;
use clusterforge::settings::Settings;
use clusterforge::template::{self, ConfigurationDraft, TemplatePatch};
use clusterforge::wizard::WizardState;
use serde_json::json;
use tracing::{debug, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings file (defaults to ./clusterforge.toml when present)
    #[arg(long, global = true, env = "CLUSTERFORGE_CONFIG")]
    config: Option<PathBuf>,

    /// Hosted backend REST endpoint
    #[arg(long, global = true, env = "CLUSTERFORGE_BACKEND_URL")]
    backend_url: Option<String>,

    /// Hosted backend API key
    #[arg(long, global = true, env = "CLUSTERFORGE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Backend request timeout in seconds
    #[arg(long, global = true, env = "CLUSTERFORGE_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the catalog, or what it offers for one provider, as JSON
    Catalog {
        #[arg(long)]
        provider: Option<ProviderId>,
    },
    /// Render a default configuration for a provider
    Preview(PreviewArgs),
    /// Manage stored templates
    #[command(subcommand)]
    Templates(TemplateCommands),
    /// Show version information
    Version,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    #[arg(long)]
    provider: ProviderId,

    /// Cluster name
    #[arg(long)]
    name: String,

    /// Credential id; fetched from the backend
    #[arg(long)]
    credential: Option<String>,

    /// Emit the assembled document as YAML instead of the preview text
    #[arg(long)]
    yaml: bool,
}

#[derive(Subcommand, Debug)]
enum TemplateCommands {
    /// List stored templates
    List,
    /// Render a stored template
    Show { id: String },
    /// Rename or re-describe a stored template
    Rename {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a stored template
    Delete { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_format);

    match &args.command {
        Commands::Version => {
            println!("clusterforge v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Catalog { provider } => run_catalog(*provider),
        Commands::Preview(preview) => run_preview(&args, preview).await,
        Commands::Templates(command) => run_templates(&args, command).await,
    }
}

fn init_tracing(format: LogFormat) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

fn load_settings(args: &Args) -> anyhow::Result<Settings> {
    let mut settings =
        Settings::load(args.config.as_deref()).context("failed to load settings")?;
    if let Some(url) = &args.backend_url {
        settings.backend.url = url.clone();
    }
    if let Some(key) = &args.api_key {
        settings.backend.api_key = Some(key.clone());
    }
    if let Some(timeout) = args.timeout_secs {
        settings.backend.timeout_secs = timeout;
    }
    settings.validate()?;
    debug!(url = %settings.backend.url, "settings loaded");
    Ok(settings)
}

fn backend(args: &Args) -> anyhow::Result<Arc<RestBackend>> {
    let settings = load_settings(args)?;
    Ok(Arc::new(RestBackend::new(&settings.backend)?))
}

fn run_catalog(provider: Option<ProviderId>) -> anyhow::Result<()> {
    let document = match provider {
        None => json!({
            "providers": catalog::providers(),
            "addons": catalog::addons(),
            "securityFrameworks": catalog::security_frameworks(),
        }),
        Some(p) => {
            let distributions: Vec<_> = catalog::distributions_for(p)
                .iter()
                .map(|d| {
                    json!({
                        "distribution": d,
                        "kubernetesVersions": catalog::k8s_versions_for(p, d.id),
                        "storageEngines": catalog::storage_engines_for(p, d.id),
                    })
                })
                .collect();
            json!({
                "provider": catalog::provider(p),
                "regions": catalog::regions_for(p),
                "operatingSystems": catalog::operating_systems_for(p),
                "distributions": distributions,
                "vmSizes": catalog::vm_sizes_for(p),
                "defaultNodePools": catalog::default_node_pools(p),
            })
        }
    };
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

async fn run_preview(args: &Args, preview: &PreviewArgs) -> anyhow::Result<()> {
    let state = match &preview.credential {
        None => WizardState::new()
            .set_name(preview.name.as_str())
            .select_provider(preview.provider),
        Some(credential) => {
            let backend = backend(args)?;
            let session = WizardSession::new(backend.clone(), backend);
            session
                .update(|s| Ok(s.set_name(preview.name.as_str())))
                .await?;
            session
                .select_provider(preview.provider)
                .await
                .context("failed to load credentials")?;
            session.update(|s| s.select_credential(credential)).await?
        }
    };

    if preview.yaml {
        match cluster::assemble(&state) {
            Ok(config) => print!("{}", config.to_yaml()?),
            Err(errors) => {
                for e in &errors {
                    eprintln!("{}: {} ({})", e.field, e.message, e.how_to_fix);
                }
                bail!("configuration is not valid ({} issue(s))", errors.len());
            }
        }
    } else {
        print!("{}", template::render_preview(&ConfigurationDraft::from(&state)));
    }
    Ok(())
}

async fn run_templates(args: &Args, command: &TemplateCommands) -> anyhow::Result<()> {
    let store = backend(args)?;
    match command {
        TemplateCommands::List => {
            for record in store.list_templates().await? {
                println!(
                    "{}\t{}\t{}\t{}",
                    record.id.as_deref().unwrap_or("-"),
                    record.name,
                    record.provider,
                    record
                        .updated_at
                        .map(|t| t.to_rfc3339())
                        .unwrap_or_default()
                );
            }
        }
        TemplateCommands::Show { id } => {
            let record = store
                .get_template(id)
                .await
                .with_context(|| format!("failed to load template {id}"))?;
            let template = template::decode(&record);
            println!("# Template: {}", template.name);
            if let Some(description) = &template.description {
                println!("# {description}");
            }
            println!();
            print!("{}", template::render_preview(&template.draft));
        }
        TemplateCommands::Rename {
            id,
            name,
            description,
        } => {
            let patch = TemplatePatch {
                name: name.clone(),
                description: description.clone(),
            };
            if patch.is_empty() {
                bail!("nothing to change: pass --name and/or --description");
            }
            let updated = store
                .update_template(id, &patch)
                .await
                .with_context(|| format!("failed to update template {id}"))?;
            info!(id = %id, name = %updated.name, "template updated");
            println!("{}\t{}", id, updated.name);
        }
        TemplateCommands::Delete { id } => {
            store
                .delete_template(id)
                .await
                .with_context(|| format!("failed to delete template {id}"))?;
            println!("deleted {id}");
        }
    }
    Ok(())
}
