use spotgen::config::{self, DEFAULT_HOST, DEFAULT_PORT, DOWNLOAD_FILE_NAME};
use spotgen::models::{AppState, FormState};
use spotgen::routes::build_router;
use spotgen::services::vantage::{export_url, import_url, VantageSelection};
use spotgen::services::{build, extract_json, render_pretty, share_query, validate, write_document, InstanceCatalog};
use spotgen::utils::{absolute_url, parse_csv_list, with_query};

use std::io::Read;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use comfy_table::{modifiers, presets, ContentArrangement, Table};
use terminal_size::{terminal_size, Width};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

fn build_state_from_env(env_file: Option<&str>) -> AppState {
    config::load_env_file(env_file);
    let catalog_file = config::get_instance_types_file();
    AppState::new(
        config::get_public_base_url(),
        InstanceCatalog::load(catalog_file.as_deref()),
        config::get_editor_quiet_interval(),
    )
}

async fn start_server(mut state: AppState, host: &str, port: u16, stylesheet: Option<String>) {
    if let Some(path) = stylesheet {
        match std::fs::read_to_string(&path) {
            Ok(css) => {
                state.custom_css = Some(css);
                tracing::info!("Loaded custom stylesheet from {}", path);
            }
            Err(e) => {
                tracing::error!(%e, "Failed to read custom stylesheet");
                fail(&format!("Failed to read custom stylesheet at {}: {}", path, e));
            }
        }
    }

    let addr: SocketAddr = match format!("{}:{}", host, port).parse() {
        Ok(a) => a,
        Err(e) => {
            tracing::error!(%e, "Invalid host/port format");
            fail(&format!("Invalid host/port format: {}", e));
        }
    };
    let app = build_router(state);
    tracing::info!(%addr, "Starting Spot Fleet generator");
    println!(
        "{} {}",
        yansi::Paint::new("Web server running on").green(),
        yansi::Paint::new(format!("http://{}", addr)).cyan()
    );
    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(%e, "Server encountered an error while running");
                fail(&format!("Server error: {}", e));
            }
        }
        Err(e) => {
            tracing::error!(%e, "Failed to bind to address; is the port already in use?");
            eprintln!(
                "{}: {}\n{}",
                yansi::Paint::new(format!("Failed to bind to {}", addr)).red(),
                e,
                yansi::Paint::new("Please stop any process using this port, or start the server with a different --port value.").yellow()
            );
            process::exit(1);
        }
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{}", yansi::Paint::new(message).red());
    process::exit(1);
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if let Some((Width(w), _)) = terminal_size() {
        table.set_width(w.saturating_sub(4));
    }
    table
}

fn print_form(form: &FormState) {
    let mut table = new_table();
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["Account ID".to_string(), form.account_id.clone()]);
    table.add_row(vec!["Launch Template ID".to_string(), form.launch_template_id.clone()]);
    table.add_row(vec!["Target Capacity".to_string(), form.target_capacity.to_string()]);
    table.add_row(vec!["Instance Types".to_string(), form.instance_types.join(", ")]);
    table.add_row(vec!["Subnet IDs".to_string(), form.subnet_ids.join(", ")]);
    println!("\n{table}\n");
}

fn read_input(path: &str) -> std::io::Result<String> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path)
    }
}

#[derive(Parser)]
#[command(
    name = "spotgen",
    author,
    version,
    about = "AWS Spot Fleet request generator",
    long_about = r#"spotgen turns a handful of Spot Fleet parameters (account ID, launch template, target capacity, instance types and subnets) into an AWS Spot Fleet request document, and reads such documents back.

Examples:
  1) Run the web generator:
      spotgen serve --host 127.0.0.1 --port 8080
  2) Generate a request on the command line:
      spotgen generate --account-id 123456789012 --launch-template-id lt-0123456789abcdefg \
          --target-capacity 4 --instance-types t3.micro,m5.large --subnet-ids subnet-0123456789abcdefg
  3) Inspect an existing request:
      spotgen import aws-spot-fleet-config.json
"#,
    after_help = "Use `spotgen <subcommand> --help` to get subcommand specific options and usage examples."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Disable colorized output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web generator
    Serve {
        /// Host to bind to
        #[arg(long, default_value_t = String::from(DEFAULT_HOST))]
        host: String,
        /// Port to bind to
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
        /// Path to .env file
        #[arg(long)]
        env_file: Option<String>,
        /// Path to a custom stylesheet to serve instead of the default
        #[arg(long)]
        stylesheet: Option<String>,
    },
    /// Build a Spot Fleet request from parameters
    #[command(about = "Generate a Spot Fleet request", long_about = "Validate the parameters and print the Spot Fleet request as pretty JSON, or write it to --output. Overrides cover every instance type / subnet combination.")]
    Generate {
        #[arg(long)]
        account_id: String,
        #[arg(long)]
        launch_template_id: String,
        #[arg(long)]
        target_capacity: u32,
        /// Comma separated instance types
        #[arg(long)]
        instance_types: String,
        /// Comma separated subnet IDs
        #[arg(long)]
        subnet_ids: String,
        /// Start of the validity window (RFC 3339); defaults to now
        #[arg(long)]
        valid_from: Option<String>,
        /// Write to this file; pass a directory to use the default file name
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
    /// Read a Spot Fleet request back into its parameters
    #[command(about = "Import a Spot Fleet request", long_about = "Parse a Spot Fleet request (file path or `-` for stdin), validate it, and print the recovered parameters together with a shareable generator link.")]
    Import {
        #[arg(default_value = "-")]
        file: String,
        /// Path to .env file
        #[arg(long)]
        env_file: Option<String>,
    },
    /// Work with instances.vantage.sh comparison links
    Vantage {
        #[command(subcommand)]
        sub: VantageCommands,
    },
    /// List or search the instance type catalog
    InstanceTypes {
        /// Substring to look for; dots are ignored (`c52` finds `c5.2xlarge`)
        #[arg(long, short = 's')]
        search: Option<String>,
        /// Newline separated catalog file (defaults to INSTANCE_TYPES_FILE or the built-in list)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Show the effective configuration
    #[command(about = "Validate configuration", long_about = "Load environment variables (optionally from --env-file) and print the effective generator settings.")]
    CheckConfig {
        /// Path to .env file
        #[arg(long)]
        env_file: Option<String>,
    },
}

#[derive(Subcommand)]
enum VantageCommands {
    #[command(about = "Build a comparison link", long_about = "Build an instances.vantage.sh link comparing the given instance types.")]
    Export {
        /// Comma separated instance types to select
        #[arg(long)]
        instance_types: String,
        /// Comma separated filter list (defaults to the selected types)
        #[arg(long)]
        filter: Option<String>,
        /// Leave the comparison view off
        #[arg(long, default_value_t = false)]
        no_compare: bool,
    },
    #[command(about = "Parse a comparison link", long_about = "Parse an instances.vantage.sh link and print the instance types it selects.")]
    Import { url: String },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        yansi::whenever(yansi::Condition::NEVER);
    }

    let Some(command) = cli.command else {
        let state = build_state_from_env(None);
        start_server(state, DEFAULT_HOST, DEFAULT_PORT, None).await;
        return;
    };

    match command {
        Commands::Serve { host, port, env_file, stylesheet } => {
            let state = build_state_from_env(env_file.as_deref());
            start_server(state, &host, port, stylesheet).await;
        }
        Commands::Generate {
            account_id,
            launch_template_id,
            target_capacity,
            instance_types,
            subnet_ids,
            valid_from,
            output,
        } => {
            let mut form = FormState {
                account_id: account_id.trim().to_string(),
                launch_template_id: launch_template_id.trim().to_string(),
                target_capacity,
                ..Default::default()
            };
            form.set_instance_types(parse_csv_list(Some(instance_types.as_str())));
            for subnet in parse_csv_list(Some(subnet_ids.as_str())) {
                if let Err(e) = form.add_subnet(&subnet) {
                    fail(&format!("{}: {}", subnet, e));
                }
            }
            if let Err(e) = validate(&form) {
                fail(&e.to_string());
            }
            let now = match valid_from.as_deref().map(DateTime::parse_from_rfc3339) {
                None => Utc::now(),
                Some(Ok(at)) => at.with_timezone(&Utc),
                Some(Err(e)) => fail(&format!("Invalid --valid-from timestamp: {}", e)),
            };
            let doc = build(&form, now);
            match output {
                Some(path) => {
                    let path = if path.is_dir() { path.join(DOWNLOAD_FILE_NAME) } else { path };
                    if let Err(e) = write_document(&path, &doc) {
                        fail(&format!("Failed to write {}: {}", path.display(), e));
                    }
                    println!("{} {}", yansi::Paint::new("Configuration written to").green(), path.display());
                }
                None => match render_pretty(&doc) {
                    Ok(text) => println!("{}", text),
                    Err(e) => fail(&format!("Failed to serialize configuration: {}", e)),
                },
            }
        }
        Commands::Import { file, env_file } => {
            config::load_env_file(env_file.as_deref());
            let text = match read_input(&file) {
                Ok(t) => t,
                Err(e) => fail(&format!("Failed to read {}: {}", file, e)),
            };
            match extract_json(&text) {
                Ok(form) => {
                    print_form(&form);
                    let link = absolute_url(&config::get_public_base_url(), &with_query("/", &share_query(&form)));
                    println!("{} {}", yansi::Paint::new("Share link:").bold(), yansi::Paint::new(link).cyan());
                }
                Err(e) => fail(&format!("Import failed: {}", e)),
            }
        }
        Commands::Vantage { sub } => match sub {
            VantageCommands::Export { instance_types, filter, no_compare } => {
                let selected = parse_csv_list(Some(instance_types.as_str()));
                let filter = filter
                    .map(|f| parse_csv_list(Some(f.as_str())))
                    .unwrap_or_else(|| selected.clone());
                println!("{}", export_url(&VantageSelection { filter, selected, compare_on: !no_compare }));
            }
            VantageCommands::Import { url } => {
                let imported = import_url(&url);
                if !imported.is_valid {
                    fail("Invalid instances.vantage.sh URL");
                }
                let mut table = new_table();
                table.set_header(vec!["List", "Instance Types"]);
                table.add_row(vec!["filter".to_string(), imported.filter.join(", ")]);
                table.add_row(vec!["selected".to_string(), imported.selected.join(", ")]);
                table.add_row(vec!["compare_on".to_string(), imported.compare_on.to_string()]);
                println!("\n{table}\n");
            }
        },
        Commands::InstanceTypes { search, catalog } => {
            config::load_env_file(None);
            let path = catalog.or_else(config::get_instance_types_file);
            let catalog = InstanceCatalog::load(path.as_deref());
            let matches = catalog.search(search.as_deref().unwrap_or(""));
            if matches.is_empty() {
                println!("{}", yansi::Paint::new("No instance types found").yellow());
            }
            for t in matches {
                println!("{}", t);
            }
        }
        Commands::CheckConfig { env_file } => {
            config::load_env_file(env_file.as_deref());
            let mut ok = true;
            let mut table = new_table();
            table.set_header(vec!["Setting", "Value"]);
            table.add_row(vec!["PUBLIC_BASE_URL".to_string(), config::get_public_base_url()]);
            table.add_row(vec![
                "EDITOR_DEBOUNCE_MS".to_string(),
                config::get_editor_quiet_interval().as_millis().to_string(),
            ]);
            match config::get_instance_types_file() {
                Some(path) => match InstanceCatalog::from_file(&path) {
                    Ok(catalog) if !catalog.is_empty() => {
                        table.add_row(vec!["INSTANCE_TYPES_FILE".to_string(), format!("{} ({} types)", path.display(), catalog.len())]);
                    }
                    Ok(_) => {
                        ok = false;
                        eprintln!("{} {}", yansi::Paint::new("INSTANCE_TYPES_FILE has no usable entries:").red(), path.display());
                    }
                    Err(e) => {
                        ok = false;
                        eprintln!("{} {}: {}", yansi::Paint::new("Cannot read INSTANCE_TYPES_FILE").red(), path.display(), e);
                    }
                },
                None => {
                    table.add_row(vec!["INSTANCE_TYPES_FILE".to_string(), "(built-in catalog)".to_string()]);
                }
            }
            println!("\n{table}\n");
            if !ok {
                process::exit(1);
            }
            println!("{}", yansi::Paint::new("Configuration looks valid").green());
        }
    }
}
