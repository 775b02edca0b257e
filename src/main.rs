//! Depot CLI
//!
//! Command-line front end for the inventory backend:
//! - Log in and out
//! - List, show and delete any resource
//! - Preview product variant combinations
//! - Capture barcodes from a keyboard-wedge scanner
//! - Normalize phone numbers and dates

use anyhow::{bail, Context};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::io::BufRead;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use depot::api::{ApiClient, PageQuery, ResourceKind, SortOrder};
use depot::config::{Config, LoggingConfig};
use depot::notify::{Confirm, FixedAnswer, TerminalConfirm, ToastQueue};
use depot::output::{render_record, render_rows, OutputFormat};
use depot::scanner::{ScanResult, ScannerService};
use depot::session::Session;
use depot::table::{DeleteOutcome, TableController};
use depot::util::{format_phone, parse_date, parse_to_yyyymmdd, sanitize_phone, to_iso_date};
use depot::variants::VariantMatrix;

#[derive(Parser)]
#[command(name = "depot")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Warehouse and inventory backend client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend base URL (overrides the config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,

    /// Config file (default: ~/.config/depot/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and save the session
    Login {
        username: String,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the saved session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// List one page of a resource
    List {
        #[arg(value_enum)]
        resource: ResourceKind,
        #[arg(short, long, default_value = "1")]
        page: u32,
        /// Rows per page (default from config)
        #[arg(short, long)]
        size: Option<u32>,
        /// Column to sort by (wire name, e.g. companyName)
        #[arg(long)]
        sort: Option<String>,
        /// Sort direction (default asc)
        #[arg(long, value_enum, requires = "sort")]
        order: Option<SortOrder>,
        /// Server-side search
        #[arg(long)]
        search: Option<String>,
        /// Client-side filter over the fetched page
        #[arg(long)]
        filter: Option<String>,
    },

    /// Show one row
    Get {
        #[arg(value_enum)]
        resource: ResourceKind,
        id: i64,
    },

    /// Delete one row after confirmation
    Delete {
        #[arg(value_enum)]
        resource: ResourceKind,
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Preview variant combinations, e.g. `depot variants Size=S,M Color=Red,Blue`
    Variants {
        /// Axes as NAME=OPTION,OPTION
        axes: Vec<String>,
    },

    /// Capture one barcode from stdin (a keyboard-wedge scanner types into it)
    Scan {
        /// Deliver this barcode instead of reading stdin (test mode only)
        #[arg(long)]
        simulate: Option<String>,
        /// Deliver a random barcode (test mode only)
        #[arg(long, conflicts_with = "simulate")]
        random: bool,
        /// Look up the scanned barcode's product
        #[arg(long)]
        lookup: bool,
    },

    /// Normalize a phone number
    Phone { input: String },

    /// Normalize a date to YYYYMMDD
    Date { input: String },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    init_logging(&config.logging);

    match cli.command {
        Commands::Phone { input } => {
            let digits = sanitize_phone(&input);
            match cli.format {
                OutputFormat::Table => println!("{}", format_phone(&digits)),
                _ => println!("{}", json!({ "digits": digits, "formatted": format_phone(&digits) })),
            }
            return Ok(());
        }

        Commands::Date { input } => {
            let Some(compact) = parse_to_yyyymmdd(&input) else {
                bail!("Unrecognized date: {}", input);
            };
            match cli.format {
                OutputFormat::Table => println!("{}", compact),
                _ => {
                    let iso = parse_date(&input).map(to_iso_date);
                    println!("{}", json!({ "yyyymmdd": compact, "iso": iso }));
                }
            }
            return Ok(());
        }

        Commands::Variants { axes } => {
            return print_variants(&axes, cli.format);
        }

        Commands::Config { output } => {
            let content = depot::config::generate_default_config();
            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &content)?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
            return Ok(());
        }

        _ => {}
    }

    let client = ApiClient::new(config.api.client_config())?;
    let mut session = Session::restore(config.session.store(), Utc::now())?;
    session.attach(&client).await;
    let mut toasts = ToastQueue::new(&config.toast);

    let result = run(cli.command, cli.format, &config, &client, &mut session, &mut toasts).await;

    for toast in toasts.drain() {
        eprintln!("{} {}", toast.level.icon(), toast.message);
    }

    if let Some(e) = result.as_ref().err().and_then(|e| e.downcast_ref::<depot::ApiError>()) {
        if session.end_if_unauthorized(&client, e).await? {
            eprintln!("Session expired. Run `depot login` again.");
        }
    }
    result
}

async fn run(
    command: Commands,
    format: OutputFormat,
    config: &Config,
    client: &ApiClient,
    session: &mut Session,
    toasts: &mut ToastQueue,
) -> anyhow::Result<()> {
    match command {
        Commands::Login { username, password } => {
            let password = match password {
                Some(p) => p,
                None => dialoguer::Password::new()
                    .with_prompt("Password")
                    .interact()
                    .context("Failed to read password")?,
            };
            let user = session.login(client, &username, &password).await?;
            toasts.success(format!("Welcome, {}", user.display_name()));
        }

        Commands::Logout => {
            session.logout(client).await?;
            toasts.info("Logged out");
        }

        Commands::Whoami => match session.current_user() {
            Some(user) if session.is_authenticated(Utc::now()) => {
                let record = serde_json::to_value(user)?;
                print!("{}", render_record(&record, format)?);
            }
            _ => bail!("Not logged in"),
        },

        Commands::List {
            resource,
            page,
            size,
            sort,
            order,
            search,
            filter,
        } => {
            require_login(session)?;
            let page_size = size.unwrap_or(config.table.default_page_size);
            let mut table = TableController::new(client.json_resource(resource), page_size, resource.label());
            {
                let state = table.state_mut();
                if let Some(term) = &search {
                    state.set_search(term);
                }
                if let Some(column) = &sort {
                    state.set_sort(column, order.unwrap_or_default());
                }
                if page > 1 {
                    state.go_to_page(page);
                }
                if let Some(text) = &filter {
                    state.set_filter(text);
                }
            }

            table.load(toasts).await?;

            let state = table.state();
            let rows: Vec<Value> = state.visible_rows().into_iter().cloned().collect();
            print!("{}", render_rows(&rows, format)?);
            if format == OutputFormat::Table {
                let sizes: Vec<String> = state.page_size_options().iter().map(u32::to_string).collect();
                eprintln!(
                    "Page {} of {} ({} total, page sizes: {})",
                    state.query().page_number,
                    state.total_pages().max(1),
                    state.total_count(),
                    sizes.join(", ")
                );
            }
        }

        Commands::Get { resource, id } => {
            require_login(session)?;
            match client.json_resource(resource).get_by_id(id).await {
                Ok(record) => print!("{}", render_record(&record, format)?),
                Err(e) => {
                    toasts.report_error(&e, &format!("Failed to load {}", resource.label()));
                    return Err(e.into());
                }
            }
        }

        Commands::Delete { resource, id, yes } => {
            require_login(session)?;
            let service = client.json_resource(resource);
            let name = match service.get_by_id(id).await {
                Ok(record) => display_name(&record).unwrap_or_else(|| format!("#{}", id)),
                Err(e) => {
                    toasts.report_error(&e, &format!("Failed to load {}", resource.label()));
                    return Err(e.into());
                }
            };

            let confirm: Box<dyn Confirm> = if yes {
                Box::new(FixedAnswer(true))
            } else {
                Box::new(TerminalConfirm)
            };

            let page_size = config.table.default_page_size;
            let mut table = TableController::new(service, page_size, resource.label());
            match table.delete_row(id, &name, confirm.as_ref(), toasts).await? {
                DeleteOutcome::Deleted => {
                    eprintln!("{} {}s remaining", table.state().total_count(), resource.label());
                }
                DeleteOutcome::Cancelled => eprintln!("Cancelled"),
            }
        }

        Commands::Scan {
            simulate,
            random,
            lookup,
        } => {
            let scanner = ScannerService::new(config.scanner.clone());
            let result = if let Some(code) = simulate {
                scanner.simulate_scan(&code).await?
            } else if random {
                scanner.simulate_random_scan().await?
            } else {
                read_scan(&scanner).await?
            };

            match result.barcode() {
                Some(barcode) if lookup => {
                    require_login(session)?;
                    match client.product_by_barcode(barcode).await {
                        Ok(product) => {
                            let record = serde_json::to_value(&product)?;
                            print!("{}", render_record(&record, format)?);
                        }
                        Err(e) => {
                            toasts.report_error(&e, &format!("No product with barcode {}", barcode));
                            return Err(e.into());
                        }
                    }
                }
                Some(barcode) => match format {
                    OutputFormat::Table => println!("{}", barcode),
                    _ => println!("{}", serde_json::to_string(&result)?),
                },
                None => bail!(result.error().unwrap_or("Scan failed").to_string()),
            }
        }

        Commands::Phone { .. } | Commands::Date { .. } | Commands::Variants { .. } | Commands::Config { .. } => {}
    }

    Ok(())
}

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("depot={}", config.level)));

    let registry = tracing_subscriber::registry().with(filter);
    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn require_login(session: &Session) -> anyhow::Result<()> {
    if !session.is_authenticated(Utc::now()) {
        bail!("Not logged in. Run `depot login <username>` first.");
    }
    Ok(())
}

/// Best human-readable name for a row
fn display_name(record: &Value) -> Option<String> {
    ["name", "companyName", "username", "serialNumber", "productName"]
        .iter()
        .find_map(|key| record.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

/// Wait for one scan: each stdin line is typed into the scanner as a burst
async fn read_scan(scanner: &ScannerService) -> anyhow::Result<ScanResult> {
    let mut results = scanner.subscribe();
    scanner.start_scanning().await;
    eprintln!(
        "Scan a barcode (timeout {}s)...",
        scanner.config().scan_timeout().as_secs()
    );

    let (tx, mut lines) = tokio::sync::mpsc::unbounded_channel::<String>();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines().map_while(Result::ok) {
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    loop {
        tokio::select! {
            changed = results.changed() => {
                changed.context("Scanner closed")?;
                if let Some(result) = results.borrow_and_update().clone() {
                    return Ok(result);
                }
            }
            line = lines.recv() => {
                match line {
                    Some(line) => {
                        if let Some(result) = scanner.type_burst(&line).await {
                            return Ok(result);
                        }
                    }
                    None => {
                        scanner.stop_scanning().await;
                        bail!("Input closed before a barcode was scanned");
                    }
                }
            }
        }
    }
}

fn print_variants(axes: &[String], format: OutputFormat) -> anyhow::Result<()> {
    let mut matrix = VariantMatrix::new();
    for axis in axes {
        let Some((name, options)) = axis.split_once('=') else {
            bail!("Expected NAME=OPTION,OPTION but got {:?}", axis);
        };
        let options: Vec<&str> = options
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .collect();
        matrix.add_axis(name.trim(), options);
    }

    if matrix.combinations().is_empty() {
        println!("No combinations (product is universal)");
        return Ok(());
    }

    let rows: Vec<Value> = matrix
        .combinations()
        .iter()
        .map(|c| {
            let mut row = serde_json::Map::new();
            row.insert("variant".to_string(), json!(c.display_name()));
            for attr in &c.values {
                row.insert(attr.name.clone(), json!(attr.value));
            }
            Value::Object(row)
        })
        .collect();
    print!("{}", render_rows(&rows, format)?);
    Ok(())
}
