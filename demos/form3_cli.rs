use clap::{Parser, Subcommand};
use form3api::{Account, AccountAttributes, AccountOperations, CancellationToken, Client, Config};
use std::error::Error;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "form3-cli", about = "CLI wrapper for the Form3 accounts API")]
struct Cli {
    /// API base URL; falls back to FORM3_BASE_URL env var
    #[arg(long, env = "FORM3_BASE_URL")]
    base_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Register a new account
    Create {
        #[arg(long)]
        id: String,
        #[arg(long)]
        organisation_id: String,
        /// ISO 3166-1 country code
        #[arg(long)]
        country: String,
        #[arg(long)]
        base_currency: Option<String>,
        #[arg(long)]
        bank_id: Option<String>,
        #[arg(long)]
        bank_id_code: Option<String>,
        #[arg(long)]
        bic: Option<String>,
        /// Account holder name, may be repeated
        #[arg(long)]
        name: Vec<String>,
    },
    /// Fetch a single account by id
    Fetch {
        #[arg(long)]
        id: String,
    },
    /// List a page of accounts
    List {
        #[arg(long, default_value_t = 0)]
        page: u64,
        #[arg(long, default_value_t = 100)]
        size: u64,
    },
    /// Delete an account at a given version
    Delete {
        #[arg(long)]
        id: String,
        #[arg(long, default_value_t = 0)]
        version: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::new(cli.base_url).with_timeout(Duration::from_secs(cli.timeout));
    let client = Client::from_config(&config)?;
    let accounts = client.accounts();

    // Ctrl-C aborts the in-flight request.
    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    match cli.command {
        Commands::Create {
            id,
            organisation_id,
            country,
            base_currency,
            bank_id,
            bank_id_code,
            bic,
            name,
        } => {
            let mut attributes = AccountAttributes::new(country);
            attributes.base_currency = base_currency;
            attributes.bank_id = bank_id;
            attributes.bank_id_code = bank_id_code;
            attributes.bic = bic;
            attributes.name = name;
            let created = accounts
                .create(&Account::new(id, organisation_id, attributes), &cancel)
                .await?;
            print_json(&created)?;
        }
        Commands::Fetch { id } => {
            let account = accounts.fetch(&id, &cancel).await?;
            print_json(&account)?;
        }
        Commands::List { page, size } => {
            let page_accounts = accounts.list(page, size, &cancel).await?;
            println!("{} accounts on page {}", page_accounts.len(), page);
            for account in &page_accounts {
                println!(
                    "{} | v{} | {}",
                    account.id, account.version, account.attributes.country
                );
            }
        }
        Commands::Delete { id, version } => {
            accounts.delete(&id, version, &cancel).await?;
            println!("Deleted account {} at version {}", id, version);
        }
    }

    Ok(())
}

fn print_json(account: &Account) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(account)?);
    Ok(())
}
