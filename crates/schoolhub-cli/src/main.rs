use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use schoolhub_cli::admin::{self, SuperAdminInput};
use schoolhub_cli::open_store;
use schoolhub_cli::seeder::{self, SeedConfig};
use schoolhub_config::{PasswordConfig, ServerConfig};

#[derive(Parser)]
#[command(name = "schoolhub-cli")]
#[command(about = "SchoolHub CLI - Administrative tools for SchoolHub", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the super administrator account
    CreateSuperAdmin {
        /// First name
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        /// Last name
        #[arg(short = 'l', long)]
        last_name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// User ID used to log in
        #[arg(short = 'u', long)]
        user_id: Option<String>,

        /// Password (prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Report whether a super administrator exists
    CheckSuperAdmin,
    /// Seed fake schools with admins, teachers, classes and students
    Seed {
        /// Number of schools to create
        #[arg(short = 's', long, default_value = "3")]
        schools: usize,

        /// Number of teachers per school
        #[arg(long, default_value = "5")]
        teachers: usize,

        /// Number of students per school
        #[arg(long, default_value = "50")]
        students: usize,

        /// Number of classes per school
        #[arg(long, default_value = "4")]
        classes: usize,

        /// Password given to every seeded account
        #[arg(long, default_value = "password123")]
        password: String,
    },
}

fn prompt(value: Option<String>, label: &str) -> anyhow::Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Input::<String>::new()
            .with_prompt(label)
            .interact_text()
            .with_context(|| format!("Failed to read {}", label.to_lowercase())),
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("\n❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let server = ServerConfig::from_env().context("Invalid configuration")?;
    let store = open_store(&server).await?;
    let bcrypt_cost = PasswordConfig::from_env().bcrypt_cost;

    match cli.command {
        Commands::CreateSuperAdmin {
            first_name,
            last_name,
            email,
            user_id,
            password,
        } => {
            if let Some(existing) = admin::find_super_admin(store.as_ref()).await? {
                anyhow::bail!("A super admin already exists (user ID {})", existing.login_id);
            }

            let input = SuperAdminInput {
                first_name: prompt(first_name, "First name")?,
                last_name: prompt(last_name, "Last name")?,
                email: prompt(email, "Email address")?,
                login_id: prompt(user_id, "User ID")?,
                password: match password {
                    Some(p) => p,
                    None => Password::new()
                        .with_prompt("Password")
                        .with_confirmation("Confirm password", "Passwords don't match")
                        .interact()
                        .context("Failed to read password")?,
                },
            };

            let created = admin::create_super_admin(store.as_ref(), input, bcrypt_cost).await?;
            println!("\n✅ Super admin created successfully!");
            println!("   User ID: {}", created.login_id);
            println!("   Email: {}", created.email);
            println!("   Name: {}", created.full_name());
        }
        Commands::CheckSuperAdmin => match admin::find_super_admin(store.as_ref()).await? {
            Some(found) => {
                println!("✅ Super admin exists");
                println!("   User ID: {}", found.login_id);
                println!("   Email: {}", found.email);
            }
            None => {
                println!("No super admin found. Run `schoolhub-cli create-super-admin`.");
            }
        },
        Commands::Seed {
            schools,
            teachers,
            students,
            classes,
            password,
        } => {
            let config = SeedConfig {
                schools,
                teachers,
                students,
                classes,
            };
            seeder::seed(store.as_ref(), &config, &password, bcrypt_cost).await?;
        }
    }

    Ok(())
}
