//! Clinic admin command line
//!
//! Drives the consultório and usuário forms and lists against the clinic
//! REST API.
//!
//! # Usage
//!
//! ```bash
//! # List consultórios
//! clinic_admin consultorios list
//!
//! # Create one (fields are masked and validated before anything is sent)
//! clinic_admin consultorios create --nome "Clínica Central" --cnpj 12345678000190 \
//!     --rua "Rua XV" --numero 100 --bairro Centro --cidade Curitiba --estado PR \
//!     --cep 80020310 --telefone 4133334444 --email contato@central.com.br
//!
//! # Usuários of consultório 3, as JSON
//! clinic_admin -o json usuarios --consultorio 3 list
//! ```

use anyhow::{anyhow, bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clinic_admin::{
    AdminConfig, ConsultorioList, ConsultorioRow, Level, Notification, Notifier, ScopeFiltering,
    SubmitOutcome, UsuarioList, UsuarioRow, ValidationErrors,
};
use clinic_client::HttpClient;
use colored::Colorize;
use serde::Serialize;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "clinic_admin")]
#[command(version)]
#[command(about = "Manage consultórios and their usuários")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: json, text, or pretty (default)
    #[arg(long, short = 'o', global = true, default_value = "pretty", value_enum)]
    format: OutputFormat,

    /// Backend base URL
    #[arg(long, global = true, env = "CLINIC_API_URL")]
    api_url: Option<String>,

    /// Where usuário listings are scoped: server or client
    #[arg(long, global = true, env = "CLINIC_USER_SCOPE")]
    user_scope: Option<String>,

    /// Suppress success notifications
    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
    Pretty,
}

#[derive(Subcommand)]
enum Commands {
    /// Consultório CRUD
    Consultorios {
        #[command(subcommand)]
        action: ConsultorioAction,
    },

    /// Usuário CRUD, scoped to one consultório
    Usuarios {
        /// Owning consultório id
        #[arg(long, global = true)]
        consultorio: Option<i64>,

        #[command(subcommand)]
        action: UsuarioAction,
    },
}

#[derive(Subcommand)]
enum ConsultorioAction {
    List,
    Create(ConsultorioFields),
    Update {
        id: i64,
        #[command(flatten)]
        fields: ConsultorioFields,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand)]
enum UsuarioAction {
    List,
    Create(UsuarioFields),
    Update {
        id: i64,
        #[command(flatten)]
        fields: UsuarioFields,
    },
    Delete {
        id: i64,
    },
}

#[derive(Args, Default)]
struct ConsultorioFields {
    #[arg(long)]
    nome: Option<String>,
    #[arg(long)]
    cnpj: Option<String>,
    #[arg(long)]
    rua: Option<String>,
    #[arg(long)]
    numero: Option<String>,
    #[arg(long)]
    complemento: Option<String>,
    #[arg(long)]
    bairro: Option<String>,
    #[arg(long)]
    cidade: Option<String>,
    #[arg(long)]
    estado: Option<String>,
    #[arg(long)]
    cep: Option<String>,
    #[arg(long)]
    telefone: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    site: Option<String>,
}

impl ConsultorioFields {
    /// Given flags, keyed by form path.
    fn assignments(&self) -> Vec<(&'static str, &str)> {
        let fields = [
            ("nome", &self.nome),
            ("cnpj", &self.cnpj),
            ("endereco.rua", &self.rua),
            ("endereco.numero", &self.numero),
            ("endereco.complemento", &self.complemento),
            ("endereco.bairro", &self.bairro),
            ("endereco.cidade", &self.cidade),
            ("endereco.estado", &self.estado),
            ("endereco.cep", &self.cep),
            ("contato.telefone", &self.telefone),
            ("contato.email", &self.email),
            ("contato.site", &self.site),
        ];
        given(fields)
    }
}

#[derive(Args, Default)]
struct UsuarioFields {
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    senha: Option<String>,
    /// ADMIN, PROFISSIONAL or PACIENTE
    #[arg(long)]
    papel: Option<String>,
    #[arg(long)]
    nome: Option<String>,
    #[arg(long)]
    cpf_cnpj: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    data_nascimento: Option<String>,
    #[arg(long)]
    pessoa_email: Option<String>,
    /// Address flags are accepted only by `update`
    #[arg(long)]
    rua: Option<String>,
    #[arg(long)]
    numero: Option<String>,
    #[arg(long)]
    complemento: Option<String>,
    #[arg(long)]
    bairro: Option<String>,
    #[arg(long)]
    cidade: Option<String>,
    #[arg(long)]
    estado: Option<String>,
    #[arg(long)]
    cep: Option<String>,
    #[arg(long)]
    telefone: Option<String>,
    #[arg(long)]
    contato_email: Option<String>,
    #[arg(long)]
    site: Option<String>,
}

impl UsuarioFields {
    fn assignments(&self) -> Vec<(&'static str, &str)> {
        let fields = [
            ("email", &self.email),
            ("senha", &self.senha),
            ("papel", &self.papel),
            ("pessoa.nome", &self.nome),
            ("pessoa.cpfCnpj", &self.cpf_cnpj),
            ("pessoa.dataNascimento", &self.data_nascimento),
            ("pessoa.email", &self.pessoa_email),
            ("pessoa.endereco.rua", &self.rua),
            ("pessoa.endereco.numero", &self.numero),
            ("pessoa.endereco.complemento", &self.complemento),
            ("pessoa.endereco.bairro", &self.bairro),
            ("pessoa.endereco.cidade", &self.cidade),
            ("pessoa.endereco.estado", &self.estado),
            ("pessoa.endereco.cep", &self.cep),
            ("pessoa.contato.telefone", &self.telefone),
            ("pessoa.contato.email", &self.contato_email),
            ("pessoa.contato.site", &self.site),
        ];
        given(fields)
    }
}

fn given<'a, const N: usize>(
    fields: [(&'static str, &'a Option<String>); N],
) -> Vec<(&'static str, &'a str)> {
    fields
        .into_iter()
        .filter_map(|(path, value)| value.as_deref().map(|v| (path, v)))
        .collect()
}

/// Prints notifications to stderr.
struct ConsoleNotifier {
    quiet: bool,
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            Level::Success if self.quiet => {}
            Level::Success => eprintln!("{} {}", "OK".green().bold(), notification),
            Level::Error => eprintln!("{} {}", "error".red().bold(), notification),
        }
    }
}

// =============================================================================
// MAIN
// =============================================================================

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clinic_admin=info,clinic_client=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let format = cli.format;

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if format == OutputFormat::Json {
                println!("{}", serde_json::json!({ "error": format!("{:#}", e) }));
            } else {
                eprintln!("{}: {:#}", "error".red().bold(), e);
            }
            ExitCode::FAILURE
        }
    }
}

struct Session {
    client: Arc<HttpClient>,
    notifier: Arc<ConsoleNotifier>,
    user_scope: ScopeFiltering,
    format: OutputFormat,
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = AdminConfig::from_env()?;
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }
    if let Some(scope) = cli.user_scope {
        config.user_scope = scope.parse()?;
    }

    let client = HttpClient::new(&config.client_config())
        .with_context(|| format!("cannot use API at {}", config.api_base_url))?;
    let ctx = Session {
        client: Arc::new(client),
        notifier: Arc::new(ConsoleNotifier { quiet: cli.quiet }),
        user_scope: config.user_scope,
        format: cli.format,
    };

    match cli.command {
        Commands::Consultorios { action } => cmd_consultorios(&ctx, action).await,
        Commands::Usuarios {
            consultorio,
            action,
        } => {
            let consultorio =
                consultorio.ok_or_else(|| anyhow!("--consultorio <ID> is required"))?;
            cmd_usuarios(&ctx, consultorio, action).await
        }
    }
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

async fn cmd_consultorios(ctx: &Session, action: ConsultorioAction) -> anyhow::Result<()> {
    let mut list = ConsultorioList::new(ctx.client.clone(), ctx.notifier.clone());
    if !list.refresh().await {
        bail!("could not load consultórios");
    }

    match action {
        ConsultorioAction::List => {
            print_consultorios(&list.table(), ctx.format)?;
        }
        ConsultorioAction::Create(fields) => {
            let form = list.open_create();
            for (path, value) in fields.assignments() {
                form.set_field(path, value)?;
            }
            let outcome = list.submit_overlay().await?;
            report(outcome, ctx.format, |c| c.id)?;
        }
        ConsultorioAction::Update { id, fields } => {
            let form = list.open_edit(id)?;
            for (path, value) in fields.assignments() {
                form.set_field(path, value)?;
            }
            let outcome = list.submit_overlay().await?;
            report(outcome, ctx.format, |c| c.id)?;
        }
        ConsultorioAction::Delete { id } => {
            if list.find(id).is_none() {
                bail!("consultório {} not found", id);
            }
            if !list.delete(id).await {
                bail!("consultório {} was not deleted", id);
            }
        }
    }
    Ok(())
}

async fn cmd_usuarios(
    ctx: &Session,
    consultorio_id: i64,
    action: UsuarioAction,
) -> anyhow::Result<()> {
    let mut consultorios = ConsultorioList::new(ctx.client.clone(), ctx.notifier.clone());
    if !consultorios.refresh().await {
        bail!("could not load consultórios");
    }
    let scope = consultorios
        .find(consultorio_id)
        .cloned()
        .ok_or_else(|| anyhow!("consultório {} not found", consultorio_id))?;

    let mut list = UsuarioList::new(
        ctx.client.clone(),
        ctx.notifier.clone(),
        scope,
        ctx.user_scope,
    );
    if !list.refresh().await {
        bail!("could not load usuários");
    }

    match action {
        UsuarioAction::List => {
            print_usuarios(&list.table(), ctx.format)?;
        }
        UsuarioAction::Create(fields) => {
            let form = list.open_create();
            for (path, value) in fields.assignments() {
                form.set_field(path, value)?;
            }
            let outcome = list.submit_overlay().await?;
            report(outcome, ctx.format, |u| u.id)?;
        }
        UsuarioAction::Update { id, fields } => {
            let form = list.open_edit(id)?;
            for (path, value) in fields.assignments() {
                form.set_field(path, value)?;
            }
            let outcome = list.submit_overlay().await?;
            report(outcome, ctx.format, |u| u.id)?;
        }
        UsuarioAction::Delete { id } => {
            if list.find(id).is_none() {
                bail!("usuário {} not found in consultório {}", id, consultorio_id);
            }
            if !list.delete(id).await {
                bail!("usuário {} was not deleted", id);
            }
        }
    }
    Ok(())
}

// =============================================================================
// OUTPUT
// =============================================================================

fn report<T: Serialize>(
    outcome: SubmitOutcome<T>,
    format: OutputFormat,
    id_of: impl Fn(&T) -> Option<i64>,
) -> anyhow::Result<()> {
    match outcome {
        SubmitOutcome::Created(record) | SubmitOutcome::Updated(record) => {
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
                OutputFormat::Text | OutputFormat::Pretty => {
                    if let Some(id) = id_of(&record) {
                        println!("id {}", id);
                    }
                }
            }
            Ok(())
        }
        SubmitOutcome::Invalid(errors) => {
            print_validation_errors(&errors, format)?;
            bail!("{} field(s) failed validation", errors.len())
        }
        SubmitOutcome::Failed(e) => Err(e.into()),
    }
}

fn print_validation_errors(errors: &ValidationErrors, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let fields: serde_json::Map<String, serde_json::Value> = errors
                .iter()
                .map(|e| (e.path.clone(), e.message.clone().into()))
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({ "invalid": fields }))?
            );
        }
        OutputFormat::Text => {
            for e in errors.iter() {
                println!("{}\t{}", e.path, e.message);
            }
        }
        OutputFormat::Pretty => {
            for e in errors.iter() {
                println!("  {} {}", e.path.yellow(), e.message);
            }
        }
    }
    Ok(())
}

fn print_consultorios(rows: &[ConsultorioRow], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(rows)?),
        OutputFormat::Text => {
            for r in rows {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    id_text(r.id),
                    r.nome,
                    r.cnpj,
                    r.cidade,
                    r.telefone
                );
            }
        }
        OutputFormat::Pretty => {
            println!(
                "{:>5}  {:<30} {:<20} {:<20} {}",
                "ID".bold(),
                "Nome".bold(),
                "CNPJ".bold(),
                "Cidade".bold(),
                "Telefone".bold()
            );
            for r in rows {
                println!(
                    "{:>5}  {:<30} {:<20} {:<20} {}",
                    id_text(r.id),
                    r.nome,
                    r.cnpj,
                    r.cidade,
                    r.telefone
                );
            }
            if rows.is_empty() {
                println!("{}", "Nenhum consultório encontrado".dimmed());
            }
        }
    }
    Ok(())
}

fn print_usuarios(rows: &[UsuarioRow], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(rows)?),
        OutputFormat::Text => {
            for r in rows {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    id_text(r.id),
                    r.nome,
                    r.email,
                    r.papel,
                    r.cpf_cnpj
                );
            }
        }
        OutputFormat::Pretty => {
            println!(
                "{:>5}  {:<30} {:<30} {:<14} {}",
                "ID".bold(),
                "Nome".bold(),
                "Email".bold(),
                "Papel".bold(),
                "CPF/CNPJ".bold()
            );
            for r in rows {
                println!(
                    "{:>5}  {:<30} {:<30} {:<14} {}",
                    id_text(r.id),
                    r.nome,
                    r.email,
                    r.papel,
                    r.cpf_cnpj
                );
            }
            if rows.is_empty() {
                println!("{}", "Nenhum usuário encontrado".dimmed());
            }
        }
    }
    Ok(())
}

fn id_text(id: Option<i64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| "-".into())
}
