use anyhow::{bail, Context};
use clap::Parser;
use clinic_assist::api::ApiClient;
use clinic_assist::chat::{
    split_terminal_line, terminal_command, ChatClient, GestureOutcome, SubmitGesture,
    TerminalCommand,
};
use clinic_assist::cli::{Args, ChatAction, Command};
use clinic_assist::config::{Config, JsonConfig};
use clinic_assist::models::{DoctorRegistration, PatientRegistration};
use clinic_assist::session::{open_session_store, SessionStore};
use clinic_assist::ui::{display_error, display_history, display_message, display_session};
use colored::*;
use std::io::{self, Write};
use std::process;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match Config::from_env_and_args(&args) {
        Ok(config) => config,
        Err(e) => {
            display_error(&e);
            process::exit(1);
        }
    };

    init_logging(config.verbose);

    if let Err(e) = run(args, config).await {
        display_error(&format!("{:#}", e));
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run(args: Args, config: Config) -> anyhow::Result<()> {
    let api = ApiClient::new(&config.api_base_url, config.api_timeout)?;
    let store = Arc::new(open_session_store(
        api,
        config.storage_dir.as_deref(),
        config.restore_policy,
    )?);

    match args.command {
        Command::Login { email, password } => {
            let role = store.login(&email, &password).await?;
            println!("{}", format!("Login successful ({}).", role).green());
            display_session(&store.snapshot());
        }
        Command::Logout => {
            store.logout();
            println!("{}", "Logged out.".green());
        }
        Command::Whoami => display_session(&store.snapshot()),
        Command::RegisterPatient(form) => {
            let receipt = store
                .register_patient(&PatientRegistration {
                    email: form.email,
                    password: form.password,
                    full_name: form.full_name,
                    phone: form.phone,
                    date_of_birth: form.date_of_birth,
                    gender: form.gender,
                })
                .await?;
            println!(
                "{}",
                format!("{} (user id {})", receipt.message, receipt.user_id).green()
            );
        }
        Command::RegisterDoctor(form) => {
            let receipt = store
                .register_doctor(&DoctorRegistration {
                    email: form.email,
                    password: form.password,
                    full_name: form.full_name,
                    phone: form.phone,
                    specialization: form.specialization,
                })
                .await?;
            println!(
                "{}",
                format!("{} (user id {})", receipt.message, receipt.user_id).green()
            );
        }
        Command::Chat { action } => run_chat(store, action).await?,
        Command::ConfigInit => {
            let path = JsonConfig::init_user_config()?;
            println!("{}", format!("Config written to {}", path.display()).green());
        }
    }

    Ok(())
}

async fn run_chat(store: Arc<SessionStore>, action: Option<ChatAction>) -> anyhow::Result<()> {
    if store.token().is_none() {
        bail!("Not logged in. Run `clinic login` first.");
    }
    let chat = ChatClient::new(store);

    match action {
        Some(ChatAction::History) => {
            chat.load_history().await;
            if let Some(error) = chat.error() {
                bail!(error);
            }
            display_history(&chat.messages());
        }
        Some(ChatAction::Analyze { symptoms }) => {
            let text = symptoms.join(" ");
            eprintln!("{}", "Analyzing...".dimmed());
            chat.analyze_symptoms(&text).await;
            if let Some(error) = chat.error() {
                bail!(error);
            }
            display_history(&chat.messages());
        }
        Some(ChatAction::Clear { yes }) => {
            let confirmation = chat.request_clear();
            let confirmed = yes || {
                let mut lines = BufReader::new(tokio::io::stdin()).lines();
                ask(confirmation.prompt(), &mut lines).await?
            };
            if !confirmed {
                chat.cancel_clear(confirmation);
                println!("{}", "Cancelled.".yellow());
            } else if chat.confirm_clear(confirmation).await {
                println!("{}", "Chat history cleared.".green());
            } else {
                bail!(chat.error().unwrap_or_default());
            }
        }
        None => interactive_chat(&chat).await?,
    }

    Ok(())
}

async fn interactive_chat(chat: &ChatClient) -> anyhow::Result<()> {
    println!("{}", "AI Health Assistant".bold());
    println!(
        "{}",
        "General health information only, not a substitute for professional medical advice."
            .dimmed()
    );
    println!(
        "{}",
        "Enter sends, end a line with \\ for a new line. /clear deletes history, /quit exits."
            .dimmed()
    );
    println!();

    chat.load_history().await;
    if let Some(error) = chat.error() {
        display_error(&error);
    } else {
        display_history(&chat.messages());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let composing = !chat.input().is_empty();
        let prompt = if composing { "… " } else { "> " };
        print!("{}", prompt.cyan());
        io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };

        match terminal_command(&line) {
            Some(TerminalCommand::Quit) => break,
            Some(TerminalCommand::Clear) => {
                clear_interactively(chat, &mut lines).await?;
                continue;
            }
            None => {}
        }

        let (text, gesture) = split_terminal_line(&line);
        if gesture == SubmitGesture::Submit
            && !chat.is_loading()
            && !(chat.input().trim().is_empty() && text.trim().is_empty())
        {
            eprintln!("{}", "Analyzing...".dimmed());
        }

        if chat.handle_terminal_line(&line).await == GestureOutcome::Submitted {
            match chat.error() {
                Some(error) => display_error(&error),
                None => {
                    if let Some(latest) = chat.messages().iter().max_by_key(|m| m.id) {
                        display_message(latest);
                    }
                }
            }
        }
    }

    Ok(())
}

async fn clear_interactively(
    chat: &ChatClient,
    lines: &mut Lines<BufReader<Stdin>>,
) -> anyhow::Result<()> {
    let confirmation = chat.request_clear();
    if !ask(confirmation.prompt(), lines).await? {
        chat.cancel_clear(confirmation);
        println!("{}", "Cancelled.".yellow());
        return Ok(());
    }

    if chat.confirm_clear(confirmation).await {
        println!("{}", "Chat history cleared.".green());
    } else if let Some(error) = chat.error() {
        display_error(&error);
    }
    Ok(())
}

async fn ask(prompt: &str, lines: &mut Lines<BufReader<Stdin>>) -> anyhow::Result<bool> {
    print!("{} [y/N] ", prompt.yellow());
    io::stdout().flush().context("Failed to flush stdout")?;
    let answer = lines
        .next_line()
        .await
        .context("Failed to read confirmation")?;
    Ok(answer.as_deref().map(is_yes).unwrap_or(false))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
