use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "clinic")]
#[command(about = "Clinic appointment scheduler client with AI symptom analysis", long_about = None)]
pub struct Args {
    #[arg(
        long = "api-url",
        global = true,
        help = "Backend base URL (e.g., http://localhost:8080/api)"
    )]
    pub api_url: Option<String>,

    #[arg(short = 'v', long = "verbose", global = true, help = "Log requests and session changes")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "CLINIC_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show who is logged in
    Whoami,

    /// Register a new patient account
    RegisterPatient(PatientArgs),

    /// Register a new doctor account
    RegisterDoctor(DoctorArgs),

    /// AI symptom-analysis chat (interactive when no subcommand is given)
    Chat {
        #[command(subcommand)]
        action: Option<ChatAction>,
    },

    /// Write an example config file to the user config directory
    ConfigInit,
}

#[derive(Subcommand, Debug)]
pub enum ChatAction {
    /// Print the chat history
    History,

    /// Describe symptoms and print the updated history
    Analyze {
        #[arg(required = true, help = "Symptoms to analyze")]
        symptoms: Vec<String>,
    },

    /// Delete all chat history
    Clear {
        #[arg(short = 'y', long = "yes", help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

#[derive(ClapArgs, Debug)]
pub struct PatientArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long, env = "CLINIC_PASSWORD", hide_env_values = true)]
    pub password: String,
    #[arg(long = "full-name")]
    pub full_name: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long = "date-of-birth", help = "Date of birth (YYYY-MM-DD)")]
    pub date_of_birth: String,
    #[arg(long)]
    pub gender: Option<String>,
}

#[derive(ClapArgs, Debug)]
pub struct DoctorArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long, env = "CLINIC_PASSWORD", hide_env_values = true)]
    pub password: String,
    #[arg(long = "full-name")]
    pub full_name: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub specialization: String,
}
