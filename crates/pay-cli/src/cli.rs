//! Command-line arguments

use clap::{Args, Parser, Subcommand};
use pay_core::SubjectType;
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "afriart-pay", version, about = "Pay for AfriArt artworks and exhibitions with M-Pesa")]
pub struct Cli {
    /// Checkout config file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Session file (defaults to ~/.afriart/session.json)
    #[arg(long, global = true, env = "AFRIART_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    /// Override AFRIART_API_URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Debug logging (RUST_LOG still wins)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a customer account and store its session
    Register(RegisterArgs),
    /// Sign in and store the session
    Login(LoginArgs),
    /// Forget the stored session
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Pay for an artwork or an exhibition ticket
    Pay(PayArgs),
    /// Query a payment once by its checkout request id
    Status { handle: String },
    /// List orders (all orders for staff, your own otherwise)
    Orders {
        /// Only my orders, even when signed in as staff
        #[arg(long)]
        mine: bool,
    },
    /// List exhibition tickets (all tickets for staff, your own otherwise)
    Tickets {
        /// Only my tickets, even when signed in as staff
        #[arg(long)]
        mine: bool,
    },
    /// List artworks
    Artworks,
    /// List exhibitions
    Exhibitions,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long, env = "AFRIART_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Contact phone number
    #[arg(long, default_value = "")]
    pub phone: String,
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long, env = "AFRIART_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Gallery staff login
    #[arg(long)]
    pub admin: bool,
}

#[derive(Debug, Args)]
pub struct PayArgs {
    /// Artwork id
    #[arg(long, required_unless_present = "exhibition", conflicts_with = "exhibition")]
    pub artwork: Option<String>,

    /// Exhibition id
    #[arg(long)]
    pub exhibition: Option<String>,

    /// Amount in KES (defaults to the listed price)
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// M-Pesa phone number (07..., 7... or 2547...)
    #[arg(long)]
    pub phone: String,
}

impl PayArgs {
    pub fn subject(&self) -> (SubjectType, &str) {
        match (&self.artwork, &self.exhibition) {
            (Some(id), _) => (SubjectType::Artwork, id.as_str()),
            (None, Some(id)) => (SubjectType::Exhibition, id.as_str()),
            // rejected by clap before we get here
            (None, None) => (SubjectType::Artwork, ""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_pay() {
        let cli = Cli::try_parse_from([
            "afriart-pay", "pay", "--artwork", "42", "--amount", "1500.50", "--phone", "0712345678",
        ])
        .unwrap();

        match cli.command {
            Command::Pay(args) => {
                assert_eq!(args.subject(), (SubjectType::Artwork, "42"));
                assert_eq!(args.amount, Some(dec!(1500.50)));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_pay_needs_exactly_one_subject() {
        assert!(Cli::try_parse_from(["afriart-pay", "pay", "--phone", "0712345678"]).is_err());
        assert!(Cli::try_parse_from([
            "afriart-pay", "pay", "--artwork", "1", "--exhibition", "2", "--phone", "0712345678",
        ])
        .is_err());
    }

    #[test]
    fn test_parse_register_and_tickets() {
        let cli = Cli::try_parse_from([
            "afriart-pay", "register", "--name", "Achieng", "--email", "a@example.com",
            "--password", "pw",
        ])
        .unwrap();
        match cli.command {
            Command::Register(args) => {
                assert_eq!(args.name, "Achieng");
                assert_eq!(args.phone, "");
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = Cli::try_parse_from(["afriart-pay", "tickets"]).unwrap();
        assert!(matches!(cli.command, Command::Tickets { mine: false }));
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["afriart-pay", "orders", "--mine", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Orders { mine: true }));
    }
}
