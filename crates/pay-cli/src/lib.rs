//! # pay-cli
//!
//! Terminal front end for AfriArt checkouts.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `register --name --email --password [--phone]` | Create an account and sign in |
//! | `login --email --password [--admin]` | Sign in and store the session |
//! | `logout` / `whoami` | Forget / show the stored session |
//! | `pay --artwork ID \| --exhibition ID --phone MSISDN [--amount KES]` | STK push, then wait for confirmation |
//! | `status HANDLE` | Query one payment |
//! | `orders [--mine]` | Order listing (staff see every order and a summary) |
//! | `tickets [--mine]` | Exhibition tickets (staff see every ticket) |
//! | `artworks` / `exhibitions` | Catalog listings |

pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod output;

pub use cli::Cli;
pub use config::CliConfig;
pub use context::AppContext;
