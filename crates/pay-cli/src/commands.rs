//! # Command Handlers
//!
//! One async function per subcommand. Errors bubble up as `anyhow`
//! wrapping a `PaymentError` so `main` can pick the exit code.

use crate::cli::{Command, LoginArgs, PayArgs, RegisterArgs};
use crate::context::AppContext;
use crate::output;
use pay_core::workflow::settle;
use pay_core::{
    clear_session, format_currency, is_authenticated, status_label, store_session, OrdersReport,
    PaymentError, PaymentHandle, PaymentRequest, PollState, Purchasable, Session, SubjectType,
};
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

pub async fn run(ctx: &AppContext, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Register(args) => register(ctx, args).await,
        Command::Login(args) => login(ctx, args).await,
        Command::Logout => logout(ctx),
        Command::Whoami => whoami(ctx),
        Command::Pay(args) => pay(ctx, args).await,
        Command::Status { handle } => status(ctx, &handle).await,
        Command::Orders { mine } => orders(ctx, mine).await,
        Command::Tickets { mine } => tickets(ctx, mine).await,
        Command::Artworks => artworks(ctx).await,
        Command::Exhibitions => exhibitions(ctx).await,
    }
}

#[instrument(skip(ctx, args), fields(email = %args.email))]
async fn register(ctx: &AppContext, args: RegisterArgs) -> anyhow::Result<()> {
    let session = ctx
        .auth()
        .register(&args.name, &args.email, &args.password, &args.phone)
        .await?;

    store_session(&ctx.store, &session.credential, &session.identity)?;
    println!("Welcome to AfriArt, {}", display_name(&session));
    Ok(())
}

#[instrument(skip(ctx, args), fields(email = %args.email, admin = args.admin))]
async fn login(ctx: &AppContext, args: LoginArgs) -> anyhow::Result<()> {
    let auth = ctx.auth();
    let session = if args.admin {
        auth.login_admin(&args.email, &args.password).await?
    } else {
        auth.login(&args.email, &args.password).await?
    };

    store_session(&ctx.store, &session.credential, &session.identity)?;

    println!(
        "Logged in as {}{}",
        display_name(&session),
        if session.identity.is_admin { " (staff)" } else { "" }
    );
    Ok(())
}

fn display_name(session: &Session) -> &str {
    if session.identity.name.is_empty() {
        session.identity.user_id.as_str()
    } else {
        session.identity.name.as_str()
    }
}

fn logout(ctx: &AppContext) -> anyhow::Result<()> {
    if !is_authenticated(&ctx.store) {
        println!("Not logged in");
        return Ok(());
    }
    clear_session(&ctx.store)?;
    println!("Logged out");
    Ok(())
}

fn whoami(ctx: &AppContext) -> anyhow::Result<()> {
    let session = ctx.session()?;
    println!(
        "{} (user {}){}",
        session.identity.name,
        session.identity.user_id,
        if session.identity.is_admin { ", staff" } else { "" }
    );
    Ok(())
}

#[instrument(skip(ctx, args))]
async fn pay(ctx: &AppContext, args: PayArgs) -> anyhow::Result<()> {
    let session = ctx.session()?;
    let (subject_type, subject_id) = args.subject();

    let amount = match args.amount {
        Some(amount) => amount,
        None => listed_price(ctx, subject_type, subject_id).await?,
    };

    let request = PaymentRequest::new(
        &args.phone,
        amount,
        subject_type,
        subject_id,
        session.identity.user_id.as_str(),
    )?;

    println!(
        "📱 Sending M-Pesa prompt to {} for {} ({})",
        request.payer_contact(),
        format_currency(amount),
        request.account_reference()
    );

    let workflow = ctx.workflow();
    let poll = workflow
        .checkout(&request, &session.credential, |update| {
            println!("{}", output::poll_update_line(update))
        })
        .await?;

    println!("   Enter your M-Pesa PIN on your phone to approve (Ctrl-C stops waiting)");

    let handle = poll.handle().clone();
    info!(session_id = %poll.id(), handle = %handle, "Waiting for payer approval");

    let mut states = poll.subscribe();
    tokio::select! {
        _ = states.wait_for(PollState::is_terminal) => {}
        _ = tokio::signal::ctrl_c() => {
            if poll.is_active() {
                warn!(handle = %handle, "Interrupted, cancelling confirmation");
                poll.cancel();
            }
        }
    }
    let state = poll.wait().await;

    let receipt = settle(
        state,
        handle,
        request.account_reference(),
        workflow.poll_config(),
    )?;

    info!(handle = %receipt.handle, "Checkout confirmed");
    println!(
        "🎉 {} paid. M-Pesa reference: {}",
        receipt.account_reference, receipt.handle
    );
    Ok(())
}

/// Price from the catalog when `--amount` is omitted
async fn listed_price(
    ctx: &AppContext,
    subject_type: SubjectType,
    subject_id: &str,
) -> anyhow::Result<Decimal> {
    let catalog = ctx.catalog();
    match subject_type {
        SubjectType::Artwork => {
            let artwork = catalog.artwork(subject_id).await?;
            if !artwork.is_available() {
                return Err(PaymentError::ValidationFailed(format!(
                    "\"{}\" has already been sold",
                    artwork.title
                ))
                .into());
            }
            Ok(artwork.unit_price())
        }
        SubjectType::Exhibition => {
            let exhibition = catalog.exhibition(subject_id).await?;
            if !exhibition.is_bookable() {
                return Err(PaymentError::ValidationFailed(format!(
                    "\"{}\" has no slots left",
                    exhibition.title
                ))
                .into());
            }
            Ok(exhibition.unit_price())
        }
    }
}

async fn status(ctx: &AppContext, handle: &str) -> anyhow::Result<()> {
    let handle = PaymentHandle::new(handle);
    let status = ctx.gateway().status(&handle).await?;
    println!("{}: {}", handle, status_label(status.as_str()));
    Ok(())
}

async fn orders(ctx: &AppContext, mine: bool) -> anyhow::Result<()> {
    let session = ctx.session()?;
    let staff_view = session.identity.is_admin && !mine;

    let orders = if staff_view {
        ctx.orders().all_orders(&session.credential).await?
    } else {
        ctx.orders()
            .user_orders(&session.identity.user_id, &session.credential)
            .await?
    };

    if orders.is_empty() {
        println!("No orders found.");
        return Ok(());
    }

    println!("{}", output::order_header());
    for order in &orders {
        println!("{}", output::order_row(order));
    }

    if staff_view {
        println!();
        for line in output::report_lines(&OrdersReport::from_orders(&orders)) {
            println!("{}", line);
        }
    }
    Ok(())
}

async fn tickets(ctx: &AppContext, mine: bool) -> anyhow::Result<()> {
    let session = ctx.session()?;
    let tickets = if session.identity.is_admin && !mine {
        ctx.tickets().all_tickets(&session.credential).await?
    } else {
        ctx.tickets()
            .user_tickets(&session.identity.user_id, &session.credential)
            .await?
    };

    if tickets.is_empty() {
        println!("No tickets found.");
        return Ok(());
    }

    println!("{}", output::ticket_header());
    for ticket in &tickets {
        println!("{}", output::ticket_row(ticket));
    }
    Ok(())
}

async fn artworks(ctx: &AppContext) -> anyhow::Result<()> {
    let artworks = ctx.catalog().artworks().await?;
    if artworks.is_empty() {
        println!("No artworks listed.");
    }
    for artwork in &artworks {
        println!("{}", output::artwork_row(artwork));
    }
    Ok(())
}

async fn exhibitions(ctx: &AppContext) -> anyhow::Result<()> {
    let exhibitions = ctx.catalog().exhibitions().await?;
    if exhibitions.is_empty() {
        println!("No exhibitions listed.");
    }
    for exhibition in &exhibitions {
        println!("{}", output::exhibition_row(exhibition));
    }
    Ok(())
}
