use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use paperstock::{
    auth::{ForgotPasswordFlow, LoginOutcome},
    config::{self, ConsoleConfig},
    errors::ConsoleError,
    forms::SaveMode,
    models::{NamedMaster, PaperSearch, PaperType, RecordId},
    navigation::{PaperAction, RouteDecision, NAVBAR_LINKS},
    screens::{AssumeYes, Confirm, MasterScreen, ScreenStatus},
    Console,
};
use serde::Serialize;
use strum::IntoEnumIterator;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let context = CliContext::initialize()?;
    let confirm: Box<dyn Confirm> = if cli.yes {
        Box::new(AssumeYes)
    } else {
        Box::new(StdinConfirm)
    };
    let json = cli.json;

    match cli.command {
        Commands::Login(args) => handle_login(&context, args, json).await?,
        Commands::Logout => handle_logout(&context, json)?,
        Commands::Whoami => handle_whoami(&context, json)?,
        Commands::ForgotPassword(args) => handle_forgot_password(&context, args).await?,
        Commands::ResetPassword(args) => handle_reset_password(&context, args).await?,
        Commands::Open(args) => handle_open(&context, args, json)?,
        Commands::Dashboard => handle_dashboard(&context, json)?,
        Commands::Mills(command) => {
            let screen = context.console.mill_screen().map_err(guard_error)?;
            handle_master_command(screen, command, json, confirm.as_ref()).await?
        }
        Commands::Shades(command) => {
            let screen = context.console.shade_screen().map_err(guard_error)?;
            handle_master_command(screen, command, json, confirm.as_ref()).await?
        }
        Commands::Papers(command) => {
            handle_papers_command(&context, command, json, confirm.as_ref()).await?
        }
        Commands::Purchase(command) => handle_purchase_command(&context, command, json).await?,
        Commands::Reels(command) => handle_reels_command(&context, command, json).await?,
        Commands::Inventory(command) => handle_inventory_command(&context, command, json).await?,
    }

    Ok(())
}

#[derive(Parser)]
#[command(
    name = "paperstock",
    about = "Paper-stock console: masters, reel purchases, stock-out and inventory",
    version
)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON when available"
    )]
    json: bool,
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Answer yes to confirmation prompts"
    )]
    yes: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login(LoginArgs),
    /// Forget the stored session
    Logout,
    /// Show the stored session
    Whoami,
    /// Request a one-time password for a password reset
    ForgotPassword(ForgotPasswordArgs),
    /// Reset the password with a one-time password
    ResetPassword(ResetPasswordArgs),
    /// Resolve a console path through the route guard
    Open(OpenArgs),
    /// Show the dashboard tiles
    Dashboard,
    #[command(subcommand)]
    Mills(MasterCommands),
    #[command(subcommand)]
    Shades(MasterCommands),
    #[command(subcommand)]
    Papers(PapersCommands),
    #[command(subcommand)]
    Purchase(PurchaseCommands),
    #[command(subcommand)]
    Reels(ReelsCommands),
    #[command(subcommand)]
    Inventory(InventoryCommands),
}

#[derive(Args)]
struct LoginArgs {
    #[arg(long, help = "Operator email address")]
    email: String,
    #[arg(long, help = "Operator password")]
    password: String,
}

#[derive(Args)]
struct ForgotPasswordArgs {
    #[arg(long)]
    email: String,
}

#[derive(Args)]
struct ResetPasswordArgs {
    #[arg(long)]
    email: String,
    #[arg(long, help = "One-time password received by email")]
    otp: String,
    #[arg(long)]
    new_password: String,
}

#[derive(Args)]
struct OpenArgs {
    /// Path such as /mill-master
    path: String,
}

#[derive(Subcommand)]
enum MasterCommands {
    List {
        #[arg(long, help = "Case-insensitive name filter")]
        search: Option<String>,
    },
    /// Suggested id for the next record
    NextId,
    Add {
        #[arg(long)]
        name: String,
    },
    Update {
        #[arg(long)]
        id: RecordId,
        #[arg(long)]
        name: String,
    },
    Delete {
        #[arg(long)]
        id: RecordId,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperTypeArg {
    /// Kraft reels
    K,
    /// Sheets
    S,
}

impl From<PaperTypeArg> for PaperType {
    fn from(arg: PaperTypeArg) -> Self {
        match arg {
            PaperTypeArg::K => PaperType::Kraft,
            PaperTypeArg::S => PaperType::Sheet,
        }
    }
}

#[derive(Args)]
struct PaperFields {
    #[arg(long = "type", value_enum, default_value = "k")]
    paper_type: PaperTypeArg,
    #[arg(long)]
    reel_size: String,
    #[arg(long)]
    gsm: String,
    #[arg(long)]
    bf: String,
}

#[derive(Subcommand)]
enum PapersCommands {
    List,
    Search {
        #[arg(long)]
        term: Option<String>,
        #[arg(long)]
        reel_size: Option<u32>,
        #[arg(long)]
        gsm: Option<u32>,
        #[arg(long)]
        bf: Option<u32>,
    },
    Add(PaperFields),
    Update {
        #[arg(long)]
        id: RecordId,
        #[command(flatten)]
        fields: PaperFields,
    },
    Delete {
        #[arg(long)]
        id: RecordId,
    },
}

#[derive(Subcommand)]
enum PurchaseCommands {
    New(NewPurchaseArgs),
    History,
    /// Allocate and print a reel number
    ReelNumber,
}

#[derive(Args)]
struct NewPurchaseArgs {
    #[arg(long)]
    paper: String,
    #[arg(long)]
    mill: String,
    #[arg(long)]
    shade: String,
    #[arg(long, help = "Quantity in kg (1-2000)")]
    quantity: String,
    #[arg(long, help = "Rate per kg (at least 1)")]
    rate: String,
    #[arg(long)]
    remark: Option<String>,
    #[arg(long, help = "Purchase date (YYYY-MM-DD); defaults to today")]
    date: Option<NaiveDate>,
    #[arg(
        long,
        action = ArgAction::SetTrue,
        help = "Keep date, paper, mill, shade and rate for the next reel"
    )]
    next: bool,
}

#[derive(Subcommand)]
enum ReelsCommands {
    List {
        #[arg(long, help = "Filter on any column")]
        search: Option<String>,
    },
    Search {
        query: String,
    },
    History,
    /// Issue part of a reel to production
    Out {
        #[arg(long)]
        reel: String,
        #[arg(long)]
        quantity: String,
    },
}

#[derive(Subcommand)]
enum InventoryCommands {
    Search {
        #[arg(default_value = "")]
        query: String,
    },
    /// Read queries line by line from stdin, searching as you type
    Watch,
}

struct CliContext {
    console: Console,
}

impl CliContext {
    fn initialize() -> Result<Self> {
        let config: ConsoleConfig =
            config::load_config().context("failed to load console config")?;
        config::init_tracing(config.log_level(), config.log_json);
        debug!(api = %config.api_base_url(), "configuration loaded");

        let console = Console::new(config).context("failed to initialise console")?;
        Ok(Self { console })
    }
}

struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        eprint!("{} [y/N] ", prompt);
        let _ = io::stderr().flush();
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

fn guard_error(err: ConsoleError) -> anyhow::Error {
    match err {
        ConsoleError::NotAuthenticated => anyhow!("not logged in; run `paperstock login` first"),
        other => anyhow::Error::new(other),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_status(status: &ScreenStatus, json: bool) {
    if let Some(notification) = status.notification() {
        if json {
            eprintln!("{}", notification);
        } else {
            println!("{}", notification);
        }
    }
}

/// Reports the banner a failed screen operation left behind and passes the error on.
fn screen_error(status: &ScreenStatus, err: ConsoleError) -> anyhow::Error {
    if let Some(notification) = status.notification() {
        eprintln!("{}", notification);
    }
    anyhow::Error::new(err)
}

async fn handle_login(context: &CliContext, args: LoginArgs, json: bool) -> Result<()> {
    let outcome: LoginOutcome = context
        .console
        .auth()
        .login(&args.email, &args.password)
        .await
        .map_err(|e| {
            let message = paperstock::Notification::from_error(&e, "Login failed");
            anyhow!("{}", message)
        })?;

    if json {
        print_json(&serde_json::json!({
            "email": outcome.session.email(),
            "redirect": outcome.redirect.path(),
            "redirectAfterMs": outcome.redirect_after.as_millis() as u64,
        }))?;
        return Ok(());
    }

    println!("{}", outcome.notification);
    tokio::time::sleep(outcome.redirect_after).await;
    render_dashboard();
    Ok(())
}

fn handle_logout(context: &CliContext, json: bool) -> Result<()> {
    let next = context.console.auth().logout()?;
    if json {
        print_json(&serde_json::json!({ "redirect": next.path() }))?;
    } else {
        println!("Logged out; next stop {}", next.path());
    }
    Ok(())
}

fn handle_whoami(context: &CliContext, json: bool) -> Result<()> {
    let state = context.console.auth_state()?;
    let session = state.session();
    if json {
        print_json(&serde_json::json!({
            "authenticated": state.is_authenticated(),
            "user": session.and_then(|s| s.user.as_ref()),
        }))?;
        return Ok(());
    }
    match session {
        Some(session) => match &session.user {
            Some(user) => println!("Logged in as {} since {}", user.email, user.logged_in_at),
            None => println!("Logged in (no user details stored)"),
        },
        None => println!("Not logged in"),
    }
    Ok(())
}

async fn handle_forgot_password(context: &CliContext, args: ForgotPasswordArgs) -> Result<()> {
    let mut flow = ForgotPasswordFlow::new();
    flow.send_otp(context.console.auth(), &args.email)
        .await
        .map_err(|e| anyhow!("{}", paperstock::Notification::from_error(&e, "Failed to send OTP")))?;
    println!("OTP sent to {}; run `paperstock reset-password` to continue", args.email.trim());
    Ok(())
}

async fn handle_reset_password(context: &CliContext, args: ResetPasswordArgs) -> Result<()> {
    let mut flow = ForgotPasswordFlow::resume(args.email.trim());
    flow.reset(context.console.auth(), &args.otp, &args.new_password)
        .await
        .map_err(|e| {
            anyhow!("{}", paperstock::Notification::from_error(&e, "Failed to reset password"))
        })?;
    println!("Password reset; you can now log in");
    Ok(())
}

fn handle_open(context: &CliContext, args: OpenArgs, json: bool) -> Result<()> {
    let decision = context.console.navigate(&args.path)?;
    if json {
        return print_json(&decision);
    }
    match decision {
        RouteDecision::Render(route) => println!("{} ({})", route, route.path()),
        RouteDecision::Redirect(route) => println!("redirect -> {} ({})", route, route.path()),
    }
    Ok(())
}

fn handle_dashboard(context: &CliContext, json: bool) -> Result<()> {
    let tiles = context.console.dashboard().map_err(guard_error)?;
    if json {
        return print_json(&serde_json::json!({
            "tiles": tiles,
            "navbar": NAVBAR_LINKS,
            "paperActions": PaperAction::iter().map(|a| a.to_string()).collect::<Vec<_>>(),
        }));
    }
    render_dashboard();
    Ok(())
}

fn render_dashboard() {
    println!("Dashboard");
    for tile in paperstock::navigation::DASHBOARD_TILES.iter() {
        println!("  - {:<20} {}", tile.label, tile.route.path());
    }
    let actions: Vec<String> = PaperAction::iter().map(|a| a.to_string()).collect();
    println!("Paper raw material: {}", actions.join(" | "));
}

async fn handle_master_command<M: NamedMaster>(
    mut screen: MasterScreen<M>,
    command: MasterCommands,
    json: bool,
    confirm: &dyn Confirm,
) -> Result<()> {
    screen
        .open()
        .await
        .map_err(|e| screen_error(screen.status(), e))?;

    match command {
        MasterCommands::List { search } => {
            screen.set_search(search.unwrap_or_default());
            let visible = screen.visible();
            if json {
                return print_json(&visible);
            }
            if visible.is_empty() {
                println!("No {} records", M::LABEL.to_lowercase());
            }
            for record in &visible {
                println!("{:>5}  {}", record.id(), record.name());
            }
        }
        MasterCommands::NextId => {
            let hint = screen.form().display_id();
            if json {
                return print_json(&serde_json::json!({ "nextId": hint }));
            }
            match hint {
                Some(id) => println!("Next {} ID: {}", M::LABEL, id),
                None => println!("Next {} ID unavailable", M::LABEL),
            }
        }
        MasterCommands::Add { name } => {
            screen.form_mut().set_name(name);
            let saved = screen
                .save()
                .await
                .map_err(|e| screen_error(screen.status(), e))?;
            print_saved(&saved, screen.status(), json)?;
        }
        MasterCommands::Update { id, name } => {
            screen.edit(id).map_err(|e| screen_error(screen.status(), e))?;
            screen.form_mut().set_name(name);
            let saved = screen
                .save()
                .await
                .map_err(|e| screen_error(screen.status(), e))?;
            print_saved(&saved, screen.status(), json)?;
        }
        MasterCommands::Delete { id } => {
            match screen.delete(id, confirm).await {
                Err(ConsoleError::Cancelled) => println!("Delete cancelled"),
                Err(e) => return Err(screen_error(screen.status(), e)),
                Ok(()) => print_status(screen.status(), json),
            }
        }
    }
    Ok(())
}

fn print_saved<T: Serialize>(saved: &T, status: &ScreenStatus, json: bool) -> Result<()> {
    if json {
        print_json(saved)
    } else {
        print_status(status, json);
        Ok(())
    }
}

async fn handle_papers_command(
    context: &CliContext,
    command: PapersCommands,
    json: bool,
    confirm: &dyn Confirm,
) -> Result<()> {
    let mut screen = context.console.paper_master_screen().map_err(guard_error)?;
    screen
        .open()
        .await
        .map_err(|e| screen_error(screen.status(), e))?;

    match command {
        PapersCommands::List => render_papers(screen.visible(), json)?,
        PapersCommands::Search {
            term,
            reel_size,
            gsm,
            bf,
        } => {
            let search = PaperSearch {
                search_term: term,
                reel_size,
                gsm,
                bf,
            };
            screen
                .apply_search(search)
                .await
                .map_err(|e| screen_error(screen.status(), e))?;
            render_papers(screen.visible(), json)?;
        }
        PapersCommands::Add(fields) => {
            fill_paper_form(&mut screen, &fields);
            let saved = screen
                .save()
                .await
                .map_err(|e| screen_error(screen.status(), e))?;
            print_saved(&saved, screen.status(), json)?;
        }
        PapersCommands::Update { id, fields } => {
            screen.edit(id).map_err(|e| screen_error(screen.status(), e))?;
            fill_paper_form(&mut screen, &fields);
            let saved = screen
                .save()
                .await
                .map_err(|e| screen_error(screen.status(), e))?;
            print_saved(&saved, screen.status(), json)?;
        }
        PapersCommands::Delete { id } => match screen.delete(id, confirm).await {
            Err(ConsoleError::Cancelled) => println!("Delete cancelled"),
            Err(e) => return Err(screen_error(screen.status(), e)),
            Ok(()) => print_status(screen.status(), json),
        },
    }
    Ok(())
}

fn fill_paper_form(screen: &mut paperstock::screens::PaperMasterScreen, fields: &PaperFields) {
    let form = screen.form_mut();
    form.set_paper_type(fields.paper_type.into());
    form.set_reel_size(&fields.reel_size);
    form.set_gsm(&fields.gsm);
    form.set_bf(&fields.bf);
}

fn render_papers(papers: &[paperstock::models::PaperMaster], json: bool) -> Result<()> {
    if json {
        return print_json(papers);
    }
    if papers.is_empty() {
        println!("No paper masters");
    }
    for paper in papers {
        println!(
            "{:>5}  part #{:<5} {:?}  {}",
            paper.id,
            paper.part_number,
            paper.paper_type,
            paper.display_name()
        );
    }
    Ok(())
}

async fn handle_purchase_command(
    context: &CliContext,
    command: PurchaseCommands,
    json: bool,
) -> Result<()> {
    let mut screen = context.console.purchase_screen().map_err(guard_error)?;

    match command {
        PurchaseCommands::ReelNumber => {
            let number = context
                .console
                .services()
                .purchases()
                .generate_reel_number()
                .await
                .context("failed to generate reel number")?;
            if json {
                print_json(&serde_json::json!({ "reelNumber": number }))?;
            } else {
                println!("{}", number);
            }
        }
        PurchaseCommands::History => {
            screen
                .open()
                .await
                .map_err(|e| screen_error(screen.status(), e))?;
            if json {
                return print_json(screen.history());
            }
            for record in screen.history() {
                println!(
                    "{}  {:<8} {:<12} {:>8} kg  {:<12} {:<8} @ {:>8}  = {:>10}  {}",
                    record.date,
                    record.reel_number,
                    record.paper_name,
                    record.quantity,
                    record.mill_name,
                    record.shade,
                    record.rate_per_kg,
                    record.price,
                    record.remark.as_deref().unwrap_or("")
                );
            }
        }
        PurchaseCommands::New(args) => {
            screen
                .open()
                .await
                .map_err(|e| screen_error(screen.status(), e))?;
            let form = screen.form_mut();
            if let Some(date) = args.date {
                form.date = date;
            }
            form.paper_name = args.paper;
            form.mill_name = args.mill;
            form.shade = args.shade;
            form.remark = args.remark.unwrap_or_default();
            form.set_quantity(args.quantity);
            form.set_rate_per_kg(args.rate);

            let mode = if args.next {
                SaveMode::SaveAndNext
            } else {
                SaveMode::Save
            };
            let record = screen
                .save(mode)
                .await
                .map_err(|e| screen_error(screen.status(), e))?;
            if json {
                return print_json(&record);
            }
            print_status(screen.status(), json);
            println!(
                "{}: {} kg x {} = {}",
                record.reel_number, record.quantity, record.rate_per_kg, record.price
            );
            if args.next {
                println!("Next reel number: {}", screen.form().reel_number);
            }
        }
    }
    Ok(())
}

async fn handle_reels_command(context: &CliContext, command: ReelsCommands, json: bool) -> Result<()> {
    let mut screen = context.console.stock_out_screen().map_err(guard_error)?;
    screen
        .open()
        .await
        .map_err(|e| screen_error(screen.status(), e))?;

    match command {
        ReelsCommands::List { search } => {
            screen.set_query(search.unwrap_or_default());
            render_reels(screen.visible(), json)?;
        }
        ReelsCommands::Search { query } => {
            screen
                .search(&query)
                .await
                .map_err(|e| screen_error(screen.status(), e))?;
            render_reels(screen.visible(), json)?;
        }
        ReelsCommands::History => {
            if json {
                return print_json(screen.history());
            }
            for entry in screen.history() {
                println!(
                    "{}  {:<8} {:<12} used {:>8}  left {:>8}  {:<12} {:<8} @ {}",
                    entry.date,
                    entry.reel_number,
                    entry.paper_name,
                    entry.quantity_used,
                    entry.quantity_left,
                    entry.mill_name,
                    entry.shade,
                    entry.rate_per_kg
                );
            }
        }
        ReelsCommands::Out { reel, quantity } => {
            screen
                .select(&reel)
                .map_err(|e| screen_error(screen.status(), e))?;
            screen.form_mut().set_out_quantity(quantity);
            let entry = screen
                .submit()
                .await
                .map_err(|e| screen_error(screen.status(), e))?;
            if json {
                return print_json(&entry);
            }
            print_status(screen.status(), json);
            println!(
                "{}: used {}, left {}",
                entry.reel_number, entry.quantity_used, entry.quantity_left
            );
        }
    }
    Ok(())
}

fn render_reels(reels: Vec<&paperstock::models::Reel>, json: bool) -> Result<()> {
    if json {
        return print_json(&reels);
    }
    if reels.is_empty() {
        println!("No reels");
    }
    for reel in reels {
        println!(
            "{} {:<8} {:<12} {:>8} kg  {:<12} {:<8} @ {:>7}  {} days",
            if reel.partially_used { "*" } else { " " },
            reel.reel_number,
            reel.paper_name,
            reel.quantity,
            reel.mill_name,
            reel.shade,
            reel.rate_per_kg.round_dp(2),
            reel.days.map(|d| d.to_string()).unwrap_or_else(|| "-".into())
        );
    }
    Ok(())
}

async fn handle_inventory_command(
    context: &CliContext,
    command: InventoryCommands,
    json: bool,
) -> Result<()> {
    let mut screen = context.console.inventory_screen().map_err(guard_error)?;

    match command {
        InventoryCommands::Search { query } => {
            screen
                .search_now(&query)
                .await
                .map_err(|e| screen_error(screen.status(), e))?;
            render_reels(screen.items().iter().collect(), json)?;
        }
        InventoryCommands::Watch => {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                tokio::select! {
                    line = lines.next_line() => {
                        match line.context("failed to read stdin")? {
                            Some(query) => screen.set_query(query),
                            None => break,
                        }
                    }
                    _ = tokio::time::sleep(Duration::from_millis(50)) => {
                        if screen.poll_results() {
                            println!("-- results for {:?}", screen.query());
                            render_reels(screen.items().iter().collect(), json)?;
                        }
                        print_status(screen.status(), json);
                        screen.dismiss_notification();
                    }
                }
            }
            if let Some(result) = screen.next_result().await {
                result.map_err(|e| screen_error(screen.status(), e))?;
                println!("-- results for {:?}", screen.query());
                render_reels(screen.items().iter().collect(), json)?;
            }
        }
    }
    Ok(())
}
