//! # flowlog
//!
//! Command-line access to a FlowLog board: list boards, print one, or move
//! a list or card the same way a drag-and-drop would.
//!
//! ```bash
//! FLOWLOG_TOKEN=flowlog-temp-token-1 flowlog move-list 3 0 2
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use flowlog_core::{
    domain::{filter_lists, CardFilter, LabelId, UserId},
    BoardId, BoardSession, ClientConfig, HttpBoardApi, ListId, PersistOutcome, SessionToken,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "flowlog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the FlowLog API
    #[arg(long, env = "FLOWLOG_API_URL")]
    api_url: Option<String>,

    /// Bearer token to forward
    #[arg(long, env = "FLOWLOG_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Use the guest token
    #[arg(long, conflicts_with = "token")]
    guest: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List boards owned by the current user
    Boards,

    /// Print a board's lists and cards
    Show {
        board: BoardId,
        /// Only cards whose title contains this text
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        label: Option<LabelId>,
        #[arg(long)]
        member: Option<UserId>,
    },

    /// Move the list at FROM to position TO
    MoveList {
        board: BoardId,
        from: usize,
        to: usize,
    },

    /// Move a card between positions, possibly across lists
    MoveCard {
        board: BoardId,
        source_list: ListId,
        source_index: usize,
        dest_list: ListId,
        dest_index: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flowlog_core=info,flowlog=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.api_url {
        Some(url) => ClientConfig::new(url.clone())?,
        None => ClientConfig::from_env()?,
    };
    if cli.guest {
        config = config.with_token(SessionToken::guest());
    } else if let Some(token) = &cli.token {
        config = config.with_token(SessionToken::new(token.clone()));
    }

    let api = Arc::new(HttpBoardApi::new(config)?);

    match cli.command {
        Commands::Boards => {
            let boards = api.list_boards().await.context("failed to list boards")?;
            if boards.is_empty() {
                println!("No boards.");
            }
            for board in boards {
                println!("{:>5}  {}", board.id, board.title);
            }
        }
        Commands::Show {
            board,
            search,
            label,
            member,
        } => {
            let session = BoardSession::load(api, board)
                .await
                .with_context(|| format!("failed to load board {}", board))?;
            let mut filter = CardFilter::default().with_query(search.unwrap_or_default());
            filter.label = label;
            filter.member = member;
            print_board(&session, &filter);
        }
        Commands::MoveList { board, from, to } => {
            let mut session = BoardSession::load(api, board)
                .await
                .with_context(|| format!("failed to load board {}", board))?;
            let handle = session.move_list(from, to)?;
            print_board(&session, &CardFilter::default());
            if let Some(handle) = handle {
                report(handle.outcome().await);
            }
        }
        Commands::MoveCard {
            board,
            source_list,
            source_index,
            dest_list,
            dest_index,
        } => {
            let mut session = BoardSession::load(api, board)
                .await
                .with_context(|| format!("failed to load board {}", board))?;
            let handle = session.move_card(source_list, source_index, dest_list, dest_index)?;
            print_board(&session, &CardFilter::default());
            if let Some(handle) = handle {
                report(handle.outcome().await);
            }
        }
    }

    Ok(())
}

fn print_board(session: &BoardSession, filter: &CardFilter) {
    let board = session.board();
    println!("{} [{}]", board.title, board.background.render_value());
    for list in filter_lists(board, filter) {
        println!("  {}. {} ({})", list.order, list.title, list.id);
        for card in &list.cards {
            let (done, total) = card.checklist_progress();
            let progress = if total > 0 {
                format!(" [{}/{}]", done, total)
            } else {
                String::new()
            };
            println!("     {}. {} ({}){}", card.order, card.title, card.id, progress);
        }
    }
}

fn report(outcome: PersistOutcome) {
    match outcome {
        PersistOutcome::Confirmed => println!("Saved."),
        PersistOutcome::FailedSilently => {
            eprintln!("Not saved; the server still has the previous order.")
        }
    }
}
