use clap::Parser;
use dialoguer::{Input, Select};
use show_browser::render::render_view;
use show_browser::view::{Cards, Notice};
use show_browser::{
    BrowserConfig, BrowserError, DEFAULT_BASE_URL, EpisodeSelection, Request, SessionHandle,
    ShowId, View, ViewMode, snapshot, start_session,
};
use std::io;
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Browse TV shows and their episodes from the TVmaze catalog
#[derive(Parser, Debug)]
#[command(name = "show-browser", version, about)]
struct Cli {
    /// Root of the show catalog API
    #[arg(long, env = "SHOW_BROWSER_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 15)]
    timeout: u64,

    /// Quiet period in milliseconds before search input is applied
    #[arg(long, default_value_t = 220)]
    debounce_ms: u64,

    /// Print the episodes of this show id and exit
    #[arg(long)]
    show: Option<ShowId>,

    /// Print the list filtered by this term and exit
    #[arg(long)]
    search: Option<String>,
}

impl Cli {
    fn config(&self) -> BrowserConfig {
        BrowserConfig {
            api_url: self.api_url.clone(),
            timeout: Duration::from_secs(self.timeout),
            debounce: Duration::from_millis(self.debounce_ms),
        }
    }

    fn is_one_shot(&self) -> bool {
        self.show.is_some() || self.search.is_some()
    }
}

/// Actions offered by the interactive prompt
#[derive(Debug, Clone, Copy, PartialEq)]
enum Action {
    OpenListedShow,
    OpenAnyShow,
    PickEpisode,
    Search,
    ClearSearch,
    Retry,
    Back,
    Quit,
}

impl Action {
    fn label(self) -> &'static str {
        match self {
            Action::OpenListedShow => "Open a listed show",
            Action::OpenAnyShow => "Choose from all shows",
            Action::PickEpisode => "Pick an episode",
            Action::Search => "Search",
            Action::ClearSearch => "Clear search",
            Action::Retry => "Retry",
            Action::Back => "Back to shows",
            Action::Quit => "Quit",
        }
    }
}

/// Sets up file-based logging; the terminal belongs to the prompts
///
/// Falls back to stderr when no data directory is available. The returned
/// guard must be kept alive for buffered lines to be written.
fn setup_logging() -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("show_browser=info"));

    match log_dir().filter(|dir| std::fs::create_dir_all(dir).is_ok()) {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "show-browser.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(io::stderr))
                .init();
            None
        }
    }
}

fn log_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "show-browser").map(|d| d.data_dir().to_path_buf())
}

/// Available actions for a view, in menu order
fn actions_for(view: &View) -> Vec<Action> {
    let mut actions = Vec::new();
    let failed = matches!(view.notice, Some(Notice::Error(_)));

    match view.mode {
        ViewMode::Shows => {
            if !view.cards.is_empty() {
                actions.push(Action::OpenListedShow);
            }
            if view.show_options.len() > 1 {
                actions.push(Action::OpenAnyShow);
            }
        }
        ViewMode::Episodes { .. } => {
            if view
                .episode_options
                .as_ref()
                .is_some_and(|options| options.len() > 1)
            {
                actions.push(Action::PickEpisode);
            }
        }
    }

    if !failed {
        actions.push(Action::Search);
    }
    if view.clear_search_visible {
        actions.push(Action::ClearSearch);
    }
    if failed {
        actions.push(Action::Retry);
    }
    if view.back_visible {
        actions.push(Action::Back);
        actions.push(Action::OpenAnyShow);
    }
    actions.push(Action::Quit);
    actions
}

/// Asks for the next action and turns it into a session request
///
/// Returns None when the user wants to quit.
fn prompt_request(view: &View) -> dialoguer::Result<Option<Request>> {
    let actions = actions_for(view);
    let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();

    let Some(index) = Select::new()
        .with_prompt(view.title.as_str())
        .items(&labels)
        .default(0)
        .interact_opt()?
    else {
        return Ok(None);
    };

    let request = match actions[index] {
        Action::OpenListedShow => {
            let Cards::Shows(cards) = &view.cards else {
                return Ok(Some(Request::LoadShows));
            };
            let titles: Vec<&str> = cards.iter().map(|c| c.title.as_str()).collect();
            Select::new()
                .with_prompt("Show")
                .items(&titles)
                .default(0)
                .interact_opt()?
                .map(|i| Request::ShowSelected(cards[i].show_id))
        }
        Action::OpenAnyShow => {
            let shows = &view.show_options[1..];
            let names: Vec<&str> = shows.iter().map(|o| o.label.as_str()).collect();
            Select::new()
                .with_prompt("Show")
                .items(&names)
                .default(0)
                .interact_opt()?
                .and_then(|i| shows[i].value)
                .map(Request::ShowSelected)
        }
        Action::PickEpisode => {
            let options = view.episode_options.as_deref().unwrap_or_default();
            let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
            Select::new()
                .with_prompt("Episode")
                .items(&labels)
                .default(0)
                .interact_opt()?
                .map(|i| {
                    let selection = match options[i].value {
                        Some(id) => EpisodeSelection::Episode(id),
                        None => EpisodeSelection::All,
                    };
                    Request::DropdownChanged(selection)
                })
        }
        Action::Search => {
            let term: String = Input::new()
                .with_prompt("Search")
                .with_initial_text(view.search_term.clone())
                .allow_empty(true)
                .interact_text()?;
            Some(Request::SearchChanged(term))
        }
        Action::ClearSearch => Some(Request::SearchChanged(String::new())),
        Action::Retry => match &view.mode {
            ViewMode::Shows => Some(Request::LoadShows),
            ViewMode::Episodes { show_id, .. } => Some(Request::ShowSelected(*show_id)),
        },
        Action::Back => Some(Request::BackRequested),
        Action::Quit => return Ok(None),
    };

    // A cancelled sub-menu redraws; LoadShows only re-renders once loaded
    Ok(Some(request.unwrap_or(Request::LoadShows)))
}

/// Prints views until one is no longer loading and returns it
fn wait_for_view(views: &mut mpsc::UnboundedReceiver<View>) -> Option<View> {
    loop {
        let view = views.blocking_recv()?;
        println!("\n{}", render_view(&view));
        if !view.is_loading() {
            return Some(view);
        }
    }
}

/// Runs the interactive prompt loop on a blocking thread
fn prompt_loop(
    requests: mpsc::Sender<Request>,
    mut views: mpsc::UnboundedReceiver<View>,
) -> Result<(), BrowserError> {
    let mut request = Request::LoadShows;

    loop {
        if requests.blocking_send(request).is_err() {
            debug!("Session closed");
            return Ok(());
        }

        let Some(view) = wait_for_view(&mut views) else {
            debug!("View channel closed");
            return Ok(());
        };

        match prompt_request(&view).map_err(io::Error::from)? {
            Some(next) => request = next,
            None => {
                info!("Closing browser");
                return Ok(());
            }
        }
    }
}

async fn run_interactive(config: &BrowserConfig) -> Result<(), BrowserError> {
    let SessionHandle {
        requests,
        views,
        task,
    } = start_session(config)?;

    let prompts = tokio::task::spawn_blocking(move || prompt_loop(requests, views));
    let result = prompts.await.map_err(io::Error::other)?;

    // Dropping the request sender inside the prompt loop ends the session
    if let Err(e) = task.await {
        error!(error = %e, "Session task failed");
    }

    result
}

async fn run_one_shot(cli: &Cli) -> Result<(), BrowserError> {
    let view = snapshot(&cli.config(), cli.show, cli.search.as_deref(), |view: &View| {
        debug!(title = %view.title, loading = view.is_loading(), "Rendered view");
    })
    .await?;

    print!("{}", render_view(&view));
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let _log_guard = setup_logging();

    info!(api_url = %cli.api_url, "Starting show-browser");

    let result = if cli.is_one_shot() {
        run_one_shot(&cli).await
    } else {
        run_interactive(&cli.config()).await
    };

    if let Err(e) = result {
        error!(error = %e, "show-browser failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
