use chrono::{Local, NaiveDate};
use clap::{CommandFactory, Parser, Subcommand};
use log::{error, info};
use std::process;
use weeklog::duration::{format_minutes, parse_duration};
use weeklog::*;

#[derive(Parser)]
#[command(name = "weeklog")]
#[command(about = "Track this week's Jira work and log time from the command line", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Show what would happen without making changes
    #[arg(short = 'n', long, global = true)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show this week's logged time per assigned issue (default command)
    Week,

    /// Log work against an issue
    Log {
        /// Issue key to log against (e.g. PROJ-123); prompts when omitted
        #[arg(long, short = 'i')]
        issue: Option<String>,

        /// Time spent in Jira notation (e.g. "2h 30m"); prompts when omitted
        #[arg(long, short = 't')]
        time: Option<String>,

        /// Date the work started (YYYY-MM-DD)
        #[arg(long, short = 'd')]
        date: Option<String>,

        /// Worklog comment
        #[arg(long, short = 'c')]
        comment: Option<String>,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Create a template configuration file
    Init,

    /// Display current configuration
    Show,

    /// Validate configuration file
    Validate,
}

fn main() {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Build context
    let ctx = models::Context {
        dry_run: cli.dry_run,
        quiet: cli.quiet,
        verbose: cli.verbose,
    };

    // Run command
    let result = match cli.command {
        Some(Commands::Week) | None => run_week(ctx),
        Some(Commands::Log {
            issue,
            time,
            date,
            comment,
            yes,
        }) => run_log(ctx, issue, time, date, comment, yes),
        Some(Commands::Config { action }) => match action {
            ConfigAction::Init => run_config_init(),
            ConfigAction::Show => run_config_show(),
            ConfigAction::Validate => run_config_validate(),
        },
        Some(Commands::Completions { shell }) => run_completions(shell),
    };

    if let Err(e) = result {
        error!("{}", e);
        process::exit(1);
    }
}

fn run_week(_ctx: models::Context) -> Result<()> {
    info!("Fetching this week's worklogs...");

    let config = Config::load()?;
    let client = JiraClient::new(config.jira)?;

    let issues = client.fetch_assigned_incomplete()?;
    let summary = week::summarize(&issues, Local::now());

    prompt::display_week_summary(&summary);

    Ok(())
}

fn run_log(
    ctx: models::Context,
    issue: Option<String>,
    time: Option<String>,
    date: Option<String>,
    comment: Option<String>,
    yes: bool,
) -> Result<()> {
    info!("Starting worklog submission...");

    // Load configuration
    let config = Config::load()?;
    let client = JiraClient::new(config.jira.clone())?;

    // A time flag means the caller is scripting us; skip the optional prompts
    let scripted = time.is_some();

    // Resolve the target issue
    let (issue_key, issue_summary) = match issue {
        Some(raw) => {
            let key = raw.trim().to_uppercase();
            if !jira::is_issue_key(&key) {
                return Err(WeeklogError::InvalidIssueKey(raw));
            }
            (key, None)
        }
        None => {
            if !ctx.quiet {
                prompt::display_info("Fetching your assigned issues...");
            }

            let issues = client.fetch_assigned_incomplete()?;

            if issues.is_empty() {
                if !ctx.quiet {
                    prompt::display_info("No assigned issues found.");
                }
                return Ok(());
            }

            let selected = if issues.len() == 1 && config.settings.auto_select_single {
                &issues[0]
            } else {
                prompt::prompt_issue_selection(&issues)?
            };

            info!("Selected issue: {} - {}", selected.key, selected.summary);
            (selected.key.clone(), Some(selected.summary.clone()))
        }
    };

    // Resolve time spent
    let minutes = match time {
        Some(raw) => {
            let minutes = parse_duration(raw.trim())?;
            if minutes == 0 {
                return Err(WeeklogError::InvalidDuration(
                    "time spent must be greater than zero".to_string(),
                ));
            }
            minutes
        }
        None => prompt::prompt_time_spent()?,
    };

    // Resolve the start date; scripted runs without --date let Jira stamp
    // the submission time
    let started = match date {
        Some(raw) => Some(
            NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map_err(|_| WeeklogError::InvalidDate(format!("{} (use YYYY-MM-DD)", raw)))?,
        ),
        None if scripted => None,
        None => Some(prompt::prompt_started_date()?),
    };

    // Resolve the comment
    let comment = match comment {
        Some(text) => Some(text),
        None if scripted => None,
        None => prompt::prompt_comment()?,
    };

    // Confirm before submitting
    if !yes {
        let confirmed = prompt::confirm_submission(
            &issue_key,
            issue_summary.as_deref(),
            minutes,
            started,
            comment.as_deref(),
        )?;

        if !confirmed {
            if !ctx.quiet {
                prompt::display_info("Worklog cancelled");
            }
            return Ok(());
        }
    }

    client.log_work(&issue_key, minutes, started, comment.as_deref(), &ctx)?;

    if !ctx.quiet {
        prompt::display_success(&format!(
            "{} of work logged for issue {}",
            format_minutes(minutes),
            issue_key
        ));
        if ctx.verbose {
            println!("  {}", client.issue_url(&issue_key));
        }
    }

    // Show the refreshed weekly total
    if !ctx.quiet && !ctx.dry_run {
        match client.fetch_assigned_incomplete() {
            Ok(issues) => {
                let summary = week::summarize(&issues, Local::now());
                println!(
                    "\nTime worked so far this week: {}",
                    format_minutes(summary.total_minutes)
                );
            }
            Err(e) => {
                prompt::display_warning(&format!("Could not refresh weekly total: {}", e))
            }
        }
    }

    Ok(())
}

fn run_config_init() -> Result<()> {
    Config::create_template()?;
    let config_path = Config::config_path()?;
    println!("✓ Configuration file created at: {}", config_path.display());
    println!("\nPlease edit the file and add your API credentials:");
    println!("  - Jira personal access token: https://id.atlassian.com/manage-profile/security/api-tokens");
    Ok(())
}

fn run_config_show() -> Result<()> {
    let config = Config::load()?;
    println!("\nCurrent Configuration");
    println!("====================\n");
    config.display();
    Ok(())
}

fn run_config_validate() -> Result<()> {
    let _config = Config::load()?;
    println!("✓ Configuration is valid");
    println!("  Config file: {}", Config::config_path()?.display());
    Ok(())
}

fn run_completions(shell: clap_complete::Shell) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
    Ok(())
}
