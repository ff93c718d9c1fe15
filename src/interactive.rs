//! Interactive form: prompt for keywords and the analysis toggle, then scan.
//!
//! Each round pre-fills the previous answers so a run can be repeated with a
//! single keystroke. Ctrl-C clears the current prompt, Ctrl-D exits.

use crate::api::AskAsync;
use crate::config::{FORM_KEYWORDS, ScanConfig, SiteConfig};
use crate::fetch::Fetch;
use crate::filter::KeywordSet;
use crate::outputs::{console::FormSink, json};
use crate::pipeline::run_scan;
use crate::utils::{time_of_day, today_token};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::error::Error;
use tracing::{error, info, instrument};

const KEYWORDS_PROMPT: &str = "Keywords (comma-separated): ";
const ANALYZE_PROMPT: &str = "Analyze matches with the language model? Costs tokens. [y/N]: ";

/// Options fixed for the whole interactive session.
#[derive(Debug, Clone, Default)]
pub struct FormOptions {
    pub site: SiteConfig,
    pub link_limit: Option<usize>,
    pub date: Option<String>,
    pub json_output_dir: Option<String>,
}

/// Interpret a yes/no answer. Blank input keeps `default`.
pub fn parse_toggle(input: &str, default: bool) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "" => Some(default),
        "y" | "yes" | "on" | "true" | "1" => Some(true),
        "n" | "no" | "off" | "false" | "0" => Some(false),
        _ => None,
    }
}

fn toggle_label(on: bool) -> &'static str {
    if on { "y" } else { "n" }
}

/// Read one line with `initial` pre-filled. `Ok(None)` means the user quit.
fn ask(rl: &mut DefaultEditor, prompt: &str, initial: &str) -> Result<Option<String>, ReadlineError> {
    loop {
        match rl.readline_with_initial(prompt, (initial, "")) {
            Ok(line) => return Ok(Some(line)),
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => return Ok(None),
            Err(e) => return Err(e),
        }
    }
}

fn print_welcome() {
    println!();
    println!("ABC News Scout - interactive");
    println!("Edit the keywords, choose whether to analyze, and press Enter to run.");
    println!("Ctrl-D quits.");
    println!();
}

/// Run the interactive form until the user quits.
#[instrument(level = "info", skip_all)]
pub async fn run<F, A>(fetcher: &F, asker: &A, options: &FormOptions) -> Result<(), Box<dyn Error>>
where
    F: Fetch,
    A: AskAsync<Response = String>,
{
    let mut rl = DefaultEditor::new()?;
    let mut last_keywords = FORM_KEYWORDS.to_string();
    let mut last_analyze = false;

    print_welcome();

    loop {
        let Some(keywords_input) = ask(&mut rl, KEYWORDS_PROMPT, &last_keywords)? else {
            break;
        };
        let keywords = KeywordSet::parse(&keywords_input);
        if keywords.is_empty() {
            println!("Please enter at least one keyword.");
            continue;
        }
        last_keywords = keywords_input.trim().to_string();

        let Some(toggle_input) = ask(&mut rl, ANALYZE_PROMPT, toggle_label(last_analyze))? else {
            break;
        };
        let Some(analyze) = parse_toggle(&toggle_input, last_analyze) else {
            println!("Please answer y or n.");
            continue;
        };
        last_analyze = analyze;
        let _ = rl.add_history_entry(last_keywords.as_str());

        let date = options.date.clone().unwrap_or_else(today_token);
        let config = ScanConfig::form(&options.site, keywords, analyze).with_link_limit(options.link_limit);
        info!(keywords = %config.keywords, analyze, %date, "Starting interactive scan");

        println!("Scanning ABC News...");
        let mut sink = FormSink::stdout();
        match run_scan(fetcher, asker, &config, &date, &mut sink).await {
            Ok(report) => {
                if let Some(dir) = &options.json_output_dir {
                    match json::write_report(&report, dir, &time_of_day()).await {
                        Ok(path) => println!("Report written to {}", path.display()),
                        Err(e) => error!(error = %e, "Failed to write JSON report"),
                    }
                }
            }
            Err(e) => {
                error!(error = %e, "Interactive scan failed");
                println!("Scan failed: {e}");
            }
        }
        println!();
    }

    println!("Bye!");
    Ok(())
}
