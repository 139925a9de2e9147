use console::style;
use std::fmt;
use storyline_core::StorylineError;

/// Error shown to the user with suggestions
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
            help_command: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Create error for a missing story server URL
pub fn api_url_missing() -> CliError {
    CliError::new("No story server configured")
        .with_context("The story server base URL is not set.")
        .with_suggestion("Pass it on the command line: storyline --api-url https://stories.example.com list")
        .with_suggestion("Or set STORYLINE_API_URL")
        .with_suggestion("Or add to storyline.toml:\n  api_url = \"https://stories.example.com\"")
        .with_help("Run: storyline config")
}

/// Create error for a catalog that could not be fetched
pub fn catalog_unavailable(error: &StorylineError) -> CliError {
    CliError::new("Cannot load the story list")
        .with_context(format!("The story server did not return a catalog.\n\nError: {}", error))
        .with_suggestion("Check that the server is reachable")
        .with_suggestion("Check the configured URL: storyline config")
        .with_help("Run with RUST_LOG=debug for request details")
}

/// Create error for an unknown story id
pub fn story_not_found(id: &str, known: &[String]) -> CliError {
    let mut error = CliError::new(format!("Story '{}' not found", id))
        .with_context("The story server has no story with this identifier.")
        .with_suggestion("List available stories: storyline list");

    if let Some(first) = known.first() {
        error = error.with_suggestion(format!("For example: storyline show {}", first));
    }
    error
}

/// Create error for a story whose detail could not be fetched
pub fn story_unavailable(error: &StorylineError) -> CliError {
    CliError::new("Cannot load the story")
        .with_context(format!("Error: {}", error))
        .with_suggestion("Try again later")
        .with_help("Run with RUST_LOG=debug for request details")
}

/// Map loader errors to user-facing errors where a better message exists
pub fn from_loader(error: StorylineError) -> anyhow::Error {
    match error {
        StorylineError::ConfigMissing { ref key } if key == "api_url" => api_url_missing().into(),
        StorylineError::CatalogFetch(_) => catalog_unavailable(&error).into(),
        StorylineError::DetailFetch { .. } => story_unavailable(&error).into(),
        other => other.into(),
    }
}
