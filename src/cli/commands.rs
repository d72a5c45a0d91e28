use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dp", about = concat!("dayplan v", env!("CARGO_PKG_VERSION"), " - study planner for one day at a time"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different data directory
    #[arg(short = 'D', long = "data-dir", global = true)]
    pub data_dir: Option<String>,

    /// Planner date (YYYY-MM-DD, default: today)
    #[arg(long, global = true)]
    pub date: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the day: D-day, quote, subjects, todos, timeline
    Show,
    /// Subject management
    Subject(SubjectCmd),
    /// Todo management
    Todo(TodoCmd),
    /// Timeline block management
    Block(BlockCmd),
    /// Set or clear the D-day countdown
    Dday(DdayCmd),
    /// Set the daily quote
    Quote(QuoteArgs),
    /// Show study time and D-day
    Stats,
    /// List dates that have stored data
    Dates,
}

// ---------------------------------------------------------------------------
// Subjects
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct SubjectCmd {
    #[command(subcommand)]
    pub action: SubjectAction,
}

#[derive(Subcommand)]
pub enum SubjectAction {
    /// Add a subject (color is picked from the palette)
    Add(SubjectAddArgs),
    /// Rename a subject
    Rename(SubjectRenameArgs),
    /// Delete a subject with its todos and their blocks
    Rm(SubjectRefArg),
}

#[derive(Args)]
pub struct SubjectAddArgs {
    /// Subject name
    pub name: String,
}

#[derive(Args)]
pub struct SubjectRenameArgs {
    /// Subject id, id prefix, or name
    pub subject: String,
    /// New name
    pub name: String,
}

#[derive(Args)]
pub struct SubjectRefArg {
    /// Subject id, id prefix, or name
    pub subject: String,
}

// ---------------------------------------------------------------------------
// Todos
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct TodoCmd {
    #[command(subcommand)]
    pub action: TodoAction,
}

#[derive(Subcommand)]
pub enum TodoAction {
    /// Add a todo under a subject
    Add(TodoAddArgs),
    /// Change a todo's text
    Edit(TodoEditArgs),
    /// Toggle completion
    Toggle(TodoRefArg),
    /// Delete a todo and its blocks
    Rm(TodoRefArg),
}

#[derive(Args)]
pub struct TodoAddArgs {
    /// Subject id, id prefix, or name
    pub subject: String,
    /// Todo text
    pub content: String,
}

#[derive(Args)]
pub struct TodoEditArgs {
    /// Todo id or id prefix
    pub todo: String,
    /// New text
    pub content: String,
}

#[derive(Args)]
pub struct TodoRefArg {
    /// Todo id or id prefix
    pub todo: String,
}

// ---------------------------------------------------------------------------
// Timeline blocks
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct BlockCmd {
    #[command(subcommand)]
    pub action: BlockAction,
}

#[derive(Subcommand)]
pub enum BlockAction {
    /// Place a todo on the timeline as a one-hour block
    Add(BlockAddArgs),
    /// Change a block's lanes
    Resize(BlockResizeArgs),
    /// Delete a block
    Rm(BlockRefArg),
}

#[derive(Args)]
pub struct BlockAddArgs {
    /// Todo id or id prefix
    pub todo: String,
    /// Column: plan or done
    #[arg(long, default_value = "plan")]
    pub kind: String,
    /// Hour of day the block starts (0-23)
    #[arg(long)]
    pub hour: u32,
}

#[derive(Args)]
pub struct BlockResizeArgs {
    /// Block id or id prefix
    pub block: String,
    /// First lane (0-5)
    #[arg(long)]
    pub start: u8,
    /// Number of lanes (1-6)
    #[arg(long)]
    pub span: u8,
}

#[derive(Args)]
pub struct BlockRefArg {
    /// Block id or id prefix
    pub block: String,
}

// ---------------------------------------------------------------------------
// Daily info
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct DdayCmd {
    #[command(subcommand)]
    pub action: DdayAction,
}

#[derive(Subcommand)]
pub enum DdayAction {
    /// Count down to a date
    Set(DdaySetArgs),
    /// Remove the countdown
    Clear,
}

#[derive(Args)]
pub struct DdaySetArgs {
    /// What the date is (e.g. an exam name)
    pub label: String,
    /// Target date (YYYY-MM-DD)
    pub target: String,
}

#[derive(Args)]
pub struct QuoteArgs {
    /// Quote text (empty clears it)
    pub text: String,
}
