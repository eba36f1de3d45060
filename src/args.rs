//! These structs provide the CLI interface for the daybook CLI.

use crate::filter::{CategoryFilter, DateFilter};
use crate::model::{Amount, RecurringFrequency, TransactionType};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// daybook: A personal organizer for the command line.
///
/// Keeps a month calendar of date-keyed events and a ledger of income and expense transactions.
/// Recurring transactions are also placed on the calendar. Everything is stored locally as JSON
/// files under the daybook home directory.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the daybook home directory and its configuration file.
    ///
    /// By default the home directory is $HOME/daybook. Pass --home or set DAYBOOK_HOME to put it
    /// somewhere else.
    Init,
    /// Add, list or remove calendar events.
    Event(EventArgs),
    /// Add, update, delete or list transactions.
    Transaction(TransactionArgs),
    /// Show income, expense and balance totals and the expense breakdown by category.
    Summary,
    /// Show a month of the calendar. Defaults to the current month.
    Month(MonthArgs),
    /// List the categories offered for income and expense transactions.
    Categories(CategoriesArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where daybook data and configuration is held. Defaults to ~/daybook
    #[arg(long, env = "DAYBOOK_HOME", default_value_t = default_daybook_home())]
    home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf) -> Self {
        Self {
            log_level,
            home: home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// Args for the `daybook event` command.
#[derive(Debug, ClapArgs, Clone)]
pub struct EventArgs {
    #[command(subcommand)]
    action: EventSubcommand,
}

impl EventArgs {
    pub fn new(action: EventSubcommand) -> Self {
        Self { action }
    }

    pub fn action(&self) -> &EventSubcommand {
        &self.action
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum EventSubcommand {
    /// Add an event to a date.
    Add(EventAddArgs),
    /// List the events of one date, or of every date.
    List(EventListArgs),
    /// Remove an event from a date by its id.
    Remove(EventRemoveArgs),
}

/// Args for `daybook event add`.
#[derive(Debug, Parser, Clone)]
pub struct EventAddArgs {
    /// The date of the event, YYYY-MM-DD
    date: String,

    /// The title of the event
    title: String,

    /// A free-form time, e.g. 09:30
    #[arg(long)]
    time: Option<String>,

    #[arg(long)]
    description: Option<String>,
}

impl EventAddArgs {
    pub fn new(
        date: impl Into<String>,
        title: impl Into<String>,
        time: Option<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            date: date.into(),
            title: title.into(),
            time,
            description,
        }
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn time(&self) -> Option<&str> {
        self.time.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Args for `daybook event list`.
#[derive(Debug, Parser, Clone, Default)]
pub struct EventListArgs {
    /// Only list this date, YYYY-MM-DD
    #[arg(long)]
    date: Option<String>,
}

impl EventListArgs {
    pub fn new(date: Option<String>) -> Self {
        Self { date }
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }
}

/// Args for `daybook event remove`.
#[derive(Debug, Parser, Clone)]
pub struct EventRemoveArgs {
    /// The date the event is on, YYYY-MM-DD
    date: String,

    /// The id of the event
    id: String,
}

impl EventRemoveArgs {
    pub fn new(date: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            id: id.into(),
        }
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Args for the `daybook transaction` command.
#[derive(Debug, ClapArgs, Clone)]
pub struct TransactionArgs {
    #[command(subcommand)]
    action: TransactionSubcommand,
}

impl TransactionArgs {
    pub fn new(action: TransactionSubcommand) -> Self {
        Self { action }
    }

    pub fn action(&self) -> &TransactionSubcommand {
        &self.action
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum TransactionSubcommand {
    /// Add a transaction. Recurring transactions are also added to the calendar.
    Add(TransactionAddArgs),
    /// Change fields of an existing transaction. The calendar is not updated.
    Update(TransactionUpdateArgs),
    /// Delete a transaction and its calendar event. Requires --yes.
    Delete(TransactionDeleteArgs),
    /// List transactions, newest first.
    List(TransactionListArgs),
}

/// Args for `daybook transaction add`.
#[derive(Debug, Parser, Clone)]
pub struct TransactionAddArgs {
    /// income or expense
    r#type: TransactionType,

    /// A positive amount, e.g. 42.50 or $1,000
    amount: Amount,

    /// The category, e.g. food or salary
    #[arg(long, default_value = crate::model::category::DEFAULT_CATEGORY)]
    category: String,

    /// The date, YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    date: Option<String>,

    #[arg(long)]
    description: Option<String>,

    /// Mark as recurring with this frequency: weekly, monthly or yearly
    #[arg(long)]
    recurring: Option<RecurringFrequency>,
}

impl TransactionAddArgs {
    pub fn new(r#type: TransactionType, amount: Amount, category: impl Into<String>) -> Self {
        Self {
            r#type,
            amount,
            category: category.into(),
            date: None,
            description: None,
            recurring: None,
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_recurring(mut self, frequency: RecurringFrequency) -> Self {
        self.recurring = Some(frequency);
        self
    }

    pub fn r#type(&self) -> TransactionType {
        self.r#type
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn recurring(&self) -> Option<RecurringFrequency> {
        self.recurring
    }
}

/// Args for `daybook transaction update`. Only the given fields change.
#[derive(Debug, Parser, Clone, Default)]
pub struct TransactionUpdateArgs {
    /// The id of the transaction
    id: u64,

    #[arg(long)]
    r#type: Option<TransactionType>,

    #[arg(long)]
    amount: Option<Amount>,

    #[arg(long)]
    category: Option<String>,

    #[arg(long)]
    date: Option<String>,

    /// The new description. An empty string clears it.
    #[arg(long)]
    description: Option<String>,

    /// Mark as recurring with this frequency
    #[arg(long, conflicts_with = "not_recurring")]
    recurring: Option<RecurringFrequency>,

    /// Clear the recurring flag
    #[arg(long)]
    not_recurring: bool,
}

impl TransactionUpdateArgs {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn with_amount(mut self, amount: Amount) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_recurring(mut self, frequency: RecurringFrequency) -> Self {
        self.recurring = Some(frequency);
        self
    }

    pub fn with_not_recurring(mut self) -> Self {
        self.not_recurring = true;
        self
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn r#type(&self) -> Option<TransactionType> {
        self.r#type
    }

    pub fn amount(&self) -> Option<Amount> {
        self.amount
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn recurring(&self) -> Option<RecurringFrequency> {
        self.recurring
    }

    pub fn not_recurring(&self) -> bool {
        self.not_recurring
    }
}

/// Args for `daybook transaction delete`.
#[derive(Debug, Parser, Clone)]
pub struct TransactionDeleteArgs {
    /// The id of the transaction
    id: u64,

    /// Confirm the deletion
    #[arg(long)]
    yes: bool,
}

impl TransactionDeleteArgs {
    pub fn new(id: u64, yes: bool) -> Self {
        Self { id, yes }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn yes(&self) -> bool {
        self.yes
    }
}

/// Args for `daybook transaction list`.
#[derive(Debug, Parser, Clone, Default)]
pub struct TransactionListArgs {
    /// today, week, month, year or all
    #[arg(long, default_value_t = DateFilter::All)]
    date: DateFilter,

    /// all, income, expense or a category
    #[arg(long, default_value_t = CategoryFilter::All)]
    category: CategoryFilter,

    /// Text to look for in the description, category and amount
    #[arg(long, default_value = "")]
    search: String,
}

impl TransactionListArgs {
    pub fn new(date: DateFilter, category: CategoryFilter, search: impl Into<String>) -> Self {
        Self {
            date,
            category,
            search: search.into(),
        }
    }

    pub fn date(&self) -> DateFilter {
        self.date
    }

    pub fn category(&self) -> &CategoryFilter {
        &self.category
    }

    pub fn search(&self) -> &str {
        &self.search
    }
}

/// Args for `daybook month`.
#[derive(Debug, Parser, Clone, Default)]
pub struct MonthArgs {
    /// Defaults to the current year
    #[arg(long)]
    year: Option<i32>,

    /// 1 to 12, defaults to the current month
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,

    /// Months to move from that month, e.g. -1 for the one before
    #[arg(
        long,
        default_value_t = 0,
        allow_negative_numbers = true,
        value_parser = clap::value_parser!(i32).range(-12000..=12000)
    )]
    offset: i32,
}

impl MonthArgs {
    pub fn new(year: Option<i32>, month: Option<u32>) -> Self {
        Self {
            year,
            month,
            offset: 0,
        }
    }

    pub fn with_offset(mut self, offset: i32) -> Self {
        self.offset = offset;
        self
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn month(&self) -> Option<u32> {
        self.month
    }
}

/// Args for `daybook categories`.
#[derive(Debug, Parser, Clone, Default)]
pub struct CategoriesArgs {
    /// Only list the categories of income or expense transactions
    #[arg(long)]
    r#type: Option<TransactionType>,
}

impl CategoriesArgs {
    pub fn new(r#type: Option<TransactionType>) -> Self {
        Self { r#type }
    }

    pub fn r#type(&self) -> Option<TransactionType> {
        self.r#type
    }
}

fn default_daybook_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("daybook"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or DAYBOOK_HOME instead of relying on the default \
                daybook home directory.",
            );
            PathBuf::from("daybook")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
