use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rbenefits
#[derive(Parser)]
#[command(
    name = "rbenefits",
    version = env!("CARGO_PKG_VERSION"),
    about = "Generate, book and track capacity-limited gym benefit slots (sauna, ice bath, pool) using SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Editor to use with --edit")]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the audit log")]
        print: bool,

        #[arg(long = "op", help = "Only rows of this operation (e.g. force_add)")]
        operation: Option<String>,
    },

    /// Manage benefit types (sauna, ice bath, ...)
    Benefit {
        #[command(subcommand)]
        action: BenefitAction,
    },

    /// Manage slot settings of a branch or of one benefit
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Generate, list and deactivate slots
    Slots {
        #[command(subcommand)]
        action: SlotsAction,
    },

    /// Book a member into a slot
    Book {
        #[arg(long = "slot", help = "Slot id")]
        slot: i64,

        #[arg(long = "member", help = "Member reference")]
        member: String,

        #[arg(long = "membership", help = "Membership id (default: the member's valid one)")]
        membership: Option<i64>,

        #[arg(
            long = "force",
            help = "Concierge override: ignore capacity and eligibility checks"
        )]
        force: bool,

        #[arg(long = "notes", default_value = "", help = "Free-text note")]
        notes: String,
    },

    /// Cancel a booking and free its seat
    Cancel {
        #[arg(long = "booking", help = "Booking id")]
        booking: i64,
    },

    /// Mark a booking as attended (or no-show)
    Attend {
        #[arg(long = "booking", help = "Booking id")]
        booking: i64,

        #[arg(long = "no-show", help = "Mark as no-show instead of attended")]
        no_show: bool,

        #[arg(
            long = "usage",
            conflicts_with = "no_show",
            help = "Also record a usage against the booking's membership allotment"
        )]
        usage: bool,
    },

    /// Record a benefit usage against a membership allotment
    Usage {
        #[arg(long = "membership", help = "Membership id")]
        membership: i64,

        #[arg(long = "benefit", help = "Benefit code")]
        benefit: String,

        #[arg(long = "date", help = "Usage date (YYYY-MM-DD, default today)")]
        date: Option<String>,
    },

    /// Manage memberships and their allotments
    Membership {
        #[command(subcommand)]
        action: MembershipAction,
    },

    /// List bookings of a date or of one slot
    Bookings {
        #[arg(long = "date", help = "Slot date (YYYY-MM-DD, default today)")]
        date: Option<String>,

        #[arg(long = "slot", conflicts_with = "date", help = "Slot id")]
        slot: Option<i64>,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Export bookings
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(
            long,
            value_name = "RANGE",
            help = "YYYY, YYYY-MM, YYYY-MM-DD or START:END (default: current month)"
        )]
        range: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum BenefitAction {
    /// Add a benefit type
    Add {
        #[arg(long = "code", help = "Short unique code (e.g. sauna, ice_bath)")]
        code: String,

        #[arg(long = "name", help = "Display name")]
        name: String,

        #[arg(long = "icon", default_value = "", help = "Icon shown in listings")]
        icon: String,
    },

    /// List benefit types
    List,
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Create or update settings (omitted values are kept or taken from config)
    Set {
        #[arg(long = "branch", help = "Branch id (default from config)")]
        branch: Option<String>,

        #[arg(long = "benefit", help = "Benefit code (omit for the branch default)")]
        benefit: Option<String>,

        #[arg(long = "capacity", help = "Seats per slot")]
        capacity: Option<i64>,

        #[arg(long = "slot-minutes", help = "Slot duration in minutes")]
        slot_minutes: Option<i64>,

        #[arg(long = "open", help = "Opening time (HH:MM)")]
        open: Option<String>,

        #[arg(long = "close", help = "Closing time (HH:MM)")]
        close: Option<String>,

        #[arg(long = "days", help = "Active days, e.g. all, mon-fri, mon,wed,fri")]
        days: Option<String>,
    },

    /// Show the settings of a branch
    Show {
        #[arg(long = "branch", help = "Branch id (default from config)")]
        branch: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum SlotsAction {
    /// Generate slots for one date or a date range
    Generate {
        #[arg(long = "branch", help = "Branch id (default from config)")]
        branch: Option<String>,

        #[arg(long = "benefit", help = "Benefit code")]
        benefit: String,

        #[arg(long = "date", conflicts_with_all = ["from", "to"], help = "Single date (YYYY-MM-DD)")]
        date: Option<String>,

        #[arg(long = "from", requires = "to", help = "Range start (YYYY-MM-DD)")]
        from: Option<String>,

        #[arg(long = "to", requires = "from", help = "Range end (YYYY-MM-DD)")]
        to: Option<String>,

        #[arg(
            long = "days",
            requires = "from",
            help = "Weekdays to generate in the range (default: the settings' active days)"
        )]
        days: Option<String>,
    },

    /// List slots of a date with remaining seats
    List {
        #[arg(long = "date", help = "Slot date (YYYY-MM-DD, default today)")]
        date: Option<String>,

        #[arg(long = "branch", help = "Only this branch")]
        branch: Option<String>,

        #[arg(long = "benefit", help = "Only this benefit code")]
        benefit: Option<String>,
    },

    /// Deactivate a slot (slots are never deleted)
    Deactivate {
        #[arg(long = "id", help = "Slot id")]
        id: i64,

        #[arg(long = "undo", help = "Re-activate instead")]
        undo: bool,
    },
}

#[derive(Subcommand)]
pub enum MembershipAction {
    /// Register a membership for a member
    Add {
        #[arg(long = "member", help = "Member reference")]
        member: String,

        #[arg(long = "plan", help = "Plan name")]
        plan: String,

        #[arg(long = "start", help = "Start date (YYYY-MM-DD, default today)")]
        start: Option<String>,

        #[arg(long = "end", help = "End date (YYYY-MM-DD, default open-ended)")]
        end: Option<String>,

        #[arg(long = "status", default_value = "active", help = "active, frozen, expired or cancelled")]
        status: String,
    },

    /// Change a membership status
    Status {
        #[arg(long = "id", help = "Membership id")]
        id: i64,

        #[arg(long = "status", help = "active, frozen, expired or cancelled")]
        status: String,
    },

    /// Grant a benefit allowance per period
    Allot {
        #[arg(long = "membership", help = "Membership id")]
        membership: i64,

        #[arg(long = "benefit", help = "Benefit code")]
        benefit: String,

        #[arg(long = "allowance", help = "Uses per period")]
        allowance: i64,

        #[arg(long = "period", help = "day, week, month or total (default from config)")]
        period: Option<String>,
    },

    /// List the memberships of a member
    List {
        #[arg(long = "member", help = "Member reference")]
        member: String,
    },
}
