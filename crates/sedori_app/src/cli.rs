use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sedori_engine::dto::MonitorStatus;

#[derive(Debug, Parser)]
#[command(name = "sedori")]
#[command(author, version)]
#[command(
    about = "Research toolkit for Amazon to Yahoo! Auctions arbitrage",
    long_about = "Annotates saved Amazon category, product and Yahoo! Auctions pages with \
                  auction search results, and drives the research backend's monitor, pricing, \
                  template, notification and scheduler endpoints."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (RON)
    #[arg(long, global = true, value_name = "FILE", env = "SEDORI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Backend API base URL, overriding the configuration file
    #[arg(long, global = true, value_name = "URL", env = "SEDORI_API_BASE")]
    pub api_base: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write logs to ./sedori.log
    #[arg(long, global = true)]
    pub log_file: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Annotate a saved category or search-result page
    Scan {
        /// Saved HTML page
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Address the page was saved from
        #[arg(long)]
        url: Option<String>,

        /// HTML fragments appended to the page one after another, like infinite scroll
        #[arg(long, value_name = "FILE")]
        append: Vec<PathBuf>,

        /// Pause between appended fragments, in milliseconds
        #[arg(long, default_value_t = 0)]
        append_interval_ms: u64,

        #[command(flatten)]
        output: PageOutputArgs,
    },

    /// Annotate a saved Amazon product page
    Product {
        /// Saved HTML page
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Address the page was saved from; the ASIN is read from it when present
        #[arg(long)]
        url: Option<String>,

        #[command(flatten)]
        output: PageOutputArgs,
    },

    /// Add the monitor link to a saved Yahoo! Auctions item page
    Auction {
        /// Saved HTML page
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Auction page address, e.g. https://page.auctions.yahoo.co.jp/jp/auction/x123
        #[arg(long)]
        url: String,

        #[command(flatten)]
        output: PageOutputArgs,
    },

    /// Search Yahoo! Auctions through the backend
    Search {
        keyword: String,
    },

    /// Closed-auction price history for a keyword
    History {
        keyword: String,

        /// Number of closed auctions to fetch
        #[arg(long, default_value_t = 20)]
        count: u32,
    },

    /// Detail of one auction
    Detail {
        auction_id: String,
    },

    /// Monitored auctions
    #[command(subcommand)]
    Monitor(MonitorCommand),

    /// Profit and price calculations
    #[command(subcommand)]
    Pricing(PricingCommand),

    /// Amazon product data
    #[command(subcommand)]
    Amazon(AmazonCommand),

    /// Listing description templates
    #[command(subcommand)]
    Templates(TemplateCommand),

    /// Backend notifications
    #[command(subcommand)]
    Notifications(NotificationCommand),

    /// Background price-check scheduler
    #[command(subcommand)]
    Scheduler(SchedulerCommand),
}

#[derive(Debug, Clone, Args)]
pub struct PageOutputArgs {
    /// Directory for the annotated page and scan report
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// File stem for the outputs; defaults to the input file stem
    #[arg(long)]
    pub stem: Option<String>,

    /// Route searches through the fetch relay instead of the typed client
    #[arg(long)]
    pub relay: bool,
}

#[derive(Debug, Subcommand)]
pub enum MonitorCommand {
    /// Start monitoring an auction for a product
    Add {
        #[arg(long)]
        asin: String,
        #[arg(long)]
        product_title: String,
        #[arg(long)]
        auction_id: String,
        #[arg(long)]
        auction_title: String,
        #[arg(long)]
        current_price: Option<i64>,
        #[arg(long)]
        buy_now_price: Option<i64>,
        #[arg(long)]
        image_url: Option<String>,
        #[arg(long)]
        url: Option<String>,
    },
    /// List monitors by status
    List {
        /// active or ended
        #[arg(long, default_value = "active")]
        status: MonitorStatus,
    },
    /// Show one monitor
    Show { id: i64 },
    /// Stop monitoring
    Remove { id: i64 },
}

#[derive(Debug, Clone, Args)]
pub struct CostArgs {
    /// Amazon category used to pick the fee rate
    #[arg(long)]
    pub category: Option<String>,
    /// Explicit fee rate, e.g. 0.1
    #[arg(long)]
    pub fee_rate: Option<f64>,
    #[arg(long)]
    pub shipping_cost: Option<i64>,
    #[arg(long)]
    pub other_cost: Option<i64>,
}

#[derive(Debug, Subcommand)]
pub enum PricingCommand {
    /// Profit for a selling price and expected winning price
    Calculate {
        #[arg(long)]
        selling_price: i64,
        #[arg(long)]
        winning_price: i64,
        #[command(flatten)]
        costs: CostArgs,
    },
    /// Selling price that reaches a target profit rate
    Suggest {
        #[arg(long)]
        winning_price: i64,
        /// Target profit rate in percent
        #[arg(long)]
        target_profit_rate: Option<f64>,
        #[command(flatten)]
        costs: CostArgs,
    },
    /// Expected winning price from closed-auction prices
    Estimate {
        /// Closed-auction prices
        #[arg(long = "price", value_name = "YEN")]
        prices: Vec<i64>,
        #[arg(long)]
        buy_now_price: Option<i64>,
    },
}

#[derive(Debug, Subcommand)]
pub enum AmazonCommand {
    /// Fetch product data
    Product { asin: String },
    /// Fetch and store product data
    Save { asin: String },
    /// Competing offers
    Competitors { asin: String },
}

#[derive(Debug, Subcommand)]
pub enum TemplateCommand {
    List,
    Show {
        id: i64,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        body: String,
    },
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        body: Option<String>,
    },
    Delete {
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum NotificationCommand {
    /// List recent notifications
    List {
        #[arg(long, default_value_t = 20)]
        limit: u32,
        #[arg(long)]
        unread: bool,
    },
    /// Mark one notification as read
    Read { id: i64 },
    /// Mark every notification as read
    ReadAll,
    /// Number of unread notifications
    Unread,
    /// Poll the unread count and print notifications as they arrive
    Poll {
        #[arg(long, default_value_t = 30)]
        interval_secs: u64,
        /// Stop after this many polls
        #[arg(long)]
        polls: Option<u64>,
    },
}

#[derive(Debug, Subcommand)]
pub enum SchedulerCommand {
    Status,
    Start,
    Stop,
    /// Run one price check immediately
    RunNow,
}
