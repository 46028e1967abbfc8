use super::*;

#[derive(Clone, Default, Debug, Parser)]
#[command(group(
  ArgGroup::new("chains")
    .required(false)
    .args(&["chain_argument", "signet", "regtest", "testnet"]),
))]
pub struct Options {
  #[arg(long = "chain", value_enum, help = "Use <CHAIN>. [default: mainnet]")]
  pub(crate) chain_argument: Option<Chain>,
  #[arg(long, help = "Load configuration from <CONFIG>.")]
  pub(crate) config: Option<PathBuf>,
  #[arg(long, help = "Load configuration from <CONFIG_DIR>/rune-split.yaml.")]
  pub(crate) config_dir: Option<PathBuf>,
  #[arg(
    long,
    help = "Use fee rate of <FALLBACK_FEE_RATE> sats/vB when the fee service is unavailable. [default: 120]"
  )]
  pub(crate) fallback_fee_rate: Option<FeeRate>,
  #[arg(
    long,
    help = "Divide estimated fees by <FEE_DIVISOR>. [default: 1.4]"
  )]
  pub(crate) fee_divisor: Option<f64>,
  #[arg(long, help = "Never pay less than <FEE_RATE_FLOOR> sats/vB. [default: 150]")]
  pub(crate) fee_rate_floor: Option<FeeRate>,
  #[arg(long, help = "Fetch recommended fees from <FEE_URL>. [default: mempool.space]")]
  pub(crate) fee_url: Option<String>,
  #[arg(long, short, help = "Specify output format. [default: json]")]
  pub(crate) format: Option<OutputFormat>,
  #[arg(
    long,
    help = "Authenticate to the indexer with bearer token <INDEXER_TOKEN>."
  )]
  pub(crate) indexer_token: Option<String>,
  #[arg(long, help = "Fetch outputs from indexer at <INDEXER_URL>. [default: UniSat]")]
  pub(crate) indexer_url: Option<String>,
  #[arg(
    long,
    help = "Only fund fees with outputs worth more than <AMOUNT>. [default: 10000 sat]",
    value_name = "AMOUNT"
  )]
  pub(crate) min_funding_value: Option<Amount>,
  #[arg(
    long,
    help = "Pad fee estimates with <PADDING_OUTPUTS> copies of the runestone output. [default: 2]"
  )]
  pub(crate) padding_outputs: Option<usize>,
  #[arg(
    long,
    help = "Send <AMOUNT> postage with split outputs. [default: 546 sat]",
    value_name = "AMOUNT"
  )]
  pub(crate) postage: Option<Amount>,
  #[arg(long, short, help = "Use regtest. Equivalent to `--chain regtest`.")]
  pub(crate) regtest: bool,
  #[arg(
    long,
    help = "Abort HTTP requests after <REQUEST_TIMEOUT> seconds. [default: none]"
  )]
  pub(crate) request_timeout: Option<u64>,
  #[arg(long, short, help = "Use signet. Equivalent to `--chain signet`.")]
  pub(crate) signet: bool,
  #[arg(long, short, help = "Use testnet. Equivalent to `--chain testnet`.")]
  pub(crate) testnet: bool,
  #[arg(
    long,
    help = "Assume a <WITNESS_STUB_SIZE> byte witness per input when estimating fees. [default: 126]"
  )]
  pub(crate) witness_stub_size: Option<usize>,
}
