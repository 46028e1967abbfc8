use {super::*, std::collections::BTreeMap};

const DEFAULT_CARDINAL_PAGE_SIZE: u32 = 5000;
const DEFAULT_RUNIC_PAGE_SIZE: u32 = 500;

/// Fully resolved configuration.
///
/// Each value is taken from, in order: its command-line flag, the
/// `RUNE_SPLIT_<KEY>` environment variable, the YAML config file, and finally
/// its default.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
  chain: Chain,
  indexer_url: Url,
  indexer_token: Option<String>,
  cardinal_page_size: u32,
  runic_page_size: u32,
  fee_url: Url,
  fallback_fee_rate: FeeRate,
  fee_rate_floor: FeeRate,
  sizing: Sizing,
  postage: Amount,
  min_funding_value: Amount,
  request_timeout: Option<Duration>,
}

impl Settings {
  /// `env` holds `RUNE_SPLIT_`-prefixed environment variables with the
  /// prefix stripped.
  pub fn load(options: Options, env: BTreeMap<String, String>) -> SnafuResult<Self> {
    let config = Config::load(&options)?;
    Ok(Self::merge(options, &env, config)?)
  }

  fn merge(options: Options, env: &BTreeMap<String, String>, config: Config) -> Result<Self> {
    let chain = setting(
      env,
      options
        .signet
        .then_some(Chain::Signet)
        .or(options.regtest.then_some(Chain::Regtest))
        .or(options.testnet.then_some(Chain::Testnet))
        .or(options.chain_argument),
      "CHAIN",
      config.chain,
    )?
    .unwrap_or_default();

    let indexer_url = setting(
      env,
      options.indexer_url,
      "INDEXER_URL",
      config.indexer_url,
    )?
    .or(chain.default_indexer_url().map(str::to_string))
    .with_context(|| format!("no indexer URL configured for {chain}, use `--indexer-url`"))?;

    let fee_url = setting(env, options.fee_url, "FEE_URL", config.fee_url)?
      .or(chain.default_fee_url().map(str::to_string))
      .with_context(|| format!("no fee URL configured for {chain}, use `--fee-url`"))?;

    let default_sizing = Sizing::default();

    let sizing = Sizing {
      witness_stub_size: setting(
        env,
        options.witness_stub_size,
        "WITNESS_STUB_SIZE",
        config.witness_stub_size,
      )?
      .unwrap_or(default_sizing.witness_stub_size),
      padding_outputs: setting(
        env,
        options.padding_outputs,
        "PADDING_OUTPUTS",
        config.padding_outputs,
      )?
      .unwrap_or(default_sizing.padding_outputs),
      fee_divisor: setting(env, options.fee_divisor, "FEE_DIVISOR", config.fee_divisor)?
        .unwrap_or(default_sizing.fee_divisor),
    };

    ensure!(
      sizing.fee_divisor.is_finite() && sizing.fee_divisor > 0.0,
      "fee divisor must be a positive number: {}",
      sizing.fee_divisor,
    );

    let cardinal_page_size = setting(
      env,
      None,
      "CARDINAL_PAGE_SIZE",
      config.cardinal_page_size,
    )?
    .unwrap_or(DEFAULT_CARDINAL_PAGE_SIZE);

    let runic_page_size = setting(env, None, "RUNIC_PAGE_SIZE", config.runic_page_size)?
      .unwrap_or(DEFAULT_RUNIC_PAGE_SIZE);

    ensure!(
      cardinal_page_size > 0 && runic_page_size > 0,
      "indexer page sizes must be greater than zero",
    );

    Ok(Self {
      chain,
      indexer_url: indexer_url
        .parse()
        .with_context(|| format!("invalid indexer URL `{indexer_url}`"))?,
      indexer_token: setting(
        env,
        options.indexer_token,
        "INDEXER_TOKEN",
        config.indexer_token,
      )?,
      cardinal_page_size,
      runic_page_size,
      fee_url: fee_url
        .parse()
        .with_context(|| format!("invalid fee URL `{fee_url}`"))?,
      fallback_fee_rate: setting(
        env,
        options.fallback_fee_rate,
        "FALLBACK_FEE_RATE",
        config.fallback_fee_rate,
      )?
      .unwrap_or(FeeOracle::FALLBACK_FEE_RATE),
      fee_rate_floor: setting(
        env,
        options.fee_rate_floor,
        "FEE_RATE_FLOOR",
        config.fee_rate_floor,
      )?
      .unwrap_or(FeeOracle::FEE_RATE_FLOOR),
      sizing,
      postage: setting(
        env,
        options.postage,
        "POSTAGE",
        config.postage.map(Amount::from_sat),
      )?
      .unwrap_or(TARGET_POSTAGE),
      min_funding_value: setting(
        env,
        options.min_funding_value,
        "MIN_FUNDING_VALUE",
        config.min_funding_value.map(Amount::from_sat),
      )?
      .unwrap_or(Splitter::MIN_FUNDING_VALUE),
      request_timeout: setting(
        env,
        options.request_timeout,
        "REQUEST_TIMEOUT",
        config.request_timeout,
      )?
      .map(Duration::from_secs),
    })
  }

  pub fn chain(&self) -> Chain {
    self.chain
  }

  pub fn indexer_url(&self) -> &Url {
    &self.indexer_url
  }

  pub fn fee_url(&self) -> &Url {
    &self.fee_url
  }

  pub fn fee_rate_floor(&self) -> FeeRate {
    self.fee_rate_floor
  }

  pub fn indexer(&self) -> Result<Indexer> {
    Indexer::new(
      self.indexer_url.clone(),
      self.indexer_token.as_deref(),
      self.request_timeout,
    )
    .map(|indexer| {
      indexer
        .cardinal_page_size(self.cardinal_page_size)
        .runic_page_size(self.runic_page_size)
    })
  }

  pub fn fee_oracle(&self) -> Result<FeeOracle> {
    FeeOracle::new(
      self.fee_url.clone(),
      self.fallback_fee_rate,
      self.request_timeout,
    )
  }

  pub fn splitter(&self) -> Splitter {
    Splitter {
      fee_rate_floor: self.fee_rate_floor,
      sizing: self.sizing,
      postage: self.postage,
      min_funding_value: self.min_funding_value,
    }
  }
}

fn setting<T>(
  env: &BTreeMap<String, String>,
  arg_value: Option<T>,
  env_key: &str,
  config_value: Option<T>,
) -> Result<Option<T>>
where
  T: FromStr,
  T::Err: Into<Error>,
{
  if let Some(arg_value) = arg_value {
    return Ok(Some(arg_value));
  }

  if let Some(env_value) = env.get(env_key) {
    return match env_value.parse::<T>() {
      Ok(value) => Ok(Some(value)),
      Err(err) => {
        Err(Into::<Error>::into(err).context(format!("failed to parse RUNE_SPLIT_{env_key}")))
      }
    };
  }

  Ok(config_value)
}
