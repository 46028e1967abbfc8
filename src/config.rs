use super::*;

#[derive(Deserialize, Default, PartialEq, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
  pub(crate) chain: Option<Chain>,
  pub(crate) indexer_url: Option<String>,
  pub(crate) indexer_token: Option<String>,
  pub(crate) cardinal_page_size: Option<u32>,
  pub(crate) runic_page_size: Option<u32>,
  pub(crate) fee_url: Option<String>,
  pub(crate) fallback_fee_rate: Option<FeeRate>,
  pub(crate) fee_rate_floor: Option<FeeRate>,
  pub(crate) fee_divisor: Option<f64>,
  pub(crate) witness_stub_size: Option<usize>,
  pub(crate) padding_outputs: Option<usize>,
  pub(crate) postage: Option<u64>,
  pub(crate) min_funding_value: Option<u64>,
  pub(crate) request_timeout: Option<u64>,
}

impl Config {
  pub(crate) fn load(options: &Options) -> SnafuResult<Self> {
    let path = match &options.config {
      Some(path) => path.clone(),
      None => match &options.config_dir {
        Some(dir) if dir.join("rune-split.yaml").exists() => dir.join("rune-split.yaml"),
        Some(_) | None => return Ok(Self::default()),
      },
    };

    let file = File::open(&path).snafu_context(error::Io { path: path.clone() })?;

    serde_yaml::from_reader(file).snafu_context(error::ConfigParse { path })
  }
}
