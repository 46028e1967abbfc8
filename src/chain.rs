use {super::*, clap::ValueEnum};

#[derive(Default, ValueEnum, Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Chain {
  #[default]
  #[value(alias("main"))]
  Mainnet,
  #[value(alias("test"))]
  Testnet,
  Signet,
  Regtest,
}

impl Chain {
  pub fn network(self) -> bitcoin::Network {
    match self {
      Self::Mainnet => bitcoin::Network::Bitcoin,
      Self::Testnet => bitcoin::Network::Testnet,
      Self::Signet => bitcoin::Network::Signet,
      Self::Regtest => bitcoin::Network::Regtest,
    }
  }

  pub(crate) fn default_indexer_url(self) -> Option<&'static str> {
    match self {
      Self::Mainnet => Some("https://open-api.unisat.io"),
      Self::Testnet => Some("https://open-api-testnet.unisat.io"),
      Self::Signet => Some("https://open-api-signet.unisat.io"),
      Self::Regtest => None,
    }
  }

  pub(crate) fn default_fee_url(self) -> Option<&'static str> {
    match self {
      Self::Mainnet => Some("https://mempool.space/api"),
      Self::Testnet => Some("https://mempool.space/testnet/api"),
      Self::Signet => Some("https://mempool.space/signet/api"),
      Self::Regtest => None,
    }
  }

  pub fn address_from_str(self, address: &str) -> Result<Address, SplitError> {
    address
      .parse::<Address<NetworkUnchecked>>()
      .ok()
      .and_then(|address| address.require_network(self.network()).ok())
      .ok_or_else(|| SplitError::InvalidAddress {
        address: address.into(),
      })
  }
}

impl Display for Chain {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(
      f,
      "{}",
      match self {
        Self::Mainnet => "mainnet",
        Self::Regtest => "regtest",
        Self::Signet => "signet",
        Self::Testnet => "testnet",
      }
    )
  }
}

impl FromStr for Chain {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "mainnet" | "main" => Ok(Self::Mainnet),
      "regtest" => Ok(Self::Regtest),
      "signet" => Ok(Self::Signet),
      "testnet" | "test" => Ok(Self::Testnet),
      _ => Err(anyhow!("invalid chain `{s}`")),
    }
  }
}
