//! Wire types for the indexer and fee service responses.

use {super::*, serde_with::serde_as};

/// Envelope wrapping every indexer response. A `code` of zero means
/// success, `-1` means the address was rejected.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Response<T> {
  pub code: i64,
  #[serde(default)]
  pub msg: String,
  pub data: Option<T>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
  #[serde(default)]
  pub total: usize,
  #[serde(default = "Vec::new")]
  pub utxo: Vec<T>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardinalUtxo {
  pub txid: Txid,
  pub vout: u32,
  pub satoshi: u64,
  pub script_pk: ScriptBuf,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunicUtxo {
  pub txid: Txid,
  pub vout: u32,
  pub satoshi: u64,
  pub script_pk: ScriptBuf,
  pub runes: Vec<RuneBalance>,
}

#[serde_as]
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct RuneBalance {
  pub runeid: RuneId,
  #[serde_as(as = "serde_with::DisplayFromStr")]
  pub amount: u128,
  pub divisibility: u8,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedFees {
  pub fastest_fee: FeeRate,
}
