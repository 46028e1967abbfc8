use {super::*, serde::de::DeserializeOwned};

/// An unspent output holding plain bitcoin.
#[derive(Debug, Clone, PartialEq)]
pub struct Utxo {
  pub outpoint: OutPoint,
  pub value: Amount,
  pub script_pubkey: ScriptBuf,
}

impl Utxo {
  pub(crate) fn tx_out(&self) -> TxOut {
    TxOut {
      value: self.value,
      script_pubkey: self.script_pubkey.clone(),
    }
  }
}

/// An unspent output holding a balance of a single rune.
#[derive(Debug, Clone, PartialEq)]
pub struct RunicUtxo {
  pub utxo: Utxo,
  pub amount: u128,
  pub divisibility: u8,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunicBalance {
  pub utxos: Vec<RunicUtxo>,
  pub total: u128,
  pub divisibility: u8,
}

/// Client for a UniSat-compatible indexer API.
#[derive(Debug, Clone)]
pub struct Indexer {
  cardinal_page_size: u32,
  client: reqwest::blocking::Client,
  runic_page_size: u32,
  url: Url,
}

impl Indexer {
  pub fn new(url: Url, token: Option<&str>, timeout: Option<Duration>) -> Result<Self> {
    ensure!(!url.cannot_be_a_base(), "invalid indexer URL `{url}`");

    let mut headers = HeaderMap::new();
    headers.insert(
      reqwest::header::ACCEPT,
      reqwest::header::HeaderValue::from_static("application/json"),
    );

    if let Some(token) = token {
      headers.insert(
        reqwest::header::AUTHORIZATION,
        reqwest::header::HeaderValue::from_str(&format!("Bearer {token}"))
          .context("invalid indexer token")?,
      );
    } else {
      log::warn!("No indexer token configured, requests to {url} are unauthenticated");
    }

    Ok(Self {
      cardinal_page_size: 5000,
      client: reqwest::blocking::ClientBuilder::new()
        .timeout(timeout)
        .default_headers(headers)
        .build()?,
      runic_page_size: 500,
      url,
    })
  }

  pub fn cardinal_page_size(self, cardinal_page_size: u32) -> Self {
    Self {
      cardinal_page_size,
      ..self
    }
  }

  pub fn runic_page_size(self, runic_page_size: u32) -> Self {
    Self {
      runic_page_size,
      ..self
    }
  }

  pub fn cardinal_utxos(&self, address: &Address) -> Result<Vec<Utxo>, SplitError> {
    let address = address.to_string();

    let utxos = self.paginate::<api::CardinalUtxo>(
      &["v1", "indexer", "address", &address, "utxo-data"],
      &address,
      ("cursor", "size"),
      self.cardinal_page_size,
    )?;

    log::info!("Fetched {} cardinal outputs for {address}", utxos.len());

    Ok(
      utxos
        .into_iter()
        .map(|utxo| Utxo {
          outpoint: OutPoint {
            txid: utxo.txid,
            vout: utxo.vout,
          },
          value: Amount::from_sat(utxo.satoshi),
          script_pubkey: utxo.script_pk,
        })
        .collect(),
    )
  }

  pub fn runic_utxos(
    &self,
    address: &Address,
    rune_id: RuneId,
  ) -> Result<RunicBalance, SplitError> {
    let address = address.to_string();
    let rune = rune_id.to_string();

    let utxos = self.paginate::<api::RunicUtxo>(
      &["v1", "indexer", "address", &address, "runes", &rune, "utxo"],
      &address,
      ("start", "limit"),
      self.runic_page_size,
    )?;

    let mut balance = RunicBalance::default();

    for utxo in utxos {
      let outpoint = OutPoint {
        txid: utxo.txid,
        vout: utxo.vout,
      };

      let Some(rune_balance) = utxo.runes.iter().find(|balance| balance.runeid == rune_id) else {
        return error::IndexerDecode {
          url: self.url.as_str(),
          reason: format!("output {outpoint} does not hold rune {rune_id}"),
        }
        .fail();
      };

      if balance.utxos.is_empty() {
        balance.divisibility = rune_balance.divisibility;
      }

      balance.total = balance
        .total
        .checked_add(rune_balance.amount)
        .ok_or_else(|| {
          error::IndexerDecode {
            url: self.url.as_str(),
            reason: format!("rune {rune_id} balance overflows"),
          }
          .build()
        })?;

      balance.utxos.push(RunicUtxo {
        utxo: Utxo {
          outpoint,
          value: Amount::from_sat(utxo.satoshi),
          script_pubkey: utxo.script_pk,
        },
        amount: rune_balance.amount,
        divisibility: rune_balance.divisibility,
      });
    }

    log::info!(
      "Fetched {} runic outputs for {address} holding {} of rune {rune_id}",
      balance.utxos.len(),
      balance.total,
    );

    Ok(balance)
  }

  /// Requests pages until one comes back empty or the reported total has
  /// been fetched.
  fn paginate<T: DeserializeOwned>(
    &self,
    segments: &[&str],
    address: &str,
    (offset_key, limit_key): (&str, &str),
    limit: u32,
  ) -> Result<Vec<T>, SplitError> {
    let mut url = self.url.clone();

    if let Ok(mut path) = url.path_segments_mut() {
      path.pop_if_empty().extend(segments);
    }

    let mut items = Vec::new();

    loop {
      let offset = items.len();

      log::debug!("GET {url} {offset_key}={offset} {limit_key}={limit}");

      let page = self.get::<T>(
        &url,
        address,
        &[(offset_key, offset.to_string()), (limit_key, limit.to_string())],
      )?;

      if page.utxo.is_empty() {
        break;
      }

      items.extend(page.utxo);

      if items.len() >= page.total {
        break;
      }
    }

    Ok(items)
  }

  fn get<T: DeserializeOwned>(
    &self,
    url: &Url,
    address: &str,
    query: &[(&str, String)],
  ) -> Result<api::Page<T>, SplitError> {
    let body = self
      .client
      .get(url.clone())
      .query(query)
      .send()
      .and_then(|response| response.error_for_status())
      .and_then(|response| response.text())
      .snafu_context(error::IndexerRequest { url: url.as_str() })?;

    let response = serde_json::from_str::<api::Response<api::Page<T>>>(&body).map_err(|err| {
      error::IndexerDecode {
        url: url.as_str(),
        reason: err.to_string(),
      }
      .build()
    })?;

    match response.code {
      0 => {}
      -1 => return error::InvalidAddress { address }.fail(),
      code => {
        return error::IndexerResponse {
          code,
          message: response.msg,
        }
        .fail()
      }
    }

    response.data.ok_or_else(|| {
      error::IndexerDecode {
        url: url.as_str(),
        reason: "response has no data",
      }
      .build()
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn indexer(handle: &mockindexer::Handle) -> Indexer {
    Indexer::new(handle.url().parse().unwrap(), Some("foo"), None).unwrap()
  }

  #[test]
  fn cardinal_utxos() {
    let address = address();

    let handle = mockindexer::builder()
      .cardinal(outpoint(1), 20_000, address.script_pubkey())
      .cardinal(outpoint(2), 546, address.script_pubkey())
      .build();

    pretty_assert_eq!(
      indexer(&handle).cardinal_utxos(&address).unwrap(),
      [
        Utxo {
          outpoint: outpoint(1),
          value: Amount::from_sat(20_000),
          script_pubkey: address.script_pubkey(),
        },
        Utxo {
          outpoint: outpoint(2),
          value: Amount::from_sat(546),
          script_pubkey: address.script_pubkey(),
        },
      ]
    );

    let requests = handle.requests();

    assert_eq!(requests.len(), 1);
    assert_eq!(
      requests[0].path,
      format!("/v1/indexer/address/{address}/utxo-data")
    );
    assert_eq!(requests[0].query, "cursor=0&size=5000");
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer foo"));
  }

  #[test]
  fn cardinal_utxos_are_paginated() {
    let address = address();

    let handle = mockindexer::builder()
      .cardinal(outpoint(1), 20_000, address.script_pubkey())
      .cardinal(outpoint(2), 30_000, address.script_pubkey())
      .cardinal(outpoint(3), 40_000, address.script_pubkey())
      .build();

    let utxos = indexer(&handle)
      .cardinal_page_size(2)
      .cardinal_utxos(&address)
      .unwrap();

    assert_eq!(
      utxos.iter().map(|utxo| utxo.outpoint).collect::<Vec<_>>(),
      [outpoint(1), outpoint(2), outpoint(3)]
    );

    assert_eq!(
      handle
        .requests()
        .into_iter()
        .map(|request| request.query)
        .collect::<Vec<String>>(),
      ["cursor=0&size=2", "cursor=2&size=2"]
    );
  }

  #[test]
  fn runic_utxos_accumulate_balance() {
    let address = address();
    let rune_id = RuneId { block: 1, tx: 1 };

    let handle = mockindexer::builder()
      .runic(outpoint(1), 546, address.script_pubkey(), "1:1", 1000, 2)
      .runic(outpoint(2), 546, address.script_pubkey(), "1:1", 500, 2)
      .runic(outpoint(3), 546, address.script_pubkey(), "2:1", 700, 0)
      .runic(outpoint(4), 546, address.script_pubkey(), "1:1", 250, 2)
      .build();

    let balance = indexer(&handle)
      .runic_page_size(2)
      .runic_utxos(&address, rune_id)
      .unwrap();

    assert_eq!(balance.total, 1750);
    assert_eq!(balance.divisibility, 2);
    assert_eq!(
      balance
        .utxos
        .iter()
        .map(|utxo| (utxo.utxo.outpoint, utxo.amount))
        .collect::<Vec<_>>(),
      [(outpoint(1), 1000), (outpoint(2), 500), (outpoint(4), 250)]
    );

    let requests = handle.requests();

    assert_eq!(
      requests[0].path,
      format!("/v1/indexer/address/{address}/runes/1:1/utxo")
    );

    assert_eq!(
      requests
        .into_iter()
        .map(|request| request.query)
        .collect::<Vec<String>>(),
      ["start=0&limit=2", "start=2&limit=2"]
    );
  }

  #[test]
  fn output_without_requested_rune_is_a_decode_error() {
    let address = address();

    let handle = mockindexer::builder()
      .runic(outpoint(1), 546, address.script_pubkey(), "1:1", 1000, 0)
      .runic(outpoint(2), 546, address.script_pubkey(), "2:1", 700, 0)
      .unfiltered_runes()
      .build();

    let err = indexer(&handle)
      .runic_utxos(&address, RuneId { block: 1, tx: 1 })
      .unwrap_err();

    assert_matches!(&err, SplitError::IndexerDecode { .. });

    assert!(err
      .to_string()
      .ends_with(&format!("output {} does not hold rune 1:1", outpoint(2))));
  }

  #[test]
  fn runic_utxos_with_no_balance() {
    let handle = mockindexer::builder().build();

    assert_eq!(
      indexer(&handle)
        .runic_utxos(&address(), RuneId { block: 1, tx: 1 })
        .unwrap(),
      RunicBalance::default()
    );
  }

  #[test]
  fn invalid_address() {
    let address = address();

    let handle = mockindexer::builder()
      .invalid_address(&address.to_string())
      .build();

    assert_matches!(
      indexer(&handle).cardinal_utxos(&address),
      Err(SplitError::InvalidAddress { .. })
    );

    assert_matches!(
      indexer(&handle).runic_utxos(&address, RuneId { block: 1, tx: 1 }),
      Err(SplitError::InvalidAddress { .. })
    );
  }

  #[test]
  fn rejected_token_is_a_request_error() {
    let handle = mockindexer::builder().token("bar").build();

    assert_matches!(
      indexer(&handle).cardinal_utxos(&address()),
      Err(SplitError::IndexerRequest { .. })
    );
  }

  #[test]
  fn unreachable_indexer_is_a_request_error() {
    let indexer = Indexer::new("http://127.0.0.1:1".parse().unwrap(), None, None).unwrap();

    assert_matches!(
      indexer.cardinal_utxos(&address()),
      Err(SplitError::IndexerRequest { .. })
    );
  }

  #[test]
  fn other_error_codes_are_response_errors() {
    let handle = mockindexer::builder().error_code(-2, "rate limited").build();

    assert_eq!(
      indexer(&handle)
        .cardinal_utxos(&address())
        .unwrap_err()
        .to_string(),
      "indexer returned code -2: rate limited"
    );
  }
}
