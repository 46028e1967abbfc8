use super::*;

#[derive(Debug)]
pub(crate) struct Entry {
  pub(crate) outpoint: OutPoint,
  pub(crate) value: u64,
  pub(crate) script_pubkey: ScriptBuf,
  pub(crate) rune: Option<(String, u128, u8)>,
}

impl Entry {
  pub(crate) fn holds(&self, rune_id: &str) -> bool {
    self.rune.as_ref().is_some_and(|(id, ..)| id == rune_id)
  }

  pub(crate) fn to_json(&self) -> Value {
    let mut utxo = json!({
      "txid": self.outpoint.txid.to_string(),
      "vout": self.outpoint.vout,
      "satoshi": self.value,
      "scriptType": "5120",
      "scriptPk": self.script_pubkey.to_hex_string(),
      "codeType": 9,
      "address": "",
      "height": 840000,
      "idx": 0,
      "isOpInRBF": false,
      "isSpent": false,
      "inscriptions": [],
    });

    if let Some((rune_id, amount, divisibility)) = &self.rune {
      utxo["runes"] = json!([{
        "rune": "",
        "runeid": rune_id,
        "spacedRune": "",
        "amount": amount.to_string(),
        "symbol": "",
        "divisibility": divisibility,
      }]);
    }

    utxo
  }
}

#[derive(Debug)]
pub(crate) struct State {
  pub(crate) error_code: Option<(i64, String)>,
  pub(crate) fastest_fee: Option<f64>,
  pub(crate) invalid_address: Option<String>,
  pub(crate) requests: Vec<Request>,
  pub(crate) token: Option<String>,
  pub(crate) unfiltered_runes: bool,
  pub(crate) utxos: Vec<Entry>,
}

impl State {
  pub(crate) fn record(&mut self, uri: &Uri, headers: &HeaderMap) {
    self.requests.push(Request {
      path: uri.path().into(),
      query: uri.query().unwrap_or_default().into(),
      authorization: headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string),
    });
  }

  /// Records an indexer request and returns the response it should be
  /// rejected with, if any.
  pub(crate) fn reject(
    &mut self,
    uri: &Uri,
    headers: &HeaderMap,
    address: &str,
  ) -> Option<Response> {
    self.record(uri, headers);

    if let Some(token) = &self.token {
      let expected = format!("Bearer {token}");

      if self.requests.last()?.authorization.as_deref() != Some(expected.as_str()) {
        return Some(StatusCode::UNAUTHORIZED.into_response());
      }
    }

    if let Some((code, message)) = &self.error_code {
      return Some(Json(json!({ "code": code, "msg": message, "data": null })).into_response());
    }

    if self.invalid_address.as_deref() == Some(address) {
      return Some(
        Json(json!({ "code": -1, "msg": "Invalid address", "data": null })).into_response(),
      );
    }

    None
  }
}
