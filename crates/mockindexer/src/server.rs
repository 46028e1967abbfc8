use super::*;

type Shared = Arc<Mutex<State>>;

#[derive(Deserialize)]
struct CursorQuery {
  cursor: Option<usize>,
  size: Option<usize>,
}

#[derive(Deserialize)]
struct StartQuery {
  start: Option<usize>,
  limit: Option<usize>,
}

pub(crate) fn router(state: Shared) -> Router {
  Router::new()
    .route(
      "/v1/indexer/address/{address}/utxo-data",
      get(cardinal_utxos),
    )
    .route(
      "/v1/indexer/address/{address}/runes/{rune_id}/utxo",
      get(runic_utxos),
    )
    .route("/api/v1/fees/recommended", get(recommended_fees))
    .with_state(state)
}

async fn cardinal_utxos(
  Extract(state): Extract<Shared>,
  Path(address): Path<String>,
  Query(query): Query<CursorQuery>,
  uri: Uri,
  headers: HeaderMap,
) -> Response {
  let mut state = state.lock().unwrap();

  if let Some(response) = state.reject(&uri, &headers, &address) {
    return response;
  }

  let utxos = state
    .utxos
    .iter()
    .filter(|entry| entry.rune.is_none())
    .collect::<Vec<&Entry>>();

  page(&utxos, query.cursor.unwrap_or(0), query.size.unwrap_or(16))
}

async fn runic_utxos(
  Extract(state): Extract<Shared>,
  Path((address, rune_id)): Path<(String, String)>,
  Query(query): Query<StartQuery>,
  uri: Uri,
  headers: HeaderMap,
) -> Response {
  let mut state = state.lock().unwrap();

  if let Some(response) = state.reject(&uri, &headers, &address) {
    return response;
  }

  let utxos = state
    .utxos
    .iter()
    .filter(|entry| {
      entry.holds(&rune_id) || (state.unfiltered_runes && entry.rune.is_some())
    })
    .collect::<Vec<&Entry>>();

  page(&utxos, query.start.unwrap_or(0), query.limit.unwrap_or(10))
}

async fn recommended_fees(
  Extract(state): Extract<Shared>,
  uri: Uri,
  headers: HeaderMap,
) -> Response {
  let mut state = state.lock().unwrap();

  state.record(&uri, &headers);

  match state.fastest_fee {
    Some(fastest_fee) => Json(json!({
      "fastestFee": fastest_fee,
      "halfHourFee": fastest_fee,
      "hourFee": fastest_fee,
      "economyFee": fastest_fee,
      "minimumFee": 1,
    }))
    .into_response(),
    None => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
  }
}

fn page(utxos: &[&Entry], offset: usize, limit: usize) -> Response {
  Json(json!({
    "code": 0,
    "msg": "ok",
    "data": {
      "cursor": offset,
      "total": utxos.len(),
      "totalConfirmed": utxos.len(),
      "totalUnconfirmed": 0,
      "totalUnconfirmedSpend": 0,
      "utxo": utxos
        .iter()
        .skip(offset)
        .take(limit)
        .map(|entry| entry.to_json())
        .collect::<Vec<Value>>(),
    },
  }))
  .into_response()
}
