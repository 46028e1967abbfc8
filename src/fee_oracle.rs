use super::*;

/// Client for a mempool.space-compatible fee estimation API.
#[derive(Debug, Clone)]
pub struct FeeOracle {
  client: reqwest::blocking::Client,
  fallback: FeeRate,
  url: Url,
}

impl FeeOracle {
  pub const FALLBACK_FEE_RATE: FeeRate = FeeRate(40.0 * 3.0);
  pub const FEE_RATE_FLOOR: FeeRate = FeeRate(150.0);

  pub fn new(url: Url, fallback: FeeRate, timeout: Option<Duration>) -> Result<Self> {
    ensure!(!url.cannot_be_a_base(), "invalid fee URL `{url}`");

    let mut headers = HeaderMap::new();
    headers.insert(
      reqwest::header::ACCEPT,
      reqwest::header::HeaderValue::from_static("application/json"),
    );

    Ok(Self {
      client: reqwest::blocking::ClientBuilder::new()
        .timeout(timeout)
        .default_headers(headers)
        .build()?,
      fallback,
      url,
    })
  }

  /// Fastest recommended fee rate, or the fallback if the service can't be
  /// reached or answers with something unusable.
  pub fn fee_rate(&self) -> FeeRate {
    match self.recommended() {
      Ok(fee_rate) => {
        log::info!("Recommended fee rate: {fee_rate} sat/vB");
        fee_rate
      }
      Err(err) => {
        log::warn!(
          "Failed to fetch recommended fee rate, falling back to {} sat/vB: {err:#}",
          self.fallback
        );
        self.fallback
      }
    }
  }

  fn recommended(&self) -> Result<FeeRate> {
    let mut url = self.url.clone();

    if let Ok(mut path) = url.path_segments_mut() {
      path.pop_if_empty().extend(["v1", "fees", "recommended"]);
    }

    let fees = self
      .client
      .get(url.clone())
      .send()?
      .error_for_status()?
      .json::<api::RecommendedFees>()
      .with_context(|| format!("invalid response from `{url}`"))?;

    Ok(fees.fastest_fee)
  }
}
