use {
  axum::{
    extract::{Path, Query, State as Extract},
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
  },
  bitcoin::{OutPoint, ScriptBuf},
  serde::Deserialize,
  serde_json::{json, Value},
  state::{Entry, State},
  std::{
    net::TcpListener,
    sync::{Arc, Mutex, MutexGuard},
    thread,
  },
  tokio::sync::oneshot,
};

mod server;
mod state;

pub fn builder() -> Builder {
  Builder {
    error_code: None,
    fastest_fee: Some(1.0),
    invalid_address: None,
    token: None,
    unfiltered_runes: false,
    utxos: Vec::new(),
  }
}

pub fn spawn() -> Handle {
  builder().build()
}

pub struct Builder {
  error_code: Option<(i64, String)>,
  fastest_fee: Option<f64>,
  invalid_address: Option<String>,
  token: Option<String>,
  unfiltered_runes: bool,
  utxos: Vec<Entry>,
}

impl Builder {
  /// Output holding only bitcoin.
  pub fn cardinal(mut self, outpoint: OutPoint, value: u64, script_pubkey: ScriptBuf) -> Self {
    self.utxos.push(Entry {
      outpoint,
      value,
      script_pubkey,
      rune: None,
    });
    self
  }

  /// Output holding `amount` of the rune with id `rune_id`.
  pub fn runic(
    mut self,
    outpoint: OutPoint,
    value: u64,
    script_pubkey: ScriptBuf,
    rune_id: &str,
    amount: u128,
    divisibility: u8,
  ) -> Self {
    self.utxos.push(Entry {
      outpoint,
      value,
      script_pubkey,
      rune: Some((rune_id.into(), amount, divisibility)),
    });
    self
  }

  /// Answer every indexer request with `code` and `message`.
  pub fn error_code(self, code: i64, message: &str) -> Self {
    Self {
      error_code: Some((code, message.into())),
      ..self
    }
  }

  /// Recommended fastest fee rate, or `None` to fail fee requests.
  pub fn fastest_fee(self, fastest_fee: Option<f64>) -> Self {
    Self {
      fastest_fee,
      ..self
    }
  }

  /// Reject requests for `address` with code `-1`.
  pub fn invalid_address(self, address: &str) -> Self {
    Self {
      invalid_address: Some(address.into()),
      ..self
    }
  }

  /// Require `Authorization: Bearer <token>` on indexer requests.
  pub fn token(self, token: &str) -> Self {
    Self {
      token: Some(token.into()),
      ..self
    }
  }

  /// Answer rune requests with every runic output, whichever rune it holds.
  pub fn unfiltered_runes(self) -> Self {
    Self {
      unfiltered_runes: true,
      ..self
    }
  }

  pub fn build(self) -> Handle {
    let state = Arc::new(Mutex::new(State {
      error_code: self.error_code,
      fastest_fee: self.fastest_fee,
      invalid_address: self.invalid_address,
      requests: Vec::new(),
      token: self.token,
      unfiltered_runes: self.unfiltered_runes,
      utxos: self.utxos,
    }));

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let port = listener.local_addr().unwrap().port();

    let (shutdown, signal) = oneshot::channel::<()>();

    let router = server::router(state.clone());

    thread::spawn(move || {
      tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(async move {
          let listener = tokio::net::TcpListener::from_std(listener).unwrap();

          axum::serve(listener, router)
            .with_graceful_shutdown(async {
              signal.await.ok();
            })
            .await
            .unwrap();
        });
    });

    Handle {
      port,
      shutdown: Some(shutdown),
      state,
    }
  }
}

/// A request received by the mock, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
  pub path: String,
  pub query: String,
  pub authorization: Option<String>,
}

pub struct Handle {
  port: u16,
  shutdown: Option<oneshot::Sender<()>>,
  state: Arc<Mutex<State>>,
}

impl Handle {
  pub fn url(&self) -> String {
    format!("http://127.0.0.1:{}", self.port)
  }

  pub fn requests(&self) -> Vec<Request> {
    self.state().requests.clone()
  }

  fn state(&self) -> MutexGuard<State> {
    self.state.lock().unwrap()
  }
}

impl Drop for Handle {
  fn drop(&mut self) {
    if let Some(shutdown) = self.shutdown.take() {
      shutdown.send(()).ok();
    }
  }
}
