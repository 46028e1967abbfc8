use {super::*, std::iter};

/// Safety margins applied when estimating the fee of a draft transaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sizing {
  /// Size of the dummy witness element assumed for every input.
  pub witness_stub_size: usize,
  /// Extra copies of the first output added to the measured transaction.
  pub padding_outputs: usize,
  /// Estimated fees are divided by this.
  pub fee_divisor: f64,
}

impl Default for Sizing {
  fn default() -> Self {
    Self {
      witness_stub_size: 126,
      padding_outputs: 2,
      fee_divisor: 1.4,
    }
  }
}

impl Sizing {
  /// Virtual size of `draft` once every input carries a stub witness and
  /// the padding outputs are appended. `draft` is not modified.
  pub fn estimate_vsize(&self, draft: &Transaction) -> usize {
    let stub = Witness::from_slice(&[vec![0; self.witness_stub_size]]);

    let mut transaction = draft.clone();

    for input in &mut transaction.input {
      input.witness = stub.clone();
    }

    if let Some(first) = draft.output.first() {
      transaction
        .output
        .extend(iter::repeat_n(first, self.padding_outputs).cloned());
    }

    transaction.vsize()
  }

  pub fn estimate_fee(&self, draft: &Transaction, fee_rate: FeeRate) -> Amount {
    fee_rate.fee(self.estimate_vsize(draft), self.fee_divisor)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn draft(inputs: u64) -> Transaction {
    Transaction {
      version: Version::TWO,
      lock_time: LockTime::ZERO,
      input: (0..inputs).map(|n| tx_in(outpoint(n + 1))).collect(),
      output: vec![TxOut {
        value: Amount::ZERO,
        script_pubkey: ScriptBuf::new(),
      }],
    }
  }

  #[test]
  fn stub_witness_and_padding_outputs_are_measured() {
    // 78 base bytes, 130 witness bytes: (78 * 4 + 130) / 4 rounded up
    assert_eq!(Sizing::default().estimate_vsize(&draft(1)), 111);
  }

  #[test]
  fn without_padding_outputs() {
    assert_eq!(
      Sizing {
        padding_outputs: 0,
        ..default()
      }
      .estimate_vsize(&draft(1)),
      93
    );
  }

  #[test]
  fn each_input_adds_stub() {
    let sizing = Sizing::default();

    let one = sizing.estimate_vsize(&draft(1));
    let two = sizing.estimate_vsize(&draft(2));

    // 41 base bytes and 128 witness bytes per input
    assert!(two - one == 73 || two - one == 74);
  }

  #[test]
  fn draft_is_not_modified() {
    let draft = draft(1);
    let before = draft.clone();

    Sizing::default().estimate_vsize(&draft);

    assert_eq!(draft, before);
  }

  #[test]
  fn estimate_matches_manually_padded_transaction() {
    let mut expected = draft(2);

    for input in &mut expected.input {
      input.witness = Witness::from_slice(&[[0u8; 126]]);
    }

    expected.output.push(expected.output[0].clone());
    expected.output.push(expected.output[0].clone());

    assert_eq!(
      Sizing::default().estimate_vsize(&draft(2)),
      expected.vsize()
    );
  }

  #[test]
  fn fee_is_floor_of_vsize_times_rate_over_divisor() {
    // 111 * 150 / 1.4 = 11892.86
    assert_eq!(
      Sizing::default().estimate_fee(&draft(1), "150".parse().unwrap()),
      Amount::from_sat(11892)
    );
  }
}
