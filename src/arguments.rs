use {
  super::*,
  clap::builder::styling::{AnsiColor, Effects, Styles},
  std::collections::BTreeMap,
};

const ENV_PREFIX: &str = "RUNE_SPLIT_";

#[derive(Debug, Parser)]
#[command(
  version,
  styles = Styles::styled()
    .error(AnsiColor::Red.on_default() | Effects::BOLD)
    .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
    .invalid(AnsiColor::Red.on_default())
    .literal(AnsiColor::Blue.on_default())
    .placeholder(AnsiColor::Cyan.on_default())
    .usage(AnsiColor::Yellow.on_default() | Effects::BOLD)
    .valid(AnsiColor::Green.on_default()),
)]
pub struct Arguments {
  #[command(flatten)]
  pub options: Options,
  #[command(subcommand)]
  pub subcommand: Subcommand,
}

impl Arguments {
  pub(crate) fn run(self) -> SnafuResult<Option<Box<dyn subcommand::Output>>> {
    let mut env = BTreeMap::<String, String>::new();

    for (variable, value) in env::vars_os() {
      let Some(variable) = variable.to_str() else {
        continue;
      };

      let Some(key) = variable.strip_prefix(ENV_PREFIX) else {
        continue;
      };

      env.insert(
        key.into(),
        value.into_string().map_err(|value| {
          error::EnvVarUnicode {
            variable: variable.to_string(),
            value,
          }
          .build()
        })?,
      );
    }

    Ok(self.subcommand.run(Settings::load(self.options, env)?)?)
  }
}
