use once_cell::sync::Lazy;

pub static CONFIG: Lazy<Config> = Lazy::new(Config::parse);

use decoder::Mode;
use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    Arm,
    #[serde(alias = "powerpc")]
    Ppc,
}

#[derive(Debug, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// architecture instructions are decoded for.
    #[serde(default = "defaults::arch")]
    pub arch: Arch,
    /// decoding mode, a single name or a list of them.
    #[serde(default = "defaults::mode", deserialize_with = "mode")]
    pub mode: Mode,
    /// build a detail record for every instruction.
    #[serde(default = "defaults::detail")]
    pub detail: bool,
}

impl Config {
    pub fn parse() -> Self {
        let path = match dirs::data_dir() {
            Some(mut dir) => {
                dir.push("opdetail");
                dir.push("config.yaml");
                dir
            }
            None => {
                log::warning!("[config::parse] no data directory, using the default config.");
                return defaults::config();
            }
        };

        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(_) => {
                log::notify!("[config::parse] no config at {}, using the defaults.", path.display());
                return defaults::config();
            }
        };

        match raw.parse() {
            Ok(parsed) => parsed,
            Err(err) => {
                log::warning!("Failed to parse config.\nError: {err}.");

                // parse everything as default
                defaults::config()
            }
        }
    }
}

impl FromStr for Config {
    type Err = serde_yaml::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.trim().is_empty() {
            return Ok(defaults::config());
        }

        serde_yaml::from_str(raw)
    }
}

fn mode_flag<E: de::Error>(name: &str) -> Result<Mode, E> {
    match name.to_ascii_lowercase().as_str() {
        "arm" | "little_endian" | "le" => Ok(Mode::empty()),
        "thumb" => Ok(Mode::THUMB),
        "v8" => Ok(Mode::V8),
        "mclass" => Ok(Mode::MCLASS),
        "big_endian" | "be" => Ok(Mode::BIG_ENDIAN),
        "64" | "mode_64" => Ok(Mode::MODE_64),
        _ => Err(E::custom(format!("unknown mode {name:?}"))),
    }
}

fn mode<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Mode, D::Error> {
    struct ModeParsing;
    impl<'de> Visitor<'de> for ModeParsing {
        type Value = Mode;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("expected a mode name or a list of mode names")
        }

        fn visit_str<E: de::Error>(self, s: &str) -> Result<Self::Value, E> {
            mode_flag(s)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            mode_flag(&v.to_string())
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut mode = Mode::empty();
            while let Some(name) = seq.next_element::<String>()? {
                mode |= mode_flag(&name)?;
            }
            Ok(mode)
        }
    }

    deserializer.deserialize_any(ModeParsing)
}

/// Default values when one is missing in the config.yaml.
mod defaults {
    use super::Arch;
    use decoder::Mode;

    pub fn config() -> super::Config {
        super::Config {
            arch: arch(),
            mode: mode(),
            detail: detail(),
        }
    }

    pub fn arch() -> Arch {
        Arch::Arm
    }

    pub fn mode() -> Mode {
        Mode::empty()
    }

    pub fn detail() -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_default() {
        let config: Config = "".parse().unwrap();
        assert_eq!(config, defaults::config());
        assert_eq!(config.arch, Arch::Arm);
        assert!(config.detail);
    }

    #[test]
    fn missing_fields_fall_back() {
        let config: Config = "detail: false\n".parse().unwrap();
        assert_eq!(config.arch, Arch::Arm);
        assert_eq!(config.mode, Mode::empty());
        assert!(!config.detail);
    }

    #[test]
    fn modes() {
        let config: Config = "arch: powerpc\nmode: [big_endian, mode_64]\n".parse().unwrap();
        assert_eq!(config.arch, Arch::Ppc);
        assert_eq!(config.mode, Mode::BIG_ENDIAN | Mode::MODE_64);

        let config: Config = "mode: Thumb\n".parse().unwrap();
        assert_eq!(config.mode, Mode::THUMB);

        let config: Config = "mode: 64\n".parse().unwrap();
        assert_eq!(config.mode, Mode::MODE_64);
    }

    #[test]
    fn unknown_values_are_rejected() {
        assert!("mode: [thumb, sparc]\n".parse::<Config>().is_err());
        assert!("arch: mips\n".parse::<Config>().is_err());
    }
}
