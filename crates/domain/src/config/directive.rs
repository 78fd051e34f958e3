use super::errors::ConfigError;
use std::net::{IpAddr, SocketAddr};

const DEFAULT_DNS_PORT: u16 = 53;

/// One entry of the resolution chain, parsed from a config line such as
/// `"forward 1.1.1.1 [2606:4700::1111]:53"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Answer from the mesh membership store, delegate on miss.
    DataMesher,

    /// Send the query to the first upstream that answers.
    Forward(Vec<SocketAddr>),

    /// Log every response produced by the rest of the chain.
    Log,
}

impl Directive {
    pub const DATA_MESHER: &'static str = "data-mesher";
    pub const FORWARD: &'static str = "forward";
    pub const LOG: &'static str = "log";

    pub fn name(&self) -> &'static str {
        match self {
            Directive::DataMesher => Self::DATA_MESHER,
            Directive::Forward(_) => Self::FORWARD,
            Directive::Log => Self::LOG,
        }
    }

    pub fn parse(line: &str) -> Result<Self, ConfigError> {
        let mut tokens = line.split_whitespace();
        let Some(head) = tokens.next() else {
            return Err(ConfigError::Validation("Empty chain directive".to_string()));
        };
        let args: Vec<&str> = tokens.collect();

        match head {
            Self::DATA_MESHER => {
                no_arguments(Self::DATA_MESHER, &args)?;
                Ok(Directive::DataMesher)
            }
            Self::LOG => {
                no_arguments(Self::LOG, &args)?;
                Ok(Directive::Log)
            }
            Self::FORWARD => {
                if args.is_empty() {
                    return Err(ConfigError::Directive {
                        directive: Self::FORWARD,
                        reason: "at least one upstream address is required".to_string(),
                    });
                }
                let upstreams = args
                    .iter()
                    .map(|arg| parse_upstream(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Directive::Forward(upstreams))
            }
            other => Err(ConfigError::UnknownDirective(other.to_string())),
        }
    }

    /// Parses and validates a whole chain, in order.
    pub fn parse_chain<S: AsRef<str>>(lines: &[S]) -> Result<Vec<Self>, ConfigError> {
        if lines.is_empty() {
            return Err(ConfigError::Validation(
                "Resolution chain has no directives".to_string(),
            ));
        }

        let chain = lines
            .iter()
            .map(|line| Self::parse(line.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        for name in [Self::DATA_MESHER, Self::LOG] {
            if chain.iter().filter(|d| d.name() == name).count() > 1 {
                return Err(ConfigError::Directive {
                    directive: name,
                    reason: "this directive can only be used once per chain".to_string(),
                });
            }
        }

        if let Some(pos) = chain.iter().position(|d| matches!(d, Directive::Forward(_))) {
            if pos != chain.len() - 1 {
                return Err(ConfigError::Directive {
                    directive: Self::FORWARD,
                    reason: "must be the last directive in the chain".to_string(),
                });
            }
        }

        if matches!(chain.last(), Some(Directive::Log)) {
            return Err(ConfigError::Directive {
                directive: Self::LOG,
                reason: "needs at least one directive after it to wrap".to_string(),
            });
        }

        Ok(chain)
    }
}

fn no_arguments(directive: &'static str, args: &[&str]) -> Result<(), ConfigError> {
    match args.first() {
        None => Ok(()),
        Some(extra) => Err(ConfigError::Directive {
            directive,
            reason: format!(
                "Wrong argument count or unexpected line ending after '{}'",
                extra
            ),
        }),
    }
}

fn parse_upstream(arg: &str) -> Result<SocketAddr, ConfigError> {
    if let Ok(addr) = arg.parse::<SocketAddr>() {
        return Ok(addr);
    }
    arg.parse::<IpAddr>()
        .map(|ip| SocketAddr::new(ip, DEFAULT_DNS_PORT))
        .map_err(|_| ConfigError::Directive {
            directive: Directive::FORWARD,
            reason: format!("invalid upstream address '{}'", arg),
        })
}
