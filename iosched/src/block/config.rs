// Options follow the kernel command-line convention: whitespace separated
// `key=value` pairs, unknown keys ignored.
use crate::block::block_error::BlockError;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::str::FromStr;
use nom::branch::alt;
use nom::bytes::complete::{tag, take_till, take_till1, take_while1};
use nom::character::complete::{char, digit1, multispace0, multispace1};
use nom::combinator::{all_consuming, map_res, opt, value};
use nom::multi::separated_list0;
use nom::sequence::{delimited, pair, preceded};
use nom::IResult;

/// Elevator selected when none is configured.
pub const DEFAULT_ELEVATOR: &str = "clook";

/// Pending requests an elevator reserves room for up front.
pub const DEFAULT_QUEUE_DEPTH: usize = 128;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElevatorConfig {
    /// `elevator=<name>`
    pub elevator: String,
    /// `queue_depth=<n>`
    pub queue_depth: usize,
    /// `clook.trace=<0|1|on|off|true|false>`
    ///
    /// Whether the C-LOOK elevator writes its add/dispatch lines.
    pub trace: bool,
}

impl Default for ElevatorConfig {
    fn default() -> Self {
        Self {
            elevator: DEFAULT_ELEVATOR.to_string(),
            queue_depth: DEFAULT_QUEUE_DEPTH,
            trace: true,
        }
    }
}

impl ElevatorConfig {
    pub fn with_elevator(mut self, name: &str) -> Self {
        self.elevator = name.to_string();
        self
    }

    /// Parse boot arguments on top of the defaults.
    pub fn parse(args: &str) -> Result<Self, BlockError> {
        let mut config = Self::default();

        let (_, parsed) = all_consuming(options)(args)
            .map_err(|_| BlockError::InvalidConfig(args.trim().to_string()))?;

        for (key, val) in parsed {
            let invalid = || BlockError::InvalidConfig(option_text(key, val));
            match key {
                "elevator" => {
                    config.elevator = val
                        .and_then(|v| parse_value(elevator_name, v))
                        .ok_or_else(invalid)?
                        .to_string();
                }
                "queue_depth" => {
                    config.queue_depth = val
                        .and_then(|v| parse_value(depth, v))
                        .ok_or_else(invalid)?;
                }
                "clook.trace" => {
                    // A bare flag turns the option on.
                    config.trace = match val {
                        None => true,
                        Some(v) => parse_value(switch, v).ok_or_else(invalid)?,
                    };
                }
                _ => {}
            }
        }

        Ok(config)
    }
}

impl FromStr for ElevatorConfig {
    type Err = BlockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn option_text(key: &str, val: Option<&str>) -> String {
    match val {
        Some(v) => alloc::format!("{key}={v}"),
        None => key.to_string(),
    }
}

fn option(input: &str) -> IResult<&str, (&str, Option<&str>)> {
    pair(
        take_till1(|c: char| c == '=' || c.is_whitespace()),
        opt(preceded(char('='), take_till(|c: char| c.is_whitespace()))),
    )(input)
}

fn options(input: &str) -> IResult<&str, Vec<(&str, Option<&str>)>> {
    delimited(multispace0, separated_list0(multispace1, option), multispace0)(input)
}

fn elevator_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-')(input)
}

fn depth(input: &str) -> IResult<&str, usize> {
    map_res(digit1, usize::from_str)(input)
}

fn switch(input: &str) -> IResult<&str, bool> {
    alt((
        value(true, alt((tag("1"), tag("on"), tag("true")))),
        value(false, alt((tag("0"), tag("off"), tag("false")))),
    ))(input)
}

fn parse_value<'a, T>(parser: fn(&'a str) -> IResult<&'a str, T>, input: &'a str) -> Option<T> {
    all_consuming(parser)(input).ok().map(|(_, v)| v)
}
