//! Expansion of `{placeholder}` tokens in chat formats.

use crate::config::{ChatConfig, DEFAULT_TIME_PATTERN};
use crate::services::Services;
use chrono::{DateTime, FixedOffset, Local, TimeZone, Utc};
use chrono_tz::Tz;
use mchprs_plugin::event::{ChatSender, ServerContext};
use mchprs_plugin::services::PlaceholderHook;
use mchprs_text::{LegacySerializer, SECTION_SIGN};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fmt::{self, Write};
use std::sync::Arc;
use tracing::warn;

static HEX_AMPERSAND_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new("(?i)&?#([0-9a-f]{6})").unwrap());

/// Rewrites `§` codes to `&` codes and hex colors to the repeated
/// `&x&r&r&g&g&b&b` form, so the text can be parsed along with the format.
pub fn normalize_legacy_codes(input: &str) -> String {
    if input.trim().is_empty() {
        return String::new();
    }
    let ampersand = input.replace(SECTION_SIGN, "&");
    HEX_AMPERSAND_REGEX
        .replace_all(&ampersand, |caps: &Captures<'_>| {
            let mut out = String::from("&x");
            for digit in caps[1].chars() {
                out.push('&');
                out.push(digit);
            }
            out
        })
        .into_owned()
}

fn world_clock(ticks: i64) -> (i64, i64) {
    // Tick 0 is 06:00
    let ticks = (ticks.rem_euclid(24000) + 6000) % 24000;
    let total_minutes = ticks * 60 / 1000;
    (total_minutes / 60, total_minutes % 60)
}

pub fn world_time_24(ticks: i64) -> String {
    let (hours, minutes) = world_clock(ticks);
    format!("{:02}:{:02}", hours, minutes)
}

pub fn world_time_12(ticks: i64) -> String {
    let (hours, minutes) = world_clock(ticks);
    let hours_12 = if hours % 12 == 0 { 12 } else { hours % 12 };
    let suffix = if hours < 12 { "AM" } else { "PM" };
    format!("{}:{:02} {}", hours_12, minutes, suffix)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockZone {
    /// The server's local time zone
    Server,
    Fixed(FixedOffset),
    Named(Tz),
}

impl ClockZone {
    /// Accepts `server`, `UTC`/`GMT`/`Z`, a zone name such as `Europe/Berlin`,
    /// or an offset such as `+02:00`, optionally written as `UTC+02:00`.
    pub fn parse(zone: &str) -> Option<ClockZone> {
        let zone = zone.trim();
        if zone.is_empty() || zone.eq_ignore_ascii_case("server") {
            return Some(ClockZone::Server);
        }
        if ["utc", "gmt", "z"].iter().any(|utc| zone.eq_ignore_ascii_case(utc)) {
            return FixedOffset::east_opt(0).map(ClockZone::Fixed);
        }
        if let Ok(named) = zone.parse::<Tz>() {
            return Some(ClockZone::Named(named));
        }
        let offset = zone
            .strip_prefix("UTC")
            .or_else(|| zone.strip_prefix("GMT"))
            .unwrap_or(zone);
        offset.parse().ok().map(ClockZone::Fixed)
    }

    fn format(self, instant: DateTime<Utc>, pattern: &str) -> Result<String, fmt::Error> {
        match self {
            ClockZone::Server => format_in(instant.with_timezone(&Local), pattern),
            ClockZone::Fixed(offset) => format_in(instant.with_timezone(&offset), pattern),
            ClockZone::Named(named) => format_in(instant.with_timezone(&named), pattern),
        }
    }
}

// Fails for specifiers that are only valid when parsing, such as `%#z`.
fn format_in<Z: TimeZone>(time: DateTime<Z>, pattern: &str) -> Result<String, fmt::Error>
where
    Z::Offset: fmt::Display,
{
    let mut out = String::new();
    write!(out, "{}", time.format(pattern))?;
    Ok(out)
}

fn is_valid_pattern(zone: ClockZone, pattern: &str) -> bool {
    zone.format(Utc::now(), pattern).is_ok()
}

/// Formats the wall clock time for `{time}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WallClock {
    zone: ClockZone,
    pattern: String,
}

impl WallClock {
    /// Invalid settings are logged and replaced by the server zone and
    /// `%H:%M:%S`.
    pub fn from_config(pattern: &str, zone: &str) -> WallClock {
        let zone = ClockZone::parse(zone).unwrap_or_else(|| {
            warn!("Invalid chat.time_zone {:?} in config, using server time zone.", zone);
            ClockZone::Server
        });
        let pattern = if is_valid_pattern(zone, pattern) {
            pattern.to_string()
        } else {
            warn!(
                "Invalid chat.time_pattern {:?} in config, using {}.",
                pattern, DEFAULT_TIME_PATTERN
            );
            DEFAULT_TIME_PATTERN.to_string()
        };
        WallClock { zone, pattern }
    }

    pub fn zone(&self) -> ClockZone {
        self.zone
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn now(&self) -> String {
        self.format(Utc::now())
    }

    pub fn format(&self, instant: DateTime<Utc>) -> String {
        self.zone
            .format(instant, &self.pattern)
            .or_else(|_| self.zone.format(instant, DEFAULT_TIME_PATTERN))
            .unwrap_or_default()
    }
}

/// Everything the placeholders of one chat event expand to, captured once
/// when the event is handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderContext {
    pub uuid: u128,
    pub player: String,
    pub display_name: String,
    pub prefix: String,
    pub world: String,
    pub world_alias: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub time: String,
    pub world_time_24: String,
    pub world_time_12: String,
    pub online_players: usize,
    pub max_players: usize,
    pub balance: String,
    pub balance_formatted: String,
}

impl PlaceholderContext {
    pub fn capture(
        sender: &ChatSender,
        prefix: &str,
        config: &ChatConfig,
        clock: &WallClock,
        services: &Services,
        server: &dyn ServerContext,
    ) -> PlaceholderContext {
        let ticks = server.world_time(&sender.world);
        let (balance, balance_formatted) =
            services.balances(sender, &config.chat.balance_unavailable);
        PlaceholderContext {
            uuid: sender.uuid,
            player: sender.username.clone(),
            display_name: normalize_legacy_codes(
                &LegacySerializer::ampersand().serialize(&sender.display_name),
            ),
            prefix: normalize_legacy_codes(prefix),
            world: config.chat.world_name_formats.resolve(&sender.world),
            world_alias: services.world_alias(&sender.world),
            x: sender.pos.x,
            y: sender.pos.y,
            z: sender.pos.z,
            time: clock.now(),
            world_time_24: world_time_24(ticks),
            world_time_12: world_time_12(ticks),
            online_players: server.online_players(),
            max_players: server.max_players(),
            balance,
            balance_formatted,
        }
    }

    /// Replaces the built-in placeholders. `{message}` is left untouched.
    pub fn apply(&self, input: &str) -> String {
        input
            .replace("{prefix}", &self.prefix)
            .replace("{player}", &self.player)
            .replace("{display_name}", &self.display_name)
            .replace("{world}", &self.world)
            .replace("{world_alias}", &self.world_alias)
            .replace("{x}", &self.x.to_string())
            .replace("{y}", &self.y.to_string())
            .replace("{z}", &self.z.to_string())
            .replace("{time}", &self.time)
            .replace("{world_time_24}", &self.world_time_24)
            .replace("{world_time_12}", &self.world_time_12)
            .replace("{online_players}", &self.online_players.to_string())
            .replace("{max_players}", &self.max_players.to_string())
            .replace("{balance}", &self.balance)
            .replace("{balance_formatted}", &self.balance_formatted)
    }
}

/// The built-in placeholders followed by the external placeholder service.
#[derive(Clone)]
pub struct Placeholders {
    context: PlaceholderContext,
    hook: Option<Arc<dyn PlaceholderHook>>,
}

impl Placeholders {
    pub fn new(context: PlaceholderContext, hook: Option<Arc<dyn PlaceholderHook>>) -> Placeholders {
        Placeholders { context, hook }
    }

    pub fn context(&self) -> &PlaceholderContext {
        &self.context
    }

    pub fn expand(&self, input: &str) -> String {
        let output = self.context.apply(input);
        match &self.hook {
            Some(hook) => hook.set_placeholders(self.context.uuid, &output),
            None => output,
        }
    }
}
