use std::fmt;
use std::str::FromStr;

use crate::channel::Channel;
use crate::entry::WeeklyEntry;
use crate::movement::CrmMovement;

/// A specific month, or the whole year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthFilter {
    All,
    Month(u32),
}

impl MonthFilter {
    pub fn month(self) -> Option<u32> {
        match self {
            MonthFilter::All => None,
            MonthFilter::Month(m) => Some(m),
        }
    }
}

impl FromStr for MonthFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(MonthFilter::All);
        }
        match s.parse::<u32>() {
            Ok(m) if (1..=12).contains(&m) => Ok(MonthFilter::Month(m)),
            _ => Err(format!("invalid month '{}': expected 1-12 or 'all'", s)),
        }
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str("all"),
            MonthFilter::Month(m) => write!(f, "{}", m),
        }
    }
}

/// A specific channel, or every channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelFilter {
    All,
    One(Channel),
}

impl FromStr for ChannelFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(ChannelFilter::All);
        }
        Channel::parse(s)
            .map(ChannelFilter::One)
            .ok_or_else(|| format!("unknown channel '{}'", s))
    }
}

impl fmt::Display for ChannelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelFilter::All => f.write_str("all"),
            ChannelFilter::One(c) => f.write_str(c.as_str()),
        }
    }
}

/// The active view selection. Drives the current-period record set and, via
/// the period resolver, the previous-period set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Filter {
    pub year: i32,
    pub month: MonthFilter,
    pub channel: ChannelFilter,
}

impl Filter {
    pub fn new(year: i32) -> Self {
        Filter { year, month: MonthFilter::All, channel: ChannelFilter::All }
    }

    pub fn with_month(mut self, month: u32) -> Self {
        self.month = MonthFilter::Month(month);
        self
    }

    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = ChannelFilter::One(channel);
        self
    }

    /// Scope predicate for weekly entries. Lifecycle is a separate concern:
    /// callers decide whether trashed rows are in play.
    pub fn matches_entry(&self, entry: &WeeklyEntry) -> bool {
        if entry.year != self.year {
            return false;
        }
        if let MonthFilter::Month(m) = self.month {
            if entry.month != m {
                return false;
            }
        }
        if let ChannelFilter::One(c) = self.channel {
            if entry.channel.known() != Some(c) {
                return false;
            }
        }
        true
    }

    /// Channel half of the movement predicate. Date-range membership is the
    /// reconciler's job since it depends on the resolved period span.
    pub fn matches_movement_channel(&self, movement: &CrmMovement) -> bool {
        match self.channel {
            ChannelFilter::All => true,
            ChannelFilter::One(c) => movement.channel.known() == Some(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ChannelTag;

    #[test]
    fn month_filter_parses_all_and_ranges() {
        assert_eq!("all".parse::<MonthFilter>().unwrap(), MonthFilter::All);
        assert_eq!("ALL".parse::<MonthFilter>().unwrap(), MonthFilter::All);
        assert_eq!("7".parse::<MonthFilter>().unwrap(), MonthFilter::Month(7));
        assert!("0".parse::<MonthFilter>().is_err());
        assert!("13".parse::<MonthFilter>().is_err());
        assert!("july".parse::<MonthFilter>().is_err());
    }

    #[test]
    fn channel_filter_parses_case_insensitively() {
        assert_eq!(
            "whatsapp".parse::<ChannelFilter>().unwrap(),
            ChannelFilter::One(Channel::Whatsapp)
        );
        assert_eq!("all".parse::<ChannelFilter>().unwrap(), ChannelFilter::All);
        assert!("carrier pigeon".parse::<ChannelFilter>().is_err());
    }

    #[test]
    fn entry_scope_honors_year_month_channel() {
        let filter = Filter::new(2025).with_month(3).with_channel(Channel::Whatsapp);
        let mut row = WeeklyEntry::new(2025, 3, 1, ChannelTag::from("WHATSAPP"));
        assert!(filter.matches_entry(&row));

        row.month = 4;
        assert!(!filter.matches_entry(&row));
        row.month = 3;
        row.channel = ChannelTag::from("EMAIL-MKT");
        assert!(!filter.matches_entry(&row));
        row.year = 2024;
        assert!(!filter.matches_entry(&row));
    }

    #[test]
    fn unknown_channel_rows_match_only_the_all_filter() {
        let row = WeeklyEntry::new(2025, 3, 1, ChannelTag::from("Telegram"));
        assert!(Filter::new(2025).matches_entry(&row));
        assert!(!Filter::new(2025)
            .with_channel(Channel::Whatsapp)
            .matches_entry(&row));
    }
}
