use std::fmt;

use serde::{Deserialize, Serialize};

/// Which profitability convention a channel reports under.
///
/// Paid media is judged by ROAS (revenue / spend, a multiplier); everything
/// else by ROI ((revenue - spend) / spend, a percentage). The two numbers are
/// not comparable, so the convention is a per-channel policy, not a display
/// preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfitabilityBasis {
    Roi,
    Roas,
}

/// The fixed set of marketing/sales channels.
///
/// Canonical display names double as the wire and CSV strings, so they are
/// kept verbatim from the ledger this tool reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Channel {
    #[serde(rename = "BNI GUELAGUETZA")]
    BniGuelaguetza,
    #[serde(rename = "BNI ANTEQUERA")]
    BniAntequera,
    #[serde(rename = "BOCA EN BOCA")]
    BocaEnBoca,
    #[serde(rename = "REDES SOCIALES (META ADS)")]
    MetaAds,
    #[serde(rename = "EMAIL-MKT")]
    EmailMkt,
    #[serde(rename = "WHATSAPP")]
    Whatsapp,
    #[serde(rename = "PATROCINIO EVENTOS")]
    PatrocinioEventos,
    #[serde(rename = "OTROS (PLATICAS, PARTICIPACIÓN EN EVENTOS EXTRAS)")]
    Otros,
}

impl Channel {
    /// Every channel, in canonical reporting order. Grouped views zero-fill
    /// from this list so charts always show the complete set.
    pub const ALL: [Channel; 8] = [
        Channel::BniGuelaguetza,
        Channel::BniAntequera,
        Channel::BocaEnBoca,
        Channel::MetaAds,
        Channel::EmailMkt,
        Channel::Whatsapp,
        Channel::PatrocinioEventos,
        Channel::Otros,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Channel::BniGuelaguetza => "BNI GUELAGUETZA",
            Channel::BniAntequera => "BNI ANTEQUERA",
            Channel::BocaEnBoca => "BOCA EN BOCA",
            Channel::MetaAds => "REDES SOCIALES (META ADS)",
            Channel::EmailMkt => "EMAIL-MKT",
            Channel::Whatsapp => "WHATSAPP",
            Channel::PatrocinioEventos => "PATROCINIO EVENTOS",
            Channel::Otros => "OTROS (PLATICAS, PARTICIPACIÓN EN EVENTOS EXTRAS)",
        }
    }

    /// Case-insensitive match against the canonical names. Leading/trailing
    /// whitespace is ignored; anything else is not a channel.
    pub fn parse(s: &str) -> Option<Channel> {
        let wanted = s.trim().to_lowercase();
        Channel::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().to_lowercase() == wanted)
    }

    /// The exhaustive ROI-vs-ROAS policy table. A new channel variant cannot
    /// compile without declaring its convention here.
    pub fn profitability_basis(self) -> ProfitabilityBasis {
        match self {
            Channel::MetaAds => ProfitabilityBasis::Roas,
            Channel::BniGuelaguetza
            | Channel::BniAntequera
            | Channel::BocaEnBoca
            | Channel::EmailMkt
            | Channel::Whatsapp
            | Channel::PatrocinioEventos
            | Channel::Otros => ProfitabilityBasis::Roi,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an entry's channel field actually holds.
///
/// Hand-edited and imported rows can carry channel text that matches nothing
/// in the enumeration. That text is preserved verbatim so the validator can
/// flag it; it is never silently coerced or dropped at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChannelTag {
    Known(Channel),
    Unknown(String),
}

impl ChannelTag {
    pub fn known(&self) -> Option<Channel> {
        match self {
            ChannelTag::Known(c) => Some(*c),
            ChannelTag::Unknown(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ChannelTag::Known(c) => c.as_str(),
            ChannelTag::Unknown(raw) => raw,
        }
    }
}

impl From<Channel> for ChannelTag {
    fn from(c: Channel) -> Self {
        ChannelTag::Known(c)
    }
}

impl From<String> for ChannelTag {
    fn from(raw: String) -> Self {
        match Channel::parse(&raw) {
            Some(c) => ChannelTag::Known(c),
            None => ChannelTag::Unknown(raw),
        }
    }
}

impl From<&str> for ChannelTag {
    fn from(raw: &str) -> Self {
        ChannelTag::from(raw.to_string())
    }
}

impl From<ChannelTag> for String {
    fn from(tag: ChannelTag) -> Self {
        match tag {
            ChannelTag::Known(c) => c.as_str().to_string(),
            ChannelTag::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for ChannelTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
